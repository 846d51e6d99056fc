//! 形態素解析結果のトークン
//!
//! 解析器が返す素性文字列を解析し、品詞・読み・原形を持つ所有型の
//! [`Token`]に変換します。

use std::fmt;

use serde::{Deserialize, Serialize};
use wana_kana::ConvertJapanese;

use crate::utils::parse_csv_row;

/// 素性文字列で値がないことを表すフィールド
const ABSENT_FIELD: &str = "*";

/// 品詞
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    /// 名詞
    Noun,
    /// 動詞
    Verb,
    /// 形容詞
    Adjective,
    /// その他の品詞(素性文字列の品詞タグをそのまま保持)
    Other(String),
}

impl PartOfSpeech {
    /// 品詞タグから品詞を求めます
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "名詞" => Self::Noun,
            "動詞" => Self::Verb,
            "形容詞" => Self::Adjective,
            _ => Self::Other(tag.to_string()),
        }
    }

    /// 品詞タグを返します
    pub fn tag(&self) -> &str {
        match self {
            Self::Noun => "名詞",
            Self::Verb => "動詞",
            Self::Adjective => "形容詞",
            Self::Other(tag) => tag,
        }
    }

    /// 語彙として抽出する内容語(名詞・動詞・形容詞)かどうか
    pub fn is_content_word(&self) -> bool {
        matches!(self, Self::Noun | Self::Verb | Self::Adjective)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 素性文字列の列配置
///
/// 品詞は常に先頭の列にあり、読みと原形の位置は辞書の形式によって異なります。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeatureLayout {
    /// IPADIC形式(`品詞,細分類1,細分類2,細分類3,活用型,活用形,原形,読み,発音`)
    #[default]
    Ipadic,

    /// UniDic形式(`品詞,細分類1,細分類2,細分類3,活用型,活用形,語彙素読み,語彙素,...`)
    Unidic,
}

impl FeatureLayout {
    fn reading_index(self) -> usize {
        match self {
            Self::Ipadic => 7,
            Self::Unidic => 6,
        }
    }

    fn base_form_index(self) -> usize {
        match self {
            Self::Ipadic => 6,
            Self::Unidic => 7,
        }
    }
}

/// 形態素解析結果の1トークン
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    surface: String,
    pos: PartOfSpeech,
    reading: Option<String>,
    base_form: String,
}

impl Token {
    /// 新しいトークンを作成します
    ///
    /// # 引数
    ///
    /// * `surface` - 表層形
    /// * `pos` - 品詞
    /// * `reading` - 読み(存在しない場合は`None`)
    /// * `base_form` - 原形
    pub fn new<S, B>(surface: S, pos: PartOfSpeech, reading: Option<String>, base_form: B) -> Self
    where
        S: Into<String>,
        B: Into<String>,
    {
        Self {
            surface: surface.into(),
            pos,
            reading,
            base_form: base_form.into(),
        }
    }

    /// 表層形と素性文字列からトークンを作成します
    ///
    /// `*`または空のフィールドは値なしとして扱います。原形がない場合は表層形を使います。
    ///
    /// # 引数
    ///
    /// * `surface` - 表層形
    /// * `feature` - 解析器が返した素性文字列
    /// * `layout` - 素性文字列の列配置
    ///
    /// # 例
    ///
    /// ```
    /// use kotoba::token::{FeatureLayout, PartOfSpeech, Token};
    ///
    /// let token = Token::from_feature("猫", "名詞,一般,*,*,*,*,猫,ネコ,ネコ", FeatureLayout::Ipadic);
    /// assert_eq!(&PartOfSpeech::Noun, token.pos());
    /// assert_eq!(Some("ネコ"), token.reading());
    /// ```
    pub fn from_feature(surface: &str, feature: &str, layout: FeatureLayout) -> Self {
        let fields = parse_csv_row(feature);
        let field = |i: usize| {
            fields
                .get(i)
                .map(String::as_str)
                .filter(|f| !f.is_empty() && *f != ABSENT_FIELD)
        };
        let pos = field(0).map_or_else(|| PartOfSpeech::Other(String::new()), PartOfSpeech::from_tag);
        let reading = field(layout.reading_index()).map(str::to_string);
        let base_form = field(layout.base_form_index()).unwrap_or(surface).to_string();
        Self {
            surface: surface.to_string(),
            pos,
            reading,
            base_form,
        }
    }

    /// 表層形
    #[inline(always)]
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// 品詞
    #[inline(always)]
    pub fn pos(&self) -> &PartOfSpeech {
        &self.pos
    }

    /// 読み
    #[inline(always)]
    pub fn reading(&self) -> Option<&str> {
        self.reading.as_deref()
    }

    /// 原形
    #[inline(always)]
    pub fn base_form(&self) -> &str {
        &self.base_form
    }

    /// 読み。読みがない場合は表層形をひらがなに変換したもの
    pub fn reading_or_transliteration(&self) -> String {
        match &self.reading {
            Some(reading) => reading.clone(),
            None => self.surface.as_str().to_hiragana(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipadic_feature() {
        let token = Token::from_feature(
            "食べ",
            "動詞,自立,*,*,一段,連用形,食べる,タベ,タベ",
            FeatureLayout::Ipadic,
        );
        assert_eq!("食べ", token.surface());
        assert_eq!(&PartOfSpeech::Verb, token.pos());
        assert_eq!(Some("タベ"), token.reading());
        assert_eq!("食べる", token.base_form());
    }

    #[test]
    fn test_unidic_feature() {
        let token = Token::from_feature(
            "高い",
            "形容詞,一般,*,*,形容詞,終止形-一般,タカイ,高い,高い,タカイ",
            FeatureLayout::Unidic,
        );
        assert_eq!(&PartOfSpeech::Adjective, token.pos());
        assert_eq!(Some("タカイ"), token.reading());
        assert_eq!("高い", token.base_form());
    }

    #[test]
    fn test_unknown_word_feature() {
        let token = Token::from_feature("パン", "名詞,一般,*,*,*,*,*", FeatureLayout::Ipadic);
        assert_eq!(&PartOfSpeech::Noun, token.pos());
        assert_eq!(None, token.reading());
        assert_eq!("パン", token.base_form());
        assert_eq!("ぱん", token.reading_or_transliteration());
    }

    #[test]
    fn test_romaji_surface_transliteration() {
        let reading = |surface: &str| {
            Token::new(surface, PartOfSpeech::Noun, None, surface).reading_or_transliteration()
        };
        assert_eq!("うぃ", reading("wi"));
        assert_eq!("っ", reading("xtsu"));
        assert_eq!("くぁ", reading("kwa"));
        assert_eq!("日本語", reading("日本語"));
    }

    #[test]
    fn test_other_pos() {
        let token = Token::from_feature("とても", "副詞,助詞類接続,*,*,*,*,とても,トテモ,トテモ", FeatureLayout::Ipadic);
        assert_eq!(&PartOfSpeech::Other("副詞".to_string()), token.pos());
        assert!(!token.pos().is_content_word());
    }

    #[test]
    fn test_empty_feature() {
        let token = Token::from_feature("？", "", FeatureLayout::Ipadic);
        assert_eq!(&PartOfSpeech::Other(String::new()), token.pos());
        assert_eq!("？", token.base_form());
    }
}
