//! 語彙の抽出

use std::fmt;

use hashbrown::HashSet;
use rand::Rng;
use serde::{Deserialize, Serialize};
use wana_kana::ConvertJapanese;

use crate::token::Token;
use crate::utils::IdGenerator;

/// 習熟度(0〜5)
///
/// 範囲外の値は作成時に0〜5へ丸められます。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Proficiency(u8);

impl Proficiency {
    /// 最大の習熟度
    pub const MAX: Self = Self(5);

    /// 値を0〜5に丸めて作成します
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX.0))
    }

    /// 値
    pub fn get(self) -> u8 {
        self.0
    }
}

impl From<u8> for Proficiency {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Proficiency> for u8 {
    fn from(value: Proficiency) -> Self {
        value.0
    }
}

impl fmt::Display for Proficiency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX.0)
    }
}

/// 学習用の語彙項目
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    /// 1回の導出の中で一意なID
    pub id: String,

    /// 表層形
    pub word: String,

    /// 読み
    pub reading: String,

    /// 意味(導出時は空)
    pub meaning: String,

    /// 例文(導出時は空)
    pub example: String,

    /// お気に入りかどうか
    pub is_favorite: bool,

    /// 習熟度
    pub proficiency: Proficiency,
}

/// トークン列から語彙を抽出します
///
/// 名詞・動詞・形容詞のトークンを出現順に取り出し、同じ表層形は最初の出現だけを残します。
/// 読みはトークンの読み、なければ表層形をひらがなに変換したものです。
///
/// # 引数
///
/// * `tokens` - 形態素解析の結果
/// * `hiragana_readings` - 読みをひらがなに正規化するかどうか
/// * `rng` - IDの生成に使う乱数生成器
pub fn extract_vocabulary<R>(tokens: &[Token], hiragana_readings: bool, rng: R) -> Vec<VocabularyItem>
where
    R: Rng,
{
    let mut ids = IdGenerator::new(rng);
    let mut seen = HashSet::new();
    let mut vocabulary = vec![];

    for token in tokens {
        if !token.pos().is_content_word() || token.surface().trim().is_empty() {
            continue;
        }
        if !seen.insert(token.surface()) {
            continue;
        }
        let reading = token.reading_or_transliteration();
        let reading = if hiragana_readings {
            reading.as_str().to_hiragana()
        } else {
            reading
        };
        vocabulary.push(VocabularyItem {
            id: ids.next_id(),
            word: token.surface().to_string(),
            reading,
            meaning: String::new(),
            example: String::new(),
            is_favorite: false,
            proficiency: Proficiency::default(),
        });
    }

    vocabulary
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::token::PartOfSpeech;

    fn token(surface: &str, pos: PartOfSpeech, reading: Option<&str>) -> Token {
        Token::new(surface, pos, reading.map(str::to_string), surface)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_content_words_in_order() {
        let tokens = vec![
            token("猫", PartOfSpeech::Noun, Some("ネコ")),
            token("が", PartOfSpeech::Other("助詞".to_string()), Some("ガ")),
            token("見る", PartOfSpeech::Verb, Some("ミル")),
            token("高い", PartOfSpeech::Adjective, Some("タカイ")),
            token("とても", PartOfSpeech::Other("副詞".to_string()), Some("トテモ")),
        ];
        let vocabulary = extract_vocabulary(&tokens, true, rng());
        let words: Vec<_> = vocabulary.iter().map(|v| v.word.as_str()).collect();
        let readings: Vec<_> = vocabulary.iter().map(|v| v.reading.as_str()).collect();
        assert_eq!(vec!["猫", "見る", "高い"], words);
        assert_eq!(vec!["ねこ", "みる", "たかい"], readings);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let tokens = vec![
            token("猫", PartOfSpeech::Noun, Some("ネコ")),
            token("犬", PartOfSpeech::Noun, Some("イヌ")),
            token("猫", PartOfSpeech::Noun, Some("ビョウ")),
        ];
        let vocabulary = extract_vocabulary(&tokens, false, rng());
        assert_eq!(2, vocabulary.len());
        assert_eq!("ネコ", vocabulary[0].reading);
    }

    #[test]
    fn test_missing_reading_falls_back_to_transliteration() {
        let tokens = vec![token("パン", PartOfSpeech::Noun, None)];
        let vocabulary = extract_vocabulary(&tokens, false, rng());
        assert_eq!("ぱん", vocabulary[0].reading);
    }

    #[test]
    fn test_defaults_and_unique_ids() {
        let tokens: Vec<_> = ["一", "二", "三", "四"]
            .iter()
            .map(|s| token(s, PartOfSpeech::Noun, None))
            .collect();
        let vocabulary = extract_vocabulary(&tokens, true, rng());
        let ids: HashSet<_> = vocabulary.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(4, ids.len());
        for item in &vocabulary {
            assert_eq!(9, item.id.len());
            assert!(item.meaning.is_empty());
            assert!(item.example.is_empty());
            assert!(!item.is_favorite);
            assert_eq!(0, item.proficiency.get());
        }
    }

    #[test]
    fn test_proficiency_is_clamped() {
        assert_eq!(5, Proficiency::new(9).get());
        assert_eq!(3, Proficiency::from(3).get());
        let parsed: Proficiency = serde_json::from_str("42").unwrap();
        assert_eq!(Proficiency::MAX, parsed);
    }

    #[test]
    fn test_serialized_field_names() {
        let tokens = vec![token("猫", PartOfSpeech::Noun, Some("ネコ"))];
        let item = &extract_vocabulary(&tokens, true, rng())[0];
        let json = serde_json::to_value(item).unwrap();
        assert_eq!(Some(&serde_json::Value::Bool(false)), json.get("isFavorite"));
        assert_eq!(Some(&serde_json::json!(0)), json.get("proficiency"));
    }
}
