//! 1つのベースパスから解析器を構築する読み込み処理

use std::path::Path;

use vibrato_rkyv::{CacheStrategy, Dictionary, LoadMode, Tokenizer};

use crate::dictionary::{COMPRESSED_DICT_FILE, DICT_FILE, DictionaryPath};
use crate::errors::{KotobaError, Result};
use crate::token::FeatureLayout;
use crate::tokenizer::{Analyzer, VibratoAnalyzer};

/// 1つのベースパスに対する解析器構築の試行
///
/// 実装は副作用を持たず、成功時は構築した解析器を返し、失敗時はエラーを返します。
/// 候補パスの走査や試験解析は[`PathResolver`](crate::dictionary::PathResolver)が担います。
pub trait DictionaryLoader: Send + Sync + 'static {
    /// 構築される解析器の型
    type Analyzer: Analyzer + Send + Sync + 'static;

    /// ベースパスの辞書を読み込み、解析器を構築します
    ///
    /// # エラー
    ///
    /// 辞書ファイルが存在しない、読み込めない、または形式が不正な場合にエラーを返します。
    fn load(&self, base: &DictionaryPath) -> Result<Self::Analyzer>;
}

/// 圧縮辞書の展開結果をキャッシュする場所
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZstdCache {
    /// 圧縮ファイルと同じディレクトリ
    Local,

    /// ユーザーのキャッシュディレクトリ
    #[default]
    GlobalCache,

    /// ユーザーのデータディレクトリ
    GlobalData,
}

impl ZstdCache {
    fn strategy(self) -> CacheStrategy {
        match self {
            Self::Local => CacheStrategy::Local,
            Self::GlobalCache => CacheStrategy::GlobalCache,
            Self::GlobalData => CacheStrategy::GlobalData,
        }
    }
}

/// vibrato-rkyvの辞書を読み込む[`DictionaryLoader`]
///
/// ローカルのベースパスでは`system.dic`を優先し、なければ`system.dic.zst`を展開して
/// 読み込みます。URLのベースパスは`download`フィーチャーが有効な場合のみ扱えます。
///
/// # 例
///
/// ```no_run
/// use kotoba::dictionary::{DictionaryLoader, DictionaryPath, VibratoLoader};
///
/// let loader = VibratoLoader::new().ignore_space(true);
/// let analyzer = loader.load(&DictionaryPath::parse("./dict"))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct VibratoLoader {
    trust_cache: bool,
    zstd_cache: ZstdCache,
    ignore_space: bool,
    max_grouping_len: Option<usize>,
    layout: FeatureLayout,
}

impl Default for VibratoLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl VibratoLoader {
    /// 既定の設定で作成します
    ///
    /// 辞書は読み込みのたびに完全に検証され、圧縮辞書はユーザーのキャッシュディレクトリに
    /// 展開されます。
    pub fn new() -> Self {
        Self {
            trust_cache: false,
            zstd_cache: ZstdCache::default(),
            ignore_space: false,
            max_grouping_len: None,
            layout: FeatureLayout::default(),
        }
    }

    /// 検証済みの証明ファイルがある場合に検証を省略するかどうかを設定します
    pub fn trust_cache(mut self, yes: bool) -> Self {
        self.trust_cache = yes;
        self
    }

    /// 圧縮辞書のキャッシュ場所を設定します
    pub fn zstd_cache(mut self, cache: ZstdCache) -> Self {
        self.zstd_cache = cache;
        self
    }

    /// 入力中の空白を無視するかどうかを設定します
    pub fn ignore_space(mut self, yes: bool) -> Self {
        self.ignore_space = yes;
        self
    }

    /// 未知語の最大グルーピング長を設定します
    pub fn max_grouping_len(mut self, len: Option<usize>) -> Self {
        self.max_grouping_len = len;
        self
    }

    /// 素性文字列の列配置を設定します
    pub fn layout(mut self, layout: FeatureLayout) -> Self {
        self.layout = layout;
        self
    }

    fn load_local(&self, dir: &Path) -> Result<Dictionary> {
        let plain = dir.join(DICT_FILE);
        if plain.is_file() {
            let mode = if self.trust_cache {
                LoadMode::TrustCache
            } else {
                LoadMode::Validate
            };
            return Ok(Dictionary::from_path(&plain, mode)?);
        }

        let compressed = dir.join(COMPRESSED_DICT_FILE);
        if compressed.is_file() {
            return Ok(Dictionary::from_zstd(&compressed, self.zstd_cache.strategy())?);
        }

        Err(KotobaError::invalid_argument(
            "base",
            format!(
                "Neither {DICT_FILE} nor {COMPRESSED_DICT_FILE} exists under {}",
                dir.display()
            ),
        ))
    }

    #[cfg(feature = "download")]
    fn load_remote(&self, base: &str) -> Result<Dictionary> {
        crate::dictionary::fetch::fetch_dictionary(base)
    }

    #[cfg(not(feature = "download"))]
    fn load_remote(&self, base: &str) -> Result<Dictionary> {
        Err(KotobaError::invalid_argument(
            "base",
            format!("Cannot fetch {base}: remote dictionaries require the `download` feature"),
        ))
    }

    fn build(&self, dict: Dictionary) -> Result<VibratoAnalyzer> {
        let mut tokenizer = Tokenizer::new(dict).ignore_space(self.ignore_space)?;
        if let Some(len) = self.max_grouping_len {
            tokenizer = tokenizer.max_grouping_len(len);
        }
        Ok(VibratoAnalyzer::new(tokenizer, self.layout))
    }
}

impl DictionaryLoader for VibratoLoader {
    type Analyzer = VibratoAnalyzer;

    fn load(&self, base: &DictionaryPath) -> Result<VibratoAnalyzer> {
        let dict = match base {
            DictionaryPath::Local(dir) => self.load_local(dir)?,
            DictionaryPath::Remote(url) => self.load_remote(url)?,
        };
        self.build(dict)
    }
}
