//! 配置環境からの候補パスの導出

use std::env;

use hashbrown::HashSet;

use crate::dictionary::DictionaryPath;

/// 辞書ディレクトリの名前
pub const DICT_DIR_NAME: &str = "dict";

/// 本番環境での辞書ディレクトリの絶対パス
pub const PRODUCTION_DICT_PATH: &str = "/dict";

/// 作業ディレクトリからの相対パス
pub const RELATIVE_DICT_PATH: &str = "./dict";

/// 公開アセットのベースを表す環境変数
pub const PUBLIC_URL_ENV: &str = "PUBLIC_URL";

/// ページのオリジンを表す環境変数
pub const ORIGIN_ENV: &str = "KOTOBA_ORIGIN";

/// 候補パスのリストを組み立てるビルダー
///
/// 候補は次の順で並びます:
///
/// 1. 本番環境の絶対パス(`/dict`)
/// 2. 公開アセットのベースと`dict`の結合(設定されている場合のみ)
/// 3. 相対パス(`./dict`)
/// 4. ページのオリジンと`/dict`の結合(設定されている場合のみ)
/// 5. 追加の候補
///
/// 空の値は除かれ、重複は最初の出現だけが残ります。
///
/// # 例
///
/// ```
/// use kotoba::dictionary::{CandidatePaths, DictionaryPath};
///
/// let paths = CandidatePaths::new()
///     .public_url(Some("/app"))
///     .origin(Some("https://example.com"))
///     .resolve();
/// assert_eq!(
///     vec![
///         DictionaryPath::parse("/dict"),
///         DictionaryPath::parse("/app/dict"),
///         DictionaryPath::parse("./dict"),
///         DictionaryPath::parse("https://example.com/dict"),
///     ],
///     paths,
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidatePaths {
    production: Option<String>,
    public_url: Option<String>,
    relative: Option<String>,
    origin: Option<String>,
    extra: Vec<String>,
}

impl CandidatePaths {
    /// 本番パスと相対パスを含む既定の候補を作成します
    pub fn new() -> Self {
        Self {
            production: Some(PRODUCTION_DICT_PATH.to_string()),
            relative: Some(RELATIVE_DICT_PATH.to_string()),
            ..Self::default()
        }
    }

    /// 候補を1つも含まないビルダーを作成します
    pub fn empty() -> Self {
        Self::default()
    }

    /// 環境変数`PUBLIC_URL`と`KOTOBA_ORIGIN`を反映した既定の候補を作成します
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の変数参照関数を使って既定の候補を作成します
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new()
            .public_url(lookup(PUBLIC_URL_ENV))
            .origin(lookup(ORIGIN_ENV))
    }

    /// 本番環境の絶対パスを設定します
    pub fn production<S: Into<String>>(mut self, path: Option<S>) -> Self {
        self.production = path.map(Into::into);
        self
    }

    /// 公開アセットのベースを設定します
    pub fn public_url<S: Into<String>>(mut self, base: Option<S>) -> Self {
        self.public_url = base.map(Into::into);
        self
    }

    /// 相対パスを設定します
    pub fn relative<S: Into<String>>(mut self, path: Option<S>) -> Self {
        self.relative = path.map(Into::into);
        self
    }

    /// ページのオリジンを設定します
    pub fn origin<S: Into<String>>(mut self, origin: Option<S>) -> Self {
        self.origin = origin.map(Into::into);
        self
    }

    /// 追加の候補を末尾に加えます
    pub fn push<S: Into<String>>(mut self, candidate: S) -> Self {
        self.extra.push(candidate.into());
        self
    }

    /// 順序付きで重複のない候補パスのリストを返します
    pub fn resolve(&self) -> Vec<DictionaryPath> {
        let joined = |base: &String| format!("{}/{}", base.trim_end_matches('/'), DICT_DIR_NAME);
        let ordered = [
            self.production.clone(),
            non_empty(&self.public_url).map(joined),
            self.relative.clone(),
            non_empty(&self.origin).map(joined),
        ];

        let mut seen = HashSet::new();
        ordered
            .into_iter()
            .flatten()
            .chain(self.extra.iter().cloned())
            .filter(|candidate| !candidate.trim().is_empty())
            .map(|candidate| DictionaryPath::parse(&candidate))
            .filter(|path| seen.insert(path.clone()))
            .collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&String> {
    value.as_ref().filter(|v| !v.trim().is_empty())
}
