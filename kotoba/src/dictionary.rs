//! 辞書の所在の解決と読み込み
//!
//! 辞書は1つのベースパス(ローカルディレクトリまたはHTTP(S)のURL)の下に
//! 置かれた辞書ファイルとして提供されます。このモジュールは以下を提供します:
//!
//! - [`DictionaryPath`]: 候補となるベースパス
//! - [`CandidatePaths`]: 配置環境から候補パスの順序付きリストを導出するビルダー
//! - [`DictionaryLoader`]: 1つのベースパスから解析器を構築する試行関数
//! - [`PathResolver`]: 候補を順に試し、試験解析に成功した最初の解析器を採用する戦略
pub mod candidates;
#[cfg(feature = "download")]
pub(crate) mod fetch;
pub mod loader;
pub mod resolver;

use std::fmt;
use std::path::{Path, PathBuf};

pub use crate::dictionary::candidates::CandidatePaths;
pub use crate::dictionary::loader::{DictionaryLoader, VibratoLoader, ZstdCache};
pub use crate::dictionary::resolver::{AttemptEvent, PathResolver, SMOKE_TEST_TEXT};

/// 圧縮された辞書ファイルの名前
pub const COMPRESSED_DICT_FILE: &str = "system.dic.zst";

/// 非圧縮の辞書ファイルの名前
pub const DICT_FILE: &str = "system.dic";

/// 辞書ファイルが置かれたベースパス
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DictionaryPath {
    /// ローカルファイルシステム上のディレクトリ
    Local(PathBuf),

    /// HTTP(S)のベースURL(末尾の`/`は含まない)
    Remote(String),
}

impl DictionaryPath {
    /// 文字列からベースパスを作成します
    ///
    /// `http://`または`https://`で始まる場合はURL、それ以外はローカルのパスとして扱います。
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Self::Remote(s.trim_end_matches('/').to_string())
        } else {
            Self::Local(PathBuf::from(s))
        }
    }

    /// URLかどうか
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// ローカルパスの場合はそのパスを返します
    pub fn as_local(&self) -> Option<&Path> {
        match self {
            Self::Local(path) => Some(path),
            Self::Remote(_) => None,
        }
    }
}

impl From<&str> for DictionaryPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<PathBuf> for DictionaryPath {
    fn from(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

impl fmt::Display for DictionaryPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}
