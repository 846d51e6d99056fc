//! エラー型の定義
//!
//! このモジュールは、辞書の解決、形態素解析、学習進捗の保存で使用される
//! すべてのエラー型を定義します。

use std::error::Error;
use std::fmt;

use crate::dictionary::DictionaryPath;

/// kotoba専用のResult型
///
/// エラー型としてデフォルトで[`KotobaError`]を使用します。
pub type Result<T, E = KotobaError> = std::result::Result<T, E>;

/// kotobaのエラー型
#[derive(Debug, thiserror::Error)]
pub enum KotobaError {
    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効な状態エラー
    ///
    /// [`InvalidStateError`]のエラーバリアント。
    #[error(transparent)]
    InvalidState(InvalidStateError),

    /// すべての候補パスで辞書の読み込みに失敗したエラー
    #[error(transparent)]
    DictionaryLoad(#[from] DictionaryLoadFailure),

    /// 形態素解析器のエラー
    ///
    /// [`VibratoError`](vibrato_rkyv::errors::VibratoError)のエラーバリアント。
    #[error(transparent)]
    Vibrato(#[from] vibrato_rkyv::errors::VibratoError),

    /// ダウンロードエラー
    ///
    /// [`DownloadError`]のエラーバリアント。
    /// `download`フィーチャーが有効な場合のみ利用可能です。
    #[cfg(feature = "download")]
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// JSONのシリアライズ・デシリアライズエラー
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// 一時ファイルの永続化エラー
    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),

    /// I/Oエラー
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl KotobaError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効な状態エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    /// * `cause` - エラーの原因
    pub(crate) fn invalid_state<S, T>(msg: S, cause: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self::InvalidState(InvalidStateError {
            msg: msg.into(),
            cause: cause.into(),
        })
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// ユーザー入力以外に起因する状態が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidStateError {
    /// エラーメッセージ
    pub(crate) msg: String,

    /// エラーの原因
    pub(crate) cause: String,
}

impl fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidStateError: {}", self.msg)?;
        if !self.cause.is_empty() {
            write!(f, ": {}", self.cause)?;
        }
        Ok(())
    }
}

impl Error for InvalidStateError {}

/// 候補パスの試行が失敗した段階
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureStage {
    /// 辞書の読み込みと解析器の構築
    Load,

    /// 構築した解析器での試験解析
    SmokeTest,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Load => f.write_str("load"),
            Self::SmokeTest => f.write_str("smoke test"),
        }
    }
}

/// 1つの候補パスでの辞書読み込みの失敗
///
/// 次の候補へ進むことで回復される、想定内の失敗です。
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {stage} failed: {reason}")]
pub struct CandidatePathFailure {
    /// 試行した候補パス
    pub path: DictionaryPath,

    /// 失敗した段階
    pub stage: FailureStage,

    /// 失敗の理由
    pub reason: String,
}

impl CandidatePathFailure {
    pub(crate) fn new<S>(path: DictionaryPath, stage: FailureStage, reason: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            path,
            stage,
            reason: reason.into(),
        }
    }
}

/// すべての候補パスで辞書の読み込みに失敗したことを表すエラー
///
/// 単一飛行の初期化を待つすべての呼び出し元で共有されるため、[`Clone`]を実装します。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DictionaryLoadFailure {
    /// 試行した候補パス(試行順)
    pub attempted: Vec<DictionaryPath>,

    /// 候補パスごとの失敗
    pub failures: Vec<CandidatePathFailure>,
}

impl DictionaryLoadFailure {
    /// 候補パスを試行する前に初期化処理が中断された場合の失敗を生成します
    pub(crate) fn interrupted<S>(attempted: Vec<DictionaryPath>, reason: S) -> Self
    where
        S: Into<String>,
    {
        let reason = reason.into();
        let failures = attempted
            .iter()
            .map(|path| CandidatePathFailure::new(path.clone(), FailureStage::Load, reason.clone()))
            .collect();
        Self {
            attempted,
            failures,
        }
    }
}

impl fmt::Display for DictionaryLoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.attempted.is_empty() {
            return f.write_str("Failed to load the dictionary: no candidate paths were configured");
        }
        f.write_str("Failed to load the dictionary from any candidate path (attempted: ")?;
        for (i, path) in self.attempted.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{path}")?;
        }
        f.write_str(")")
    }
}

impl Error for DictionaryLoadFailure {}

/// 形態素解析の失敗
///
/// 導出処理では空の出力として回復されます。
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("TokenizationFailure: {msg}")]
pub struct TokenizationFailure {
    /// エラーメッセージ
    pub msg: String,
}

impl TokenizationFailure {
    pub(crate) fn new<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self { msg: msg.into() }
    }
}

/// ダウンロード処理中に発生するエラー
///
/// `download`フィーチャーが有効な場合のみ利用可能です。
#[cfg(feature = "download")]
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTPリクエストの失敗
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// 成功以外のHTTPステータス
    #[error("Server returned a non-success status: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// ベースURLに辞書ファイルが存在しない
    #[error("No dictionary file was found under {0}")]
    NotFound(String),

    /// 受信データの展開・読み込み時のI/Oエラー
    #[error("I/O error while reading the response: {0}")]
    Io(#[from] std::io::Error),
}

/// パニックのペイロードからメッセージを取り出します
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
