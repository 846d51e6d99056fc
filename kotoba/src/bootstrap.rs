//! 解析器の単一飛行初期化
//!
//! [`TokenizerBootstrap`]はプロセスで共有する1つの解析器を所有します。
//! 最初の呼び出しで辞書の解決を1回だけ開始し、同時に到着した呼び出し元は
//! すべて同じ結果を待ちます。成功した解析器はハンドルが生きている間キャッシュされ、
//! 失敗した場合は待機中の全員に同じ[`DictionaryLoadFailure`]が返り、
//! 状態は未初期化に戻るため、後の呼び出しで候補パスの走査全体が再実行されます。
//!
//! 辞書の読み込みはtokioのブロッキングスレッドプールで実行され、
//! 呼び出し元から切り離されています。待機中のフューチャーを破棄しても
//! 読み込みは中断されません。

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task;

use crate::dictionary::{AttemptEvent, DictionaryLoader, DictionaryPath, PathResolver};
use crate::errors::{CandidatePathFailure, DictionaryLoadFailure};

type Outcome<T> = Result<Arc<T>, DictionaryLoadFailure>;

/// 初期化の状態
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrapStatus {
    /// 初期化が開始されていない、または前回の失敗後に未初期化へ戻った
    Idle,

    /// 辞書を解決中
    Loading {
        /// 試行中の候補パス
        current: Option<DictionaryPath>,

        /// これまでに失敗した候補パス
        failures: Vec<CandidatePathFailure>,
    },

    /// 解析器が利用可能
    Ready {
        /// 辞書を読み込んだ候補パス
        path: DictionaryPath,

        /// 成功した候補より前に失敗した候補パス
        failures: Vec<CandidatePathFailure>,
    },

    /// 直前の初期化がすべての候補で失敗した
    Failed(DictionaryLoadFailure),
}

impl BootstrapStatus {
    /// 解析器が利用可能かどうか
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// 初期化が終了した(成功または失敗した)かどうか
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready { .. } | Self::Failed(_))
    }
}

enum Slot<T> {
    Idle,
    Loading(watch::Receiver<Option<Outcome<T>>>),
    Ready(Arc<T>),
}

enum Begin<T> {
    Ready(Arc<T>),
    Waiting(watch::Receiver<Option<Outcome<T>>>),
}

struct Inner<L: DictionaryLoader> {
    loader: L,
    resolver: PathResolver,
    slot: Mutex<Slot<L::Analyzer>>,
    status: watch::Sender<BootstrapStatus>,
    build_attempts: AtomicUsize,
}

/// 共有解析器の所有者と単一飛行のラッチ
///
/// クローンは同じ状態を共有します。
///
/// # 例
///
/// ```no_run
/// use kotoba::bootstrap::TokenizerBootstrap;
/// use kotoba::dictionary::{PathResolver, VibratoLoader};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let bootstrap = TokenizerBootstrap::new(VibratoLoader::new(), PathResolver::from_env());
/// let analyzer = bootstrap.ensure_ready().await?;
/// # Ok(())
/// # }
/// ```
pub struct TokenizerBootstrap<L: DictionaryLoader> {
    inner: Arc<Inner<L>>,
}

impl<L: DictionaryLoader> Clone for TokenizerBootstrap<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: DictionaryLoader> TokenizerBootstrap<L> {
    /// 読み込み処理と解決戦略から作成します
    ///
    /// この時点では辞書の読み込みは行われません。
    pub fn new(loader: L, resolver: PathResolver) -> Self {
        let (status, _) = watch::channel(BootstrapStatus::Idle);
        Self {
            inner: Arc::new(Inner {
                loader,
                resolver,
                slot: Mutex::new(Slot::Idle),
                status,
                build_attempts: AtomicUsize::new(0),
            }),
        }
    }

    /// 解析器が利用可能になるまで待ち、共有の解析器を返します
    ///
    /// 利用可能であれば即座に返ります。初期化中であれば進行中の初期化の結果を待ち、
    /// 未初期化であれば新たに初期化を開始します。
    ///
    /// tokioランタイム上で呼び出す必要があります。
    ///
    /// # エラー
    ///
    /// 初期化がすべての候補パスで失敗した場合に[`DictionaryLoadFailure`]を返します。
    /// 同じ初期化を待っていたすべての呼び出し元に同じ値が返ります。
    pub async fn ensure_ready(&self) -> Result<Arc<L::Analyzer>, DictionaryLoadFailure> {
        let mut rx = match self.begin() {
            Begin::Ready(analyzer) => return Ok(analyzer),
            Begin::Waiting(rx) => rx,
        };

        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(outcome) => Option::clone(&outcome),
            Err(_) => None,
        };
        match outcome {
            Some(outcome) => outcome,
            None => {
                // The build task went away without publishing an outcome.
                self.inner.abandon();
                Err(DictionaryLoadFailure::interrupted(
                    self.inner.resolver.candidates().to_vec(),
                    "the dictionary build task was dropped",
                ))
            }
        }
    }

    /// 前回の初期化が失敗した後に、候補パスの走査をやり直します
    ///
    /// 失敗した初期化は状態を未初期化に戻すため、[`ensure_ready`](Self::ensure_ready)と
    /// 同じ動作になります。すでに利用可能であればその解析器を返し、初期化中であれば
    /// その結果を待ちます。
    pub async fn retry(&self) -> Result<Arc<L::Analyzer>, DictionaryLoadFailure> {
        self.ensure_ready().await
    }

    /// 待たずに初期化を開始します
    ///
    /// 初期化が開始された場合、またはすでに初期化中・利用可能な場合に`true`を返します。
    /// 現在のスレッドでtokioランタイムが動いていない場合は何もせず`false`を返します。
    pub fn start(&self) -> bool {
        if tokio::runtime::Handle::try_current().is_err() {
            log::warn!("[kotoba] Cannot start loading the dictionary outside of a tokio runtime");
            return false;
        }
        self.begin();
        true
    }

    /// 利用可能であれば共有の解析器を返します
    pub fn tokenizer(&self) -> Option<Arc<L::Analyzer>> {
        match &*self.inner.slot.lock() {
            Slot::Ready(analyzer) => Some(Arc::clone(analyzer)),
            _ => None,
        }
    }

    /// 現在の状態
    pub fn status(&self) -> BootstrapStatus {
        self.inner.status.borrow().clone()
    }

    /// 状態の変化を受け取るレシーバー
    pub fn subscribe(&self) -> watch::Receiver<BootstrapStatus> {
        self.inner.status.subscribe()
    }

    /// これまでに開始された初期化の回数
    pub fn build_attempts(&self) -> usize {
        self.inner.build_attempts.load(Ordering::SeqCst)
    }

    /// 解決戦略
    pub fn resolver(&self) -> &PathResolver {
        &self.inner.resolver
    }

    fn begin(&self) -> Begin<L::Analyzer> {
        let mut slot = self.inner.slot.lock();
        if let Slot::Ready(analyzer) = &*slot {
            return Begin::Ready(Arc::clone(analyzer));
        }
        if let Slot::Loading(rx) = &*slot {
            return Begin::Waiting(rx.clone());
        }

        let (tx, rx) = watch::channel(None);
        *slot = Slot::Loading(rx.clone());
        self.inner.build_attempts.fetch_add(1, Ordering::SeqCst);
        self.inner.status.send_replace(BootstrapStatus::Loading {
            current: None,
            failures: vec![],
        });
        drop(slot);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let worker = Arc::clone(&inner);
            let joined = task::spawn_blocking(move || worker.resolve()).await;
            let outcome = match joined {
                Ok(Ok((path, analyzer))) => Ok((path, Arc::new(analyzer))),
                Ok(Err(failure)) => Err(failure),
                Err(e) => {
                    log::error!("[kotoba] Dictionary build task failed: {e}");
                    Err(DictionaryLoadFailure::interrupted(
                        inner.resolver.candidates().to_vec(),
                        format!("the dictionary build task failed: {e}"),
                    ))
                }
            };
            inner.finish(outcome, &tx);
        });

        Begin::Waiting(rx)
    }
}

impl<L: DictionaryLoader> Inner<L> {
    fn resolve(&self) -> Result<(DictionaryPath, L::Analyzer), DictionaryLoadFailure> {
        self.resolver.resolve(&self.loader, |event| self.observe(event))
    }

    fn observe(&self, event: AttemptEvent<'_>) {
        self.status.send_modify(|status| {
            if let BootstrapStatus::Loading { current, failures } = status {
                match event {
                    AttemptEvent::Trying(path) => *current = Some(path.clone()),
                    AttemptEvent::Failed(failure) => failures.push(failure.clone()),
                    AttemptEvent::Succeeded(_) => {}
                }
            }
        });
    }

    /// 結果を状態に反映してから待機中の呼び出し元へ公開します
    fn finish(
        &self,
        outcome: Result<(DictionaryPath, Arc<L::Analyzer>), DictionaryLoadFailure>,
        tx: &watch::Sender<Option<Outcome<L::Analyzer>>>,
    ) {
        let published = {
            let mut slot = self.slot.lock();
            match outcome {
                Ok((path, analyzer)) => {
                    *slot = Slot::Ready(Arc::clone(&analyzer));
                    self.status.send_modify(|status| {
                        let failures = match status {
                            BootstrapStatus::Loading { failures, .. } => std::mem::take(failures),
                            _ => vec![],
                        };
                        *status = BootstrapStatus::Ready { path, failures };
                    });
                    Ok(analyzer)
                }
                Err(failure) => {
                    *slot = Slot::Idle;
                    self.status.send_replace(BootstrapStatus::Failed(failure.clone()));
                    Err(failure)
                }
            }
        };
        tx.send_replace(Some(published));
    }

    fn abandon(&self) {
        let mut slot = self.slot.lock();
        if matches!(&*slot, Slot::Loading(rx) if rx.has_changed().is_err()) {
            *slot = Slot::Idle;
        }
    }
}
