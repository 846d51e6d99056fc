//! 候補パスの走査と試験解析
//!
//! [`PathResolver`]は候補パスを順に[`DictionaryLoader`]へ渡し、読み込みと試験解析の
//! 両方に成功した最初の解析器を採用します。候補ごとの失敗は記録して次へ進み、
//! すべての候補が失敗した場合にのみ[`DictionaryLoadFailure`]を返します。

use std::panic::{self, AssertUnwindSafe};

use crate::dictionary::{CandidatePaths, DictionaryLoader, DictionaryPath};
use crate::errors::{CandidatePathFailure, DictionaryLoadFailure, FailureStage, panic_message};
use crate::tokenizer::Analyzer;

/// 試験解析に使う既定のテキスト
pub const SMOKE_TEST_TEXT: &str = "テスト";

/// 候補パスの試行状況の通知
#[derive(Debug)]
pub enum AttemptEvent<'a> {
    /// 候補パスの試行を開始した
    Trying(&'a DictionaryPath),

    /// 候補パスの試行に失敗した
    Failed(&'a CandidatePathFailure),

    /// 候補パスで解析器の構築に成功した
    Succeeded(&'a DictionaryPath),
}

/// 候補パスを順に試す辞書解決戦略
#[derive(Clone, Debug)]
pub struct PathResolver {
    candidates: Vec<DictionaryPath>,
    smoke_text: String,
}

impl PathResolver {
    /// 候補パスのリストから作成します
    ///
    /// 候補は与えられた順に試されます。重複の除去は[`CandidatePaths`]で行われます。
    pub fn new(candidates: Vec<DictionaryPath>) -> Self {
        Self {
            candidates,
            smoke_text: SMOKE_TEST_TEXT.to_string(),
        }
    }

    /// 環境変数を反映した既定の候補パスで作成します
    pub fn from_env() -> Self {
        Self::new(CandidatePaths::from_env().resolve())
    }

    /// 試験解析に使うテキストを設定します
    pub fn smoke_text<S: Into<String>>(mut self, text: S) -> Self {
        self.smoke_text = text.into();
        self
    }

    /// 候補パス
    pub fn candidates(&self) -> &[DictionaryPath] {
        &self.candidates
    }

    /// 候補パスを順に試し、最初に成功した解析器とそのパスを返します
    ///
    /// # 引数
    ///
    /// * `loader` - 1つのベースパスから解析器を構築する読み込み処理
    /// * `observe` - 試行状況の通知を受け取る関数
    ///
    /// # エラー
    ///
    /// すべての候補が失敗した場合、または候補が1つもない場合に
    /// [`DictionaryLoadFailure`]を返します。`attempted`は候補リストと同じ順序と長さです。
    pub fn resolve<L, F>(
        &self,
        loader: &L,
        mut observe: F,
    ) -> Result<(DictionaryPath, L::Analyzer), DictionaryLoadFailure>
    where
        L: DictionaryLoader + ?Sized,
        F: FnMut(AttemptEvent<'_>),
    {
        let mut attempted = Vec::with_capacity(self.candidates.len());
        let mut failures = vec![];

        for path in &self.candidates {
            attempted.push(path.clone());
            observe(AttemptEvent::Trying(path));
            log::info!("[kotoba] Trying dictionary path {path}");

            match self.attempt(loader, path) {
                Ok(analyzer) => {
                    log::info!("[kotoba] Dictionary loaded from {path}");
                    observe(AttemptEvent::Succeeded(path));
                    return Ok((path.clone(), analyzer));
                }
                Err(failure) => {
                    log::warn!("[kotoba] {failure}");
                    observe(AttemptEvent::Failed(&failure));
                    failures.push(failure);
                }
            }
        }

        let failure = DictionaryLoadFailure {
            attempted,
            failures,
        };
        log::error!("[kotoba] {failure}");
        Err(failure)
    }

    fn attempt<L>(&self, loader: &L, path: &DictionaryPath) -> Result<L::Analyzer, CandidatePathFailure>
    where
        L: DictionaryLoader + ?Sized,
    {
        let analyzer = match panic::catch_unwind(AssertUnwindSafe(|| loader.load(path))) {
            Ok(Ok(analyzer)) => analyzer,
            Ok(Err(e)) => {
                return Err(CandidatePathFailure::new(path.clone(), FailureStage::Load, e.to_string()));
            }
            Err(payload) => {
                let msg = panic_message(&*payload);
                log::error!("[kotoba] Dictionary loader panicked on {path}: {msg}");
                return Err(CandidatePathFailure::new(
                    path.clone(),
                    FailureStage::Load,
                    format!("loader panicked: {msg}"),
                ));
            }
        };

        match analyzer.analyze(&self.smoke_text) {
            Ok(tokens) if !tokens.is_empty() => Ok(analyzer),
            Ok(_) => Err(CandidatePathFailure::new(
                path.clone(),
                FailureStage::SmokeTest,
                format!("analyzing {:?} produced no tokens", self.smoke_text),
            )),
            Err(e) => Err(CandidatePathFailure::new(
                path.clone(),
                FailureStage::SmokeTest,
                e.to_string(),
            )),
        }
    }
}
