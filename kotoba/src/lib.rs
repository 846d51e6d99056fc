//! # kotoba
//!
//! 日本語テキストから学習素材を導出するライブラリです。
//!
//! ## 概要
//!
//! 形態素解析は辞書ベースのトークナイザー(vibrato-rkyv)に任せ、このライブラリは
//! 次の2つを担います。
//!
//! - **辞書の解決と単一飛行の初期化**: 配置環境に応じた候補パスを順に試し、
//!   試験解析に成功した最初の辞書で解析器を1つだけ構築して共有します
//!   ([`bootstrap::TokenizerBootstrap`])。
//! - **学習素材の導出**: テキストから語彙・文・読み方クイズを導出します
//!   ([`pipeline::TextPipeline`])。
//!
//! あわせて、学習進捗の記録([`progress`])を提供します。
//!
//! ## 使用例
//!
//! ```no_run
//! use kotoba::bootstrap::TokenizerBootstrap;
//! use kotoba::dictionary::{CandidatePaths, PathResolver, VibratoLoader};
//! use kotoba::pipeline::TextPipeline;
//!
//! # async fn run() -> kotoba::errors::Result<()> {
//! let candidates = CandidatePaths::from_env().push("/usr/share/kotoba/dict").resolve();
//! let bootstrap = TokenizerBootstrap::new(VibratoLoader::new(), PathResolver::new(candidates));
//! let pipeline = TextPipeline::new(bootstrap);
//!
//! let derivation = pipeline.derive("日本語。元気？とても！").await?;
//! assert_eq!(vec!["日本語", "元気", "とても"], derivation.sentences);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bootstrap;
pub mod dictionary;
pub mod errors;
pub mod pipeline;
pub mod progress;
pub mod quiz;
pub mod sentence;
pub mod token;
pub mod tokenizer;
pub mod utils;
pub mod vocabulary;

#[cfg(test)]
mod test_utils;

// Re-exports
pub use bootstrap::{BootstrapStatus, TokenizerBootstrap};
pub use errors::{KotobaError, Result};
pub use pipeline::{DeriveOptions, Derivation, TextPipeline};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
