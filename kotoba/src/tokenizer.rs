//! 形態素解析器
//!
//! [`Analyzer`]はテキストを[`Token`]の列に分割する読み取り専用の解析器です。
//! 実運用ではvibrato-rkyvのトークナイザーを包む[`VibratoAnalyzer`]を使います。

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use vibrato_rkyv::Tokenizer;

use crate::errors::{TokenizationFailure, panic_message};
use crate::token::{FeatureLayout, Token};

/// 1回の解析で受け付ける最大文字数
///
/// 格子の位置は16ビットで表現されるため、これを超える入力は解析できません。
pub const MAX_SENTENCE_CHARS: usize = u16::MAX as usize - 1;

/// テキストをトークン列に分割する解析器
pub trait Analyzer {
    /// テキストを解析してトークン列を返します
    ///
    /// # エラー
    ///
    /// 解析器が入力を処理できなかった場合に[`TokenizationFailure`]を返します。
    fn analyze(&self, text: &str) -> Result<Vec<Token>, TokenizationFailure>;
}

impl<A> Analyzer for Arc<A>
where
    A: Analyzer + ?Sized,
{
    fn analyze(&self, text: &str) -> Result<Vec<Token>, TokenizationFailure> {
        (**self).analyze(text)
    }
}

/// vibrato-rkyvのトークナイザーによる[`Analyzer`]
///
/// ワーカーは呼び出しごとに生成するため、複数のスレッドから同時に呼び出せます。
pub struct VibratoAnalyzer {
    tokenizer: Tokenizer,
    layout: FeatureLayout,
}

impl VibratoAnalyzer {
    /// トークナイザーから解析器を作成します
    ///
    /// # 引数
    ///
    /// * `tokenizer` - 解析に使うトークナイザー
    /// * `layout` - 辞書の素性文字列の列配置
    pub fn new(tokenizer: Tokenizer, layout: FeatureLayout) -> Self {
        Self { tokenizer, layout }
    }

    /// 素性文字列の列配置
    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }
}

impl Analyzer for VibratoAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<Token>, TokenizationFailure> {
        if text.is_empty() {
            return Ok(vec![]);
        }
        let len = text.chars().count();
        if len > MAX_SENTENCE_CHARS {
            return Err(TokenizationFailure::new(format!(
                "Input has {len} characters, exceeding the limit of {MAX_SENTENCE_CHARS}"
            )));
        }

        panic::catch_unwind(AssertUnwindSafe(|| {
            let mut worker = self.tokenizer.new_worker();
            worker.reset_sentence(text);
            worker.tokenize();
            (0..worker.num_tokens())
                .map(|i| {
                    let t = worker.token(i);
                    Token::from_feature(t.surface(), t.feature(), self.layout)
                })
                .collect()
        }))
        .map_err(|payload| TokenizationFailure::new(format!("Tokenizer panicked: {}", panic_message(&*payload))))
    }
}
