//! テキストからの学習素材の導出
//!
//! 入力テキストを形態素解析し、語彙・文・読み方クイズの3つを導出します。
//! パイプラインは呼び出し間で状態を持たず、導出結果は毎回丸ごと作り直されます。

use serde::{Deserialize, Serialize};

use crate::bootstrap::TokenizerBootstrap;
use crate::dictionary::DictionaryLoader;
use crate::errors::Result;
use crate::quiz::{QuizQuestion, generate_quizzes};
use crate::sentence::split_sentences;
use crate::tokenizer::Analyzer;
use crate::vocabulary::{VocabularyItem, extract_vocabulary};

/// 既定のクイズの最大問題数
pub const DEFAULT_MAX_QUIZZES: usize = 10;

/// 導出の設定
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeriveOptions {
    /// クイズの最大問題数(`None`の場合は語彙の数だけ)
    pub max_quizzes: Option<usize>,

    /// 読みをひらがなに正規化するかどうか
    ///
    /// 既定では解析器が返す読みをそのまま使います。
    pub hiragana_readings: bool,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            max_quizzes: Some(DEFAULT_MAX_QUIZZES),
            hiragana_readings: false,
        }
    }
}

/// 導出結果
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    /// 語彙
    pub vocabulary: Vec<VocabularyItem>,

    /// 文
    pub sentences: Vec<String>,

    /// 読み方クイズ
    pub quizzes: Vec<QuizQuestion>,
}

impl Derivation {
    /// 3つの集合がすべて空かどうか
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty() && self.sentences.is_empty() && self.quizzes.is_empty()
    }
}

/// 解析器を使ってテキストから学習素材を導出します
///
/// 空白のみの入力は解析器を呼び出さずに空の結果を返します。
/// 解析に失敗した場合はエラーを記録し、空の結果を返します。
pub fn derive_with<A>(analyzer: &A, text: &str, options: &DeriveOptions) -> Derivation
where
    A: Analyzer + ?Sized,
{
    if text.trim().is_empty() {
        return Derivation::default();
    }

    let tokens = match analyzer.analyze(text) {
        Ok(tokens) => tokens,
        Err(e) => {
            log::error!("[kotoba] {e}");
            return Derivation::default();
        }
    };

    let mut rng = rand::thread_rng();
    let vocabulary = extract_vocabulary(&tokens, options.hiragana_readings, &mut rng);
    let sentences = split_sentences(text);
    let quizzes = generate_quizzes(&vocabulary, options.max_quizzes, &mut rng);
    log::debug!(
        "[kotoba] Derived {} vocabulary items, {} sentences and {} quizzes from {} tokens",
        vocabulary.len(),
        sentences.len(),
        quizzes.len(),
        tokens.len(),
    );

    Derivation {
        vocabulary,
        sentences,
        quizzes,
    }
}

/// 共有解析器を使う導出パイプライン
///
/// # 例
///
/// ```no_run
/// use kotoba::bootstrap::TokenizerBootstrap;
/// use kotoba::dictionary::{PathResolver, VibratoLoader};
/// use kotoba::pipeline::TextPipeline;
///
/// # async fn run() -> kotoba::errors::Result<()> {
/// let bootstrap = TokenizerBootstrap::new(VibratoLoader::new(), PathResolver::from_env());
/// let pipeline = TextPipeline::new(bootstrap);
/// let derivation = pipeline.derive("日本語を勉強します。").await?;
/// for item in &derivation.vocabulary {
///     println!("{}\t{}", item.word, item.reading);
/// }
/// # Ok(())
/// # }
/// ```
pub struct TextPipeline<L: DictionaryLoader> {
    bootstrap: TokenizerBootstrap<L>,
    options: DeriveOptions,
}

impl<L: DictionaryLoader> Clone for TextPipeline<L> {
    fn clone(&self) -> Self {
        Self {
            bootstrap: self.bootstrap.clone(),
            options: self.options.clone(),
        }
    }
}

impl<L: DictionaryLoader> TextPipeline<L> {
    /// 既定の設定で作成します
    pub fn new(bootstrap: TokenizerBootstrap<L>) -> Self {
        Self::with_options(bootstrap, DeriveOptions::default())
    }

    /// 設定を指定して作成します
    pub fn with_options(bootstrap: TokenizerBootstrap<L>, options: DeriveOptions) -> Self {
        Self { bootstrap, options }
    }

    /// 解析器の初期化ハンドル
    pub fn bootstrap(&self) -> &TokenizerBootstrap<L> {
        &self.bootstrap
    }

    /// 導出の設定
    pub fn options(&self) -> &DeriveOptions {
        &self.options
    }

    /// 解析器が利用可能になるのを待ってから導出します
    ///
    /// 空白のみの入力は初期化を開始せずに空の結果を返します。
    ///
    /// # エラー
    ///
    /// 解析器の初期化がすべての候補パスで失敗した場合に
    /// [`KotobaError::DictionaryLoad`](crate::errors::KotobaError::DictionaryLoad)を返します。
    pub async fn derive(&self, text: &str) -> Result<Derivation> {
        if text.trim().is_empty() {
            return Ok(Derivation::default());
        }
        let analyzer = self.bootstrap.ensure_ready().await?;
        Ok(derive_with(&*analyzer, text, &self.options))
    }

    /// 待たずに導出します
    ///
    /// 解析器がまだ利用可能でない場合は、初期化をバックグラウンドで開始して
    /// 空の結果を返します。呼び出し元は[`TokenizerBootstrap::subscribe`]で
    /// 利用可能になったことを知り、改めて呼び出します。
    pub fn derive_now(&self, text: &str) -> Derivation {
        if text.trim().is_empty() {
            return Derivation::default();
        }
        match self.bootstrap.tokenizer() {
            Some(analyzer) => derive_with(&*analyzer, text, &self.options),
            None => {
                log::debug!("[kotoba] Tokenizer is not ready; returning an empty derivation");
                self.bootstrap.start();
                Derivation::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::bootstrap::BootstrapStatus;
    use crate::dictionary::PathResolver;
    use crate::errors::KotobaError;
    use crate::test_utils::{FakeAnalyzer, FakeBehavior, FakeLoader, path};

    fn pipeline(loader: &FakeLoader) -> TextPipeline<FakeLoader> {
        let resolver = PathResolver::new(vec![path("/dict")]);
        TextPipeline::new(TokenizerBootstrap::new(loader.clone(), resolver))
    }

    #[test]
    fn test_derive_with() {
        let derivation = derive_with(
            &FakeAnalyzer::working(),
            "ねこ いぬ ねこ。とり！",
            &DeriveOptions::default(),
        );
        let words: Vec<_> = derivation.vocabulary.iter().map(|v| v.word.as_str()).collect();
        assert_eq!(vec!["ねこ", "いぬ", "とり"], words);
        assert_eq!(vec!["ねこ いぬ ねこ", "とり"], derivation.sentences);
        assert_eq!(3, derivation.quizzes.len());
    }

    #[test]
    fn test_blank_input() {
        let derivation = derive_with(&FakeAnalyzer::broken(), " \n\t　", &DeriveOptions::default());
        assert!(derivation.is_empty());
    }

    #[test]
    fn test_tokenization_failure_degrades_to_empty() {
        let derivation = derive_with(&FakeAnalyzer::broken(), "ねこ。", &DeriveOptions::default());
        assert!(derivation.is_empty());
    }

    #[test]
    fn test_quiz_limit_and_katakana_readings() {
        let text = (0..12).map(|i| format!("ア{i}")).collect::<Vec<_>>().join(" ");
        let options = DeriveOptions {
            max_quizzes: Some(10),
            hiragana_readings: false,
        };
        let derivation = derive_with(&FakeAnalyzer::working(), &text, &options);
        assert_eq!(12, derivation.vocabulary.len());
        assert_eq!(10, derivation.quizzes.len());
        // Transliteration always yields hiragana, even without normalization.
        assert_eq!("あ0", derivation.vocabulary[0].reading);
    }

    #[test]
    fn test_default_options() {
        let options = DeriveOptions::default();
        assert_eq!(Some(DEFAULT_MAX_QUIZZES), options.max_quizzes);
        assert!(!options.hiragana_readings);
    }

    #[tokio::test]
    async fn test_derive_waits_for_bootstrap() {
        let loader = FakeLoader::new().with("/dict", FakeBehavior::Working);
        let pipeline = pipeline(&loader);
        let derivation = pipeline.derive("ねこ。").await.unwrap();
        assert_eq!(1, derivation.vocabulary.len());
        assert_eq!(1, pipeline.bootstrap().build_attempts());
    }

    #[tokio::test]
    async fn test_derive_reports_load_failure() {
        let loader = FakeLoader::new();
        let pipeline = pipeline(&loader);
        let err = pipeline.derive("ねこ。").await.err().unwrap();
        assert!(matches!(err, KotobaError::DictionaryLoad(_)));
    }

    #[tokio::test]
    async fn test_blank_input_does_not_start_bootstrap() {
        let loader = FakeLoader::new().with("/dict", FakeBehavior::Working);
        let pipeline = pipeline(&loader);
        assert!(pipeline.derive("   ").await.unwrap().is_empty());
        assert!(pipeline.derive_now("   ").is_empty());
        assert_eq!(0, pipeline.bootstrap().build_attempts());
    }

    #[tokio::test]
    async fn test_derive_now_before_and_after_ready() {
        let loader = FakeLoader::new().with("/dict", FakeBehavior::Working);
        let pipeline = pipeline(&loader);

        assert!(pipeline.derive_now("ねこ。").is_empty());
        let mut status = pipeline.bootstrap().subscribe();
        status.wait_for(BootstrapStatus::is_settled).await.unwrap();

        let derivation = pipeline.derive_now("ねこ。");
        assert_eq!(1, derivation.vocabulary.len());
        assert_eq!(1, pipeline.bootstrap().build_attempts());
    }
}
