//! テスト用ユーティリティ
//!
//! 小さな実辞書の構築と、入出力を伴わない偽の読み込み処理を提供します。

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hashbrown::HashMap;
use parking_lot::Mutex;
use vibrato_rkyv::SystemDictionaryBuilder;

use crate::dictionary::{DICT_FILE, DictionaryLoader, DictionaryPath};
use crate::errors::{KotobaError, Result, TokenizationFailure};
use crate::token::{PartOfSpeech, Token};
use crate::tokenizer::Analyzer;

pub(crate) const LEX_CSV: &str = "\
日本語,1,1,100,名詞,一般,*,*,*,*,日本語,ニホンゴ,ニホンゴ
元気,1,1,100,名詞,形容動詞語幹,*,*,*,*,元気,ゲンキ,ゲンキ
とても,1,1,100,副詞,助詞類接続,*,*,*,*,とても,トテモ,トテモ
猫,1,1,100,名詞,一般,*,*,*,*,猫,ネコ,ネコ
犬,1,1,100,名詞,一般,*,*,*,*,犬,イヌ,イヌ
見る,1,1,100,動詞,自立,*,*,一段,基本形,見る,ミル,ミル
高い,1,1,100,形容詞,自立,*,*,形容詞・アウオ段,基本形,高い,タカイ,タカイ
テスト,1,1,100,名詞,サ変接続,*,*,*,*,テスト,テスト,テスト
と,1,1,100,助詞,並立助詞,*,*,*,*,と,ト,ト
が,1,1,100,助詞,格助詞,一般,*,*,*,が,ガ,ガ
を,1,1,100,助詞,格助詞,一般,*,*,*,を,ヲ,ヲ
は,1,1,100,助詞,係助詞,*,*,*,*,は,ハ,ワ
";

pub(crate) const MATRIX_DEF: &str = "2 2\n0 0 0\n0 1 0\n1 0 0\n1 1 0\n";

pub(crate) const CHAR_DEF: &str = "\
DEFAULT 0 0 1
SYMBOL 1 1 0
0x3002 SYMBOL
0xFF01 SYMBOL
0xFF1F SYMBOL
";

pub(crate) const UNK_DEF: &str = "\
DEFAULT,1,1,1000,名詞,一般,*,*,*,*,*
SYMBOL,1,1,100,記号,一般,*,*,*,*,*
";

/// 小さなIPADIC形式の辞書を構築し、`dir/system.dic`に書き出します
pub(crate) fn write_test_dictionary(dir: &Path) -> PathBuf {
    let dict = SystemDictionaryBuilder::from_readers(
        LEX_CSV.as_bytes(),
        MATRIX_DEF.as_bytes(),
        CHAR_DEF.as_bytes(),
        UNK_DEF.as_bytes(),
    )
    .unwrap();
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(DICT_FILE);
    dict.write(File::create(&path).unwrap()).unwrap();
    path
}

pub(crate) fn path(s: &str) -> DictionaryPath {
    DictionaryPath::parse(s)
}

/// 偽の読み込み処理の振る舞い
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FakeBehavior {
    /// 読み込みに成功し、試験解析にも成功する
    Working,
    /// 読み込みに成功するが、解析結果が常に空
    Silent,
    /// 読み込みに成功するが、解析が常に失敗する
    Broken,
    /// 辞書が存在しない
    Missing,
    /// 読み込み中にパニックする
    Panicking,
}

/// 空白と句読点で区切った語を名詞として返す偽の解析器
#[derive(Debug)]
pub(crate) struct FakeAnalyzer {
    behavior: FakeBehavior,
}

impl FakeAnalyzer {
    pub(crate) fn working() -> Self {
        Self {
            behavior: FakeBehavior::Working,
        }
    }

    pub(crate) fn broken() -> Self {
        Self {
            behavior: FakeBehavior::Broken,
        }
    }
}

impl Analyzer for FakeAnalyzer {
    fn analyze(&self, text: &str) -> std::result::Result<Vec<Token>, TokenizationFailure> {
        match self.behavior {
            FakeBehavior::Silent => Ok(vec![]),
            FakeBehavior::Broken => Err(TokenizationFailure::new("broken analyzer")),
            _ => Ok(text
                .split(|c: char| c.is_whitespace() || "。！？、".contains(c))
                .filter(|w| !w.is_empty())
                .map(|w| Token::new(w, PartOfSpeech::Noun, None, w))
                .collect()),
        }
    }
}

/// パスごとに振る舞いを切り替えられる偽の読み込み処理
///
/// クローンは状態を共有するため、解決器に渡した後も呼び出し履歴を確認できます。
#[derive(Clone, Default)]
pub(crate) struct FakeLoader {
    behaviors: Arc<Mutex<HashMap<DictionaryPath, FakeBehavior>>>,
    calls: Arc<Mutex<Vec<DictionaryPath>>>,
    delay: Option<Duration>,
}

impl FakeLoader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(self, p: &str, behavior: FakeBehavior) -> Self {
        self.set(p, behavior);
        self
    }

    pub(crate) fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn set(&self, p: &str, behavior: FakeBehavior) {
        self.behaviors.lock().insert(path(p), behavior);
    }

    pub(crate) fn calls(&self) -> Vec<DictionaryPath> {
        self.calls.lock().clone()
    }
}

impl DictionaryLoader for FakeLoader {
    type Analyzer = FakeAnalyzer;

    fn load(&self, base: &DictionaryPath) -> Result<FakeAnalyzer> {
        self.calls.lock().push(base.clone());
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        let behavior = self
            .behaviors
            .lock()
            .get(base)
            .copied()
            .unwrap_or(FakeBehavior::Missing);
        match behavior {
            FakeBehavior::Missing => Err(KotobaError::invalid_argument(
                "base",
                format!("no dictionary under {base}"),
            )),
            FakeBehavior::Panicking => panic!("fake loader panicked on {base}"),
            behavior => Ok(FakeAnalyzer { behavior }),
        }
    }
}
