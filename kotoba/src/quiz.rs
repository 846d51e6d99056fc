//! 読み方クイズの生成と採点

use hashbrown::HashSet;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use wana_kana::ConvertJapanese;

use crate::vocabulary::VocabularyItem;

/// 1問あたりの選択肢の数
pub const OPTION_COUNT: usize = 4;

/// 誤答の選択肢を作るために語の末尾に付ける文字
pub const DISTRACTOR_SUFFIXES: [&str; 3] = ["う", "ん", "つ"];

/// 誤答が正答や他の誤答と重複した場合に補う文字
pub const FALLBACK_SUFFIXES: [&str; 5] = ["く", "す", "る", "い", "か"];

/// 読み方を問う4択の問題
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// 問題文
    pub question: String,

    /// 選択肢(正答をちょうど1つ含む)
    pub options: Vec<String>,

    /// 正答
    pub correct_answer: String,

    /// 解説
    pub explanation: String,
}

impl QuizQuestion {
    /// 語彙項目から問題を作成します
    ///
    /// 選択肢は正答と3つの誤答をシャッフルしたものです。
    pub fn for_item<R>(item: &VocabularyItem, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut options = distractors(&item.word, &item.reading);
        options.push(item.reading.clone());
        options.shuffle(rng);
        Self {
            question: format!("「{}」の読み方は何ですか？", item.word),
            options,
            correct_answer: item.reading.clone(),
            explanation: format!("「{}」は「{}」と読みます。", item.word, item.reading),
        }
    }

    /// 回答が正しいかどうか
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

/// 語彙の先頭から最大`limit`個を問題にします
///
/// `limit`が`None`の場合はすべての語彙を問題にします。
pub fn generate_quizzes<R>(vocabulary: &[VocabularyItem], limit: Option<usize>, rng: &mut R) -> Vec<QuizQuestion>
where
    R: Rng + ?Sized,
{
    let count = limit.map_or(vocabulary.len(), |limit| limit.min(vocabulary.len()));
    vocabulary[..count]
        .iter()
        .map(|item| QuizQuestion::for_item(item, rng))
        .collect()
}

/// 正答と重複しない3つの誤答
fn distractors(word: &str, reading: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    seen.insert(reading.to_string());
    let mut options = Vec::with_capacity(OPTION_COUNT);
    for suffix in DISTRACTOR_SUFFIXES.iter().chain(FALLBACK_SUFFIXES.iter()) {
        if options.len() == OPTION_COUNT - 1 {
            break;
        }
        let candidate = format!("{word}{suffix}").as_str().to_hiragana();
        if seen.insert(candidate.clone()) {
            options.push(candidate);
        }
    }
    options
}

/// クイズの得点
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
    correct: usize,
    total: usize,
}

impl QuizScore {
    /// 新しい得点表を作成します
    pub fn new() -> Self {
        Self::default()
    }

    /// 回答を記録し、正解だったかどうかを返します
    pub fn record(&mut self, question: &QuizQuestion, answer: &str) -> bool {
        let correct = question.is_correct(answer);
        self.total += 1;
        if correct {
            self.correct += 1;
        }
        correct
    }

    /// 正解数
    pub fn correct(&self) -> usize {
        self.correct
    }

    /// 回答数
    pub fn total(&self) -> usize {
        self.total
    }

    /// 正答率(百分率)。回答がない場合は0
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        }
    }
}
