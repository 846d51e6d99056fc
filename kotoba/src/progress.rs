//! 学習進捗の記録
//!
//! 語ごとの習熟度と学習セッションの履歴をJSONファイルに保存します。
//! ファイルが存在しない場合は空の進捗として扱い、壊れている場合はエラーにします。

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::errors::{KotobaError, Result};
use crate::vocabulary::Proficiency;

/// 既定の保存先ディレクトリ名
const APP_DIR_NAME: &str = "kotoba";

/// 既定の保存ファイル名
const PROGRESS_FILE: &str = "progress.json";

/// 語ごとの習熟度
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyProgress {
    /// 語彙項目のID
    pub id: String,

    /// 習熟度
    pub proficiency: Proficiency,
}

/// 1回の学習セッション
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    /// 学習した日
    pub date: NaiveDate,

    /// 学習時間(分)
    pub duration_minutes: u32,

    /// 復習した語の数
    pub vocabulary_reviewed: u32,

    /// 回答したクイズの数
    pub quizzes_taken: u32,

    /// 正解したクイズの数
    pub correct_answers: u32,
}

/// 学習進捗
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyProgress {
    /// 語ごとの習熟度
    pub vocabulary: Vec<VocabularyProgress>,

    /// 学習セッションの履歴(記録順)
    pub study_sessions: Vec<StudySession>,

    /// 合計学習時間(分)
    pub total_study_minutes: u64,

    /// 復習した語の合計
    pub total_vocabulary_reviewed: u64,

    /// 全セッションを通した正答率(百分率)
    pub average_accuracy: f64,

    /// 最後に記録したセッションの日を終点とする連続学習日数
    pub current_streak: u32,

    /// 最長の連続学習日数
    pub longest_streak: u32,
}

impl StudyProgress {
    /// 語の習熟度を0〜5に丸めて設定し、設定した値を返します
    ///
    /// 未登録の語は新たに追加されます。
    pub fn set_proficiency(&mut self, id: &str, value: u8) -> Proficiency {
        let proficiency = Proficiency::new(value);
        match self.vocabulary.iter_mut().find(|v| v.id == id) {
            Some(entry) => entry.proficiency = proficiency,
            None => self.vocabulary.push(VocabularyProgress {
                id: id.to_string(),
                proficiency,
            }),
        }
        proficiency
    }

    /// 語の習熟度
    pub fn proficiency(&self, id: &str) -> Option<Proficiency> {
        self.vocabulary
            .iter()
            .find(|v| v.id == id)
            .map(|v| v.proficiency)
    }

    /// セッションを記録し、集計値を更新します
    pub fn record_session(&mut self, session: StudySession) {
        let today = session.date;
        self.total_study_minutes += u64::from(session.duration_minutes);
        self.total_vocabulary_reviewed += u64::from(session.vocabulary_reviewed);
        self.study_sessions.push(session);
        self.average_accuracy = self.accuracy();
        self.current_streak = self.streak(today);
        self.longest_streak = self.longest_streak.max(self.current_streak);
    }

    /// 全セッションを通した正答率。クイズに1問も回答していない場合は0
    pub fn accuracy(&self) -> f64 {
        let (quizzes, correct) = self
            .study_sessions
            .iter()
            .fold((0u64, 0u64), |(q, c), s| {
                (q + u64::from(s.quizzes_taken), c + u64::from(s.correct_answers))
            });
        if quizzes == 0 {
            0.0
        } else {
            correct as f64 / quizzes as f64 * 100.0
        }
    }

    /// `today`を終点とする連続学習日数
    ///
    /// `today`に学習していない場合は0です。同じ日の複数のセッションは1日として数えます。
    pub fn streak(&self, today: NaiveDate) -> u32 {
        let days: HashSet<NaiveDate> = self.study_sessions.iter().map(|s| s.date).collect();
        let mut streak = 0;
        let mut day = today;
        while days.contains(&day) {
            streak += 1;
            match day.checked_sub_days(Days::new(1)) {
                Some(prev) => day = prev,
                None => break,
            }
        }
        streak
    }
}

/// JSONファイルに保存される学習進捗
#[derive(Clone, Debug)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// 保存先のファイルを指定して作成します
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// OSのローカルデータディレクトリ以下の既定の保存先
    pub fn default_location() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join(APP_DIR_NAME).join(PROGRESS_FILE))
    }

    /// 既定の保存先で作成します
    ///
    /// # エラー
    ///
    /// ローカルデータディレクトリを特定できない場合にエラーを返します。
    pub fn open_default() -> Result<Self> {
        Self::default_location()
            .map(Self::new)
            .ok_or_else(|| KotobaError::invalid_state("Could not determine the local data directory.", ""))
    }

    /// 保存先のファイル
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 進捗を読み込みます
    ///
    /// # エラー
    ///
    /// ファイルが読めない場合、またはJSONとして不正な場合にエラーを返します。
    pub fn load(&self) -> Result<StudyProgress> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StudyProgress::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// 進捗を保存します
    ///
    /// 一時ファイルに書き出してから置き換えるため、書き込み途中のファイルは残りません。
    pub fn save(&self, progress: &StudyProgress) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, progress)?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path)?;
        Ok(())
    }

    /// 語の習熟度を更新して保存します
    pub fn update_proficiency(&self, id: &str, value: u8) -> Result<Proficiency> {
        let mut progress = self.load()?;
        let proficiency = progress.set_proficiency(id, value);
        self.save(&progress)?;
        Ok(proficiency)
    }

    /// セッションを記録して保存し、更新後の進捗を返します
    pub fn add_session(&self, session: StudySession) -> Result<StudyProgress> {
        let mut progress = self.load()?;
        progress.record_session(session);
        self.save(&progress)?;
        Ok(progress)
    }

    /// `today`を終点とする連続学習日数
    pub fn streak(&self, today: NaiveDate) -> Result<u32> {
        Ok(self.load()?.streak(today))
    }
}
