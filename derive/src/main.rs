//! テキストから学習素材を導出するユーティリティ
//!
//! このバイナリは、標準入力から読み込んだテキストを1行ずつ形態素解析し、
//! 指定された出力形式(vocab、sentences、quiz、json)で語彙・文・クイズを出力します。

use std::error::Error;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use kotoba::dictionary::{CandidatePaths, PathResolver, VibratoLoader};
use kotoba::progress::{ProgressStore, StudySession};
use kotoba::token::FeatureLayout;
use kotoba::pipeline::derive_with;
use kotoba::{Derivation, DeriveOptions, TokenizerBootstrap};

use clap::Parser;

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Vocab,
    Sentences,
    Quiz,
    Json,
}

/// `OutputMode` の `FromStr` 実装
impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "vocab" => Ok(Self::Vocab),
            "sentences" => Ok(Self::Sentences),
            "quiz" => Ok(Self::Quiz),
            "json" => Ok(Self::Json),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "kotoba-derive", about = "Derives vocabulary, sentences and reading quizzes")]
struct Args {
    /// Additional dictionary base paths or URLs, tried after the defaults.
    #[clap(short = 'd', long = "dict")]
    dict: Vec<String>,

    /// Page origin joined with /dict as a candidate (overrides KOTOBA_ORIGIN).
    #[clap(long)]
    origin: Option<String>,

    /// Skips the default candidates and tries only the --dict paths.
    #[clap(long)]
    no_defaults: bool,

    /// Output mode. Choices are vocab, sentences, quiz, and json.
    #[clap(short = 'O', long, default_value = "vocab")]
    output_mode: OutputMode,

    /// Maximum number of quizzes per line (0 for no limit).
    #[clap(short = 'q', long, default_value = "10")]
    max_quizzes: usize,

    /// Normalizes readings to hiragana instead of keeping the dictionary's readings.
    #[clap(long)]
    hiragana: bool,

    /// Reads features in the UniDic column layout.
    #[clap(long)]
    unidic: bool,

    /// Ignores white spaces in input strings.
    #[clap(short = 'S', long)]
    ignore_space: bool,

    /// Maximum length of unknown words.
    #[clap(short = 'M', long)]
    max_grouping_len: Option<usize>,

    /// Records a study session with the number of derived words into this file.
    #[clap(long)]
    progress: Option<PathBuf>,
}

impl Args {
    fn candidates(&self) -> CandidatePaths {
        let mut candidates = if self.no_defaults {
            CandidatePaths::empty()
        } else {
            CandidatePaths::from_env()
        };
        if let Some(origin) = &self.origin {
            candidates = candidates.origin(Some(origin.as_str()));
        }
        for dict in &self.dict {
            candidates = candidates.push(dict.as_str());
        }
        candidates
    }

    fn loader(&self) -> VibratoLoader {
        let layout = if self.unidic {
            FeatureLayout::Unidic
        } else {
            FeatureLayout::Ipadic
        };
        VibratoLoader::new()
            .ignore_space(self.ignore_space)
            .max_grouping_len(self.max_grouping_len)
            .layout(layout)
    }

    fn options(&self) -> DeriveOptions {
        DeriveOptions {
            max_quizzes: (self.max_quizzes != 0).then_some(self.max_quizzes),
            hiragana_readings: self.hiragana,
        }
    }
}

fn write_derivation<W: Write>(out: &mut W, mode: &OutputMode, derivation: &Derivation) -> Result<(), Box<dyn Error>> {
    match mode {
        OutputMode::Vocab => {
            for item in &derivation.vocabulary {
                writeln!(out, "{}\t{}\t{}", item.word, item.reading, item.id)?;
            }
            out.write_all(b"EOS\n")?;
        }
        OutputMode::Sentences => {
            for sentence in &derivation.sentences {
                writeln!(out, "{sentence}")?;
            }
            out.write_all(b"EOS\n")?;
        }
        OutputMode::Quiz => {
            for (i, quiz) in derivation.quizzes.iter().enumerate() {
                writeln!(out, "Q{}. {}", i + 1, quiz.question)?;
                for (j, option) in quiz.options.iter().enumerate() {
                    writeln!(out, "  {}) {}", j + 1, option)?;
                }
                writeln!(out, "  => {}", quiz.explanation)?;
            }
            out.write_all(b"EOS\n")?;
        }
        OutputMode::Json => {
            serde_json::to_writer(&mut *out, derivation)?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// メイン関数
///
/// 候補パスから辞書を解決し、標準入力の各行から学習素材を導出して出力します。
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let resolver = PathResolver::new(args.candidates().resolve());
    let bootstrap = TokenizerBootstrap::new(args.loader(), resolver);
    let options = args.options();

    eprintln!("Loading the dictionary...");
    let analyzer = bootstrap.ensure_ready().await?;
    eprintln!("Ready to derive");

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let mut reviewed = 0;
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let derivation = derive_with(&*analyzer, &line, &options);
        reviewed += derivation.vocabulary.len();
        write_derivation(&mut out, &args.output_mode, &derivation)?;
        if is_tty {
            out.flush()?;
        }
    }
    out.flush()?;

    if let Some(path) = &args.progress {
        let session = StudySession {
            date: chrono::Local::now().date_naive(),
            duration_minutes: 0,
            vocabulary_reviewed: u32::try_from(reviewed)?,
            quizzes_taken: 0,
            correct_answers: 0,
        };
        let progress = ProgressStore::new(path).add_session(session)?;
        log::info!(
            "[kotoba] Recorded a session of {reviewed} words (streak: {} days)",
            progress.current_streak
        );
    }

    Ok(())
}
