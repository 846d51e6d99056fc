//! 学習素材の導出のベンチマーク
//!
//! 小さな辞書で構築した解析器を使い、語彙・文・クイズの導出速度を計測します。

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kotoba::pipeline::{DeriveOptions, derive_with};
use kotoba::token::FeatureLayout;
use kotoba::tokenizer::VibratoAnalyzer;
use vibrato_rkyv::{SystemDictionaryBuilder, Tokenizer};

const LEX_CSV: &str = "\
日本語,1,1,100,名詞,一般,*,*,*,*,日本語,ニホンゴ,ニホンゴ
勉強,1,1,100,名詞,サ変接続,*,*,*,*,勉強,ベンキョウ,ベンキョー
する,1,1,100,動詞,自立,*,*,サ変・スル,基本形,する,スル,スル
猫,1,1,100,名詞,一般,*,*,*,*,猫,ネコ,ネコ
犬,1,1,100,名詞,一般,*,*,*,*,犬,イヌ,イヌ
高い,1,1,100,形容詞,自立,*,*,形容詞・アウオ段,基本形,高い,タカイ,タカイ
を,1,1,100,助詞,格助詞,一般,*,*,*,を,ヲ,ヲ
と,1,1,100,助詞,並立助詞,*,*,*,*,と,ト,ト
";
const MATRIX_DEF: &str = "2 2\n0 0 0\n0 1 0\n1 0 0\n1 1 0\n";
const CHAR_DEF: &str = "DEFAULT 0 0 1\nSYMBOL 1 1 0\n0x3002 SYMBOL\n";
const UNK_DEF: &str = "DEFAULT,1,1,1000,名詞,一般,*,*,*,*,*\nSYMBOL,1,1,100,記号,一般,*,*,*,*,*\n";

fn analyzer() -> VibratoAnalyzer {
    let dict = SystemDictionaryBuilder::from_readers(
        LEX_CSV.as_bytes(),
        MATRIX_DEF.as_bytes(),
        CHAR_DEF.as_bytes(),
        UNK_DEF.as_bytes(),
    )
    .expect("Failed to build the benchmark dictionary");
    VibratoAnalyzer::new(Tokenizer::from_inner(dict), FeatureLayout::Ipadic)
}

fn bench_derivation(c: &mut Criterion) {
    let analyzer = analyzer();
    let options = DeriveOptions::default();

    let mut group = c.benchmark_group("Derivation");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));

    for repeat in [1, 10, 100] {
        let text = "日本語を勉強する。猫と犬。高い猫。".repeat(repeat);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("derive_with", repeat), &text, |b, text| {
            b.iter(|| derive_with(&analyzer, text, &options));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_derivation);
criterion_main!(benches);
