//! 文への分割
//!
//! 句点・感嘆符・疑問符(`。！？`)で入力を区切り、前後の空白を除いた空でない文を
//! 出現順に返します。

use std::ops::Range;

/// 文の区切りとなる文字
pub const SENTENCE_TERMINATORS: [char; 3] = ['。', '！', '？'];

/// 入力中の各文のバイト範囲を返します
///
/// 範囲は前後の空白を除いた部分を指し、空の文は含まれません。
/// 区切り文字自体はどの範囲にも含まれません。
pub fn sentence_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = vec![];
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if SENTENCE_TERMINATORS.contains(&c) {
            push_trimmed(text, start..i, &mut ranges);
            start = i + c.len_utf8();
        }
    }
    push_trimmed(text, start..text.len(), &mut ranges);
    ranges
}

/// 入力を文に分割します
///
/// # 例
///
/// ```
/// use kotoba::sentence::split_sentences;
///
/// assert_eq!(
///     vec!["日本語", "元気", "とても"],
///     split_sentences("日本語。元気？とても！"),
/// );
/// ```
pub fn split_sentences(text: &str) -> Vec<String> {
    sentence_ranges(text)
        .into_iter()
        .map(|range| text[range].to_string())
        .collect()
}

fn push_trimmed(text: &str, range: Range<usize>, ranges: &mut Vec<Range<usize>>) {
    let segment = &text[range.clone()];
    let trimmed = segment.trim_start();
    let start = range.start + (segment.len() - trimmed.len());
    let trimmed = trimmed.trim_end();
    if !trimmed.is_empty() {
        ranges.push(start..start + trimmed.len());
    }
}
