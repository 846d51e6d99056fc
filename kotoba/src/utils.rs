//! ユーティリティ関数を提供するモジュール
//!
//! - 形態素の素性文字列(CSV行)の解析
//! - 導出結果に付与するランダムなIDの生成

use csv_core::ReadFieldResult;
use hashbrown::HashSet;
use rand::Rng;

/// 生成するIDの文字数
pub const ID_LEN: usize = 9;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// CSV形式の行を解析してフィールドのベクターに分割する
///
/// ダブルクォートで囲まれたフィールドや、フィールド内のカンマも正しく処理します。
///
/// # 引数
///
/// * `row` - 解析するCSV形式の文字列
///
/// # 戻り値
///
/// 解析されたフィールドを格納する文字列のベクター
///
/// # 例
///
/// ```
/// # use kotoba::utils::parse_csv_row;
/// let fields = parse_csv_row("名詞,\"1,2-ジクロロエタン\"");
/// assert_eq!(fields, vec!["名詞", "1,2-ジクロロエタン"]);
/// ```
pub fn parse_csv_row(row: &str) -> Vec<String> {
    let mut fields = vec![];
    let mut rdr = csv_core::Reader::new();
    let mut bytes = row.as_bytes();
    // A field is never longer than the row itself.
    let mut output = vec![0; row.len() + 1];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        let end = !matches!(result, ReadFieldResult::Field { .. });
        fields.push(String::from_utf8_lossy(&output[..nout]).into_owned());
        if end {
            break;
        }
        bytes = &bytes[nin..];
    }
    fields
}

/// 1回の導出の中で重複しないランダムなIDを生成する
///
/// IDは[`ID_LEN`]文字の36進数(`0-9a-z`)です。
pub struct IdGenerator<R> {
    rng: R,
    issued: HashSet<String>,
}

impl<R> IdGenerator<R>
where
    R: Rng,
{
    /// 新しいジェネレータを作成します
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            issued: HashSet::new(),
        }
    }

    /// 未発行のIDを1つ生成します
    pub fn next_id(&mut self) -> String {
        loop {
            let id: String = (0..ID_LEN)
                .map(|_| BASE36_DIGITS[self.rng.gen_range(0..BASE36_DIGITS.len())] as char)
                .collect();
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}
