//! URLで示されたベースパスからの辞書の取得
//!
//! `download`フィーチャーが有効な場合のみ利用可能です。

use std::io::Read;

use reqwest::StatusCode;
use vibrato_rkyv::Dictionary;

use crate::dictionary::{COMPRESSED_DICT_FILE, DICT_FILE};
use crate::errors::{DownloadError, Result};

/// ベースURLから辞書を取得して読み込みます。
///
/// `system.dic.zst`を優先し、存在しない(404)場合は`system.dic`を試します。
/// 圧縮ファイルはレスポンスを読みながら展開します。
///
/// # 引数
///
/// * `base` - 末尾に`/`を含まないベースURL
///
/// # エラー
///
/// リクエストの失敗、成功以外のステータス、どちらのファイルも存在しない場合、
/// または受信データが辞書として不正な場合にエラーを返します。
pub(crate) fn fetch_dictionary(base: &str) -> Result<Dictionary> {
    let client = reqwest::blocking::Client::new();

    for (file, compressed) in [(COMPRESSED_DICT_FILE, true), (DICT_FILE, false)] {
        let url = format!("{base}/{file}");
        log::info!("[kotoba] Fetching {url}");

        let response = client.get(&url).send().map_err(DownloadError::from)?;
        if response.status() == StatusCode::NOT_FOUND {
            continue;
        }
        if !response.status().is_success() {
            return Err(DownloadError::HttpStatus(response.status()).into());
        }

        let reader: Box<dyn Read> = if compressed {
            Box::new(zstd::Decoder::new(response).map_err(DownloadError::from)?)
        } else {
            Box::new(response)
        };
        return Ok(Dictionary::read(reader)?);
    }

    Err(DownloadError::NotFound(base.to_string()).into())
}
