//! KSH (Hungarian Central Statistical Office) stadat download.
//!
//! The consumer price index table is a static CSV export with Hungarian
//! column headers, served in an ISO-8859-1-family encoding rather than UTF-8.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{AppError, Result};

pub const CPI_URL: &str = "https://www.ksh.hu/stadat_files/ara/hu/ara0040.csv";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Download the CPI export and decode it to UTF-8.
pub fn fetch_cpi(url: &str) -> Result<String> {
    debug!(%url, "requesting CSV");
    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let resp = client.get(url).send()?;
    if !resp.status().is_success() {
        return Err(AppError::Status {
            status: resp.status(),
            url: url.to_string(),
        });
    }
    let bytes = resp.bytes()?;
    Ok(decode_latin1(&bytes))
}

/// Latin-1 bytes map one-to-one onto the first 256 Unicode code points, so
/// decoding needs no table. Hungarian `ő`/`ű` do not exist in Latin-1; the
/// feed ships them as `õ`/`û`, which the CPI normalizer accounts for.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn latin1_decodes_accented_headers() {
        // "Év;Idõszak" in ISO-8859-1.
        let bytes = [0xC9, 0x76, 0x3B, 0x49, 0x64, 0xF5, 0x73, 0x7A, 0x61, 0x6B];
        assert_eq!(decode_latin1(&bytes), "Év;Idõszak");
    }

    #[test]
    fn fetch_decodes_response_bytes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/ara0040.csv");
            then.status(200).body(b"\xC9v;Per\xEDodo\n".to_vec());
        });

        let body = fetch_cpi(&server.url("/ara0040.csv")).unwrap();
        assert_eq!(body, "Év;Período\n");
    }

    #[test]
    fn server_error_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(500);
        });

        let err = fetch_cpi(&server.url("/ara0040.csv")).unwrap_err();
        assert!(matches!(err, AppError::Status { .. }));
    }
}
