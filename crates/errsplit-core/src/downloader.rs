//! Streaming HTTP GET of the report.
//!
//! The body is handed to a caller-supplied sink chunk by chunk as libcurl
//! receives it; nothing is buffered beyond libcurl's receive buffer. Bodies of
//! non-200 responses are kept (capped) for the error report instead.

use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::fetch_head::{easy_for, status_code};
use std::cell::Cell;
use std::str;

/// Upper bound on the error body retained for a failed GET.
const ERROR_BODY_LIMIT: usize = 64 * 1024;

/// GETs `url` and feeds every body chunk of a 200 response to `sink`.
///
/// Chunks are at most `cfg.chunk_size` bytes. The first error returned by
/// `sink` aborts the transfer and is returned as-is. A non-200 final status
/// yields `SplitError::Http` with the (lossy UTF-8) response body.
pub fn stream_get<F>(url: &str, cfg: &SplitConfig, mut sink: F) -> Result<(), SplitError>
where
    F: FnMut(&[u8]) -> Result<(), SplitError>,
{
    let status = Cell::new(0u32);
    let mut error_body: Vec<u8> = Vec::new();
    let mut failure: Option<SplitError> = None;

    let mut easy = easy_for(url, cfg)?;
    easy.get(true)?;
    easy.buffer_size(cfg.chunk_size)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Some(code) = str::from_utf8(data).ok().and_then(status_code) {
                status.set(code);
            }
            true
        })?;
        transfer.write_function(|data| {
            if status.get() != 200 {
                let room = ERROR_BODY_LIMIT.saturating_sub(error_body.len());
                error_body.extend_from_slice(&data[..data.len().min(room)]);
                return Ok(data.len());
            }
            match sink(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    failure = Some(e);
                    Ok(0) // abort transfer
                }
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = failure {
        return Err(e);
    }
    performed?;

    let code = easy.response_code()?;
    if code != 200 {
        return Err(SplitError::Http {
            method: "GET",
            status: code,
            body: String::from_utf8_lossy(&error_body).into_owned(),
        });
    }

    Ok(())
}
