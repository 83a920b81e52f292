//! HTTP HEAD probe for the report's cache validator.
//!
//! Uses the curl crate (libcurl) to fetch response headers and capture the
//! `ETag` that decides whether the shards need rebuilding.

mod parse;

pub(crate) use parse::status_code;

use crate::config::SplitConfig;
use crate::error::SplitError;
use std::str;

/// Status and validator of the final response of a HEAD request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadResult {
    pub status: u32,
    /// `ETag` value verbatim (quotes included), if present.
    pub etag: Option<String>,
}

impl HeadResult {
    /// The validator compared against the sidecar; empty when the server sent none.
    pub fn remote_token(&self) -> &str {
        self.etag.as_deref().unwrap_or("")
    }
}

/// Easy handle with the options shared by HEAD and GET.
pub(crate) fn easy_for(url: &str, cfg: &SplitConfig) -> Result<curl::easy::Easy, SplitError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(&cfg.user_agent)?;
    easy.connect_timeout(cfg.connect_timeout())?;
    easy.timeout(cfg.timeout())?;
    Ok(easy)
}

/// Performs a HEAD request and returns the final status and `ETag`.
///
/// Follows redirects. Any status other than 200 becomes `SplitError::Http`.
pub fn probe(url: &str, cfg: &SplitConfig) -> Result<HeadResult, SplitError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = easy_for(url, cfg)?;
    easy.nobody(true)?; // HEAD request

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform()?;
    }

    let mut head = parse::parse_headers(&headers);
    if head.status == 0 {
        head.status = easy.response_code()?;
    }
    if head.status != 200 {
        return Err(SplitError::Http {
            method: "HEAD",
            status: head.status,
            body: String::new(),
        });
    }

    Ok(head)
}
