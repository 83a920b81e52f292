//! Parse HTTP response header lines into HeadResult.

use super::HeadResult;

/// Status code of an `HTTP/x.y NNN reason` line, `None` for ordinary headers.
pub(crate) fn status_code(line: &str) -> Option<u32> {
    let rest = line.trim().strip_prefix("HTTP/")?;
    rest.split_whitespace().nth(1)?.parse().ok()
}

/// Parse collected header lines into HeadResult.
///
/// libcurl reports the headers of every response in a redirect chain, so each
/// status line starts over and only the final response survives.
pub(crate) fn parse_headers(lines: &[String]) -> HeadResult {
    let mut status = 0;
    let mut etag = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(code) = status_code(line) {
            status = code;
            etag = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("etag") {
                etag = Some(value.trim().to_string());
            }
        }
    }

    HeadResult { status, etag }
}
