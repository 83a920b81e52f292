//! Error type for a split run.

use std::io;

/// Everything that can stop a run before the new token is persisted.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// The server answered with a status other than 200.
    #[error("HTTP {status} - {body}")]
    Http {
        method: &'static str,
        status: u32,
        body: String,
    },
    /// libcurl failed (DNS, connect, timeout, aborted transfer).
    #[error("transfer failed")]
    Curl(#[from] curl::Error),
    /// Filesystem failure; `context` names the operation and path.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    /// A report line is not valid JSON.
    #[error("line {line}: invalid JSON")]
    Json {
        line: u64,
        #[source]
        source: serde_json::Error,
    },
    /// A report line is JSON but has no string key at index 0.
    #[error("line {line}: {reason}")]
    InvalidRecord { line: u64, reason: &'static str },
}

impl SplitError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        SplitError::Io {
            context: context.into(),
            source,
        }
    }

    /// True for a non-200 status on HEAD or GET.
    pub fn is_http_status(&self) -> bool {
        matches!(self, SplitError::Http { .. })
    }
}
