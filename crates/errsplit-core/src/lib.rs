//! Fetch the published lint error report and split it into one JSON-lines
//! shard per source file, skipping the download when the `ETag` is unchanged.

pub mod config;
pub mod logging;

pub mod cache_token;
pub mod chunker;
pub mod downloader;
pub mod error;
pub mod fetch_head;
pub mod partition;
pub mod run;
pub mod storage;

pub use error::SplitError;
pub use run::{run, split_file, Outcome, RunSummary};
