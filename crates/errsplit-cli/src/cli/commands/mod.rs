//! CLI command handlers.

mod offline;
mod split;

pub use offline::run_offline;
pub use split::run_split;
