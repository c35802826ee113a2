//! Filewalker: concurrent file tree scanner with pluggable filters and actions.
//!
//! A walk thread feeds regular-file paths into a bounded channel, a pool of filter workers
//! passes the matching ones on, and a single action (report, copy, move) consumes them and
//! reports one terminal result. A shared [`CancelToken`](pipeline::CancelToken) stops every
//! stage on the first fatal error.

pub mod engine;
pub mod executor;
pub mod filter;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

/// Result alias used by public filewalker API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

use executor::ExecutorMethods;
use filter::FilterMethods;
use pipeline::CancelToken;

/// Run one scan with the standard filter and action registries.
///
/// Use [`pipeline::run_pipeline`] directly to inject custom registries or share a cancel token.
pub fn walk_dir(opts: &Opts) -> Result<RunSummary> {
    pipeline::run_pipeline(
        opts,
        &FilterMethods::default(),
        &ExecutorMethods::default(),
        &CancelToken::new(),
    )
}
