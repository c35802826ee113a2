//! Pipeline components: cancellation, context, walk loop, orchestration, error handling.

pub mod cancel;
pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod walk;

pub use cancel::{CancelToken, recv_or_cancel, send_or_cancel};
pub use context::{PipelineChannels, WalkContext, WalkStats, create_pipeline_channels};
pub use error_handler::check_for_initial_error_or_skipped_paths;
pub use orchestrator::{
    PipelineHandles, check_root, drain_results, resolve_workers, run_pipeline,
    shutdown_pipeline_handles, spawn_coordinator, spawn_filter_workers, start_pipeline,
};
pub use walk::{
    WalkOutcome, is_excluded, run_walk_loop, spawn_walk_thread, to_outcome_walkdir,
    to_path_string,
};
