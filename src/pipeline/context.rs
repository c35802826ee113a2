//! Pipeline context: channels and the shared data passed into the walk thread.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::PathBuf;

use crate::Opts;

/// Shared context for the walk. Built in `run_pipeline` and moved into the walk thread.
#[derive(Clone, Debug)]
pub struct WalkContext {
    pub root: PathBuf,
    pub follow_links: bool,
    pub strict: bool,
    /// Canonical path of the action's output file or directory; never fed back into the pipeline.
    pub exclude: Option<PathBuf>,
}

impl WalkContext {
    pub fn new(opts: &Opts, exclude: Option<PathBuf>) -> Self {
        Self {
            root: opts.root.clone(),
            follow_links: opts.follow_links,
            strict: opts.strict,
            exclude,
        }
    }
}

/// What the walk thread reports when it is joined.
#[derive(Debug, Default)]
pub struct WalkStats {
    /// Paths sent into the path channel.
    pub sent: usize,
    /// Entries that could not be read, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
    /// Strict mode: the traversal error that stopped the walk.
    pub first_error: Option<String>,
}

/// Path channel (walk -> filters) and matched channel (filters -> action).
/// Both are bounded by the worker count.
pub struct PipelineChannels {
    pub path_tx: Sender<String>,
    pub path_rx: Receiver<String>,
    pub matched_tx: Sender<String>,
    pub matched_rx: Receiver<String>,
}

pub fn create_pipeline_channels(channel_cap: usize) -> PipelineChannels {
    let (path_tx, path_rx) = bounded::<String>(channel_cap);
    let (matched_tx, matched_rx) = bounded::<String>(channel_cap);
    PipelineChannels {
        path_tx,
        path_rx,
        matched_tx,
        matched_rx,
    }
}
