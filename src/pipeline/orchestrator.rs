use anyhow::{Context, Result, anyhow, bail};
use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::executor::ExecutorMethods;
use crate::filter::{Filter, FilterMethods};
use crate::pipeline::{self, CancelToken, WalkContext, WalkStats};
use crate::utils::config::default_workers;
use crate::{ActionOpts, Cancelled, Opts, RunSummary};

/// Handles returned by [`start_pipeline`]: drain `results` until it closes, then join both threads.
pub struct PipelineHandles {
    pub results: Receiver<Result<()>>,
    pub walk_handle: JoinHandle<WalkStats>,
    pub coordinator_handle: JoinHandle<Result<usize>>,
    pub workers: usize,
}

/// Fail unless `root` exists and is a directory.
pub fn check_root(root: &Path) -> Result<()> {
    let meta = match std::fs::metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            bail!("{} does not exist", root.display())
        }
        Err(e) => return Err(e).with_context(|| format!("while reading {}", root.display())),
    };
    if !meta.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    Ok(())
}

/// Resolve the filter worker count; zero workers could never drain the path channel.
pub fn resolve_workers(opts: &Opts) -> Result<usize> {
    match opts.workers.unwrap_or_else(default_workers) {
        0 => bail!("worker count must be at least 1"),
        n => Ok(n),
    }
}

/// Start `num_workers` filter workers competing for `path_rx`.
pub fn spawn_filter_workers(
    filter: &Arc<dyn Filter>,
    path_rx: &Receiver<String>,
    matched_tx: &Sender<String>,
    num_workers: usize,
    cancel: &CancelToken,
) {
    for _ in 0..num_workers {
        filter.start(path_rx.clone(), matched_tx.clone(), cancel.clone());
    }
}

/// Wait for every filter worker, then drop the last matched-path sender so the action sees the
/// channel close. Holding `matched_tx` until then means the channel only closes after all workers
/// have finished.
pub fn spawn_coordinator(
    filter: Arc<dyn Filter>,
    matched_tx: Sender<String>,
) -> JoinHandle<Result<usize>> {
    thread::spawn(move || {
        let joined = filter.wait_all();
        drop(matched_tx);
        joined
    })
}

/// Validate config, then start walk, filter workers, coordinator, and action.
/// Configuration errors return here, before any thread is started.
pub fn start_pipeline(
    opts: &Opts,
    filters: &FilterMethods,
    executors: &ExecutorMethods,
    cancel: &CancelToken,
) -> Result<PipelineHandles> {
    let workers = resolve_workers(opts)?;
    check_root(&opts.root)?;
    let filter = filters.build(&opts.filter, &opts.pattern)?;
    let executor = executors.lookup(&opts.action)?;
    debug!(
        "Filter {} {:?}, action {}, {} workers",
        opts.filter, opts.pattern, opts.action, workers
    );

    let channels = pipeline::create_pipeline_channels(workers);

    spawn_filter_workers(
        &filter,
        &channels.path_rx,
        &channels.matched_tx,
        workers,
        cancel,
    );
    // Workers hold their own clones; the walk must notice when they are all gone.
    drop(channels.path_rx);

    let action = executor(channels.matched_rx, &ActionOpts::from(opts), cancel.clone());
    let exclude = action.target.as_deref().and_then(|p| p.canonicalize().ok());
    if let Some(target) = &exclude {
        debug!("Action writes to {}; excluded from walk", target.display());
    }

    let walk_handle = pipeline::spawn_walk_thread(
        channels.path_tx,
        WalkContext::new(opts, exclude),
        cancel.clone(),
    );
    let coordinator_handle = spawn_coordinator(filter, channels.matched_tx);

    Ok(PipelineHandles {
        results: action.results,
        walk_handle,
        coordinator_handle,
        workers,
    })
}

/// Drain the action's result channel until it closes. Returns the first error, if any.
pub fn drain_results(results: &Receiver<Result<()>>) -> Result<()> {
    let mut received = 0_usize;
    let mut first_error = None;
    for outcome in results.iter() {
        received += 1;
        if let Err(e) = outcome
            && first_error.is_none()
        {
            first_error = Some(e);
        }
    }
    match first_error {
        Some(e) => Err(e),
        None if received == 0 => Err(anyhow!("action exited without reporting a result")),
        None => Ok(()),
    }
}

/// Join walk and coordinator threads (after the result channel closed).
pub fn shutdown_pipeline_handles(
    walk_handle: JoinHandle<WalkStats>,
    coordinator_handle: JoinHandle<Result<usize>>,
) -> Result<WalkStats> {
    let stats = walk_handle
        .join()
        .map_err(|_| anyhow!("walk thread panicked"))?;
    let joined = coordinator_handle
        .join()
        .map_err(|_| anyhow!("coordinator thread panicked"))??;
    debug!("Joined {} filter workers", joined);
    Ok(stats)
}

/// Main orchestrator: walk -> path channel -> filter workers -> matched channel -> action.
///
/// Reports zero or one error. A strict-mode traversal error wins over the action error it caused
/// (the action only sees the cancellation). A run stopped by an outside cancel returns
/// [`Cancelled`].
pub fn run_pipeline(
    opts: &Opts,
    filters: &FilterMethods,
    executors: &ExecutorMethods,
    cancel: &CancelToken,
) -> Result<RunSummary> {
    let PipelineHandles {
        results,
        walk_handle,
        coordinator_handle,
        workers,
    } = start_pipeline(opts, filters, executors, cancel)?;

    let action_result = drain_results(&results);
    let stats = shutdown_pipeline_handles(walk_handle, coordinator_handle)?;

    pipeline::check_for_initial_error_or_skipped_paths(&stats, opts.verbose)?;
    if let Err(e) = action_result {
        // A stop caused only by cancellation is reported as the bare cancellation.
        if e.downcast_ref::<Cancelled>().is_some() {
            return Err(Cancelled.into());
        }
        return Err(e);
    }

    let summary = RunSummary {
        walked: stats.sent,
        skipped: stats.skipped.len(),
    };
    debug!(
        "Walked {} files with {} filter workers, skipped {} entries",
        summary.walked, workers, summary.skipped
    );
    Ok(summary)
}
