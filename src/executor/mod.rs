//! Action stage: consumes matched paths and produces a single terminal result.
//!
//! An executor is started once with the matched-path receiver. It drains that receiver on its own
//! thread, then sends exactly one `Result` on the handle's result channel and drops the sender,
//! which is the only way that channel gets closed. Failures found while setting up (destination
//! directory, output file) travel the same channel, so callers consume results the same way
//! no matter when the failure happened.
//!
//! On a fatal error an executor fires the cancellation token before reporting, so the walk and the
//! filter workers stop instead of blocking on a stage that no longer reads.

pub mod copy;
pub mod destination;
pub mod mover;
pub mod report;

use anyhow::{Result, bail};
use crossbeam_channel::{Receiver, Sender, bounded};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::thread;

use crate::ActionOpts;
use crate::pipeline::CancelToken;

pub use copy::copy_executor;
pub use destination::{resolve_destination, synthesized_dir_name};
pub use mover::move_executor;
pub use report::report_executor;

/// Starts an action over `inputs`.
pub type Executor =
    fn(inputs: Receiver<String>, opts: &ActionOpts, cancel: CancelToken) -> ActionHandle;

/// What a started action hands back to the caller.
pub struct ActionHandle {
    /// Zero or one terminal results, then closed.
    pub results: Receiver<Result<()>>,
    /// File or directory the action writes into, if any. The walk skips it.
    pub target: Option<PathBuf>,
}

impl ActionHandle {
    /// Handle for an action that failed before it could start. The error is already queued.
    pub(crate) fn failed(err: anyhow::Error, cancel: &CancelToken) -> Self {
        cancel.cancel();
        let (tx, rx) = bounded(1);
        let _ = tx.send(Err(err));
        Self {
            results: rx,
            target: None,
        }
    }

    /// Run `body` on the action thread and report its outcome as the single terminal result.
    pub(crate) fn spawn<F>(target: Option<PathBuf>, cancel: CancelToken, body: F) -> Self
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let (tx, rx) = bounded(1);
        thread::spawn(move || report_outcome(tx, &cancel, body()));
        Self {
            results: rx,
            target,
        }
    }
}

fn report_outcome(done: Sender<Result<()>>, cancel: &CancelToken, outcome: Result<()>) {
    if outcome.is_err() {
        cancel.cancel();
    }
    let _ = done.send(outcome);
}

/// Immutable name -> executor map, injected into the pipeline.
#[derive(Clone)]
pub struct ExecutorMethods(BTreeMap<&'static str, Executor>);

impl Default for ExecutorMethods {
    fn default() -> Self {
        Self::new()
            .with("report", report_executor)
            .with("copy", copy_executor)
            .with("move", move_executor)
    }
}

impl ExecutorMethods {
    /// Empty registry.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, name: &'static str, executor: Executor) -> Self {
        self.0.insert(name, executor);
        self
    }

    pub fn get(&self, name: &str) -> Option<Executor> {
        self.0.get(name).copied()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.0.keys().copied().collect()
    }

    /// Look up `name`, failing with the list of valid names.
    pub fn lookup(&self, name: &str) -> Result<Executor> {
        match self.get(name) {
            Some(executor) => Ok(executor),
            None => bail!(
                "{} is not a valid action; possible values: {}",
                name,
                self.names().join(", ")
            ),
        }
    }
}
