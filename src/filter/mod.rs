//! Filter stage: predicate-backed workers that pass matching paths from one channel to another.

pub mod function;
pub mod methods;

use anyhow::Result;
use crossbeam_channel::{Receiver, Sender};

use crate::pipeline::CancelToken;

pub use function::{FunctionFilter, Predicate};
pub use methods::{FilterConstructor, FilterMethods, base_name};

/// Something that takes path strings, evaluates them by some rule, and outputs the ones that pass.
pub trait Filter: Send + Sync {
    /// Start one worker that consumes `inputs` until the channel is closed (or `cancel` fires),
    /// sending passing paths to `outputs`.
    ///
    /// May be called repeatedly against the same channel pair; workers compete for inputs.
    fn start(&self, inputs: Receiver<String>, outputs: Sender<String>, cancel: CancelToken);

    /// Evaluate the rule on a single path, outside any worker.
    fn matches(&self, path: &str) -> bool;

    /// Block until one started worker has finished.
    ///
    /// Errors immediately when no started worker is left to join, instead of blocking forever.
    fn wait(&self) -> Result<()>;

    /// Workers started but not yet joined by [`Filter::wait`].
    fn pending(&self) -> usize;

    /// Join every outstanding worker. Returns how many were joined.
    fn wait_all(&self) -> Result<usize> {
        let mut joined = 0;
        while self.pending() > 0 {
            self.wait()?;
            joined += 1;
        }
        Ok(joined)
    }
}
