use anyhow::{Result, bail};
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::{Arc, Mutex};
use std::thread;

use super::Filter;
use crate::pipeline::{CancelToken, recv_or_cancel, send_or_cancel};

/// Pure test over a path string. Shared by every worker of a filter.
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A [`Filter`] that tests each path with a predicate function.
///
/// Workers are plain threads. Each one signals a shared completion channel exactly once when it
/// exits; `outstanding` counts started workers whose signal has not been claimed by `wait` yet.
pub struct FunctionFilter {
    predicate: Predicate,
    outstanding: Mutex<usize>,
    done_tx: Sender<()>,
    done_rx: Receiver<()>,
}

/// Sends the completion signal on drop, so a worker signals once even if the predicate panics.
struct CompletionGuard(Sender<()>);

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let _ = self.0.send(());
    }
}

impl FunctionFilter {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let (done_tx, done_rx) = unbounded();
        Self {
            predicate: Arc::new(predicate),
            outstanding: Mutex::new(0),
            done_tx,
            done_rx,
        }
    }
}

fn filter_worker_loop(
    predicate: Predicate,
    inputs: Receiver<String>,
    outputs: Sender<String>,
    cancel: CancelToken,
) {
    while let Ok(Some(path)) = recv_or_cancel(&inputs, &cancel) {
        if predicate(&path) && send_or_cancel(&outputs, path, &cancel).is_err() {
            break;
        }
    }
}

impl Filter for FunctionFilter {
    fn start(&self, inputs: Receiver<String>, outputs: Sender<String>, cancel: CancelToken) {
        match self.outstanding.lock() {
            Ok(mut n) => *n += 1,
            Err(poisoned) => *poisoned.into_inner() += 1,
        }
        let guard = CompletionGuard(self.done_tx.clone());
        let predicate = Arc::clone(&self.predicate);
        thread::spawn(move || {
            let _guard = guard;
            filter_worker_loop(predicate, inputs, outputs, cancel);
        });
    }

    fn matches(&self, path: &str) -> bool {
        (self.predicate)(path)
    }

    fn wait(&self) -> Result<()> {
        {
            let mut n = match self.outstanding.lock() {
                Ok(n) => n,
                Err(poisoned) => poisoned.into_inner(),
            };
            if *n == 0 {
                bail!("filter wait called with no running workers");
            }
            *n -= 1;
        }
        self.done_rx
            .recv()
            .map_err(|_| anyhow::anyhow!("filter completion channel closed"))
    }

    fn pending(&self) -> usize {
        match self.outstanding.lock() {
            Ok(n) => *n,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
