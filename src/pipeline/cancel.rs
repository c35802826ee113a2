//! Cancellation token shared by every pipeline stage, plus cancellable send/receive.
//!
//! The token owns the only sender of a zero-capacity channel. Cancelling drops that sender,
//! which disconnects the channel, so every `select!` that lists the token's receiver wakes up.

use crossbeam_channel::{Receiver, Sender, bounded, select};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::Cancelled;

#[derive(Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    signal: Receiver<()>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = bounded::<()>(0);
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            trigger: Arc::new(Mutex::new(Some(tx))),
            signal: rx,
        }
    }

    /// Fire the token. Idempotent; callable from any thread, the Ctrl+C handler included.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        if let Ok(mut trigger) = self.trigger.lock() {
            trigger.take();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Receiver that becomes ready (disconnected) once the token fires. Never yields a value.
    pub fn signal(&self) -> &Receiver<()> {
        &self.signal
    }
}

/// Send `item` unless the token fires first. A disconnected receiver also counts as a halt:
/// the downstream stage is gone and nothing more can be delivered.
pub fn send_or_cancel<T>(tx: &Sender<T>, item: T, cancel: &CancelToken) -> Result<(), Cancelled> {
    if cancel.is_cancelled() {
        return Err(Cancelled);
    }
    select! {
        send(tx, item) -> res => res.map_err(|_| Cancelled),
        recv(cancel.signal()) -> _ => Err(Cancelled),
    }
}

/// Receive the next item. `Ok(None)` when the channel is closed and drained,
/// `Err(Cancelled)` when the token fires.
pub fn recv_or_cancel<T>(rx: &Receiver<T>, cancel: &CancelToken) -> Result<Option<T>, Cancelled> {
    if cancel.is_cancelled() {
        return Err(Cancelled);
    }
    select! {
        recv(rx) -> msg => Ok(msg.ok()),
        recv(cancel.signal()) -> _ => Err(Cancelled),
    }
}
