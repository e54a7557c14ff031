//! Background execution of a batch
//!
//! The batch runs on its own thread and reports progress over a channel, so
//! an interactive front end stays responsive while titles are fetched.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::{BatchEvent, BatchJob, BatchProcessor, BatchSummary};

/// Cooperative cancellation flag, checked between files
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle to a batch running in the background
pub struct BatchHandle {
    events: Receiver<BatchEvent>,
    cancel: CancelToken,
    thread: JoinHandle<Result<(BatchJob, BatchSummary)>>,
}

impl BatchHandle {
    /// Progress events; the channel closes when the batch ends
    pub fn events(&self) -> &Receiver<BatchEvent> {
        &self.events
    }

    /// Asks the batch to stop after the file in progress
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Waits for the batch and hands back the job with its updated counters
    pub fn join(self) -> Result<(BatchJob, BatchSummary)> {
        self.thread
            .join()
            .map_err(|_| anyhow::anyhow!("Batch thread panicked"))?
    }
}

/// Starts `job` on a background thread
///
/// The processor's busy flag still applies: spawning a second batch on the
/// same processor while one is running makes the second one fail.
pub fn spawn_batch(processor: Arc<BatchProcessor>, mut job: BatchJob) -> BatchHandle {
    let (sender, events) = mpsc::channel();
    let cancel = CancelToken::new();
    let token = cancel.clone();

    let thread = thread::spawn(move || {
        let summary = processor.run(&mut job, &token, |event| {
            // Receiver may have been dropped; the batch still runs to the end
            let _ = sender.send(event.clone());
        })?;
        Ok((job, summary))
    });

    BatchHandle {
        events,
        cancel,
        thread,
    }
}
