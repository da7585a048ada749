//! Dedicated thread for the blocking assistant loop
//!
//! Audio capture, playback and the HTTP adapters all block, so the whole
//! listen/dispatch/speak cycle runs on one named OS thread. The state
//! machine is built on that thread too, keeping blocking clients out of
//! the async runtime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tokio::sync::oneshot;
use tracing::{error, info};

use crate::state::StateMachine;

/// Errors that can occur when starting the assistant loop
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("assistant loop is already running")]
    AlreadyRunning,

    #[error("failed to spawn assistant thread: {0}")]
    ThreadSpawn(String),
}

/// Owner of the assistant loop thread
pub struct AssistantWorker {
    running: Arc<AtomicBool>,
}

impl AssistantWorker {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Build a state machine on a new thread and run it there.
    ///
    /// The returned receiver resolves once the loop ends, with the build or
    /// run error if there was one.
    pub fn start<F>(&self, build: F) -> Result<oneshot::Receiver<anyhow::Result<()>>, WorkerError>
    where
        F: FnOnce() -> anyhow::Result<StateMachine> + Send + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(WorkerError::AlreadyRunning);
        }

        let running = Arc::clone(&self.running);
        let (done_tx, done_rx) = oneshot::channel();

        let spawned = thread::Builder::new()
            .name("assistant-loop".to_string())
            .spawn(move || {
                info!("assistant loop thread started");

                let result = build().and_then(|mut machine| Ok(machine.run(&running)?));
                if let Err(e) = &result {
                    error!(error = %e, "assistant loop failed");
                }

                running.store(false, Ordering::SeqCst);
                let _ = done_tx.send(result);
                info!("assistant loop thread stopped");
            });

        if let Err(e) = spawned {
            self.running.store(false, Ordering::SeqCst);
            return Err(WorkerError::ThreadSpawn(e.to_string()));
        }

        Ok(done_rx)
    }

    /// Ask the loop to stop after the current listen cycle
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the loop is currently running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for AssistantWorker {
    fn default() -> Self {
        Self::new()
    }
}
