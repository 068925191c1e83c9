use std::sync::Arc;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::{Receiver, Sender};
use tokio::sync::Mutex;

/// Broadcasts a shutdown signal to every listener created from this handle.
///
/// The runner owns one of these and hands out listeners to agents, the progress bar and any
/// background work that needs to stop when the run ends.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Sender<()>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self {
            sender: tokio::sync::broadcast::channel(1).0,
        }
    }

    /// Signal all listeners that they should stop their work.
    pub fn shutdown(&self) {
        if let Err(e) = self.sender.send(()) {
            // Fails if nobody is listening, which just means there is nothing left to stop.
            log::warn!("Failed to send shutdown signal: {e:?}");
        }
    }

    pub fn new_listener(&self) -> DelegatedShutdownListener {
        DelegatedShutdownListener::new(self.sender.subscribe())
    }
}

#[derive(Clone, Debug)]
pub struct DelegatedShutdownListener {
    receiver: Arc<Mutex<Receiver<()>>>,
}

impl DelegatedShutdownListener {
    pub(crate) fn new(receiver: Receiver<()>) -> Self {
        Self {
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    /// Point in time check whether the shutdown signal has been received.
    pub fn should_shutdown(&mut self) -> bool {
        match self.receiver.try_lock() {
            Ok(mut guard) => match guard.try_recv() {
                Ok(_) => true,
                Err(TryRecvError::Closed) => true,
                // Empty or lagged, keep going.
                Err(_) => false,
            },
            Err(_) => false,
        }
    }

    /// Wait for the shutdown signal. Safe to race against another future so the signal can
    /// cancel work in progress.
    pub async fn wait_for_shutdown(&mut self) {
        self.receiver
            .lock()
            .await
            .recv()
            .await
            .expect("Failed to receive shutdown signal");
    }
}

/// Returned from work that was cancelled because the run is shutting down.
///
/// The runner treats this error as expected and does not log it as a behaviour failure.
#[derive(derive_more::Error, derive_more::Display, Debug)]
pub struct ShutdownSignalError {
    msg: String,
}

impl Default for ShutdownSignalError {
    fn default() -> Self {
        Self {
            msg: "Execution cancelled by shutdown signal".to_string(),
        }
    }
}
