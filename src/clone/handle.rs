//! Single-shot completion handle for a background clone.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self as oneshot, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use thiserror::Error;

use crate::git::GitError;

/// Errors delivered through a [`CloneHandle`].
#[derive(Error, Debug)]
pub enum CloneError {
    /// The destination directory could not be created.
    #[error("io error: {0}")]
    Directory(#[from] io::Error),
    /// The clone itself failed.
    #[error("git error: {0}")]
    Clone(#[from] GitError),
    /// A collaborator panicked while handling the request. The worker
    /// survives and keeps serving the queue.
    #[error("clone panicked: {0}")]
    Panicked(String),
    /// The worker pool was shut down before answering.
    #[error("clone worker unavailable")]
    WorkerUnavailable,
}

/// Final result of one clone request.
pub type CloneOutcome = Result<(), CloneError>;

/// Receives the outcome of exactly one clone request.
///
/// Every method that yields the outcome consumes the handle; the non-blocking
/// variants hand it back when the clone is still running.
#[derive(Debug)]
pub struct CloneHandle {
    destination: PathBuf,
    receiver: oneshot::Receiver<CloneOutcome>,
}

impl CloneHandle {
    pub(crate) fn new(destination: PathBuf, receiver: oneshot::Receiver<CloneOutcome>) -> Self {
        Self {
            destination,
            receiver,
        }
    }

    /// Where the working copy is being created.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Block until the clone finishes.
    pub fn wait(self) -> CloneOutcome {
        self.receiver
            .recv()
            .unwrap_or(Err(CloneError::WorkerUnavailable))
    }

    /// Block for at most `timeout`. Returns the handle if the clone is still
    /// running.
    pub fn wait_timeout(self, timeout: Duration) -> Result<CloneOutcome, Self> {
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => Ok(outcome),
            Err(RecvTimeoutError::Timeout) => Err(self),
            Err(RecvTimeoutError::Disconnected) => Ok(Err(CloneError::WorkerUnavailable)),
        }
    }

    /// Return the outcome if it is already available.
    pub fn try_wait(self) -> Result<CloneOutcome, Self> {
        match self.receiver.try_recv() {
            Ok(outcome) => Ok(outcome),
            Err(TryRecvError::Empty) => Err(self),
            Err(TryRecvError::Disconnected) => Ok(Err(CloneError::WorkerUnavailable)),
        }
    }
}
