//! Background worker threads for clone requests.
//!
//! Clones run on a small pool of threads so the caller never blocks on
//! directory creation or on git. The queue is unbounded, so submitting never
//! waits either. Each request carries its own reply channel and is answered
//! exactly once.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc as oneshot;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::handle::{CloneError, CloneHandle, CloneOutcome};
use crate::git::ClonePrimitive;
use crate::paths::DirectoryProvider;
use crate::types::CloneRequest;

/// Submodules are always cloned along with the repository.
const RECURSE_SUBMODULES: bool = true;

/// Requests the workers can handle.
pub enum WorkerRequest {
    /// Clone a repository and report the outcome.
    Clone {
        request: CloneRequest,
        reply: oneshot::Sender<CloneOutcome>,
    },

    /// Stop one worker.
    Shutdown,
}

/// One background worker.
struct Worker {
    receiver: Receiver<WorkerRequest>,
    directories: Arc<dyn DirectoryProvider>,
    cloner: Arc<dyn ClonePrimitive>,
}

impl Worker {
    /// Run the worker loop (blocks until Shutdown).
    fn run(self) {
        log::debug!("Clone worker started");

        loop {
            match self.receiver.recv() {
                Ok(WorkerRequest::Clone { request, reply }) => {
                    let outcome = self.handle(&request);
                    // The caller may have dropped its handle.
                    let _ = reply.send(outcome);
                }
                Ok(WorkerRequest::Shutdown) => {
                    log::debug!("Clone worker shutting down");
                    break;
                }
                Err(_) => {
                    log::debug!("Clone worker channel closed, exiting");
                    break;
                }
            }
        }
    }

    /// Execute one request, turning a panic in a collaborator into an error.
    fn handle(&self, request: &CloneRequest) -> CloneOutcome {
        panic::catch_unwind(AssertUnwindSafe(|| self.execute(request))).unwrap_or_else(
            |payload| {
                let message = panic_message(payload.as_ref());
                log::error!(
                    "Could not clone {} to {}. {}",
                    request.source_url(),
                    request.destination().display(),
                    message
                );
                Err(CloneError::Panicked(message))
            },
        )
    }

    fn execute(&self, request: &CloneRequest) -> CloneOutcome {
        let path = request.destination();

        self.directories.create_directory(&path)?;

        self.cloner
            .clone_repo(request.source_url(), &path, RECURSE_SUBMODULES)
            .inspect_err(|e| {
                log::error!(
                    "Could not clone {} to {}. {}",
                    request.source_url(),
                    path.display(),
                    e
                )
            })?;

        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Handle for the pool of clone workers.
pub struct WorkerPool {
    sender: Sender<WorkerRequest>,
    threads: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` threads (at least 1) sharing one queue.
    pub fn spawn(
        workers: usize,
        directories: Arc<dyn DirectoryProvider>,
        cloner: Arc<dyn ClonePrimitive>,
    ) -> io::Result<Self> {
        let (sender, receiver) = unbounded();

        let mut pool = Self {
            sender,
            threads: Vec::new(),
        };

        for index in 0..workers.max(1) {
            let worker = Worker {
                receiver: receiver.clone(),
                directories: Arc::clone(&directories),
                cloner: Arc::clone(&cloner),
            };
            // On error `pool` is dropped, which stops the threads already running.
            let thread = thread::Builder::new()
                .name(format!("ghclone-worker-{}", index))
                .spawn(move || worker.run())?;
            pool.threads.push(thread);
        }

        Ok(pool)
    }

    /// Number of worker threads. Zero after [`shutdown`](Self::shutdown).
    pub fn size(&self) -> usize {
        self.threads.len()
    }

    /// Requests waiting for a free worker.
    pub fn pending(&self) -> usize {
        self.sender.len()
    }

    /// Queue a clone. Never blocks.
    pub fn submit(&self, request: CloneRequest) -> CloneHandle {
        let (tx, rx) = oneshot::channel();
        let destination = request.destination();

        if self
            .sender
            .send(WorkerRequest::Clone { request, reply: tx })
            .is_err()
        {
            // The reply sender was dropped with the request, so the handle
            // reports WorkerUnavailable.
            log::warn!("Clone workers are gone; request dropped");
        }

        CloneHandle::new(destination, rx)
    }

    /// Stop the workers and wait for them after every queued request has
    /// been answered.
    pub fn shutdown(&mut self) {
        self.stop();
        for thread in self.threads.drain(..) {
            if thread.join().is_err() {
                log::warn!("Clone worker panicked");
            }
        }
    }

    /// Ask every worker to stop once the queue ahead of it is drained.
    fn stop(&self) {
        for _ in &self.threads {
            let _ = self.sender.send(WorkerRequest::Shutdown);
        }
    }
}

impl Drop for WorkerPool {
    /// Workers finish the queued requests on their own; dropping the pool
    /// does not wait for running clones.
    fn drop(&mut self) {
        self.stop();
    }
}
