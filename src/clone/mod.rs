//! Background clone orchestration

mod handle;
mod service;
mod worker;

pub use handle::{CloneError, CloneHandle, CloneOutcome};
pub use service::RepositoryCloneService;
pub use worker::{WorkerPool, WorkerRequest};
