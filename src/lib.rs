//! Resolve where repositories should be cloned and clone them in the
//! background.
//!
//! ```no_run
//! use ghclone::{Config, RepositoryCloneService};
//!
//! let service = RepositoryCloneService::from_config(&Config::default())?;
//! let handle = service.clone_repository(
//!     "https://github.com/octocat/Hello-World.git",
//!     "Hello-World",
//!     service.default_clone_path(),
//! )?;
//! handle.wait()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod clone;
pub mod config;
pub mod env;
pub mod git;
pub mod paths;
pub mod types;

#[cfg(test)]
mod test_support;

pub use clone::{CloneError, CloneHandle, CloneOutcome, RepositoryCloneService};
pub use config::{Config, ConfigError};
pub use env::{Environment, SystemEnvironment};
pub use git::{ClonePrimitive, GitCli, GitConfigProvider, GitError, GitProvider};
pub use paths::{DirectoryProvider, LocalDirectories, PathResolver};
pub use types::{ArgumentError, CloneRequest};
