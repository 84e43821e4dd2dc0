//! Repository clone service
//!
//! Ties together default-path resolution and the clone worker pool. This is
//! the surface a host application talks to.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::handle::CloneHandle;
use super::worker::WorkerPool;
use crate::config::Config;
use crate::env::{Environment, SystemEnvironment};
use crate::git::{ClonePrimitive, FixedClonePath, GitCli, GitConfigProvider, GitProvider};
use crate::paths::{DirectoryProvider, LocalDirectories, PathResolver};
use crate::types::{ArgumentError, CloneRequest};

/// Clones repositories in the background.
pub struct RepositoryCloneService {
    default_clone_path: PathBuf,
    pool: WorkerPool,
}

impl RepositoryCloneService {
    /// Build a service from explicit collaborators.
    ///
    /// The default clone path is resolved here, once, and never re-evaluated.
    pub fn new(
        env: &dyn Environment,
        provider: &dyn GitProvider,
        directories: Arc<dyn DirectoryProvider>,
        cloner: Arc<dyn ClonePrimitive>,
        workers: usize,
    ) -> io::Result<Self> {
        let fallback = env.user_documents_path_for_application();
        let default_clone_path =
            PathResolver::new(env, provider).resolve_default_path(&fallback);
        log::debug!("Default clone path: {}", default_clone_path.display());

        let pool = WorkerPool::spawn(workers, directories, cloner)?;

        Ok(Self {
            default_clone_path,
            pool,
        })
    }

    /// Build a service backed by the real environment, filesystem and git.
    ///
    /// `config.clone_path` takes precedence over the git config preference.
    pub fn from_config(config: &Config) -> io::Result<Self> {
        let provider: Box<dyn GitProvider> = match &config.clone_path {
            Some(path) => Box::new(FixedClonePath(Some(path.clone()))),
            None => Box::new(GitConfigProvider::default()),
        };

        Self::new(
            &SystemEnvironment,
            provider.as_ref(),
            Arc::new(LocalDirectories),
            Arc::new(GitCli::with_path(&config.git_path)),
            config.workers,
        )
    }

    /// Directory new repositories go under when the caller has no preference.
    pub fn default_clone_path(&self) -> &Path {
        &self.default_clone_path
    }

    /// Clone `source_url` into `{destination_parent_dir}/{repository_name}`.
    ///
    /// Returns immediately. Empty arguments are rejected here, before any
    /// work is queued; every other failure arrives through the handle.
    pub fn clone_repository(
        &self,
        source_url: &str,
        repository_name: &str,
        destination_parent_dir: impl AsRef<Path>,
    ) -> Result<CloneHandle, ArgumentError> {
        let request =
            CloneRequest::new(source_url, repository_name, destination_parent_dir.as_ref())?;
        Ok(self.clone_request(request))
    }

    /// Queue an already validated request.
    pub fn clone_request(&self, request: CloneRequest) -> CloneHandle {
        self.pool.submit(request)
    }

    /// Accepted requests that no worker has picked up yet.
    pub fn pending_requests(&self) -> usize {
        self.pool.pending()
    }
}
