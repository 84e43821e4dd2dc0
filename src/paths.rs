//! Clone location management
//!
//! `PathResolver` picks the directory new repositories are cloned under when
//! the caller does not name one:
//!
//! ```text
//! git provider preference set?
//! ├── yes -> expand env vars      e.g. %APPDATA%/repos -> /home/u/appdata/repos
//! └── no  -> fallback, verbatim   e.g. ~/Documents/GitHub
//! ```
//!
//! `DirectoryProvider` prepares the per-repository destination before a clone.

use std::io;
use std::path::{Path, PathBuf};

use crate::env::Environment;
use crate::git::GitProvider;

/// Creates destination directories.
pub trait DirectoryProvider: Send + Sync {
    /// Create `path` and any missing ancestors. Succeeds if it already exists.
    fn create_directory(&self, path: &Path) -> io::Result<()>;
}

/// The local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDirectories;

impl DirectoryProvider for LocalDirectories {
    fn create_directory(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Resolves the default clone location.
pub struct PathResolver<'a> {
    env: &'a dyn Environment,
    provider: &'a dyn GitProvider,
}

impl<'a> PathResolver<'a> {
    pub fn new(env: &'a dyn Environment, provider: &'a dyn GitProvider) -> Self {
        Self { env, provider }
    }

    /// Returns the provider's preferred path with environment variables
    /// expanded, or `fallback` unchanged when the provider has no preference.
    pub fn resolve_default_path(&self, fallback: &Path) -> PathBuf {
        match self.provider.local_clone_path() {
            Some(preferred) if !preferred.is_empty() => {
                let expanded = self.env.expand_environment_variables(&preferred);
                log::debug!("Using provider clone path {} ({})", expanded, preferred);
                PathBuf::from(expanded)
            }
            _ => fallback.to_path_buf(),
        }
    }
}
