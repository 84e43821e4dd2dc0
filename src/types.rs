//! Shared request types for ghclone

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A required argument was missing.
///
/// Raised synchronously, before any background work is scheduled.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

/// A single clone request.
///
/// All three fields are guaranteed non-empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    source_url: String,
    repository_name: String,
    destination_parent_dir: PathBuf,
}

impl CloneRequest {
    /// Validate and build a request.
    pub fn new(
        source_url: impl Into<String>,
        repository_name: impl Into<String>,
        destination_parent_dir: impl Into<PathBuf>,
    ) -> Result<Self, ArgumentError> {
        let source_url = source_url.into();
        let repository_name = repository_name.into();
        let destination_parent_dir = destination_parent_dir.into();

        if source_url.is_empty() {
            return Err(ArgumentError::Empty("source_url"));
        }
        if repository_name.is_empty() {
            return Err(ArgumentError::Empty("repository_name"));
        }
        if destination_parent_dir.as_os_str().is_empty() {
            return Err(ArgumentError::Empty("destination_parent_dir"));
        }

        Ok(Self {
            source_url,
            repository_name,
            destination_parent_dir,
        })
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn repository_name(&self) -> &str {
        &self.repository_name
    }

    pub fn destination_parent_dir(&self) -> &Path {
        &self.destination_parent_dir
    }

    /// Returns the working copy location: `{destination_parent_dir}/{repository_name}`
    ///
    /// Computed on every call, never cached.
    pub fn destination(&self) -> PathBuf {
        self.destination_parent_dir.join(&self.repository_name)
    }
}

/// Derive a repository name from a clone URL.
///
/// Takes the last path segment and strips a trailing `.git`, so
/// `https://github.com/octocat/Hello-World.git` and
/// `git@github.com:octocat/Hello-World` both give `Hello-World`.
pub fn repo_name_from_url(url: &str) -> Option<&str> {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':', '\\']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);

    if name.is_empty() || name == trimmed {
        return None;
    }

    Some(name)
}
