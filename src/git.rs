//! Git collaborators.
//!
//! **CLI for the clone itself:**
//! - `GitCli::clone_repo` - full working copy, with `--recurse-submodules`
//!
//! **libgit2 for reading configuration:**
//! - `GitConfigProvider` - the user's preferred clone location, if any

use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Git config key holding the preferred clone location.
pub const CLONE_PATH_CONFIG_KEY: &str = "ghclone.clonePath";

/// Errors returned by git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// libgit2 reported an error.
    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),
    /// Clone failed.
    #[error("clone failed: {0}")]
    CloneError(String),
    /// Underlying IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid inputs were provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Materializes a full working copy of a remote repository.
///
/// Implementations signal every failure through `Err`; there is no partial
/// success.
pub trait ClonePrimitive: Send + Sync {
    fn clone_repo(
        &self,
        source_url: &str,
        destination: &Path,
        recurse_submodules: bool,
    ) -> Result<(), GitError>;
}

/// Source of the user's preferred clone location.
pub trait GitProvider {
    /// Returns the preferred path, unexpanded. `None` or an empty string means
    /// no preference.
    fn local_clone_path(&self) -> Option<String>;
}

/// Validate that a clone URL is safe to hand to the git CLI.
///
/// Rejects:
/// - Empty strings
/// - Strings starting with `-` (could be interpreted as flags)
/// - Strings containing null bytes or control characters
fn validate_url(value: &str) -> Result<(), GitError> {
    if value.is_empty() {
        return Err(GitError::InvalidInput("url cannot be empty".to_string()));
    }
    if value.starts_with('-') {
        return Err(GitError::InvalidInput(
            "url cannot start with '-'".to_string(),
        ));
    }
    if value.bytes().any(|b| b == 0 || b < 0x20) {
        return Err(GitError::InvalidInput(
            "url cannot contain null or control characters".to_string(),
        ));
    }
    Ok(())
}

/// Git CLI wrapper.
pub struct GitCli {
    git_path: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Create a new GitCli instance using the system git.
    pub fn new() -> Self {
        Self::with_path("git")
    }

    /// Create a GitCli that runs the given git binary.
    pub fn with_path(git_path: impl Into<String>) -> Self {
        Self {
            git_path: git_path.into(),
        }
    }

    /// Create a Command with non-interactive settings.
    ///
    /// Applies:
    /// - `GIT_TERMINAL_PROMPT=0` - a worker thread has no terminal to prompt on
    /// - stdin closed
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.git_path);
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.stdin(Stdio::null());
        cmd
    }

    /// Returns the output of `git --version`, trimmed.
    pub fn version(&self) -> Result<String, GitError> {
        let output = self.command().arg("--version").output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::Io(std::io::Error::other(stderr.into_owned())));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl ClonePrimitive for GitCli {
    /// Clone `source_url` into `destination`.
    ///
    /// `destination` may already exist as long as it is empty.
    fn clone_repo(
        &self,
        source_url: &str,
        destination: &Path,
        recurse_submodules: bool,
    ) -> Result<(), GitError> {
        validate_url(source_url)?;

        let mut cmd = self.command();
        cmd.arg("clone");
        if recurse_submodules {
            cmd.arg("--recurse-submodules");
        }
        let output = cmd.arg("--").arg(source_url).arg(destination).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CloneError(stderr.trim().to_string()));
        }

        Ok(())
    }
}

/// Reads the preferred clone location from the user's git configuration.
///
/// ```text
/// git config --global ghclone.clonePath '%USERPROFILE%/source/repos'
/// ```
pub struct GitConfigProvider {
    key: String,
}

impl Default for GitConfigProvider {
    fn default() -> Self {
        Self::new(CLONE_PATH_CONFIG_KEY)
    }
}

impl GitConfigProvider {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Read the configured value. An unset key is `Ok(None)`.
    pub fn read(&self) -> Result<Option<String>, GitError> {
        let config = git2::Config::open_default()?;
        match config.get_string(&self.key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl GitProvider for GitConfigProvider {
    fn local_clone_path(&self) -> Option<String> {
        self.read()
            .inspect_err(|e| log::debug!("Could not read git config {}: {}", self.key, e))
            .ok()
            .flatten()
    }
}

/// A preference fixed up front, e.g. from the config file.
pub struct FixedClonePath(pub Option<String>);

impl GitProvider for FixedClonePath {
    fn local_clone_path(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Returns the linked libgit2 version as `major.minor.rev`.
pub fn libgit2_version() -> String {
    let (major, minor, rev) = git2::Version::get().libgit2_version();
    format!("{}.{}.{}", major, minor, rev)
}
