// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Clone orchestration.
//!
//! Make sure a resolved target exists locally. If it does not, create the
//! missing parent directories, and hand off to an external clone
//! collaborator. If the clone fails, every directory created along the way is
//! removed again, so a failed clone leaves no empty husks in the code root.
//!
//! # Rollback Boundary
//!
//! Before anything is created, the deepest already existing ancestor of the
//! target's parent is recorded as the __rollback boundary__. Rollback walks
//! upward from the target's parent, and never removes the boundary itself, or
//! anything above it.

use crate::target::ResolvedTarget;

use std::{
    ffi::OsString,
    fs::{create_dir_all, remove_dir},
    io,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};
use tracing::{debug, info, instrument, warn};

/// Passthrough options for the clone collaborator.
///
/// Forwarded verbatim. An empty set means `--recursive`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CloneOptions(Vec<OsString>);

impl CloneOptions {
    /// Construct new set of passthrough options.
    pub fn new(options: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        Self(options.into_iter().map(Into::into).collect())
    }

    /// Options to actually pass to the collaborator.
    pub fn to_args(&self) -> Vec<OsString> {
        if self.0.is_empty() {
            vec!["--recursive".into()]
        } else {
            self.0.clone()
        }
    }
}

/// External clone operation.
pub trait CloneCollaborator {
    /// Clone `url` into `dest` with the given options.
    fn clone_repo(&self, options: &[OsString], url: &str, dest: &Path) -> Result<()>;
}

/// Clone collaborator backed by the Git binary.
///
/// Progress output of Git goes to standard error, standard output of Git is
/// folded into standard error, so it never mixes with the resolved path.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl GitCli {
    /// Construct new collaborator that runs "git" from `PATH`.
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Construct new collaborator that runs a specific Git binary.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl CloneCollaborator for GitCli {
    #[instrument(skip(self, options), level = "debug")]
    fn clone_repo(&self, options: &[OsString], url: &str, dest: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .arg("clone")
            .args(options)
            .arg("--")
            .arg(url)
            .arg(dest)
            .stdout(Stdio::from(io::stderr()))
            .status()
            .map_err(CloneError::Spawn)?;

        if !status.success() {
            return Err(match status.code() {
                Some(code) => CloneError::Exited(code),
                None => CloneError::Killed,
            });
        }

        Ok(())
    }
}

/// Make sure target exists locally, cloning it if need be.
///
/// An existing directory at the target path counts as resolved, even if it
/// happens to be empty.
///
/// # Errors
///
/// - Return [`CloneError::NotFound`] if target is missing, and has no clone
///   URL.
/// - Return [`CloneError::CreateDir`] if parent directories cannot be
///   created.
/// - Return [`CloneError::Spawn`] or [`CloneError::Exited`] if the clone
///   collaborator fails. Any directories created beforehand are removed.
#[instrument(skip(target, options, collaborator), level = "debug")]
pub fn ensure_local(
    target: &ResolvedTarget,
    options: &CloneOptions,
    collaborator: &impl CloneCollaborator,
) -> Result<PathBuf> {
    let path = &target.local_path;
    if path.is_dir() {
        debug!("{:?} already exists", path.display());
        return Ok(path.clone());
    }

    let Some(url) = target.clone_url.as_deref() else {
        return Err(CloneError::NotFound(path.clone()));
    };

    let parent = path.parent().unwrap_or(Path::new(""));
    let boundary = rollback_boundary(parent);
    debug!("rollback boundary {:?}", boundary.display());

    create_dir_all(parent).map_err(|source| CloneError::CreateDir {
        source,
        path: parent.to_path_buf(),
    })?;

    info!("clone {url} into {:?}", path.display());
    if let Err(error) = collaborator.clone_repo(&options.to_args(), url, path) {
        roll_back(parent, &boundary);
        return Err(error);
    }

    Ok(path.clone())
}

/// Find deepest existing ancestor of directory, including itself.
///
/// Stops at the file system root or at the empty relative root, even if that
/// does not exist as a directory.
pub fn rollback_boundary(dir: &Path) -> PathBuf {
    let mut current = dir;
    loop {
        if current.is_dir() {
            return current.to_path_buf();
        }

        // INVARIANT: Missing top of relative path yields empty relative root.
        match current.parent() {
            Some(parent) => current = parent,
            None => return current.to_path_buf(),
        }
    }
}

/// Remove directories from `dir` upward until `boundary` is reached.
///
/// Removal stops early at the first directory that cannot be removed, e.g.,
/// because something else was put in it.
pub fn roll_back(dir: &Path, boundary: &Path) {
    let mut current = dir;
    while current != boundary && current.starts_with(boundary) {
        if let Err(error) = remove_dir(current) {
            warn!("cannot remove {:?}: {error}", current.display());
            return;
        }
        debug!("removed {:?}", current.display());

        match current.parent() {
            Some(parent) => current = parent,
            None => return,
        }
    }
}

/// Clone orchestration error types.
#[derive(Debug, thiserror::Error)]
pub enum CloneError {
    /// Target does not exist, and there is nowhere to clone it from.
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    /// Parent directories of target cannot be created.
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        #[source]
        source: io::Error,
        path: PathBuf,
    },

    /// Clone collaborator cannot be started.
    #[error("failed to run clone: {0}")]
    Spawn(#[source] io::Error),

    /// Clone collaborator exited unsuccessfully.
    #[error("clone exited with status {0}")]
    Exited(i32),

    /// Clone collaborator was terminated by a signal.
    #[error("clone was terminated by a signal")]
    Killed,
}

impl CloneError {
    /// Exit status to report for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exited(code) => *code,
            _ => 1,
        }
    }
}

/// Friendly result alias :3
pub type Result<T, E = CloneError> = std::result::Result<T, E>;
