// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Term resolution pipeline.
//!
//! Glue every stage together into one entry point: classify the term, fix
//! the casing of `owner/name` pairs, compute where the repository lives, and
//! make sure it actually exists there.
//!
//! # Output Contract
//!
//! The resolver is meant to be wrapped by a shell function that changes
//! directory to whatever the resolver prints. Thus, exactly one path is always
//! printed on standard output. On success that is the resolved directory. On
//! failure it is the current working directory, so the shell function stays
//! where it is, while the diagnostic goes to standard error. See
//! [`ResolveError::exit_code`] for the exit status of each failure.

use crate::{
    canonical::{canonicalize, RepoLookup},
    clone::{ensure_local, CloneCollaborator, CloneError, CloneOptions},
    path::PathError,
    target::{compute_target, TargetError},
    term::{classify, ClassifiedTerm, ClassifyError},
};

use std::path::PathBuf;
use tracing::{debug, instrument};

/// Usage message of the resolver.
pub const USAGE: &str = "Usage: h (<name> | <repo>/<name> | <url>) [git opts]";

/// Resolve terms into local repository directories.
#[derive(Debug)]
pub struct Resolver<C, L> {
    code_root: PathBuf,
    collaborator: C,
    lookup: Option<L>,
}

impl<C, L> Resolver<C, L>
where
    C: CloneCollaborator,
    L: RepoLookup,
{
    /// Construct new resolver without casing lookup.
    pub fn new(code_root: impl Into<PathBuf>, collaborator: C) -> Self {
        Self {
            code_root: code_root.into(),
            collaborator,
            lookup: None,
        }
    }

    /// Fix casing of `owner/name` terms through lookup.
    pub fn with_lookup(mut self, lookup: L) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Resolve term into local directory, cloning it if need be.
    ///
    /// Help flags are rejected with the usage message before classification.
    ///
    /// # Errors
    ///
    /// - Return [`ResolveError::Usage`] if term is a help flag.
    /// - Return [`ResolveError::Classify`] if term is not a valid URL.
    /// - Return [`ResolveError::Target`] if term has unknown shape, or a bare
    ///   name is not in the code root.
    /// - Return [`ResolveError::Clone`] if the local directory is missing,
    ///   and cannot be cloned.
    #[instrument(skip(self, options), level = "debug")]
    pub async fn resolve(&self, term: &str, options: &CloneOptions) -> Result<PathBuf> {
        if matches!(term, "-h" | "--help") {
            return Err(ResolveError::Usage);
        }

        let classified = match (classify(term)?, &self.lookup) {
            (ClassifiedTerm::Repo(repo), Some(lookup)) => {
                ClassifiedTerm::Repo(canonicalize(lookup, repo).await)
            }
            (classified, _) => classified,
        };
        debug!("classified as {classified:?}");

        let target = compute_target(&classified, &self.code_root)?;
        debug!("target {target:?}");

        ensure_local(&target, options, &self.collaborator).map_err(|error| match error {
            CloneError::NotFound(_) => ResolveError::NotFound(term.to_string()),
            error => ResolveError::Clone(error),
        })
    }
}

/// Resolution error types.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Help was asked for, or arguments are missing.
    #[error("{}", USAGE)]
    Usage,

    /// Code root cannot be expanded into absolute path.
    #[error(transparent)]
    CodeRoot(#[from] PathError),

    /// Term looks like a URL, but is not one.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// Term has unknown shape, or names nothing in code root.
    #[error(transparent)]
    Target(#[from] TargetError),

    /// Target is missing, and has no clone URL.
    #[error("{0} not found")]
    NotFound(String),

    /// Parent directories cannot be created, or clone failed.
    #[error(transparent)]
    Clone(CloneError),
}

impl ResolveError {
    /// Exit status to report for this error.
    ///
    /// Always 1, except for a failed clone, which reports the exit status of
    /// the clone collaborator.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Clone(error) => error.exit_code(),
            _ => 1,
        }
    }
}

/// Friendly result alias :3
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
