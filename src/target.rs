// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Local path and clone URL computation.
//!
//! Every managed repository lives at `<code-root>/<host>/<path>`, where the
//! path is whatever the term says the repository path on the host is. A
//! classified term is mapped onto that layout here, along with the URL to
//! clone from if the directory turns out to be missing.

use crate::{
    search::find_repo,
    term::{ClassifiedTerm, RepoRef},
};

use std::path::{Component, Path, PathBuf};

/// Host assumed for `owner/name` references.
pub const DEFAULT_HOST: &str = "github.com";

const VCS_SUFFIX: &str = ".git";

/// Where a term lives locally, and where it can be cloned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Local directory of repository. Never ends in ".git".
    pub local_path: PathBuf,

    /// Remote to clone from if local directory is missing.
    pub clone_url: Option<String>,
}

/// Compute local path and clone URL of classified term.
///
/// Bare names are looked up in the code root through
/// [`find_repo`](crate::search::find_repo), and never yield a clone URL.
///
/// # Errors
///
/// - Return [`TargetError::UnknownPattern`] if term did not classify.
/// - Return [`TargetError::NotFound`] if bare name is not in code root.
pub fn compute_target(classified: &ClassifiedTerm, code_root: &Path) -> Result<ResolvedTarget> {
    let (local_path, clone_url) = match classified {
        ClassifiedTerm::Repo(repo) => (
            join_under(code_root, [DEFAULT_HOST, repo.owner.as_str(), repo.name.as_str()]),
            Some(ssh_clone_url(repo)),
        ),
        ClassifiedTerm::AbsoluteUrl { raw, host, path } => {
            (join_under(code_root, [host.as_str(), path.as_str()]), Some(raw.clone()))
        }
        ClassifiedTerm::Ssh { raw, host, path } => {
            (join_under(code_root, [host.as_str(), path.as_str()]), Some(raw.clone()))
        }
        ClassifiedTerm::Search(name) => {
            let found =
                find_repo(code_root, name).ok_or_else(|| TargetError::NotFound(name.clone()))?;
            (found, None)
        }
        ClassifiedTerm::Invalid(term) => return Err(TargetError::UnknownPattern(term.clone())),
    };

    Ok(ResolvedTarget {
        local_path: strip_vcs_suffix(local_path),
        clone_url,
    })
}

/// SSH clone URL of reference on default host.
pub fn ssh_clone_url(repo: &RepoRef) -> String {
    let name = repo.name.strip_suffix(VCS_SUFFIX).unwrap_or(&repo.name);
    format!("git@{DEFAULT_HOST}:{}/{name}{VCS_SUFFIX}", repo.owner)
}

/// Strip trailing ".git" from final component of path.
///
/// A final component that is nothing but ".git" is dropped entirely.
pub fn strip_vcs_suffix(path: PathBuf) -> PathBuf {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return path;
    };

    if name == VCS_SUFFIX {
        return path.parent().map(Path::to_path_buf).unwrap_or(path);
    }

    match name.strip_suffix(VCS_SUFFIX) {
        Some(stem) => path.with_file_name(stem),
        None => path,
    }
}

// INVARIANT: Joined segments never climb above the root.
//   - "." and empty segments vanish.
//   - ".." only pops segments that were joined here.
//   - Absolute segments are treated as relative to the root.
fn join_under<'a>(root: &Path, segments: impl IntoIterator<Item = &'a str>) -> PathBuf {
    let mut joined = Vec::new();
    for segment in segments {
        for component in Path::new(segment).components() {
            match component {
                Component::Normal(part) => joined.push(part.to_os_string()),
                Component::ParentDir => {
                    joined.pop();
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
    }

    let mut path = root.to_path_buf();
    path.extend(joined);
    path
}

/// Path computation error types.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// Term did not match any known shape.
    #[error("Unknown pattern for {0}")]
    UnknownPattern(String),

    /// Bare name is nowhere in code root.
    #[error("{0} not found")]
    NotFound(String),
}

/// Friendly result alias :3
type Result<T, E = TargetError> = std::result::Result<T, E>;
