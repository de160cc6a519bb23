// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Term classification.
//!
//! A __term__ is whatever the user typed after `h`. Before anything touches
//! the file system, the term is sorted into exactly one structural shape:
//!
//! 1. `owner/name` pair, e.g., `octocat/Hello-World`.
//! 2. Absolute URL with a scheme, e.g., `https://example.com/group/proj.git`.
//! 3. SSH shorthand used by Git hosting front ends, e.g.,
//!    `git@example.com:group/proj.git`.
//! 4. Bare name to search for in the code root, e.g., `proj`.
//!
//! The order matters. An `owner/name` pair must never be mistaken for a search
//! token, so it is always checked first.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter, Result as FmtResult};
use url::Url;

static REPO_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9_.\-]+)/([A-Za-z0-9_.\-]+)$").unwrap());

static SSH_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^gite?a?@([^:]+):(.*)$").unwrap());

static SEARCH_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap());

/// Owner and name of a repository on the default host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Construct new repository reference.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl Display for RepoRef {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(fmt, "{}/{}", self.owner, self.name)
    }
}

/// Structural shape of a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedTerm {
    /// Strict `owner/name` pair.
    Repo(RepoRef),

    /// URL containing a `scheme://` marker.
    ///
    /// The host is lower-cased and keeps a non-default port. The path is the
    /// percent-decoded URL path without its leading slash.
    AbsoluteUrl {
        raw: String,
        host: String,
        path: String,
    },

    /// `git@host:path` style shorthand.
    Ssh {
        raw: String,
        host: String,
        path: String,
    },

    /// Bare name to look up in the code root.
    Search(String),

    /// Nothing matched.
    Invalid(String),
}

/// Sort term into its structural shape.
///
/// # Errors
///
/// - Return [`ClassifyError::MissingScheme`] if term looks like a URL, but
///   has nothing in front of "://".
/// - Return [`ClassifyError::InvalidUrl`] if term looks like a URL, but cannot
///   be parsed as one.
pub fn classify(term: &str) -> Result<ClassifiedTerm> {
    if let Some(caps) = REPO_REF.captures(term) {
        return Ok(ClassifiedTerm::Repo(RepoRef::new(&caps[1], &caps[2])));
    }

    if let Some((scheme, _)) = term.split_once("://") {
        if scheme.is_empty() {
            return Err(ClassifyError::MissingScheme);
        }

        let url = Url::parse(term).map_err(|source| ClassifyError::InvalidUrl {
            source,
            term: term.to_string(),
        })?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };

        // INVARIANT: Local path uses decoded URL path, e.g., "my%20repo" is "my repo".
        let path = urlencoding::decode(url.path())
            .map(|path| path.into_owned())
            .unwrap_or_else(|_| url.path().to_string());

        return Ok(ClassifiedTerm::AbsoluteUrl {
            raw: term.to_string(),
            host: host.to_lowercase(),
            path: path.trim_start_matches('/').to_string(),
        });
    }

    if let Some(caps) = SSH_REF.captures(term) {
        return Ok(ClassifiedTerm::Ssh {
            raw: term.to_string(),
            host: caps[1].to_string(),
            path: caps[2].to_string(),
        });
    }

    if SEARCH_NAME.is_match(term) {
        return Ok(ClassifiedTerm::Search(term.to_string()));
    }

    Ok(ClassifiedTerm::Invalid(term.to_string()))
}

/// Term classification error types.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// Term has "://" but no scheme in front of it.
    #[error("Missing url scheme")]
    MissingScheme,

    /// Term has "://" but is not a URL.
    #[error("Invalid URL: {term}")]
    InvalidUrl {
        #[source]
        source: url::ParseError,
        term: String,
    },
}

/// Friendly result alias :3
type Result<T, E = ClassifyError> = std::result::Result<T, E>;
