// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Casing canonicalization for `owner/name` references.
//!
//! Hosting services treat `octocat/hello-world` and `octocat/Hello-World` as
//! the same repository, but the file system does not. Before an `owner/name`
//! pair is turned into a local path, the upstream metadata endpoint is asked
//! for the canonical spelling, so the clone lands in a directory whose name
//! matches upstream no matter how the user typed it.
//!
//! The lookup is best-effort. Any failure along the way leaves the reference
//! exactly as the user typed it.

use crate::term::RepoRef;

use reqwest::{header::ACCEPT, Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
use tracing::{debug, instrument};

/// Default endpoint for repository metadata.
pub const GITHUB_API: &str = "https://api.github.com";

const USER_AGENT: &str = "h-cli";
const MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Source of canonical repository spelling.
pub trait RepoLookup {
    /// Fetch canonical owner and name for repository reference.
    fn lookup(&self, repo: &RepoRef) -> impl Future<Output = Result<RepoRef>> + Send;
}

/// Repository metadata lookup through the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubLookup {
    client: Client,
    api_base: String,
}

impl GitHubLookup {
    /// Construct new lookup against the public GitHub API.
    ///
    /// # Errors
    ///
    /// - Return [`LookupError::Request`] if HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            api_base: GITHUB_API.into(),
        })
    }

    /// Point lookup at different API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl RepoLookup for GitHubLookup {
    #[instrument(skip(self), level = "debug")]
    async fn lookup(&self, repo: &RepoRef) -> Result<RepoRef> {
        let url = format!(
            "{}/repos/{}/{}",
            self.api_base.trim_end_matches('/'),
            repo.owner,
            repo.name
        );
        debug!("query {url}");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, MEDIA_TYPE)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(LookupError::Status(response.status()));
        }

        let payload: RepoPayload = response.json().await?;
        payload.try_into()
    }
}

/// Subset of repository metadata payload that carries the canonical spelling.
#[derive(Debug, Deserialize)]
struct RepoPayload {
    owner: OwnerPayload,
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    login: String,
}

impl TryFrom<RepoPayload> for RepoRef {
    type Error = LookupError;

    fn try_from(payload: RepoPayload) -> Result<Self> {
        if payload.owner.login.is_empty() || payload.name.is_empty() {
            return Err(LookupError::Malformed);
        }

        Ok(RepoRef::new(payload.owner.login, payload.name))
    }
}

/// Replace owner and name of reference with their canonical spelling.
///
/// Never fails. If the lookup fails for any reason, then the reference is
/// returned unchanged.
pub async fn canonicalize<L>(lookup: &L, repo: RepoRef) -> RepoRef
where
    L: RepoLookup,
{
    match lookup.lookup(&repo).await {
        Ok(canonical) => {
            if canonical != repo {
                debug!("canonical casing of {repo} is {canonical}");
            }
            canonical
        }
        Err(error) => {
            debug!("keep {repo} as typed: {error}");
            repo
        }
    }
}

/// Repository metadata lookup error types.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// Transport failure, or payload is not valid JSON.
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// Endpoint answered with anything but 200.
    #[error("metadata endpoint answered with {0}")]
    Status(StatusCode),

    /// Payload lacks owner login or name.
    #[error("metadata payload lacks owner login or name")]
    Malformed,
}

/// Friendly result alias :3
type Result<T, E = LookupError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FixedLookup(Option<RepoRef>);

    impl RepoLookup for FixedLookup {
        async fn lookup(&self, _repo: &RepoRef) -> Result<RepoRef> {
            self.0.clone().ok_or(LookupError::Malformed)
        }
    }

    #[tokio::test]
    async fn canonicalize_replaces_casing() {
        let lookup = FixedLookup(Some(RepoRef::new("octocat", "Hello-World")));
        let result = canonicalize(&lookup, RepoRef::new("OctoCat", "hello-world")).await;
        assert_eq!(result, RepoRef::new("octocat", "Hello-World"));
    }

    #[tokio::test]
    async fn canonicalize_keeps_input_on_failure() {
        let lookup = FixedLookup(None);
        let result = canonicalize(&lookup, RepoRef::new("OctoCat", "hello-world")).await;
        assert_eq!(result, RepoRef::new("OctoCat", "hello-world"));
    }

    #[tokio::test]
    async fn canonicalize_keeps_input_when_endpoint_unreachable() {
        let lookup = GitHubLookup::new()
            .unwrap()
            .with_api_base("http://127.0.0.1:9");
        let result = canonicalize(&lookup, RepoRef::new("OctoCat", "hello-world")).await;
        assert_eq!(result, RepoRef::new("OctoCat", "hello-world"));
    }

    #[test]
    fn payload_yields_canonical_reference() -> anyhow::Result<()> {
        let payload: RepoPayload = serde_json::from_str(
            r#"{"id": 1296269, "name": "Hello-World", "owner": {"login": "octocat", "id": 1}}"#,
        )?;
        let result = RepoRef::try_from(payload)?;
        assert_eq!(result, RepoRef::new("octocat", "Hello-World"));
        Ok(())
    }

    #[test]
    fn payload_with_empty_fields_is_malformed() -> anyhow::Result<()> {
        let payload: RepoPayload =
            serde_json::from_str(r#"{"name": "", "owner": {"login": "octocat"}}"#)?;
        assert!(matches!(RepoRef::try_from(payload), Err(LookupError::Malformed)));
        Ok(())
    }
}
