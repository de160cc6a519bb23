// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Jump to local checkouts of repositories, cloning them on demand.
//!
//! Every repository is kept under one __code root__ in a layout that mirrors
//! where it came from, i.e., `<code-root>/<host>/<path-on-host>`. A single
//! term, such as `owner/name`, a clone URL, or the bare name of something
//! already checked out, is enough to find the repository again:
//!
//! | Term                               | Local directory                       |
//! |------------------------------------|---------------------------------------|
//! | `octocat/Hello-World`              | `<root>/github.com/octocat/Hello-World` |
//! | `https://gitlab.com/group/proj`    | `<root>/gitlab.com/group/proj`        |
//! | `git@example.com:me/tool.git`      | `<root>/example.com/me/tool`          |
//! | `tool`                             | deepest `tool` directory under `<root>` |
//!
//! Resolution is handled by [`Resolver`]. Shell integration lives in
//! [`shell`], and [`project`] finds the root of the project the caller is
//! currently in.

pub mod canonical;
pub mod clone;
pub mod path;
pub mod project;
pub mod resolve;
pub mod search;
pub mod shell;
pub mod target;
pub mod term;

#[doc(inline)]
pub use canonical::{GitHubLookup, RepoLookup};

#[doc(inline)]
pub use clone::{CloneCollaborator, CloneOptions, GitCli};

#[doc(inline)]
pub use resolve::{ResolveError, Resolver};

#[doc(inline)]
pub use term::{classify, ClassifiedTerm, RepoRef};
