// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Local repository search.
//!
//! A bare name never implies a remote. Instead, the code root is searched for
//! a directory with that name. The code root is usually organized as
//! `<host>/<owner>/<name>`, so the walk only goes a few levels deep, and
//! prefers the deepest match it can find.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Deepest level below code root that gets visited.
pub const MAX_DEPTH: usize = 4;

/// Search code root for directory named after term.
///
/// Matching is case-sensitive only if the term itself contains an uppercase
/// character. Hidden directories are skipped, and symbolic links are not
/// followed. Among all matches the deepest wins. Ties at the same depth go to
/// whichever match comes first in file-name order.
///
/// Subtrees deeper than [`MAX_DEPTH`] are never entered.
#[instrument(skip(code_root), level = "debug")]
pub fn find_repo(code_root: &Path, term: &str) -> Option<PathBuf> {
    let matcher = NameMatcher::new(term);
    let mut builder = WalkBuilder::new(code_root);
    builder
        .standard_filters(false)
        .hidden(true)
        .follow_links(false)
        .max_depth(Some(MAX_DEPTH))
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| entry.file_type().is_some_and(|kind| kind.is_dir()));

    let mut best: Option<(usize, PathBuf)> = None;
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                debug!("skip unreadable entry: {error}");
                continue;
            }
        };

        // INVARIANT: Code root itself is never a match.
        let depth = entry.depth();
        if depth == 0 {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };

        if !matcher.matches(name) {
            continue;
        }

        if best.as_ref().is_none_or(|(best_depth, _)| depth > *best_depth) {
            debug!("match at depth {depth}: {:?}", entry.path().display());
            best = Some((depth, entry.into_path()));
        }
    }

    best.map(|(_, path)| path)
}

/// Directory name matcher with smart case sensitivity.
#[derive(Debug, Clone)]
struct NameMatcher {
    term: String,
    case_sensitive: bool,
}

impl NameMatcher {
    fn new(term: &str) -> Self {
        let lowered = term.to_lowercase();
        if lowered == term {
            Self {
                term: lowered,
                case_sensitive: false,
            }
        } else {
            Self {
                term: term.to_string(),
                case_sensitive: true,
            }
        }
    }

    fn matches(&self, name: &str) -> bool {
        if self.case_sensitive {
            name == self.term
        } else {
            name.to_lowercase() == self.term
        }
    }
}
