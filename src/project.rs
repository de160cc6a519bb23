// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Project root detection.
//!
//! A project root is the nearest directory above the caller that looks like
//! the top of a project. Looks like means it holds version control metadata,
//! or a file that usually only sits at the top of a project.

use crate::path::home_dir;

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

const ROOT_DIRS: [&str; 2] = [".git", ".hg"];
const ROOT_FILES: [&str; 2] = [".envrc", "Gemfile"];

/// Find project roots above a directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProjectFinder {
    home: Option<PathBuf>,
    direnv_dir: Option<PathBuf>,
}

impl ProjectFinder {
    /// Construct new project finder.
    ///
    /// Upward walks never enter `home`. A directory equal to `direnv_dir`
    /// always counts as a project root.
    pub fn new(home: Option<PathBuf>, direnv_dir: Option<PathBuf>) -> Self {
        Self { home, direnv_dir }
    }

    /// Construct project finder from user's home directory and `DIRENV_DIR`.
    ///
    /// Direnv marks unloaded environments with a leading "-", which is
    /// stripped.
    pub fn from_env() -> Self {
        let home = home_dir().ok();
        let direnv_dir = env::var("DIRENV_DIR")
            .ok()
            .map(|dir| dir.trim_start_matches('-').to_string())
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        Self::new(home, direnv_dir)
    }

    /// Check if directory is a project root.
    pub fn is_project_root(&self, dir: &Path) -> bool {
        ROOT_DIRS.iter().any(|name| dir.join(name).is_dir())
            || ROOT_FILES.iter().any(|name| dir.join(name).is_file())
            || self.direnv_dir.as_deref() == Some(dir)
    }

    /// Find nearest project root above `start`.
    ///
    /// If `start` is a project root already, then its parent project root is
    /// searched for instead. The walk stops before reaching the filesystem
    /// root or home directory. Returns `start` itself if no project root was
    /// found.
    #[instrument(skip(self), level = "debug")]
    pub fn find_root(&self, start: &Path) -> PathBuf {
        let mut current = if self.is_project_root(start) {
            start.parent()
        } else {
            Some(start)
        };

        while let Some(dir) = current {
            if self.is_boundary(dir) {
                break;
            }

            if self.is_project_root(dir) {
                debug!("found project root {dir:?}");
                return dir.to_path_buf();
            }

            current = dir.parent();
        }

        debug!("no project root above {start:?}");
        start.to_path_buf()
    }

    fn is_boundary(&self, dir: &Path) -> bool {
        dir.as_os_str().is_empty()
            || dir == Path::new("/")
            || dir == Path::new(".")
            || self.home.as_deref() == Some(dir)
    }
}
