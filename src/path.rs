// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine the code root, the user's home directory, and the directory the
//! shell currently sits in.

use std::{
    env,
    fs,
    path::{absolute, PathBuf},
};

/// Code root used when neither an argument nor `H_CODE_ROOT` names one.
pub const DEFAULT_CODE_ROOT: &str = "~/src";

/// Determine absolute path to user's home directory.
///
/// Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`PathError::NoWayHome`] if home directory path cannot be
///   determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(PathError::NoWayHome)
}

/// Expand code root into absolute path.
///
/// Performs tilde and environment variable expansion, then makes the result
/// absolute relative to the current working directory. Does not check if the
/// path returned actually exists.
///
/// # Errors
///
/// - Return [`PathError::ShellExpansion`] if expansion references an unset
///   variable.
/// - Return [`PathError::Absolute`] if path cannot be made absolute.
pub fn expand_code_root(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)?;
    absolute(&*expanded).map_err(|source| PathError::Absolute {
        source,
        path: expanded.into_owned(),
    })
}

/// Directory the caller currently sits in.
///
/// Prefers `$PWD` when it names the same directory as the process working
/// directory, which keeps symbolic links the shell went through intact.
/// Falls back to "." if the working directory cannot be determined at all.
pub fn working_dir() -> PathBuf {
    let Ok(cwd) = env::current_dir() else {
        return PathBuf::from(".");
    };

    if let Some(pwd) = env::var_os("PWD").map(PathBuf::from) {
        let same = pwd.is_absolute()
            && matches!(
                (fs::canonicalize(&pwd), fs::canonicalize(&cwd)),
                (Ok(a), Ok(b)) if a == b
            );
        if same {
            return pwd;
        }
    }

    cwd
}

/// Path resolution error types.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// No way to determine user's home directory.
    ///
    /// # See Also
    ///
    /// - [`dirs::home_dir`](https://docs.rs/dirs/latest/dirs/fn.home_dir.html)
    #[error("cannot determine absolute path to user's home directory")]
    NoWayHome,

    /// Code root references unset variable.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<env::VarError>),

    /// Code root cannot be made absolute.
    #[error("cannot make {path:?} absolute")]
    Absolute {
        #[source]
        source: std::io::Error,
        path: String,
    },
}

/// Friendly result alias :3
pub type Result<T, E = PathError> = std::result::Result<T, E>;
