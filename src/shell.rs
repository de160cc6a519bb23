// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Shell hook generation.
//!
//! A child process cannot change the working directory of its parent shell.
//! So `h` and `up` only ever print a directory, and a small shell function
//! does the actual `cd`. The functions rendered here are meant to be
//! evaluated in the user's shell startup file:
//!
//! ```sh
//! eval "$(h init ~/src)"
//! eval "$(up init)"
//! ```

use std::{
    env,
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
};

/// Command used by shell hooks to change directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CdCommand {
    #[default]
    Cd,

    Pushd,
}

impl CdCommand {
    /// Pick `pushd` over `cd` if asked to.
    pub fn new(pushd: bool) -> Self {
        if pushd {
            Self::Pushd
        } else {
            Self::Cd
        }
    }
}

impl Display for CdCommand {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Cd => fmt.write_str("cd"),
            Self::Pushd => fmt.write_str("pushd"),
        }
    }
}

/// Shell function wrapping `h resolve`.
///
/// Always changes directory to whatever the resolver printed, and hands back
/// the resolver's exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellHook {
    /// Name of shell function.
    pub name: String,

    /// Absolute path to resolver binary.
    pub binary: PathBuf,

    /// Code root to pass to resolver.
    pub code_root: PathBuf,

    /// Extra clone options appended after the user's arguments.
    pub git_opts: Option<String>,

    /// Directory changing command.
    pub cd_command: CdCommand,
}

impl Display for ShellHook {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let git_opts = match self.git_opts.as_deref() {
            Some(opts) if !opts.trim().is_empty() => format!(" {opts}"),
            _ => String::new(),
        };

        writeln!(fmt, "{}() {{", self.name)?;
        writeln!(
            fmt,
            "  _h_dir=$(command {} resolve \"{}\" \"$@\"{git_opts})",
            self.binary.display(),
            self.code_root.display(),
        )?;
        writeln!(fmt, "  _h_ret=$?")?;
        writeln!(
            fmt,
            "  [ \"$_h_dir\" != \"$PWD\" ] && {} \"$_h_dir\"",
            self.cd_command
        )?;
        writeln!(fmt, "  return $_h_ret")?;
        writeln!(fmt, "}}")
    }
}

/// Shell function wrapping `up`.
///
/// Only changes directory if `up` succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpHook {
    /// Absolute path to `up` binary.
    pub binary: PathBuf,

    /// Directory changing command.
    pub cd_command: CdCommand,
}

impl Display for UpHook {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        writeln!(fmt, "up() {{")?;
        writeln!(fmt, "  _up_dir=$(command {} \"$@\")", self.binary.display())?;
        writeln!(fmt, "  if [ $? = 0 ]; then")?;
        writeln!(
            fmt,
            "    [ \"$_up_dir\" != \"$PWD\" ] && {} \"$_up_dir\"",
            self.cd_command
        )?;
        writeln!(fmt, "  fi")?;
        writeln!(fmt, "}}")
    }
}

/// Absolute path of the running binary.
///
/// Falls back to `fallback`, leaving it to `PATH` lookup, if the path of the
/// running binary cannot be determined.
pub fn current_binary(fallback: &str) -> PathBuf {
    env::current_exe().unwrap_or_else(|_| PathBuf::from(fallback))
}
