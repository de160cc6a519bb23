// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use hcli::{
    path::{expand_code_root, working_dir, DEFAULT_CODE_ROOT},
    resolve::ResolveError,
    shell::{current_binary, CdCommand, ShellHook},
    CloneOptions, GitCli, GitHubLookup, Resolver,
};

use anyhow::Result;
use clap::{builder::FalseyValueParser, error::ErrorKind, Parser, Subcommand};
use std::{ffi::OsString, path::PathBuf, process::exit};
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "\n  h init [options] [code_root]\n  h resolve [options] <code_root> <term> [clone_options]...",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Resolve term into local repository directory, cloning it if need be.
    #[command(
        disable_help_flag = true,
        override_usage = "h resolve [--offline] <code_root> <term> [clone_options]..."
    )]
    Resolve(ResolveOptions),

    /// Print shell function that wraps the resolver.
    #[command(override_usage = "h init [options] [code_root]")]
    Init(InitOptions),
}

#[derive(Parser, Clone, Debug)]
struct ResolveOptions {
    /// Keep owner and name of references exactly as typed.
    #[arg(long, env = "H_OFFLINE", value_parser = FalseyValueParser::new())]
    pub offline: bool,

    /// Directory all repositories are kept under.
    #[arg(value_name = "code_root")]
    pub code_root: String,

    /// Repository reference, clone URL, or name of local repository.
    #[arg(value_name = "term", allow_hyphen_values = true)]
    pub term: Option<String>,

    /// Options passed verbatim to "git clone".
    #[arg(
        value_name = "clone_options",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub clone_options: Vec<OsString>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct InitOptions {
    /// Change directory with "pushd" instead of "cd".
    #[arg(long)]
    pub pushd: bool,

    /// Name of shell function.
    #[arg(long, value_name = "name", default_value = "h")]
    pub name: String,

    /// Clone options to always pass to the resolver.
    #[arg(long, value_name = "opts", allow_hyphen_values = true)]
    pub git_opts: Option<String>,

    /// Directory all repositories are kept under.
    #[arg(value_name = "code_root", env = "H_CODE_ROOT", default_value = DEFAULT_CODE_ROOT)]
    pub code_root: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => bail_parse(error),
    };

    let code = match cli.command {
        Command::Resolve(opts) => run_resolve(opts).await,
        Command::Init(opts) => match run_init(opts) {
            Ok(()) => 0,
            Err(error) => {
                error!("{error:?}");
                1
            }
        },
    };

    exit(code)
}

// INVARIANT: Standard output always carries exactly one directory.
//   - Shell function changes directory to whatever is printed, so print the
//     current directory to make it stay put.
fn bail_parse(error: clap::Error) -> ! {
    if matches!(
        error.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    ) {
        error.exit();
    }

    println!("{}", working_dir().display());
    eprintln!("h needs to be hooked into the shell before it can be used.");
    eprintln!("Usage: eval \"$(h init [code_root])\"");
    eprintln!();
    eprintln!("{}", error.render());
    exit(1)
}

async fn run_resolve(opts: ResolveOptions) -> i32 {
    match resolve(opts).await {
        Ok(path) => {
            println!("{}", path.display());
            0
        }
        Err(error) => {
            println!("{}", working_dir().display());
            eprintln!("{error}");
            error.exit_code()
        }
    }
}

async fn resolve(opts: ResolveOptions) -> Result<PathBuf, ResolveError> {
    let Some(term) = opts.term else {
        return Err(ResolveError::Usage);
    };

    let code_root = expand_code_root(&opts.code_root)?;
    let options = CloneOptions::new(opts.clone_options);
    let resolver = Resolver::<GitCli, GitHubLookup>::new(code_root, GitCli::new());

    if opts.offline {
        return resolver.resolve(&term, &options).await;
    }

    match GitHubLookup::new() {
        Ok(lookup) => resolver.with_lookup(lookup).resolve(&term, &options).await,
        Err(error) => {
            warn!("cannot set up casing lookup: {error}");
            resolver.resolve(&term, &options).await
        }
    }
}

fn run_init(opts: InitOptions) -> Result<()> {
    let hook = ShellHook {
        name: opts.name,
        binary: current_binary("h"),
        code_root: expand_code_root(&opts.code_root)?,
        git_opts: opts.git_opts,
        cd_command: CdCommand::new(opts.pushd),
    };
    print!("{hook}");

    Ok(())
}
