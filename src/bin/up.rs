// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use hcli::{
    path::working_dir,
    project::ProjectFinder,
    shell::{current_binary, CdCommand, UpHook},
};

use clap::{Parser, Subcommand};
use std::process::exit;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Move back up to the root of the current project.
#[derive(Debug, Clone, Parser)]
#[command(
    disable_help_flag = true,
    disable_version_flag = true,
    override_usage = "\n  up\n  up init [--pushd]",
    subcommand_help_heading = "Commands"
)]
struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print shell function that wraps up.
    #[command(disable_help_flag = true, override_usage = "up init [--pushd]")]
    Init(InitOptions),
}

#[derive(Parser, Clone, Debug)]
struct InitOptions {
    /// Change directory with "pushd" instead of "cd".
    #[arg(long)]
    pub pushd: bool,
}

fn main() {
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
        Err(error) => {
            eprintln!("up needs to be hooked into the shell before it can be used.");
            eprintln!("Usage: eval \"$(up init)\"");
            eprintln!();
            eprintln!("{}", error.render());
            exit(1);
        }
    };

    match cli.command {
        Some(Command::Init(opts)) => {
            let hook = UpHook {
                binary: current_binary("up"),
                cd_command: CdCommand::new(opts.pushd),
            };
            print!("{hook}");
        }
        None => {
            let root = ProjectFinder::from_env().find_root(&working_dir());
            println!("{}", root.display());
        }
    }

    exit(0)
}
