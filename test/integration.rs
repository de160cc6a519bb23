// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{git_available, RepoFixture, RepoKind};

use hcli::{resolve::ResolveError, CloneOptions, GitCli, GitHubLookup, Resolver};

use anyhow::Result;
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use std::{
    env::current_dir,
    fs::create_dir_all,
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn offline_resolver(code_root: &Path) -> Resolver<GitCli, GitHubLookup> {
    Resolver::new(code_root, GitCli::new())
}

// INVARIANT: File URLs have no host, so the clone lands under the absolute
// path of the upstream repository, minus any ".git" suffix.
fn local_path_of(code_root: &Path, upstream: &Path) -> PathBuf {
    let upstream = upstream.to_string_lossy();
    let upstream = upstream.trim_end_matches(".git");
    code_root.join(upstream.trim_start_matches('/'))
}

fn run_bin(bin: &str, args: &[&str]) -> Result<Output> {
    run_bin_offline(bin, args, "1")
}

fn run_bin_offline(bin: &str, args: &[&str], offline: &str) -> Result<Output> {
    let output = Command::new(bin)
        .args(args)
        .env("PWD", current_dir()?)
        .env("H_OFFLINE", offline)
        .env("RUST_LOG", "off")
        .env_remove("DIRENV_DIR")
        .output()?;
    Ok(output)
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout_line(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

#[sealed_test]
fn resolve_clones_normal_repository() -> Result<()> {
    if !git_available() {
        return Ok(());
    }

    let root = current_dir()?;
    let upstream = root.join("upstream/proj");
    let fixture = RepoFixture::new(&upstream, RepoKind::Normal)?;
    fixture.stage_and_commit("README.md", "hello")?;
    let code_root = root.join("code");
    create_dir_all(&code_root)?;

    let resolver = offline_resolver(&code_root);
    let result = block_on(resolver.resolve(&fixture.url(), &CloneOptions::default()))?;

    let expect = local_path_of(&code_root, &upstream);
    assert_eq!(result, expect);
    assert!(expect.join("README.md").is_file());
    assert!(expect.join(".git").is_dir());

    Ok(())
}

#[sealed_test]
fn resolve_clones_bare_repository_without_vcs_suffix() -> Result<()> {
    if !git_available() {
        return Ok(());
    }

    let root = current_dir()?;
    let upstream = root.join("upstream/tool.git");
    let fixture = RepoFixture::new(&upstream, RepoKind::Bare)?;
    fixture.stage_and_commit("main.rs", "fn main() {}")?;
    let code_root = root.join("code");

    let resolver = offline_resolver(&code_root);
    let options = CloneOptions::new(["--depth", "1"]);
    let result = block_on(resolver.resolve(&fixture.url(), &options))?;

    let expect = local_path_of(&code_root, &upstream);
    assert_eq!(result, expect);
    assert!(!result.to_string_lossy().ends_with(".git"));
    assert!(expect.join("main.rs").is_file());

    let again = block_on(resolver.resolve(&fixture.url(), &CloneOptions::default()))?;
    assert_eq!(again, expect);

    Ok(())
}

#[sealed_test]
fn resolve_failed_clone_rolls_back_directories() -> Result<()> {
    if !git_available() {
        return Ok(());
    }

    let root = current_dir()?;
    let code_root = root.join("code");
    create_dir_all(code_root.join("keep"))?;
    let missing = root.join("nowhere/proj");

    let resolver = offline_resolver(&code_root);
    let url = format!("file://{}", missing.display());
    let result = block_on(resolver.resolve(&url, &CloneOptions::default()));

    let error = result.unwrap_err();
    assert!(matches!(error, ResolveError::Clone(_)));
    assert_ne!(error.exit_code(), 0);
    assert!(!local_path_of(&code_root, &missing).exists());
    assert!(!local_path_of(&code_root, &missing).parent().unwrap().exists());
    assert!(code_root.join("keep").is_dir());

    let mut leftovers = std::fs::read_dir(&code_root)?
        .map(|entry| entry.map(|entry| entry.file_name()))
        .collect::<Result<Vec<_>, _>>()?;
    leftovers.sort();
    assert_eq!(leftovers, vec!["keep"]);

    Ok(())
}

#[sealed_test]
fn h_prints_resolved_path() -> Result<()> {
    let root = current_dir()?;
    create_dir_all(root.join("code/work/myrepo"))?;
    let code_root = root.join("code");

    let output = run_bin(
        env!("CARGO_BIN_EXE_h"),
        &["resolve", &code_root.to_string_lossy(), "myrepo"],
    )?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_line(&output), code_root.join("work/myrepo").to_string_lossy());

    Ok(())
}

#[sealed_test]
fn h_prints_working_dir_on_failure() -> Result<()> {
    let root = current_dir()?;
    let code_root = root.join("code");
    create_dir_all(&code_root)?;

    let cases = [
        ("???", "Unknown pattern for ???"),
        ("-h", "Usage: h (<name> | <repo>/<name> | <url>) [git opts]"),
        ("nothing-here", "nothing-here not found"),
        ("://example.com/a", "Missing url scheme"),
    ];
    for (term, diagnostic) in cases {
        let output = run_bin(
            env!("CARGO_BIN_EXE_h"),
            &["resolve", &code_root.to_string_lossy(), term],
        )?;

        assert_eq!(output.status.code(), Some(1), "{term}");
        assert_eq!(stdout_line(&output), root.to_string_lossy(), "{term}");
        assert!(stderr_text(&output).contains(diagnostic), "{term}: {}", stderr_text(&output));
    }

    Ok(())
}

#[sealed_test]
fn h_accepts_boolish_offline_env() -> Result<()> {
    let root = current_dir()?;
    create_dir_all(root.join("code/work/myrepo"))?;
    let code_root = root.join("code");

    for offline in ["1", "0", "yes", "true", "false", ""] {
        let output = run_bin_offline(
            env!("CARGO_BIN_EXE_h"),
            &["resolve", &code_root.to_string_lossy(), "myrepo"],
            offline,
        )?;

        assert_eq!(output.status.code(), Some(0), "H_OFFLINE={offline:?}");
        assert_eq!(
            stdout_line(&output),
            code_root.join("work/myrepo").to_string_lossy(),
            "H_OFFLINE={offline:?}"
        );
    }

    Ok(())
}

#[sealed_test]
fn h_trailing_clone_options_follow_term() -> Result<()> {
    let root = current_dir()?;
    create_dir_all(root.join("code/work/myrepo"))?;
    let code_root = root.join("code");

    let output = run_bin(
        env!("CARGO_BIN_EXE_h"),
        &["resolve", &code_root.to_string_lossy(), "myrepo", "--depth", "1"],
    )?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr_text(&output));
    assert_eq!(stdout_line(&output), code_root.join("work/myrepo").to_string_lossy());

    Ok(())
}

#[sealed_test]
fn h_hook_with_git_opts_changes_directory() -> Result<()> {
    let root = current_dir()?;
    create_dir_all(root.join("code/work/myrepo"))?;
    let code_root = root.join("code");

    let init = run_bin(
        env!("CARGO_BIN_EXE_h"),
        &["init", "--git-opts", "--depth 1", &code_root.to_string_lossy()],
    )?;
    assert_eq!(init.status.code(), Some(0));
    let hook = String::from_utf8_lossy(&init.stdout).into_owned();

    let script = format!("{hook}\nh myrepo\npwd\n");
    let output = Command::new("sh")
        .arg("-c")
        .arg(script)
        .env("PWD", &root)
        .env("H_OFFLINE", "1")
        .output()?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr_text(&output));
    assert_eq!(stdout_line(&output), code_root.join("work/myrepo").to_string_lossy());

    Ok(())
}

#[sealed_test]
fn h_missing_arguments_prints_working_dir() -> Result<()> {
    let root = current_dir()?;

    let output = run_bin(env!("CARGO_BIN_EXE_h"), &["resolve"])?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_line(&output), root.to_string_lossy());

    Ok(())
}

#[sealed_test]
fn h_init_prints_shell_function() -> Result<()> {
    let output = run_bin(env!("CARGO_BIN_EXE_h"), &["init", "--name", "code", "/srv/src"])?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.starts_with("code() {\n"));
    assert!(stdout.contains("resolve \"/srv/src\" \"$@\""));

    Ok(())
}

#[sealed_test]
fn up_prints_project_root() -> Result<()> {
    let root = current_dir()?;
    create_dir_all(root.join("proj/.git"))?;
    create_dir_all(root.join("proj/src/deep"))?;
    std::env::set_current_dir(root.join("proj/src/deep"))?;

    let output = run_bin(env!("CARGO_BIN_EXE_up"), &[])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_line(&output), root.join("proj").to_string_lossy());

    Ok(())
}

#[sealed_test]
fn up_help_is_usage_error() -> Result<()> {
    for flag in ["-h", "--help"] {
        let output = run_bin(env!("CARGO_BIN_EXE_up"), &[flag])?;
        assert_eq!(output.status.code(), Some(1), "{flag}");
        assert!(output.stdout.is_empty(), "{flag}");
    }

    Ok(())
}
