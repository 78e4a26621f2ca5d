mod common;

use assert_cmd::prelude::*;
use common::{commit_file, has_git, init_git_repo, merge_history, sample_repo};
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const START: &str = "<!-- LANGUAGE-STATS:START -->";
const END: &str = "<!-- LANGUAGE-STATS:END -->";

fn langstat() -> Command {
    let mut cmd = Command::cargo_bin("langstat").unwrap();
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("ANALYZE_ALL_REPOS")
        .env_remove("GITHUB_API_URL")
        .env("RUST_LOG", "warn");
    cmd
}

fn analyze_json(repo: &std::path::Path, output: &std::path::Path, backend: &str) -> serde_json::Value {
    let out = langstat()
        .current_dir(repo)
        .args(["analyze", "--all-repos", "false", "--json", "--backend", backend])
        .arg("--repo")
        .arg(repo)
        .arg("--output")
        .arg(output)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn analyze_single_repo_writes_sorted_artifact() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    sample_repo(dir.path());
    let output = dir.path().join(".github/language_stats.json");

    let v = analyze_json(dir.path(), &output, "git");
    assert_eq!(v["mode"], "single-repository");
    assert_eq!(v["total_lines"], 5);
    assert_eq!(v["languages"][0]["language"], "Python");
    assert_eq!(v["languages"][0]["lines"], 3);
    assert_eq!(v["languages"][1]["language"], "Rust");
    assert_eq!(v["languages"][1]["lines"], 2);

    let artifact = fs::read_to_string(&output).unwrap();
    assert_eq!(artifact, "{\n  \"Python\": 3,\n  \"Rust\": 2\n}\n");
}

#[test]
fn gix_backend_agrees_with_git_backend() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    sample_repo(dir.path());
    merge_history(dir.path());

    let via_git = analyze_json(dir.path(), &dir.path().join("git.json"), "git");
    let via_gix = analyze_json(dir.path(), &dir.path().join("gix.json"), "gix");
    assert_eq!(via_git["languages"], via_gix["languages"]);
    assert_eq!(via_git["languages"][0]["language"], "Python");
    assert_eq!(via_git["languages"][0]["lines"], 7);
}

#[test]
fn quoted_paths_are_counted_by_both_backends() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "café.py", "x = 1\ny = 2\n");
    commit_file(dir.path(), "tab\there.rs", "fn main() {}\n");

    for backend in ["git", "gix"] {
        let v = analyze_json(dir.path(), &dir.path().join(format!("{backend}.json")), backend);
        assert_eq!(v["total_lines"], 3, "{backend}");
        assert_eq!(v["languages"][0]["language"], "Python", "{backend}");
        assert_eq!(v["languages"][0]["lines"], 2, "{backend}");
        assert_eq!(v["languages"][1]["language"], "Rust", "{backend}");
    }
}

#[test]
fn empty_repository_yields_empty_artifact() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    let output = dir.path().join("stats.json");

    let v = analyze_json(dir.path(), &output, "git");
    assert_eq!(v["total_lines"], 0);
    assert_eq!(fs::read_to_string(&output).unwrap(), "{}\n");
}

#[test]
fn all_repos_mode_without_token_fails_before_writing() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("stats.json");

    let assert = langstat()
        .current_dir(dir.path())
        .args(["analyze", "--output"])
        .arg(&output)
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("GITHUB_TOKEN"), "stderr: {stderr}");
    assert!(!output.exists());
}

#[test]
fn render_appends_then_replaces_in_place() {
    let dir = tempdir().unwrap();
    let stats = dir.path().join("stats.json");
    let readme = dir.path().join("README.md");
    fs::write(&stats, r#"{"Python": 80, "Go": 20}"#).unwrap();
    fs::write(&readme, "# Profile\n\nHello there.\n").unwrap();

    let run = || {
        langstat()
            .current_dir(dir.path())
            .arg("render")
            .arg("--stats")
            .arg(&stats)
            .arg("--readme")
            .arg(&readme)
            .assert()
            .success();
        fs::read_to_string(&readme).unwrap()
    };

    let first = run();
    assert!(first.starts_with("# Profile\n\nHello there.\n\n<!-- LANGUAGE-STATS:START -->\n"));
    assert!(first.contains("**Python** - 80.0%"));
    assert!(first.contains("**Go** - 20.0%"));
    assert!(first.contains("*Based on 100 lines of code added across all commits*"));
    assert!(first.trim_end().ends_with(END));
    assert_eq!(first.matches(START).count(), 1);

    let second = run();
    assert_eq!(first, second);
}

#[test]
fn render_with_empty_stats_leaves_readme_alone() {
    let dir = tempdir().unwrap();
    let stats = dir.path().join("stats.json");
    let readme = dir.path().join("README.md");
    fs::write(&stats, "{}").unwrap();
    fs::write(&readme, "# Untouched\n").unwrap();

    langstat()
        .current_dir(dir.path())
        .arg("render")
        .arg("--stats")
        .arg(&stats)
        .arg("--readme")
        .arg(&readme)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&readme).unwrap(), "# Untouched\n");
}

#[test]
fn render_dry_run_prints_without_writing() {
    let dir = tempdir().unwrap();
    let stats = dir.path().join("stats.json");
    let readme = dir.path().join("README.md");
    fs::write(&stats, r#"{"Rust": 10}"#).unwrap();
    fs::write(&readme, "![Top Languages](https://example.com/top)\n").unwrap();

    let out = langstat()
        .current_dir(dir.path())
        .args(["render", "--dry-run", "--top", "1"])
        .arg("--stats")
        .arg(&stats)
        .arg("--readme")
        .arg(&readme)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let printed = String::from_utf8(out).unwrap();

    assert!(printed.starts_with(START));
    assert!(printed.ends_with("\n\n![Top Languages](https://example.com/top)\n"));
    assert_eq!(
        fs::read_to_string(&readme).unwrap(),
        "![Top Languages](https://example.com/top)\n"
    );
}
