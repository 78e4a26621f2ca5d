#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;

pub fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

pub fn git(dir: &Path, args: &[&str]) {
    assert!(Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

pub fn init_git_repo(dir: &Path) {
    // init and basic identity
    git(dir, &["init", "--quiet"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "core.safecrlf", "false"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
}

pub fn commit_bytes(dir: &Path, name: &str, content: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content).unwrap();
    f.sync_all().unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "--quiet", "-m", &format!("add {name}")]);
}

pub fn commit_file(dir: &Path, name: &str, content: &str) {
    commit_bytes(dir, name, content.as_bytes());
}

/// A repository with 3 lines of Python, 2 of Rust, a binary image and a
/// markdown file spread over four commits.
pub fn sample_repo(dir: &Path) {
    init_git_repo(dir);
    commit_file(dir, "app/main.py", "import os\nprint(os.name)\n");
    commit_file(dir, "src/lib.rs", "pub fn a() {}\npub fn b() {}\n");
    commit_bytes(dir, "assets/logo.png", b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0");
    commit_file(dir, "app/main.py", "import os\nprint(os.name)\nprint('done')\n");
    commit_file(dir, "README.md", "# sample\n\nsome words\n");
}

/// Adds 4 lines of Python through a side branch and a merge commit on top of
/// an existing history. The merge itself changes one line relative to its
/// first parent.
pub fn merge_history(dir: &Path) {
    commit_file(dir, "merge/a.py", "a = 1\n");
    git(dir, &["checkout", "--quiet", "-b", "side"]);
    commit_file(dir, "merge/a.py", "a = 1\na = 2\n");
    git(dir, &["checkout", "--quiet", "-"]);
    commit_file(dir, "merge/b.py", "b = 1\n");
    git(dir, &["merge", "--quiet", "--no-edit", "side"]);
}
