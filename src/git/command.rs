use super::numstat::parse_numstat;
use super::CommitSource;
use crate::error::{LangstatError, Result};
use crate::model::DiffRecord;
use std::path::{Path, PathBuf};
use std::process::Command;

/// History access through the `git` binary.
pub struct GitCommand {
    path: PathBuf,
}

impl GitCommand {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = Self {
            path: path.as_ref().to_path_buf(),
        };
        source
            .run(&["rev-parse", "--git-dir"])
            .map_err(|e| LangstatError::GitRepo(format!("{}: {e}", source.path.display())))?;
        Ok(source)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.path)
            .args(args)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LangstatError::GitCommand(format!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl CommitSource for GitCommand {
    fn commit_ids(&self) -> Result<Vec<String>> {
        let stdout = self.run(&["rev-list", "--all"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn diff_records(&self, commit_id: &str) -> Result<Vec<DiffRecord>> {
        let stdout = self.run(&["show", "--numstat", "--format=", "--no-color", commit_id])?;
        Ok(parse_numstat(&stdout))
    }
}
