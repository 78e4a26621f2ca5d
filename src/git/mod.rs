pub mod command;
pub mod numstat;
pub mod repo;

use crate::error::Result;
use crate::model::DiffRecord;
use clap::ValueEnum;
use std::path::Path;

pub use command::GitCommand;
pub use numstat::{parse_numstat, parse_numstat_line, NumstatSkip};
pub use repo::GitRepo;

/// Read access to a repository's history, one commit at a time.
pub trait CommitSource {
    /// Every commit reachable from any reference. Empty for a repository
    /// without commits.
    fn commit_ids(&self) -> Result<Vec<String>>;

    /// Per-file line deltas a commit introduces relative to its first parent.
    fn diff_records(&self, commit_id: &str) -> Result<Vec<DiffRecord>>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Shell out to the `git` binary and parse `--numstat` output
    #[default]
    Git,
    /// Walk history in-process with gix
    Gix,
}

pub fn open_source(backend: Backend, path: &Path) -> Result<Box<dyn CommitSource>> {
    Ok(match backend {
        Backend::Git => Box::new(GitCommand::open(path)?),
        Backend::Gix => Box::new(GitRepo::open(path)?),
    })
}
