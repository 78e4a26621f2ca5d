use crate::error::Result;
use crate::git::CommitSource;
use crate::model::{LanguageStats, RepoScan};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

/// Attribute every commit's added lines to languages.
///
/// Listing the commits is the only hard failure. A commit whose diff cannot
/// be read is logged and skipped, and the scan moves on.
pub fn scan_repository(source: &dyn CommitSource, show_progress: bool) -> Result<RepoScan> {
    let commit_ids = source.commit_ids()?;
    if commit_ids.is_empty() {
        debug!("repository has no commits");
        return Ok(RepoScan::default());
    }

    let pb = if show_progress {
        let pb = ProgressBar::new(commit_ids.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} commits")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut stats = LanguageStats::new();
    let mut skipped_commits = 0;

    for commit_id in &commit_ids {
        match source.diff_records(commit_id) {
            Ok(records) => stats.accumulate(&records),
            Err(e) => {
                warn!(commit = %commit_id, error = %e, "skipping commit");
                skipped_commits += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    Ok(RepoScan {
        stats,
        commits: commit_ids.len(),
        skipped_commits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LangstatError;
    use crate::model::DiffRecord;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct FakeHistory {
        commits: Vec<(&'static str, Option<Vec<DiffRecord>>)>,
    }

    impl CommitSource for FakeHistory {
        fn commit_ids(&self) -> Result<Vec<String>> {
            Ok(self.commits.iter().map(|(id, _)| id.to_string()).collect())
        }

        fn diff_records(&self, commit_id: &str) -> Result<Vec<DiffRecord>> {
            let by_id: HashMap<_, _> = self.commits.iter().cloned().collect();
            by_id
                .get(commit_id)
                .cloned()
                .flatten()
                .ok_or_else(|| LangstatError::GitCommand(format!("bad object {commit_id}")))
        }
    }

    #[test]
    fn empty_history_is_not_an_error() {
        let scan = scan_repository(&FakeHistory { commits: vec![] }, false).unwrap();
        assert_eq!(scan, RepoScan::default());
    }

    #[test]
    fn unreadable_commits_are_skipped() {
        let history = FakeHistory {
            commits: vec![
                ("a1", Some(vec![DiffRecord::text("main.py", 80, 0)])),
                ("b2", None),
                (
                    "c3",
                    Some(vec![
                        DiffRecord::text("main.go", 20, 4),
                        DiffRecord::binary("logo.png"),
                        DiffRecord::text("notes.txt", 300, 0),
                    ]),
                ),
            ],
        };

        let scan = scan_repository(&history, false).unwrap();
        assert_eq!(scan.commits, 3);
        assert_eq!(scan.skipped_commits, 1);
        assert_eq!(scan.stats.get("Python"), Some(80));
        assert_eq!(scan.stats.get("Go"), Some(20));
        assert_eq!(scan.stats.total(), 100);
    }
}
