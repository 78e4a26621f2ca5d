use super::CommitSource;
use crate::error::{LangstatError, Result};
use crate::model::DiffRecord;
use gix::object::tree::diff::ChangeDetached;
use gix::{discover, ObjectId, Repository};
use similar::{ChangeTag, TextDiff};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Bytes inspected when deciding whether a blob is binary, as git does.
const BINARY_PROBE_LEN: usize = 8000;

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open the repository containing `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = discover(path.as_ref())?;
        Ok(Self { repo })
    }

    /// Commits that references (and HEAD) point at, after peeling tags.
    fn tips(&self) -> Result<Vec<ObjectId>> {
        let mut tips = Vec::new();

        if let Ok(head) = self.repo.head_id() {
            tips.push(head.detach());
        }

        let platform = self
            .repo
            .references()
            .map_err(|e| LangstatError::GitRepo(format!("Failed to read references: {e}")))?;
        let refs = platform
            .all()
            .map_err(|e| LangstatError::GitRepo(format!("Failed to iterate references: {e}")))?;

        for reference in refs {
            let mut reference = match reference {
                Ok(r) => r,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable reference");
                    continue;
                }
            };
            let id = match reference.peel_to_id_in_place() {
                Ok(id) => id.detach(),
                Err(e) => {
                    debug!(error = %e, "skipping reference that does not peel");
                    continue;
                }
            };
            let is_commit = self
                .repo
                .find_object(id)
                .map(|obj| obj.kind == gix::object::Kind::Commit)
                .unwrap_or(false);
            if is_commit {
                tips.push(id);
            }
        }

        Ok(tips)
    }

    fn handle_change(&self, change: ChangeDetached, records: &mut Vec<DiffRecord>) {
        match change {
            ChangeDetached::Addition { id, location, .. } => {
                if let Some(data) = self.blob_data(id) {
                    records.push(if is_binary(&data) {
                        DiffRecord::binary(location.to_string())
                    } else {
                        DiffRecord::text(location.to_string(), count_lines(&data), 0)
                    });
                }
            }
            ChangeDetached::Deletion { id, location, .. } => {
                if let Some(data) = self.blob_data(id) {
                    records.push(if is_binary(&data) {
                        DiffRecord::binary(location.to_string())
                    } else {
                        DiffRecord::text(location.to_string(), 0, count_lines(&data))
                    });
                }
            }
            ChangeDetached::Modification {
                previous_id,
                id,
                location,
                ..
            } => {
                if let (Some(old), Some(new)) = (self.blob_data(previous_id), self.blob_data(id)) {
                    records.push(text_or_binary(location.to_string(), &old, &new));
                }
            }
            ChangeDetached::Rewrite {
                source_id,
                id,
                location,
                ..
            } => {
                if let (Some(old), Some(new)) = (self.blob_data(source_id), self.blob_data(id)) {
                    records.push(text_or_binary(location.to_string(), &old, &new));
                }
            }
        }
    }

    /// Blob contents, or `None` for trees, submodules and missing objects.
    fn blob_data(&self, id: ObjectId) -> Option<Vec<u8>> {
        let object = self.repo.find_object(id).ok()?;
        if object.kind != gix::object::Kind::Blob {
            return None;
        }
        Some(object.data.clone())
    }
}

impl CommitSource for GitRepo {
    fn commit_ids(&self) -> Result<Vec<String>> {
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: Vec<ObjectId> = self.tips()?;
        let mut ids = Vec::new();

        while let Some(commit_id) = stack.pop() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            for pid in commit.parent_ids() {
                stack.push(pid.into());
            }
            ids.push(commit_id.to_string());
        }

        Ok(ids)
    }

    fn diff_records(&self, commit_id: &str) -> Result<Vec<DiffRecord>> {
        let oid = ObjectId::from_hex(commit_id.as_bytes())
            .map_err(|e| LangstatError::Parse(format!("Invalid commit ID: {e}")))?;
        let commit = self.repo.find_commit(oid)?;
        // Merges are diffed against their first parent, which is what
        // `git show --numstat` reports for them.
        let first_parent: Option<ObjectId> = commit.parent_ids().next().map(|id| id.into());

        let commit_tree = commit.tree()?;
        let changes: Vec<ChangeDetached> = match first_parent {
            Some(parent_id) => {
                let parent_tree = self.repo.find_commit(parent_id)?.tree()?;
                self.repo
                    .diff_tree_to_tree(Some(&parent_tree), Some(&commit_tree), None)?
            }
            None => self.repo.diff_tree_to_tree(None, Some(&commit_tree), None)?,
        };

        let mut records = Vec::new();
        for change in changes {
            self.handle_change(change, &mut records);
        }
        Ok(records)
    }
}

fn is_binary(data: &[u8]) -> bool {
    data.iter().take(BINARY_PROBE_LEN).any(|&b| b == 0)
}

fn count_lines(data: &[u8]) -> u64 {
    String::from_utf8_lossy(data).lines().count() as u64
}

fn text_or_binary(path: String, old: &[u8], new: &[u8]) -> DiffRecord {
    if is_binary(old) || is_binary(new) {
        return DiffRecord::binary(path);
    }
    let (added, deleted) = line_delta(old, new);
    DiffRecord::text(path, added, deleted)
}

fn line_delta(old: &[u8], new: &[u8]) -> (u64, u64) {
    let old = String::from_utf8_lossy(old);
    let new = String::from_utf8_lossy(new);
    let diff = TextDiff::from_lines(&*old, &*new);

    let mut added = 0u64;
    let mut deleted = 0u64;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => deleted += 1,
            ChangeTag::Equal => {}
        }
    }
    (added, deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_delta_counts_inserts_and_deletes() {
        let old = b"a\nb\nc\n";
        let new = b"a\nB\nc\nd\n";
        assert_eq!(line_delta(old, new), (2, 1));
        assert_eq!(line_delta(b"", b"x\ny\n"), (2, 0));
    }

    #[test]
    fn nul_bytes_mark_binary() {
        assert!(is_binary(b"\x89PNG\r\n\x1a\n\0\0"));
        assert!(!is_binary(b"fn main() {}\n"));

        let record = text_or_binary("img.py".to_string(), b"ok\n", b"\0\0");
        assert_eq!(record, DiffRecord::binary("img.py"));
    }

    #[test]
    fn counts_lines_without_trailing_newline() {
        assert_eq!(count_lines(b"one\ntwo"), 2);
        assert_eq!(count_lines(b""), 0);
    }
}
