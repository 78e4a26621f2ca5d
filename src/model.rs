use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::languages::classify;

pub const SCHEMA_VERSION: u32 = 1;

/// Line counts for one file in one commit, as a numstat line reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDelta {
    Text { added: u64, deleted: u64 },
    Binary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRecord {
    pub path: String,
    pub delta: LineDelta,
}

impl DiffRecord {
    pub fn text(path: impl Into<String>, added: u64, deleted: u64) -> Self {
        Self {
            path: path.into(),
            delta: LineDelta::Text { added, deleted },
        }
    }

    pub fn binary(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            delta: LineDelta::Binary,
        }
    }
}

/// Total added lines per language.
///
/// Only ever grows: records and partial results are folded in by addition,
/// so the order in which commits or repositories are scanned does not matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageStats {
    lines: BTreeMap<String, u64>,
}

impl LanguageStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, language: &str, lines: u64) {
        let total = self.lines.entry(language.to_string()).or_insert(0);
        *total = total.saturating_add(lines);
    }

    /// Attribute one diff record. Returns the language it was counted under,
    /// or `None` when the record is binary or its extension is unknown.
    pub fn record(&mut self, record: &DiffRecord) -> Option<&'static str> {
        let LineDelta::Text { added, .. } = record.delta else {
            return None;
        };
        let language = classify(&record.path)?;
        self.add(language, added);
        Some(language)
    }

    pub fn accumulate<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a DiffRecord>,
    {
        for record in records {
            self.record(record);
        }
    }

    pub fn merge(&mut self, other: LanguageStats) {
        for (language, lines) in other.lines {
            self.add(&language, lines);
        }
    }

    pub fn get(&self, language: &str) -> Option<u64> {
        self.lines.get(language).copied()
    }

    pub fn total(&self) -> u64 {
        self.lines.values().fold(0, |sum, lines| sum.saturating_add(*lines))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.lines.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries by descending line count; equal counts keep alphabetical order.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

impl FromIterator<(String, u64)> for LanguageStats {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        let mut stats = LanguageStats::new();
        for (language, lines) in iter {
            stats.add(&language, lines);
        }
        stats
    }
}

impl Serialize for LanguageStats {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let entries = self.sorted();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (language, lines) in entries {
            map.serialize_entry(language, &lines)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LanguageStats {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let lines = BTreeMap::<String, u64>::deserialize(deserializer)?;
        Ok(Self { lines })
    }
}

/// Repository metadata handed over by the hosting API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    pub full_name: String,
    pub name: String,
    pub clone_url: String,
    pub fork: bool,
    pub owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoScan {
    pub stats: LanguageStats,
    pub commits: usize,
    pub skipped_commits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RepoOutcome {
    Analyzed { commits: usize, skipped_commits: usize, lines: u64 },
    SkippedFork,
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RepoReport {
    pub full_name: String,
    #[serde(flatten)]
    pub outcome: RepoOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageEntry {
    pub language: String,
    pub lines: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub mode: String,
    pub output_path: String,
    pub total_lines: u64,
    pub languages: Vec<LanguageEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<RepoReport>,
}
