//! cache.rs — single most-recent headline report, persisted as a JSON file
//! and mirrored in memory. Overwritten wholesale on every successful scan.
//!
//! Not safe for concurrent writers to the same file; fine for the expected
//! single-operator, low-frequency polling use.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::report::NarrativeReport;

#[derive(Clone)]
pub struct ReportCache {
    path: PathBuf,
    last: Arc<RwLock<Option<NarrativeReport>>>,
}

impl ReportCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the cache file into memory, if it exists and parses.
    /// Unreadable or stale-format files are logged and ignored.
    pub fn prime_from_disk(&self) {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str::<NarrativeReport>(&raw) {
                Ok(report) => {
                    *self.last.write().expect("cache rwlock poisoned") = Some(report);
                }
                Err(e) => {
                    tracing::warn!(error = ?e, path = %self.path.display(), "ignoring unparsable cache file");
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(error = ?e, path = %self.path.display(), "cache file unreadable");
            }
        }
    }

    /// Replace both the file and the in-memory copy with a fresh report.
    pub fn store(&self, report: &NarrativeReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report).context("serializing report")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing cache file {}", self.path.display()))?;
        *self.last.write().expect("cache rwlock poisoned") = Some(report.clone());
        Ok(())
    }

    /// Last report seen this process, if any.
    pub fn last(&self) -> Option<NarrativeReport> {
        self.last.read().expect("cache rwlock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{format_growth, Stage};

    fn sample() -> NarrativeReport {
        NarrativeReport {
            narrative: "AI Agents".into(),
            growth: format_growth(201.5),
            growth_percent: 201.5,
            mentions_24h: 67,
            mentions_2h: 28,
            stage: Stage::CrowdedTrade,
            summary: "AI Agents-related discussions accelerating rapidly".into(),
            alignment: 100,
            timestamp: "2025-08-16T10:00:00Z".into(),
        }
    }

    #[test]
    fn store_then_prime_round_trips_through_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("narrative_detected.json");

        let writer = ReportCache::new(&path);
        writer.store(&sample()).unwrap();
        assert_eq!(writer.last(), Some(sample()));

        // Fresh instance only sees the report after priming from disk.
        let reader = ReportCache::new(&path);
        assert!(reader.last().is_none());
        reader.prime_from_disk();
        assert_eq!(reader.last(), Some(sample()));
    }

    #[test]
    fn missing_or_garbage_files_leave_memory_empty() {
        let tmp = tempfile::tempdir().unwrap();

        let missing = ReportCache::new(tmp.path().join("absent.json"));
        missing.prime_from_disk();
        assert!(missing.last().is_none());

        let garbage_path = tmp.path().join("garbage.json");
        std::fs::write(&garbage_path, "{not json").unwrap();
        let garbage = ReportCache::new(&garbage_path);
        garbage.prime_from_disk();
        assert!(garbage.last().is_none());
    }
}
