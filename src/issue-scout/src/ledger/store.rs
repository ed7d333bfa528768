//! Keyed ledger store backed by a JSON snapshot.

use super::{LedgerEntry, LedgerError, LedgerKey, Outcome};
use crate::repositories::RepositoryId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Current snapshot format version.
const SNAPSHOT_VERSION: u32 = 1;

/// On-disk form of the ledger.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Snapshot {
    version: u32,
    entries: Vec<SnapshotEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SnapshotEntry {
    repository: RepositoryId,
    number: u64,
    #[serde(flatten)]
    entry: LedgerEntry,
}

/// Record of issues already acted upon, keyed by `(repository, number)`.
///
/// Holds every entry in memory. When opened from a file, each mutation
/// rewrites the whole snapshot to a sibling temp file and renames it into
/// place, so the file on disk is always a complete snapshot.
#[derive(Debug, Default)]
pub struct Ledger {
    path: Option<PathBuf>,
    entries: BTreeMap<LedgerKey, LedgerEntry>,
}

impl Ledger {
    /// Creates an empty ledger that is never persisted.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the ledger at `path`. A missing file yields an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the file exists but cannot be read or parsed.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let mut ledger = Self {
            path: Some(path.to_path_buf()),
            entries: BTreeMap::new(),
        };

        if !path.exists() {
            info!(path = %path.display(), "No ledger found, starting empty");
            return Ok(ledger);
        }

        let contents = std::fs::read_to_string(path).map_err(|source| LedgerError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let snapshot: Snapshot =
            serde_json::from_str(&contents).map_err(|source| LedgerError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LedgerError::UnsupportedVersion {
                path: path.display().to_string(),
                version: snapshot.version,
            });
        }

        // Later duplicates win, same as an upsert.
        for item in snapshot.entries {
            ledger
                .entries
                .insert(LedgerKey::new(item.repository, item.number), item.entry);
        }

        info!(path = %path.display(), entries = ledger.entries.len(), "Loaded ledger");
        Ok(ledger)
    }

    /// Returns the file backing this ledger, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Looks up the entry for a key.
    pub fn get(&self, key: &LedgerKey) -> Option<&LedgerEntry> {
        self.entries.get(key)
    }

    /// Returns `true` if the issue already has a final outcome and must not be selected.
    pub fn blocks(&self, key: &LedgerKey) -> bool {
        self.get(key).is_some_and(|entry| entry.outcome.is_final())
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the ledger holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&LedgerKey, &LedgerEntry)> {
        self.entries.iter()
    }

    /// Inserts or replaces the entry for `key` and persists the result.
    ///
    /// Returns the entry that was replaced, if any. The in-memory state is
    /// only changed once the snapshot has been written.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the snapshot cannot be written.
    pub fn upsert(
        &mut self,
        key: LedgerKey,
        entry: LedgerEntry,
    ) -> Result<Option<LedgerEntry>, LedgerError> {
        let previous = self.entries.insert(key.clone(), entry);
        if let Err(e) = self.persist() {
            match previous {
                Some(old) => self.entries.insert(key, old),
                None => self.entries.remove(&key),
            };
            return Err(e);
        }
        debug!(key = %key, outcome = %entry.outcome, "Ledger entry written");
        Ok(previous)
    }

    /// Removes `skipped-dry-run` entries processed before `now - retention`.
    ///
    /// Returns how many entries were dropped. Other outcomes are never removed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the compacted snapshot cannot be written.
    pub fn compact_dry_runs(
        &mut self,
        retention: Duration,
        now: DateTime<Utc>,
    ) -> Result<usize, LedgerError> {
        let cutoff = now - retention;
        let before = self.entries.len();
        let kept: BTreeMap<LedgerKey, LedgerEntry> = self
            .entries
            .iter()
            .filter(|(_, entry)| {
                entry.outcome != Outcome::SkippedDryRun || entry.processed_at >= cutoff
            })
            .map(|(key, entry)| (key.clone(), *entry))
            .collect();
        let removed = before - kept.len();

        if removed > 0 {
            let previous = std::mem::replace(&mut self.entries, kept);
            if let Err(e) = self.persist() {
                self.entries = previous;
                return Err(e);
            }
            info!(removed, "Compacted stale dry-run ledger entries");
        }
        Ok(removed)
    }

    /// Writes the snapshot atomically. No-op for in-memory ledgers.
    fn persist(&self) -> Result<(), LedgerError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let write_err = |source: std::io::Error| LedgerError::Write {
            path: path.display().to_string(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(write_err)?;

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            entries: self
                .entries
                .iter()
                .map(|(key, entry)| SnapshotEntry {
                    repository: key.repository.clone(),
                    number: key.number,
                    entry: *entry,
                })
                .collect(),
        };
        let json = serde_json::to_vec_pretty(&snapshot).map_err(|source| LedgerError::Encode {
            path: path.display().to_string(),
            source,
        })?;

        let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
        file.write_all(&json).map_err(write_err)?;
        file.as_file().sync_all().map_err(write_err)?;
        file.persist(path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn key(repo: &str, number: u64) -> LedgerKey {
        LedgerKey::new(repo.parse().unwrap(), number)
    }

    fn entry(outcome: Outcome, day: u32) -> LedgerEntry {
        LedgerEntry {
            processed_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            outcome,
        }
    }

    #[test]
    fn open_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let ledger = Ledger::open(&temp.path().join("ledger.json")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn upsert_replaces_existing_entry() {
        let mut ledger = Ledger::in_memory();
        let previous = ledger
            .upsert(key("a/repo1", 1), entry(Outcome::Failed, 1))
            .unwrap();
        assert!(previous.is_none());

        let previous = ledger
            .upsert(key("a/repo1", 1), entry(Outcome::Commented, 2))
            .unwrap();
        assert_eq!(previous.map(|e| e.outcome), Some(Outcome::Failed));
        assert_eq!(ledger.len(), 1);
        assert_eq!(
            ledger.get(&key("a/repo1", 1)).map(|e| e.outcome),
            Some(Outcome::Commented)
        );
    }

    #[test]
    fn blocks_only_final_outcomes() {
        let mut ledger = Ledger::in_memory();
        ledger
            .upsert(key("a/repo1", 1), entry(Outcome::Commented, 1))
            .unwrap();
        ledger
            .upsert(key("a/repo1", 2), entry(Outcome::AssignmentRequested, 1))
            .unwrap();
        ledger
            .upsert(key("a/repo1", 3), entry(Outcome::Failed, 1))
            .unwrap();
        ledger
            .upsert(key("a/repo1", 4), entry(Outcome::SkippedDryRun, 1))
            .unwrap();

        assert!(ledger.blocks(&key("a/repo1", 1)));
        assert!(ledger.blocks(&key("a/repo1", 2)));
        assert!(!ledger.blocks(&key("a/repo1", 3)));
        assert!(!ledger.blocks(&key("a/repo1", 4)));
        assert!(!ledger.blocks(&key("a/repo1", 5)));
    }

    #[test]
    fn persists_and_reloads() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state/ledger.json");

        let mut ledger = Ledger::open(&path).unwrap();
        ledger
            .upsert(key("b/repo2", 10), entry(Outcome::Commented, 1))
            .unwrap();
        ledger
            .upsert(key("a/repo1", 2), entry(Outcome::SkippedDryRun, 2))
            .unwrap();

        let reloaded = Ledger::open(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(
            reloaded.get(&key("b/repo2", 10)),
            Some(&entry(Outcome::Commented, 1))
        );
        assert_eq!(
            reloaded.get(&key("a/repo1", 2)),
            Some(&entry(Outcome::SkippedDryRun, 2))
        );
    }

    #[test]
    fn snapshot_uses_readable_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ledger.json");
        let mut ledger = Ledger::open(&path).unwrap();
        ledger
            .upsert(key("a/repo1", 7), entry(Outcome::AssignmentRequested, 3))
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"repository\": \"a/repo1\""));
        assert!(contents.contains("\"outcome\": \"assignment-requested\""));
        assert!(contents.contains("\"processed-at\""));
    }

    #[test]
    fn open_rejects_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ledger.json");
        fs::write(&path, "{ not json").unwrap();

        let result = Ledger::open(&path);
        assert!(matches!(result, Err(LedgerError::Parse { .. })));
    }

    #[test]
    fn open_rejects_unknown_version() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ledger.json");
        fs::write(&path, r#"{"version": 99, "entries": []}"#).unwrap();

        let result = Ledger::open(&path);
        assert!(matches!(
            result,
            Err(LedgerError::UnsupportedVersion { version: 99, .. })
        ));
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let temp = TempDir::new().unwrap();
        // A regular file where the parent directory should be makes every write fail.
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let mut ledger = Ledger::open(&blocker.join("ledger.json")).unwrap();

        let result = ledger.upsert(key("a/repo1", 1), entry(Outcome::Commented, 1));
        assert!(matches!(result, Err(LedgerError::Write { .. })));
        assert!(ledger.is_empty());
    }

    #[test]
    fn compaction_drops_only_stale_dry_runs() {
        let mut ledger = Ledger::in_memory();
        ledger
            .upsert(key("a/repo1", 1), entry(Outcome::SkippedDryRun, 1))
            .unwrap();
        ledger
            .upsert(key("a/repo1", 2), entry(Outcome::SkippedDryRun, 20))
            .unwrap();
        ledger
            .upsert(key("a/repo1", 3), entry(Outcome::Failed, 1))
            .unwrap();
        ledger
            .upsert(key("a/repo1", 4), entry(Outcome::Commented, 1))
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 25, 0, 0, 0).unwrap();
        let removed = ledger.compact_dry_runs(Duration::days(10), now).unwrap();

        assert_eq!(removed, 1);
        assert!(ledger.get(&key("a/repo1", 1)).is_none());
        assert!(ledger.get(&key("a/repo1", 2)).is_some());
        assert!(ledger.get(&key("a/repo1", 3)).is_some());
        assert!(ledger.get(&key("a/repo1", 4)).is_some());
    }
}
