//! Snapshot ledger
//!
//! Keeps an append-only history of each skill's document:
//!
//! ```text
//! <versions_dir>/
//!   my-skill/
//!     20241208_141234.md
//!     20241209_090000.md
//! ```
//!
//! Every snapshot is a full copy of `SKILL.md` prefixed with a
//! [`VersionHeader`]. Snapshots are addressed by relative index, 1 being the
//! most recent. Two saves within the same second share an identifier and the
//! later one replaces the earlier file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, error, info, warn};

use crate::config::{Config, SNAPSHOT_EXTENSION};
use crate::diff::unified_diff;
use crate::error::{SkillError, SkillResult};
use crate::header::VersionHeader;
use crate::models::{RollbackOutcome, Snapshot, SnapshotId, SnapshotSummary};
use crate::persist::{atomic_write, read_optional};
use crate::store::{validate_name, SkillStore};

/// Message recorded on the snapshot taken when a skill is created
pub const INITIAL_MESSAGE: &str = "initial creation";

/// Message recorded on the snapshot taken before a rollback
pub const ROLLBACK_MESSAGE: &str = "auto-save before rollback";

/// Append-only snapshot history for every skill
#[derive(Debug, Clone)]
pub struct VersionLedger {
    config: Config,
}

impl VersionLedger {
    /// Create a ledger over the configured versions directory
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Snapshot the current document of `name`
    pub fn save(
        &self,
        store: &SkillStore,
        name: &str,
        message: &str,
        now: NaiveDateTime,
    ) -> SkillResult<Snapshot> {
        let current = store.read_current(name)?;

        let id = SnapshotId::new(now);
        let path = self.config.version_dir(name).join(id.file_name());
        if path.exists() {
            warn!(skill = name, version = %id, "snapshot for this second already exists, replacing it");
        }

        let content = VersionHeader::new(id.to_string(), message).encode(&current);
        atomic_write(&path, content.as_bytes())?;

        info!(skill = name, version = %id, "saved snapshot");
        Ok(Snapshot { id, path, content })
    }

    /// Number of snapshots, 0 when there is no history
    pub fn count(&self, name: &str) -> SkillResult<usize> {
        Ok(self.entries(name)?.len())
    }

    /// History of `name`, most recent first
    pub fn list(&self, name: &str) -> SkillResult<Vec<SnapshotSummary>> {
        let entries = self.history(name)?;

        entries
            .into_iter()
            .enumerate()
            .map(|(i, (id, path))| {
                let content = self.read_snapshot(&path)?;
                Ok(SnapshotSummary {
                    index: i + 1,
                    id,
                    message: VersionHeader::parse(&content).message().to_string(),
                })
            })
            .collect()
    }

    /// Snapshot at relative `index`, 1 being the most recent
    pub fn get(&self, name: &str, index: i64) -> SkillResult<Snapshot> {
        let (id, path) = self.resolve(name, index)?;
        let content = self.read_snapshot(&path)?;
        Ok(Snapshot { id, path, content })
    }

    /// Restore the current document from the snapshot at `index`
    ///
    /// The target is resolved first, then the current document is
    /// auto-saved, then the target's body is written back. The auto-save is
    /// kept even if the final write fails.
    pub fn rollback(
        &self,
        store: &SkillStore,
        name: &str,
        index: i64,
        now: NaiveDateTime,
    ) -> SkillResult<RollbackOutcome> {
        PendingRollback::resolve(self, name, index)?.apply(self, store, now)
    }

    /// Unified diff between two snapshots, `index_a` being the new side
    pub fn diff(&self, name: &str, index_a: i64, index_b: i64) -> SkillResult<String> {
        let new = self.get(name, index_a)?;
        let old = self.get(name, index_b)?;

        Ok(unified_diff(
            old.body(),
            new.body(),
            &old.id.to_string(),
            &new.id.to_string(),
        ))
    }

    /// Snapshot files of `name`, most recent first; empty without history
    fn entries(&self, name: &str) -> SkillResult<Vec<(SnapshotId, PathBuf)>> {
        validate_name(name)?;
        let dir = self.config.version_dir(name);

        let read_dir = match fs::read_dir(&dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SkillError::read(e, dir)),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let path = entry.map_err(|e| SkillError::read(e, &dir))?.path();

            if path.extension().and_then(|e| e.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            match path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(SnapshotId::parse)
            {
                Some(id) => entries.push((id, path)),
                None => debug!(path = ?path, "ignoring file that is not a snapshot"),
            }
        }

        entries.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(entries)
    }

    /// Like `entries`, but a skill without snapshots is an error
    fn history(&self, name: &str) -> SkillResult<Vec<(SnapshotId, PathBuf)>> {
        let entries = self.entries(name)?;
        if entries.is_empty() {
            return Err(SkillError::NoHistory {
                name: name.to_string(),
            });
        }
        Ok(entries)
    }

    fn resolve(&self, name: &str, index: i64) -> SkillResult<(SnapshotId, PathBuf)> {
        let mut entries = self.history(name)?;
        let count = entries.len();

        let position = usize::try_from(index)
            .ok()
            .filter(|i| (1..=count).contains(i))
            .ok_or(SkillError::InvalidIndex { index, count })?;
        Ok(entries.swap_remove(position - 1))
    }

    fn read_snapshot(&self, path: &Path) -> SkillResult<String> {
        read_optional(path)?.ok_or_else(|| {
            SkillError::read(
                io::Error::new(io::ErrorKind::NotFound, "snapshot disappeared"),
                path,
            )
        })
    }
}

/// A rollback whose target has been resolved but not yet applied
///
/// Resolving reads the target before anything is written, so relative
/// indices refer to the history as it was when the rollback was requested.
#[derive(Debug)]
struct PendingRollback {
    name: String,
    target: Snapshot,
}

impl PendingRollback {
    fn resolve(ledger: &VersionLedger, name: &str, index: i64) -> SkillResult<Self> {
        let target = ledger.get(name, index)?;
        debug!(skill = name, index, version = %target.id, "resolved rollback target");
        Ok(Self {
            name: name.to_string(),
            target,
        })
    }

    fn apply(
        self,
        ledger: &VersionLedger,
        store: &SkillStore,
        now: NaiveDateTime,
    ) -> SkillResult<RollbackOutcome> {
        let auto_saved = ledger.save(store, &self.name, ROLLBACK_MESSAGE, now)?;

        if let Err(e) = store.write_current(&self.name, self.target.body()) {
            error!(
                skill = %self.name,
                auto_saved = %auto_saved.id,
                error = %e,
                "rollback failed after auto-save; the auto-save snapshot is kept"
            );
            return Err(e);
        }

        info!(skill = %self.name, version = %self.target.id, "rolled back");
        Ok(RollbackOutcome {
            restored: self.target,
            auto_saved,
        })
    }
}
