//! Unified skill interface
//!
//! `SkillRepo` coordinates the artifact store (current documents) and the
//! snapshot ledger (history), and owns the clock used to stamp snapshots.
//! Each method maps onto one CLI command.
//!
//! ## Usage
//!
//! ```ignore
//! let repo = SkillRepo::open(Config::load()?);
//!
//! repo.create("my-skill", "Does things")?;  // writes the first snapshot
//! repo.write_current("my-skill", "...")?;
//! repo.save("my-skill", "tweak steps")?;
//! repo.rollback("my-skill", 2)?;
//! ```

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::SkillResult;
use crate::ledger::{VersionLedger, INITIAL_MESSAGE};
use crate::models::{RollbackOutcome, Skill, Snapshot, SnapshotSummary};
use crate::store::{SkillStore, Skills};

/// Message used by `update` when none is given
pub const UPDATE_MESSAGE: &str = "saved before update";

/// Number of snapshots shown alongside a skill's document
pub const RECENT_VERSIONS: usize = 5;

/// A skill's current document with its most recent snapshots
#[derive(Debug, Clone)]
pub struct SkillDetails {
    /// Skill key
    pub name: String,
    /// Current document
    pub content: String,
    /// Up to `RECENT_VERSIONS` snapshots, most recent first
    pub recent: Vec<SnapshotSummary>,
    /// Total number of snapshots
    pub total_versions: usize,
}

/// Skill storage with version history
#[derive(Debug)]
pub struct SkillRepo<C: Clock = SystemClock> {
    store: SkillStore,
    ledger: VersionLedger,
    clock: C,
    config: Config,
}

impl SkillRepo<SystemClock> {
    /// Open the repository with a specific configuration
    pub fn open(config: Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> SkillRepo<C> {
    /// Open the repository with a custom timestamp source
    pub fn with_clock(config: Config, clock: C) -> Self {
        Self {
            store: SkillStore::new(config.clone()),
            ledger: VersionLedger::new(config.clone()),
            clock,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the artifact store
    pub fn store(&self) -> &SkillStore {
        &self.store
    }

    // ==================== Skill Operations ====================

    /// Enumerate skills with a readable `SKILL.md`
    pub fn list_skills(&self) -> SkillResult<Skills> {
        self.store.list_entities()
    }

    /// Create a skill and record its first snapshot
    pub fn create(&self, name: &str, description: &str) -> SkillResult<Skill> {
        let skill = self.store.create_entity(name, description)?;
        self.ledger
            .save(&self.store, name, INITIAL_MESSAGE, self.clock.now())?;
        Ok(skill)
    }

    /// Read the current document
    pub fn read_current(&self, name: &str) -> SkillResult<String> {
        self.store.read_current(name)
    }

    /// Overwrite the current document
    pub fn write_current(&self, name: &str, content: &str) -> SkillResult<()> {
        self.store.write_current(name, content)
    }

    /// Current document and recent history
    ///
    /// A skill without history is not an error here; `recent` is empty.
    pub fn show(&self, name: &str) -> SkillResult<SkillDetails> {
        let content = self.store.read_current(name)?;
        let total_versions = self.ledger.count(name)?;

        let recent = if total_versions == 0 {
            Vec::new()
        } else {
            let mut history = self.ledger.list(name)?;
            history.truncate(RECENT_VERSIONS);
            history
        };

        Ok(SkillDetails {
            name: name.to_string(),
            content,
            recent,
            total_versions,
        })
    }

    // ==================== Version Operations ====================

    /// Snapshot the current document
    pub fn save(&self, name: &str, message: &str) -> SkillResult<Snapshot> {
        self.ledger.save(&self.store, name, message, self.clock.now())
    }

    /// Snapshot before editing, with a default message
    pub fn update(&self, name: &str, message: &str) -> SkillResult<Snapshot> {
        let message = match message.trim() {
            "" => UPDATE_MESSAGE,
            m => m,
        };
        debug!(skill = name, "saving before update");
        self.save(name, message)
    }

    /// History, most recent first
    pub fn history(&self, name: &str) -> SkillResult<Vec<SnapshotSummary>> {
        self.ledger.list(name)
    }

    /// Number of snapshots, 0 when there is no history
    pub fn version_count(&self, name: &str) -> SkillResult<usize> {
        self.ledger.count(name)
    }

    /// Snapshot at relative `index`, 1 being the most recent
    pub fn get(&self, name: &str, index: i64) -> SkillResult<Snapshot> {
        self.ledger.get(name, index)
    }

    /// Restore the current document from the snapshot at `index`
    pub fn rollback(&self, name: &str, index: i64) -> SkillResult<RollbackOutcome> {
        self.ledger
            .rollback(&self.store, name, index, self.clock.now())
    }

    /// Unified diff between two snapshots, `index_a` being the new side
    pub fn diff(&self, name: &str, index_a: i64, index_b: i64) -> SkillResult<String> {
        self.ledger.diff(name, index_a, index_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SteppingClock;
    use crate::error::{ErrorKind, SkillError};
    use crate::ledger::ROLLBACK_MESSAGE;
    use crate::store::render_template;
    use chrono::{Duration, NaiveDate};
    use tempfile::TempDir;

    fn test_repo(temp_dir: &TempDir) -> SkillRepo<SteppingClock> {
        let start = NaiveDate::from_ymd_opt(2024, 12, 8)
            .and_then(|d| d.and_hms_opt(14, 12, 34))
            .unwrap();
        SkillRepo::with_clock(
            Config::with_root(temp_dir.path()),
            SteppingClock::starting_at(start),
        )
    }

    #[test]
    fn test_create_takes_initial_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let repo = test_repo(&temp_dir);

        repo.create("foo", "").unwrap();

        assert_eq!(repo.read_current("foo").unwrap(), render_template("foo", ""));
        let history = repo.history("foo").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message, INITIAL_MESSAGE);
        assert_eq!(history[0].id.to_string(), "20241208_141234");
    }

    #[test]
    fn test_create_existing_fails_without_new_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let repo = test_repo(&temp_dir);
        repo.create("foo", "").unwrap();

        let err = repo.create("foo", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(repo.version_count("foo").unwrap(), 1);
    }

    #[test]
    fn test_lifecycle_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let repo = test_repo(&temp_dir);
        let template = render_template("foo", "");

        repo.create("foo", "").unwrap();
        assert_eq!(repo.history("foo").unwrap().len(), 1);

        repo.write_current("foo", "v2").unwrap();
        repo.save("foo", "edit one").unwrap();
        let history = repo.history("foo").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].message, "edit one");

        let outcome = repo.rollback("foo", 2).unwrap();
        assert_eq!(outcome.restored.message(), INITIAL_MESSAGE);
        assert_eq!(repo.read_current("foo").unwrap(), template);

        let history = repo.history("foo").unwrap();
        let messages: Vec<_> = history.iter().map(|s| s.message.as_str()).collect();
        assert_eq!(messages, vec![ROLLBACK_MESSAGE, "edit one", INITIAL_MESSAGE]);

        // The auto-save preserved the pre-rollback document
        assert_eq!(repo.get("foo", 1).unwrap().body(), "v2");
    }

    #[test]
    fn test_save_then_get_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repo = test_repo(&temp_dir);
        repo.create("foo", "").unwrap();

        let doc = "---\nname: foo\n---\n\nnew body without trailing newline";
        repo.write_current("foo", doc).unwrap();
        repo.save("foo", "").unwrap();

        assert_eq!(repo.get("foo", 1).unwrap().body(), doc);
    }

    #[test]
    fn test_rollback_round_trip_every_index() {
        let temp_dir = TempDir::new().unwrap();
        let repo = test_repo(&temp_dir);
        repo.create("foo", "").unwrap();
        for i in 0..3 {
            repo.write_current("foo", &format!("revision {}\n", i)).unwrap();
            repo.save("foo", &format!("rev {}", i)).unwrap();
        }

        for index in 1..=4 {
            let target = repo.get("foo", index).unwrap();
            let outcome = repo.rollback("foo", index).unwrap();

            assert_eq!(outcome.restored, target);
            assert_eq!(repo.read_current("foo").unwrap(), target.body());
        }
    }

    #[test]
    fn test_rollback_single_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let repo = test_repo(&temp_dir);
        repo.create("foo", "").unwrap();
        repo.write_current("foo", "scribbles").unwrap();

        repo.rollback("foo", 1).unwrap();

        assert_eq!(repo.read_current("foo").unwrap(), render_template("foo", ""));
        assert_eq!(repo.version_count("foo").unwrap(), 2);
    }

    #[test]
    fn test_get_out_of_range() {
        let temp_dir = TempDir::new().unwrap();
        let repo = test_repo(&temp_dir);
        repo.create("foo", "").unwrap();
        repo.save("foo", "second").unwrap();

        assert_eq!(repo.version_count("foo").unwrap(), 2);
        assert_eq!(repo.get("foo", 0).unwrap_err().kind(), ErrorKind::InvalidIndex);
        assert_eq!(repo.get("foo", -1).unwrap_err().kind(), ErrorKind::InvalidIndex);
        assert_eq!(repo.get("foo", 3).unwrap_err().kind(), ErrorKind::InvalidIndex);
    }

    #[test]
    fn test_history_of_unknown_skill() {
        let temp_dir = TempDir::new().unwrap();
        let repo = test_repo(&temp_dir);

        let err = repo.history("nope").unwrap_err();
        assert!(matches!(err, SkillError::NoHistory { .. }));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_update_default_message() {
        let temp_dir = TempDir::new().unwrap();
        let repo = test_repo(&temp_dir);
        repo.create("foo", "").unwrap();

        assert_eq!(repo.update("foo", "").unwrap().message(), UPDATE_MESSAGE);
        assert_eq!(repo.update("foo", "custom").unwrap().message(), "custom");
    }

    #[test]
    fn test_show_limits_recent_versions() {
        let temp_dir = TempDir::new().unwrap();
        let repo = test_repo(&temp_dir);
        repo.create("foo", "").unwrap();
        for i in 0..6 {
            repo.save("foo", &format!("save {}", i)).unwrap();
        }

        let details = repo.show("foo").unwrap();
        assert_eq!(details.total_versions, 7);
        assert_eq!(details.recent.len(), RECENT_VERSIONS);
        assert_eq!(details.recent[0].message, "save 5");
    }

    #[test]
    fn test_show_without_history() {
        let temp_dir = TempDir::new().unwrap();
        let repo = test_repo(&temp_dir);
        repo.store().create_entity("bare", "").unwrap();

        let details = repo.show("bare").unwrap();
        assert_eq!(details.total_versions, 0);
        assert!(details.recent.is_empty());
    }

    #[test]
    fn test_same_second_collision_is_tolerated() {
        let temp_dir = TempDir::new().unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 12, 8)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let repo = SkillRepo::with_clock(
            Config::with_root(temp_dir.path()),
            SteppingClock::new(start, Duration::zero()),
        );

        repo.create("foo", "").unwrap();
        repo.save("foo", "same second").unwrap();

        let history = repo.history("foo").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message, "same second");
    }

    #[test]
    fn test_list_skills() {
        let temp_dir = TempDir::new().unwrap();
        let repo = test_repo(&temp_dir);
        repo.create("alpha", "A").unwrap();
        repo.create("beta", "B").unwrap();

        let mut names: Vec<_> = repo.list_skills().unwrap().map(|s| s.key).collect();
        names.sort();
        assert_eq!(names, vec!["alpha", "beta"]);
    }
}
