//! Data models for skillkeep
//!
//! Defines skills, snapshot identifiers and snapshots.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::header::{ParsedSnapshot, VersionHeader};

/// Format of snapshot identifiers and file stems
pub const SNAPSHOT_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Identity of a snapshot: its creation time at second resolution
///
/// Rendered as `YYYYMMDD_HHMMSS`, which sorts the same way as the
/// underlying time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId(NaiveDateTime);

impl SnapshotId {
    /// Create an identifier for the given instant
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// Parse a file stem such as `20241208_141234`
    pub fn parse(stem: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(stem, SNAPSHOT_ID_FORMAT)
            .ok()
            .map(Self)
    }

    /// Creation time
    pub fn timestamp(&self) -> NaiveDateTime {
        self.0
    }

    /// File name used to store this snapshot
    pub fn file_name(&self) -> String {
        format!("{}.{}", self, crate::config::SNAPSHOT_EXTENSION)
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(SNAPSHOT_ID_FORMAT))
    }
}

impl Serialize for SnapshotId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A skill as created on disk
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Skill {
    /// Unique key, also the directory name
    pub name: String,
    /// Skill directory
    pub path: PathBuf,
}

/// A skill as seen when listing the skills directory
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkillSummary {
    /// Unique key, also the directory name
    pub key: String,
    /// Display name from the front matter, falling back to the key
    pub name: String,
    /// Description from the front matter, or a placeholder
    pub description: String,
    /// Skill directory
    pub path: PathBuf,
}

/// An immutable stored copy of a skill document
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Identity and creation time
    pub id: SnapshotId,
    /// Where the snapshot is stored
    pub path: PathBuf,
    /// Stored text including the metadata header
    pub content: String,
}

impl Snapshot {
    /// Header and body of the stored text
    pub fn parsed(&self) -> ParsedSnapshot<'_> {
        VersionHeader::parse(&self.content)
    }

    /// The document as it was when the snapshot was taken
    pub fn body(&self) -> &str {
        self.parsed().body
    }

    /// Message recorded with the snapshot, empty if none
    pub fn message(&self) -> String {
        self.parsed().message().to_string()
    }

    /// Creation time
    pub fn timestamp(&self) -> NaiveDateTime {
        self.id.timestamp()
    }
}

/// One line of a skill's history
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SnapshotSummary {
    /// 1-based position, 1 being the most recent
    pub index: usize,
    /// Snapshot identity
    pub id: SnapshotId,
    /// Message recorded with the snapshot
    pub message: String,
}

impl SnapshotSummary {
    /// Creation time
    pub fn timestamp(&self) -> NaiveDateTime {
        self.id.timestamp()
    }
}

/// Result of a rollback
#[derive(Debug, Clone)]
pub struct RollbackOutcome {
    /// The snapshot whose body became the current document
    pub restored: Snapshot,
    /// Snapshot of the document as it was before the rollback
    pub auto_saved: Snapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_snapshot_id_format() {
        let at = NaiveDate::from_ymd_opt(2024, 12, 8)
            .and_then(|d| d.and_hms_opt(14, 12, 34))
            .unwrap();
        let id = SnapshotId::new(at);

        assert_eq!(id.to_string(), "20241208_141234");
        assert_eq!(id.file_name(), "20241208_141234.md");
        assert_eq!(SnapshotId::parse("20241208_141234"), Some(id));
    }

    #[test]
    fn test_snapshot_id_rejects_garbage() {
        assert_eq!(SnapshotId::parse("notes"), None);
        assert_eq!(SnapshotId::parse("20241308_141234"), None);
        assert_eq!(SnapshotId::parse(""), None);
    }

    #[test]
    fn test_snapshot_id_order_matches_text() {
        let a = SnapshotId::parse("20241208_235959").unwrap();
        let b = SnapshotId::parse("20241209_000000").unwrap();

        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn test_snapshot_id_serializes_as_string() {
        let id = SnapshotId::parse("20250102_030405").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"20250102_030405\"");
    }

    #[test]
    fn test_snapshot_accessors() {
        let id = SnapshotId::parse("20250102_030405").unwrap();
        let content = VersionHeader::new(id.to_string(), "tweak").encode("# doc\n");
        let snapshot = Snapshot {
            id,
            path: PathBuf::from("/v/foo/20250102_030405.md"),
            content,
        };

        assert_eq!(snapshot.body(), "# doc\n");
        assert_eq!(snapshot.message(), "tweak");
        assert_eq!(snapshot.timestamp(), id.timestamp());
    }
}
