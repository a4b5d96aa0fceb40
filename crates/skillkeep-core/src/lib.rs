//! skillkeep Core Library
//!
//! This crate provides file-backed version history for skills: a primary
//! `SKILL.md` document plus unversioned auxiliary directories. Snapshots are
//! full copies stored as timestamped files, no version-control system needed.
//!
//! # Architecture
//!
//! - **Store**: one mutable current document per skill
//! - **Ledger**: append-only, per-skill list of immutable snapshots
//!
//! # Quick Start
//!
//! ```text
//! let repo = SkillRepo::open(Config::load()?);
//!
//! repo.create("my-skill", "Summarizes release notes")?;
//! repo.write_current("my-skill", &edited)?;
//! repo.save("my-skill", "add pitfalls table")?;
//!
//! for version in repo.history("my-skill")? {
//!     println!("{} {}", version.index, version.message);
//! }
//! ```
//!
//! # Modules
//!
//! - `repo`: Unified interface (main entry point)
//! - `store`: Current documents and skill scaffolding
//! - `ledger`: Snapshot history, rollback and diff
//! - `header`: Snapshot metadata header codec
//! - `frontmatter`: `SKILL.md` front matter
//! - `models`: Data structures for skills and snapshots
//! - `clock`: Timestamp source
//! - `config`: Application configuration
//! - `error`: Error types

pub mod clock;
pub mod config;
pub mod diff;
pub mod error;
pub mod frontmatter;
pub mod header;
pub mod ledger;
pub mod models;
mod persist;
pub mod repo;
pub mod store;

pub use clock::{Clock, SteppingClock, SystemClock};
pub use config::Config;
pub use error::{ErrorKind, SkillError, SkillResult};
pub use frontmatter::FrontMatter;
pub use header::{ParsedSnapshot, VersionHeader};
pub use ledger::VersionLedger;
pub use models::{RollbackOutcome, Skill, SkillSummary, Snapshot, SnapshotId, SnapshotSummary};
pub use repo::{SkillDetails, SkillRepo};
pub use store::{SkillStore, Skills};
