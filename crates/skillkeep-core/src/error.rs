//! Error handling
//!
//! Provides typed errors for skill and snapshot operations with descriptive
//! messages and recovery suggestions. Every error maps onto one coarse
//! [`ErrorKind`] so callers can report failures uniformly.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`SkillError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Skill or history absent
    NotFound,
    /// Create on an existing skill
    AlreadyExists,
    /// Relative index out of range
    InvalidIndex,
    /// Skill name cannot be used as a directory name
    InvalidName,
    /// Underlying read/write/enumerate failure
    IoFailure,
}

impl ErrorKind {
    /// Stable identifier used in machine-readable output
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::InvalidIndex => "invalid_index",
            ErrorKind::InvalidName => "invalid_name",
            ErrorKind::IoFailure => "io_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during skill and snapshot operations
#[derive(Error, Debug)]
pub enum SkillError {
    /// The skill has no current document
    #[error("Skill not found: '{name}'")]
    SkillNotFound { name: String },

    /// The skill has no snapshot history
    #[error("No version history for skill '{name}'")]
    NoHistory { name: String },

    /// A skill with this name already exists
    #[error("Skill already exists: '{name}'")]
    AlreadyExists { name: String },

    /// Relative index outside `1..=count`
    #[error("Invalid version number {index} ({count} version(s) available)")]
    InvalidIndex { index: i64, count: usize },

    /// Skill name is not a single plain path component
    #[error("Invalid skill name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Failed to create a directory
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error(
        "Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again."
    )]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read a file or enumerate a directory
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write a file
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SkillError {
    /// Create a read error, classifying permission problems
    pub fn read(error: io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match error.kind() {
            io::ErrorKind::PermissionDenied => SkillError::PermissionDenied {
                path,
                source: error,
            },
            _ => SkillError::Read {
                path,
                source: error,
            },
        }
    }

    /// Create an error from a failed write with path context
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_io(error: io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match error.kind() {
            io::ErrorKind::PermissionDenied => SkillError::PermissionDenied {
                path,
                source: error,
            },
            // StorageFull is not stable everywhere, so check the message too
            _ if is_disk_full_error(&error) => SkillError::DiskFull {
                path,
                source: error,
            },
            _ => SkillError::Write {
                path,
                source: error,
            },
        }
    }

    /// Coarse kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SkillError::SkillNotFound { .. } | SkillError::NoHistory { .. } => ErrorKind::NotFound,
            SkillError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            SkillError::InvalidIndex { .. } => ErrorKind::InvalidIndex,
            SkillError::InvalidName { .. } => ErrorKind::InvalidName,
            SkillError::CreateDirectory { .. }
            | SkillError::PermissionDenied { .. }
            | SkillError::DiskFull { .. }
            | SkillError::Read { .. }
            | SkillError::Write { .. } => ErrorKind::IoFailure,
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            SkillError::DiskFull { .. } => Some("Free up disk space and try again."),
            SkillError::PermissionDenied { .. } => {
                Some("Check file and directory permissions for the skills and versions directories.")
            }
            SkillError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            SkillError::NoHistory { .. } => {
                Some("Save a version first with `skillkeep save <name>`.")
            }
            SkillError::InvalidIndex { .. } => {
                Some("Run `skillkeep history <name>` to see available versions.")
            }
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for skill operations
pub type SkillResult<T> = Result<T, SkillError>;
