//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use skillkeep_core::{
    RollbackOutcome, SkillDetails, SkillError, SkillSummary, Snapshot, SnapshotSummary,
};

/// Format used for history timestamps
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// A skill in a listing, with its version count when verbose
pub struct ListedSkill {
    pub summary: SkillSummary,
    pub versions: Option<usize>,
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the skills listing
    pub fn print_skills(&self, skills: &[ListedSkill], skills_dir: &std::path::Path) {
        match self.format {
            OutputFormat::Human => {
                println!("Skills in {}", skills_dir.display());
                println!("{}", "-".repeat(50));
                if skills.is_empty() {
                    println!("  (none)");
                    return;
                }
                for (i, skill) in skills.iter().enumerate() {
                    let summary = &skill.summary;
                    if summary.name == summary.key {
                        println!("  {}. {}", i + 1, summary.key);
                    } else {
                        println!("  {}. {} ({})", i + 1, summary.key, summary.name);
                    }
                    println!("     {}", truncate(&skill.summary.description, 70));
                    if let Some(count) = skill.versions {
                        println!("     versions: {}", count);
                    }
                }
                println!("\n{} skill(s)", skills.len());
            }
            OutputFormat::Json => {
                let json: Vec<_> = skills
                    .iter()
                    .map(|s| {
                        let mut value = serde_json::json!({
                            "key": s.summary.key,
                            "name": s.summary.name,
                            "description": s.summary.description,
                            "path": s.summary.path,
                        });
                        if let Some(count) = s.versions {
                            value["versions"] = count.into();
                        }
                        value
                    })
                    .collect();
                print_json(&json);
            }
            OutputFormat::Quiet => {
                for skill in skills {
                    println!("{}", skill.summary.key);
                }
            }
        }
    }

    /// Print a skill's document and recent versions
    pub fn print_details(&self, details: &SkillDetails) {
        match self.format {
            OutputFormat::Human => {
                println!("Skill: {}", details.name);
                println!("{}", "=".repeat(50));
                println!("{}", details.content);

                if !details.recent.is_empty() {
                    println!();
                    println!("── Versions ({}) ──", details.total_versions);
                    for version in &details.recent {
                        println!("  {}. {}", version.index, version.id);
                    }
                    let hidden = details.total_versions.saturating_sub(details.recent.len());
                    if hidden > 0 {
                        println!("  ... {} more", hidden);
                    }
                }
            }
            OutputFormat::Json => {
                print_json(&serde_json::json!({
                    "name": details.name,
                    "content": details.content,
                    "total_versions": details.total_versions,
                    "recent": details.recent,
                }));
            }
            OutputFormat::Quiet => {
                print!("{}", details.content);
            }
        }
    }

    /// Print a skill's history
    pub fn print_history(&self, name: &str, history: &[SnapshotSummary]) {
        match self.format {
            OutputFormat::Human => {
                println!("Version history: {}", name);
                println!("{}", "-".repeat(50));
                for version in history {
                    let marker = if version.index == 1 { "→ " } else { "  " };
                    println!(
                        "{}{}. {}",
                        marker,
                        version.index,
                        version.timestamp().format(TIME_FORMAT)
                    );
                    if !version.message.is_empty() {
                        println!("     {}", version.message);
                    }
                }
            }
            OutputFormat::Json => print_json(&history),
            OutputFormat::Quiet => {
                for version in history {
                    println!("{}", version.id);
                }
            }
        }
    }

    /// Print a freshly written snapshot
    pub fn print_saved(&self, snapshot: &Snapshot) {
        let message = snapshot.message();
        match self.format {
            OutputFormat::Human => {
                println!("✓ Saved version {}", snapshot.id);
                println!(
                    "  Message: {}",
                    if message.is_empty() { "(none)" } else { message.as_str() }
                );
            }
            OutputFormat::Json => print_json(&snapshot_json(snapshot)),
            OutputFormat::Quiet => println!("{}", snapshot.id),
        }
    }

    /// Print the result of a rollback
    pub fn print_rollback(&self, outcome: &RollbackOutcome) {
        match self.format {
            OutputFormat::Human => {
                println!("✓ Rolled back to {}", outcome.restored.id);
                println!("  Previous state saved as {}", outcome.auto_saved.id);
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "restored": snapshot_json(&outcome.restored),
                "auto_saved": snapshot_json(&outcome.auto_saved),
            })),
            OutputFormat::Quiet => println!("{}", outcome.restored.id),
        }
    }

    /// Print a diff between two versions
    pub fn print_diff(&self, name: &str, new: i64, old: i64, diff: &str) {
        match self.format {
            OutputFormat::Human => {
                println!("Diff {}: version {} vs version {}", name, new, old);
                println!("{}", "-".repeat(50));
                if diff.is_empty() {
                    println!("(no differences)");
                } else {
                    print!("{}", diff);
                }
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "name": name,
                "new": new,
                "old": old,
                "diff": diff,
            })),
            OutputFormat::Quiet => print!("{}", diff),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Report a failed command on stderr
    ///
    /// Errors are printed even in quiet mode.
    pub fn error(&self, error: &anyhow::Error) {
        let skill_error = error.downcast_ref::<SkillError>();
        let kind = skill_error.map(SkillError::kind);

        match self.format {
            OutputFormat::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "status": "error",
                        "kind": kind.map(|k| k.as_str()),
                        "message": format!("{:#}", error),
                    })
                );
            }
            OutputFormat::Human | OutputFormat::Quiet => {
                eprintln!("✗ {:#}", error);
                if let Some(hint) = skill_error.and_then(SkillError::recovery_suggestion) {
                    if self.format == OutputFormat::Human {
                        eprintln!("  {}", hint);
                    }
                }
            }
        }
    }
}

fn snapshot_json(snapshot: &Snapshot) -> serde_json::Value {
    serde_json::json!({
        "id": snapshot.id,
        "message": snapshot.message(),
        "path": snapshot.path,
    })
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("描述描述描述描述描述描述", 5), "描述...");
    }

    #[test]
    fn test_snapshot_json() {
        let id = skillkeep_core::SnapshotId::parse("20250102_030405").unwrap();
        let snapshot = Snapshot {
            id,
            path: "/v/foo/20250102_030405.md".into(),
            content: skillkeep_core::VersionHeader::new(id.to_string(), "msg").encode("body"),
        };

        let json = snapshot_json(&snapshot);
        assert_eq!(json["id"], "20250102_030405");
        assert_eq!(json["message"], "msg");
    }
}
