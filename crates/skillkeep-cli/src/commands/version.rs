//! Version command handlers

use anyhow::{Context, Result};

use skillkeep_core::{Clock, SkillRepo};

use crate::editor;
use crate::output::Output;

/// Show version history
pub fn history(repo: &SkillRepo<impl Clock>, name: String, output: &Output) -> Result<()> {
    let history = repo.history(&name)?;
    output.print_history(&name, &history);
    Ok(())
}

/// Save the current document as a new version
pub fn save(
    repo: &SkillRepo<impl Clock>,
    name: String,
    message: Option<String>,
    output: &Output,
) -> Result<()> {
    let snapshot = repo.save(&name, message.as_deref().unwrap_or(""))?;
    output.print_saved(&snapshot);
    Ok(())
}

/// Roll back to a version (1 = most recent)
pub fn rollback(
    repo: &SkillRepo<impl Clock>,
    name: String,
    index: i64,
    output: &Output,
) -> Result<()> {
    let outcome = repo.rollback(&name, index)?;
    output.print_rollback(&outcome);
    Ok(())
}

/// Diff two versions, `v1` being the newer side
pub fn diff(
    repo: &SkillRepo<impl Clock>,
    name: String,
    v1: i64,
    v2: i64,
    output: &Output,
) -> Result<()> {
    let diff = repo.diff(&name, v1, v2)?;
    output.print_diff(&name, v1, v2, &diff);
    Ok(())
}

/// Save a version before editing, optionally opening the editor
pub fn update(
    repo: &SkillRepo<impl Clock>,
    name: String,
    message: Option<String>,
    edit: bool,
    output: &Output,
) -> Result<()> {
    let snapshot = repo.update(&name, message.as_deref().unwrap_or(""))?;
    output.print_saved(&snapshot);

    let path = repo.config().skill_file(&name);
    if !edit {
        output.message(&format!("Safe to edit: {}", path.display()));
        return Ok(());
    }

    let current = repo.read_current(&name)?;
    let edited = editor::edit_text(&name, &current).context("Failed to edit skill")?;

    if edited == current {
        output.message("No changes made.");
        return Ok(());
    }

    repo.write_current(&name, &edited)?;
    output.success(&format!("Updated {}", path.display()));
    Ok(())
}
