//! Skill command handlers

use anyhow::Result;

use skillkeep_core::{Clock, SkillRepo};

use crate::output::{ListedSkill, Output};

/// List all skills, sorted by name
pub fn list(repo: &SkillRepo<impl Clock>, verbose: bool, output: &Output) -> Result<()> {
    let mut skills = Vec::new();
    for summary in repo.list_skills()? {
        let versions = if verbose {
            Some(repo.version_count(&summary.key)?)
        } else {
            None
        };
        skills.push(ListedSkill { summary, versions });
    }
    skills.sort_by(|a, b| a.summary.key.cmp(&b.summary.key));

    output.print_skills(&skills, &repo.config().skills_dir);
    Ok(())
}

/// Show a skill's document and recent versions
pub fn show(repo: &SkillRepo<impl Clock>, name: String, output: &Output) -> Result<()> {
    let details = repo.show(&name)?;
    output.print_details(&details);
    Ok(())
}

/// Create a new skill and record its first version
pub fn create(
    repo: &SkillRepo<impl Clock>,
    name: String,
    description: String,
    output: &Output,
) -> Result<()> {
    let skill = repo.create(&name, &description)?;

    output.success(&format!(
        "Created skill '{}' at {}",
        skill.name,
        skill.path.display()
    ));
    output.message("  SKILL.md\n  scripts/\n  references/");
    Ok(())
}
