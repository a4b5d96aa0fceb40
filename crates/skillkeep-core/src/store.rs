//! Artifact store
//!
//! The `SkillStore` owns the skills directory. Each skill is a directory
//! holding the current document (`SKILL.md`) and two auxiliary directories
//! (`scripts/`, `references/`) that are never versioned:
//!
//! ```text
//! <skills_dir>/
//!   my-skill/
//!     SKILL.md
//!     scripts/
//!     references/
//! ```

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::config::{Config, AUX_DIRS, SKILL_FILE};
use crate::error::{SkillError, SkillResult};
use crate::frontmatter::FrontMatter;
use crate::models::{Skill, SkillSummary};
use crate::persist::{atomic_write, create_dir_all, read_optional};

/// Description written into new skills when none is given
pub const DEFAULT_DESCRIPTION: &str = "TODO: describe this skill";

/// Description reported for skills whose front matter has none
pub const MISSING_DESCRIPTION: &str = "No description";

/// Storage for current skill documents
#[derive(Debug, Clone)]
pub struct SkillStore {
    config: Config,
}

impl SkillStore {
    /// Create a store over the configured skills directory
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create the on-disk scaffold for a new skill
    ///
    /// Writes `SKILL.md` from the template and creates the auxiliary
    /// directories. Does not take a snapshot; `SkillRepo::create` does that.
    pub fn create_entity(&self, name: &str, description: &str) -> SkillResult<Skill> {
        validate_name(name)?;
        let dir = self.config.skill_dir(name);

        if dir.exists() {
            return Err(SkillError::AlreadyExists {
                name: name.to_string(),
            });
        }

        create_dir_all(&dir)?;
        for aux in AUX_DIRS {
            create_dir_all(&dir.join(aux))?;
        }
        atomic_write(
            &dir.join(SKILL_FILE),
            render_template(name, description).as_bytes(),
        )?;

        debug!(skill = name, path = ?dir, "created skill scaffold");
        Ok(Skill {
            name: name.to_string(),
            path: dir,
        })
    }

    /// Read the current document
    pub fn read_current(&self, name: &str) -> SkillResult<String> {
        validate_name(name)?;
        read_optional(&self.config.skill_file(name))?.ok_or_else(|| SkillError::SkillNotFound {
            name: name.to_string(),
        })
    }

    /// Overwrite the current document
    ///
    /// The skill directory must already exist; the content is not validated.
    pub fn write_current(&self, name: &str, content: &str) -> SkillResult<()> {
        validate_name(name)?;
        if !self.config.skill_dir(name).is_dir() {
            return Err(SkillError::SkillNotFound {
                name: name.to_string(),
            });
        }

        atomic_write(&self.config.skill_file(name), content.as_bytes())?;
        debug!(skill = name, bytes = content.len(), "wrote current document");
        Ok(())
    }

    /// Enumerate skills with a readable current document
    ///
    /// Each call starts a fresh enumeration. A missing skills directory
    /// yields nothing.
    pub fn list_entities(&self) -> SkillResult<Skills> {
        let root = &self.config.skills_dir;
        let entries = match fs::read_dir(root) {
            Ok(entries) => Some(entries),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(SkillError::read(e, root)),
        };

        Ok(Skills { entries })
    }
}

/// Lazy iterator over the skills directory
#[derive(Debug)]
pub struct Skills {
    entries: Option<fs::ReadDir>,
}

impl Iterator for Skills {
    type Item = SkillSummary;

    fn next(&mut self) -> Option<Self::Item> {
        let entries = self.entries.as_mut()?;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            if let Some(summary) = summarize(entry.path()) {
                return Some(summary);
            }
        }

        None
    }
}

/// Build a summary for a skill directory, or `None` to skip it
fn summarize(dir: PathBuf) -> Option<SkillSummary> {
    let key = dir.file_name()?.to_str()?.to_string();
    if key.starts_with('.') || !dir.is_dir() {
        return None;
    }

    let content = match fs::read_to_string(dir.join(SKILL_FILE)) {
        Ok(content) => content,
        Err(e) => {
            debug!(skill = %key, error = %e, "skipping directory without readable SKILL.md");
            return None;
        }
    };

    let front_matter = FrontMatter::parse(&content);
    let name = front_matter.name().unwrap_or(&key).to_string();
    let description = front_matter
        .description()
        .unwrap_or(MISSING_DESCRIPTION)
        .to_string();

    Some(SkillSummary {
        key,
        name,
        description,
        path: dir,
    })
}

/// Check that a skill name is a single plain path component
pub fn validate_name(name: &str) -> SkillResult<()> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name.contains(['/', '\\']) {
        Some("name must not contain path separators")
    } else if name.starts_with('.') {
        Some("name must not start with '.'")
    } else if name.contains('\0') {
        Some("name must not contain NUL")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SkillError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Render the initial `SKILL.md` for a new skill
pub fn render_template(name: &str, description: &str) -> String {
    let description = match description.trim() {
        "" => DEFAULT_DESCRIPTION,
        d => d,
    };

    format!(
        "---
name: {name}
description: {description}
---

# {name}

## When to use
- The user says \"...\"

## Steps
1. Step one
2. Step two

## Boundaries
- Use when: ...
- Do not use when: ...

## Pitfalls
| Pitfall | Symptom | Remedy |
|---------|---------|--------|
| - | - | - |

## Constraints
- Must: ...
- Must not: ...
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> SkillStore {
        SkillStore::new(Config::with_root(temp_dir.path()))
    }

    #[test]
    fn test_create_entity_scaffold() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let skill = store.create_entity("foo", "Does foo things").unwrap();

        assert_eq!(skill.name, "foo");
        assert!(skill.path.join("scripts").is_dir());
        assert!(skill.path.join("references").is_dir());
        assert_eq!(
            store.read_current("foo").unwrap(),
            render_template("foo", "Does foo things")
        );
    }

    #[test]
    fn test_create_entity_already_exists() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        store.create_entity("foo", "").unwrap();
        let err = store.create_entity("foo", "again").unwrap_err();

        assert!(matches!(err, SkillError::AlreadyExists { .. }));
    }

    #[test]
    fn test_template_substitution() {
        let content = render_template("foo", "");

        assert!(content.starts_with("---\nname: foo\n"));
        assert!(content.contains(&format!("description: {}", DEFAULT_DESCRIPTION)));
        assert!(content.contains("# foo\n"));
    }

    #[test]
    fn test_read_current_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let err = store.read_current("missing").unwrap_err();
        assert!(matches!(err, SkillError::SkillNotFound { .. }));
    }

    #[test]
    fn test_write_current_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        store.create_entity("foo", "").unwrap();

        store.write_current("foo", "v2").unwrap();
        assert_eq!(store.read_current("foo").unwrap(), "v2");
    }

    #[test]
    fn test_write_current_requires_skill() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let err = store.write_current("ghost", "boo").unwrap_err();
        assert!(matches!(err, SkillError::SkillNotFound { .. }));
    }

    #[test]
    fn test_list_entities() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        let skills_dir = store.config().skills_dir.clone();

        store.create_entity("alpha", "First").unwrap();
        store.create_entity("beta", "").unwrap();
        store.write_current("beta", "no front matter").unwrap();

        // Skipped: hidden, no SKILL.md, plain file
        fs::create_dir_all(skills_dir.join(".hidden")).unwrap();
        fs::write(skills_dir.join(".hidden").join(SKILL_FILE), "---\n---\n").unwrap();
        fs::create_dir_all(skills_dir.join("empty")).unwrap();
        fs::write(skills_dir.join("README.md"), "not a skill").unwrap();

        let mut skills: Vec<_> = store.list_entities().unwrap().collect();
        skills.sort_by(|a, b| a.key.cmp(&b.key));

        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].key, "alpha");
        assert_eq!(skills[0].name, "alpha");
        assert_eq!(skills[0].description, "First");
        assert_eq!(skills[1].key, "beta");
        assert_eq!(skills[1].name, "beta");
        assert_eq!(skills[1].description, MISSING_DESCRIPTION);
    }

    #[test]
    fn test_list_entities_uses_front_matter_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        store.create_entity("pdf-tools", "").unwrap();
        store
            .write_current(
                "pdf-tools",
                "---\nname: PDF Tools\ndescription: Work with PDFs\n---\n\n# PDF\n",
            )
            .unwrap();

        let skills: Vec<_> = store.list_entities().unwrap().collect();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].key, "pdf-tools");
        assert_eq!(skills[0].name, "PDF Tools");
        assert_eq!(skills[0].description, "Work with PDFs");
    }

    #[test]
    fn test_list_entities_restartable() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        store.create_entity("alpha", "").unwrap();

        assert_eq!(store.list_entities().unwrap().count(), 1);
        assert_eq!(store.list_entities().unwrap().count(), 1);
    }

    #[test]
    fn test_list_entities_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        assert_eq!(store.list_entities().unwrap().count(), 0);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("my-skill").is_ok());
        assert!(validate_name("skill_2").is_ok());

        for bad in ["", "  ", "a/b", "a\\b", ".", "..", ".hidden"] {
            let err = validate_name(bad).unwrap_err();
            assert!(
                matches!(err, SkillError::InvalidName { .. }),
                "expected InvalidName for {:?}",
                bad
            );
        }
    }
}
