//! Front matter of a skill document
//!
//! `SKILL.md` may start with a `---`-delimited block of `key: value` lines.
//! Only flat keys are read; nested YAML structures are ignored.

use std::collections::BTreeMap;

const DELIMITER: &str = "---";

/// Flat key/value pairs read from the leading `---` block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: BTreeMap<String, String>,
}

impl FrontMatter {
    /// Parse the leading block of `content`
    ///
    /// Returns an empty set of fields when there is no block or it is never
    /// closed. The first occurrence of a key wins.
    pub fn parse(content: &str) -> Self {
        let mut lines = content.lines();
        let mut fields = BTreeMap::new();

        if lines.next().map(str::trim_end) != Some(DELIMITER) {
            return Self::default();
        }

        for line in lines {
            if line.trim_end() == DELIMITER {
                return Self { fields };
            }

            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim();
                if key.is_empty() || key.starts_with('#') {
                    continue;
                }
                fields
                    .entry(key.to_string())
                    .or_insert_with(|| unquote(value.trim()).to_string());
            }
        }

        Self::default()
    }

    /// Value of `key`, if present and non-empty
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The `name` field
    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    /// The `description` field
    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    /// True when no fields were read
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
