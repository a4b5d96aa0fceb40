//! Line-oriented unified diff

use similar::{DiffTag, TextDiff};

/// Lines of context around each hunk
const CONTEXT_RADIUS: usize = 3;

/// Generate a unified diff from `old` to `new`
///
/// Returns an empty string when the texts are identical.
pub fn unified_diff(old: &str, new: &str, old_label: &str, new_label: &str) -> String {
    let diff = TextDiff::from_lines(old, new);

    if diff.ops().iter().all(|op| op.tag() == DiffTag::Equal) {
        return String::new();
    }

    let mut unified = diff.unified_diff();
    unified
        .context_radius(CONTEXT_RADIUS)
        .header(old_label, new_label);
    unified.to_string()
}
