//! Code-fence stripping.
//!
//! Models wrap code in markdown fences even when told not to. This is a
//! heuristic text transform, not a markdown parser: every opener naming one
//! of the expected tags and every bare closer is removed wherever it occurs,
//! then the result is trimmed.
//!
//! The transform is lossy. A fence that appears inside the generated code
//! itself (say, an example in a comment) is removed as well.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::artifact::ArtifactKind;

static MARKUP_FENCE: Lazy<Regex> = Lazy::new(|| fence_pattern(ArtifactKind::Markup.fence_tags()));
static STYLING_FENCE: Lazy<Regex> = Lazy::new(|| fence_pattern(ArtifactKind::Styling.fence_tags()));
static BEHAVIOR_FENCE: Lazy<Regex> =
    Lazy::new(|| fence_pattern(ArtifactKind::Behavior.fence_tags()));

/// Build `` ```(?:tag1|tag2)?\n? ``. Tags match case-sensitively.
fn fence_pattern(tags: &[&str]) -> Regex {
    let pattern = if tags.is_empty() {
        "```\n?".to_string()
    } else {
        let alternatives = tags
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        format!("```(?:{})?\n?", alternatives)
    };
    Regex::new(&pattern).expect("escaped fence pattern is a valid regex")
}

/// Strip fences for the given language tags, then trim.
///
/// Stripping already-clean text returns it unchanged.
pub fn strip_code_fences(text: &str, tags: &[&str]) -> String {
    fence_pattern(tags).replace_all(text, "").trim().to_string()
}

/// Clean a stage's raw output according to its kind.
///
/// Specification text is only trimmed; code artifacts lose their fences.
pub fn clean_output(kind: ArtifactKind, raw: &str) -> String {
    let pattern: &Regex = match kind {
        ArtifactKind::Specification => return raw.trim().to_string(),
        ArtifactKind::Markup => &*MARKUP_FENCE,
        ArtifactKind::Styling => &*STYLING_FENCE,
        ArtifactKind::Behavior => &*BEHAVIOR_FENCE,
    };
    pattern.replace_all(raw, "").trim().to_string()
}
