//! Generation data model.
//!
//! Requests and results are created per stage and dropped once consumed.
//! Only the final [`CodeBundle`] outlives a run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fence::clean_output;

/// What a single stage produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Stage 1: free-text feature/design notes
    Specification = 0,
    /// Stage 2: HTML document
    Markup = 1,
    /// Stage 3: stylesheet
    Styling = 2,
    /// Stage 4: standalone script
    Behavior = 3,
}

/// The three code artifacts, in stage order.
pub const CODE_KINDS: [ArtifactKind; 3] = [
    ArtifactKind::Markup,
    ArtifactKind::Styling,
    ArtifactKind::Behavior,
];

impl ArtifactKind {
    /// Stage name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Specification => "specification",
            ArtifactKind::Markup => "markup",
            ArtifactKind::Styling => "styling",
            ArtifactKind::Behavior => "behavior",
        }
    }

    /// Language tags a model puts after a fence opener for this kind.
    ///
    /// Longer tags come first so `javascript` is not left as `avascript`.
    pub fn fence_tags(&self) -> &'static [&'static str] {
        match self {
            ArtifactKind::Specification => &[],
            ArtifactKind::Markup => &["html"],
            ArtifactKind::Styling => &["css"],
            ArtifactKind::Behavior => &["javascript", "js"],
        }
    }

    /// File name used when exporting this artifact.
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Specification => "specification.md",
            ArtifactKind::Markup => "index.html",
            ArtifactKind::Styling => "style.css",
            ArtifactKind::Behavior => "script.js",
        }
    }

    /// Whether this kind is one of the three code artifacts.
    pub fn is_code(&self) -> bool {
        !matches!(self, ArtifactKind::Specification)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input for one stage.
///
/// Fields are private so a request cannot be altered after construction, and
/// a code request cannot exist without the specification text it embeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    description: String,
    specification: Option<String>,
    kind: ArtifactKind,
}

impl GenerationRequest {
    /// Request for the structure stage.
    pub fn specification(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            specification: None,
            kind: ArtifactKind::Specification,
        }
    }

    /// Request for one of the code stages.
    ///
    /// # Panics
    ///
    /// Debug builds assert that `kind` is a code artifact.
    pub fn artifact(
        kind: ArtifactKind,
        description: impl Into<String>,
        specification: impl Into<String>,
    ) -> Self {
        debug_assert!(kind.is_code(), "artifact request needs a code kind");
        Self {
            description: description.into(),
            specification: Some(specification.into()),
            kind,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn specification_text(&self) -> Option<&str> {
        self.specification.as_deref()
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }
}

/// Output of one stage, before and after cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub kind: ArtifactKind,
    pub raw_text: String,
    pub cleaned_text: String,
}

impl GenerationResult {
    /// Build a result, cleaning `raw_text` according to `kind`.
    pub fn new(kind: ArtifactKind, raw_text: String) -> Self {
        let cleaned_text = clean_output(kind, &raw_text);
        Self {
            kind,
            raw_text,
            cleaned_text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cleaned_text.is_empty()
    }
}

/// The cleaned markup, styling and behavior of one successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBundle {
    markup: String,
    styling: String,
    behavior: String,
}

impl CodeBundle {
    /// Bundle three already-cleaned texts.
    pub fn new(markup: String, styling: String, behavior: String) -> Self {
        Self {
            markup,
            styling,
            behavior,
        }
    }

    /// Assemble a bundle from the three code results.
    ///
    /// Returns `None` if any result has the wrong kind.
    pub fn from_results(
        markup: GenerationResult,
        styling: GenerationResult,
        behavior: GenerationResult,
    ) -> Option<Self> {
        if markup.kind != ArtifactKind::Markup
            || styling.kind != ArtifactKind::Styling
            || behavior.kind != ArtifactKind::Behavior
        {
            return None;
        }
        Some(Self {
            markup: markup.cleaned_text,
            styling: styling.cleaned_text,
            behavior: behavior.cleaned_text,
        })
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn styling(&self) -> &str {
        &self.styling
    }

    pub fn behavior(&self) -> &str {
        &self.behavior
    }

    /// Artifact text by kind. The specification is not part of a bundle.
    pub fn get(&self, kind: ArtifactKind) -> Option<&str> {
        match kind {
            ArtifactKind::Specification => None,
            ArtifactKind::Markup => Some(&self.markup),
            ArtifactKind::Styling => Some(&self.styling),
            ArtifactKind::Behavior => Some(&self.behavior),
        }
    }

    /// `(kind, text)` pairs in stage order.
    pub fn iter(&self) -> impl Iterator<Item = (ArtifactKind, &str)> {
        CODE_KINDS
            .iter()
            .filter_map(move |&kind| self.get(kind).map(|text| (kind, text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_in_stage_order() {
        assert!(ArtifactKind::Specification < ArtifactKind::Markup);
        assert!(ArtifactKind::Markup < ArtifactKind::Styling);
        assert!(ArtifactKind::Styling < ArtifactKind::Behavior);
        assert!(CODE_KINDS.iter().all(|k| k.is_code()));
    }

    #[test]
    fn test_artifact_request_carries_specification() {
        let req = GenerationRequest::artifact(ArtifactKind::Styling, "a todo app", "1. Add tasks");
        assert_eq!(req.kind(), ArtifactKind::Styling);
        assert_eq!(req.description(), "a todo app");
        assert_eq!(req.specification_text(), Some("1. Add tasks"));

        let spec_req = GenerationRequest::specification("a todo app");
        assert_eq!(spec_req.specification_text(), None);
    }

    #[test]
    fn test_result_cleans_raw_text() {
        let result = GenerationResult::new(
            ArtifactKind::Markup,
            "```html\n<main></main>\n```".to_string(),
        );
        assert_eq!(result.cleaned_text, "<main></main>");
        assert!(result.raw_text.starts_with("```html"));
    }

    #[test]
    fn test_bundle_rejects_mismatched_kinds() {
        let m = GenerationResult::new(ArtifactKind::Markup, "<p></p>".into());
        let s = GenerationResult::new(ArtifactKind::Styling, "p{}".into());
        let b = GenerationResult::new(ArtifactKind::Behavior, "1;".into());

        assert!(CodeBundle::from_results(s.clone(), m.clone(), b.clone()).is_none());

        let bundle = CodeBundle::from_results(m, s, b).unwrap();
        assert_eq!(bundle.get(ArtifactKind::Styling), Some("p{}"));
        assert_eq!(bundle.get(ArtifactKind::Specification), None);

        let kinds: Vec<_> = bundle.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, CODE_KINDS.to_vec());
    }
}
