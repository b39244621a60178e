//! Prompt construction, one prompt per stage.
//!
//! The structure prompt sees only the description. Every code prompt embeds
//! the description and the full specification text unchanged, so the three
//! artifacts agree on IDs, sections and behavior.

use va_core::preview::{SCRIPT_TAG, STYLESHEET_LINK};
use va_core::{ArtifactKind, GenerationRequest};

/// Icon stylesheet the markup may pull from a CDN.
const ICON_CDN_LINK: &str = r#"<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css">"#;

/// Builds stage prompts from generation requests.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Prompt for whatever stage the request targets.
    pub fn build(request: &GenerationRequest) -> String {
        let spec = request.specification_text().unwrap_or_default();
        match request.kind() {
            ArtifactKind::Specification => Self::structure_prompt(request.description()),
            ArtifactKind::Markup => Self::markup_prompt(request.description(), spec),
            ArtifactKind::Styling => Self::styling_prompt(request.description(), spec),
            ArtifactKind::Behavior => Self::behavior_prompt(request.description(), spec),
        }
    }

    /// Stage 1: turn the idea into a structured feature/design specification.
    pub fn structure_prompt(description: &str) -> String {
        format!(
            r#"Analyze this app idea and write a detailed specification: "{description}"

Provide:
1. Core features (5-8 concrete features)
2. UI sections and layout structure
3. Design aesthetic (modern, minimal, colorful, dark, glassmorphism, ...)
4. Color scheme (specific colors and gradients)
5. Animations and interactions
6. Key JavaScript behavior

Be specific. Aim for a polished, modern web app."#,
        )
    }

    /// Stage 2: semantic markup referencing the external stylesheet and script.
    pub fn markup_prompt(description: &str, specification: &str) -> String {
        format!(
            r##"Write semantic, modern HTML for: "{description}"

Requirements:
{specification}

RULES:
- Clean, semantic HTML5 (section, article, nav, header, main, footer)
- Link the stylesheet in the head exactly as: {STYLESHEET_LINK}
- Load the script at the end of the body exactly as: {SCRIPT_TAG}
- Icons may come from: {ICON_CDN_LINK}
- Meaningful IDs and classes; data attributes for scripted elements
- Include every section named in the requirements
- In-page navigation uses IDs: <a href="#section-id">
- NO inline styles and NO inline scripts

Return ONLY the HTML code, no explanations."##,
        )
    }

    /// Stage 3: complete stylesheet.
    pub fn styling_prompt(description: &str, specification: &str) -> String {
        format!(
            r#"Write complete, modern CSS for: "{description}"

Requirements:
{specification}

RULES:
- CSS Grid and Flexbox layout
- Responsive, mobile-first
- Smooth transitions, hover effects and @keyframes animations
- Gradients, shadows and glass effects where they fit
- A consistent color palette with readable typography and spacing
- Custom scrollbar styling and smooth scroll behavior

Return ONLY the CSS code, no explanations."#,
        )
    }

    /// Stage 4: standalone script with no external dependencies.
    pub fn behavior_prompt(description: &str, specification: &str) -> String {
        format!(
            r#"Write functional JavaScript for: "{description}"

Requirements:
{specification}

RULES:
- Vanilla JavaScript, no frameworks or external libraries
- Wrap everything in a DOMContentLoaded listener
- Event listeners for every interaction; smooth scroll for anchor links
- Validate forms if any exist
- Persist user data in localStorage
- Handle errors; modern ES6+ syntax; commented code
- Real functionality, no placeholders

Return ONLY the JavaScript code, no explanations."#,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = "a recipe sharing app with search and favorites";
    const SPEC: &str = "1. Search recipes\n2. Favorite recipes\n3. Warm orange palette";

    #[test]
    fn test_structure_prompt_has_description_only() {
        let prompt = PromptBuilder::build(&GenerationRequest::specification(DESCRIPTION));
        assert!(prompt.contains(DESCRIPTION));
        assert!(prompt.contains("Core features"));
        assert!(prompt.contains("Color scheme"));
        assert!(!prompt.contains("Requirements:"));
    }

    #[test]
    fn test_code_prompts_embed_description_and_spec_verbatim() {
        for kind in va_core::CODE_KINDS {
            let request = GenerationRequest::artifact(kind, DESCRIPTION, SPEC);
            let prompt = PromptBuilder::build(&request);
            assert!(prompt.contains(DESCRIPTION), "{} prompt lacks description", kind);
            assert!(prompt.contains(SPEC), "{} prompt lacks specification", kind);
        }
    }

    #[test]
    fn test_markup_prompt_names_external_resources() {
        let prompt = PromptBuilder::markup_prompt(DESCRIPTION, SPEC);
        assert!(prompt.contains(STYLESHEET_LINK));
        assert!(prompt.contains(SCRIPT_TAG));
        assert!(prompt.contains("NO inline styles"));
    }

    #[test]
    fn test_markup_prompt_keeps_anchor_rule_and_closing_line() {
        let prompt = PromptBuilder::markup_prompt(DESCRIPTION, SPEC);
        assert!(prompt.contains(r##"In-page navigation uses IDs: <a href="#section-id">"##));
        assert!(prompt.ends_with("Return ONLY the HTML code, no explanations."));
    }

    #[test]
    fn test_behavior_prompt_forbids_dependencies() {
        let prompt = PromptBuilder::behavior_prompt(DESCRIPTION, SPEC);
        assert!(prompt.contains("no frameworks or external libraries"));
        assert!(prompt.contains("DOMContentLoaded"));
    }
}
