//! # va-core
//!
//! Core types for turning a spoken app idea into a three-file web app.
//!
//! A generation run produces four texts in a fixed order:
//!
//! | Stage | Kind | Output |
//! |-------|------|--------|
//! | 1 | Specification | structured feature/design notes |
//! | 2 | Markup | `index.html` |
//! | 3 | Styling | `style.css` |
//! | 4 | Behavior | `script.js` |
//!
//! Stages 2-4 each embed the stage 1 output verbatim. A run either yields a
//! complete [`CodeBundle`] or fails with a [`GenerationError`] naming the
//! stage that broke; there is no partial bundle.
//!
//! This crate holds the data model, the fence-stripping heuristic, the
//! chat-completions wire types and the [`CompletionBackend`] seam. The HTTP
//! client and the pipeline itself live in `va-generator`.

pub mod artifact;
pub mod backend;
pub mod error;
pub mod fence;
pub mod preview;
pub mod wire;

pub use artifact::{ArtifactKind, CodeBundle, GenerationRequest, GenerationResult, CODE_KINDS};
pub use backend::{ApiKey, CompletionBackend};
pub use error::{AppError, BackendError, GenerationError};
pub use fence::{clean_output, strip_code_fences};
pub use preview::{compose_document, export_bundle, write_preview, ExportedFiles};
pub use wire::{extract_content, ChatMessage, ChatRequest, Role};
