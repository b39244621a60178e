//! # va-generator
//!
//! Turn a spoken app idea into a runnable three-file web app.
//!
//! ## Pipeline
//!
//! One description goes through four completion calls. The first produces a
//! structured specification; the other three each embed that specification
//! verbatim and produce one code artifact.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Transcript  │ ──> │  Structure  │ ──> │Specification│
//! │ (speech/txt)│     │   stage     │     │    text     │
//! └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                │
//!                 ┌──────────────────┬───────────┴──────┐
//!                 ▼                  ▼                  ▼
//!          ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//!          │   Markup    │    │   Styling   │    │  Behavior   │
//!          │ index.html  │    │  style.css  │    │  script.js  │
//!          └──────┬──────┘    └──────┬──────┘    └──────┬──────┘
//!                 └──────────────────┼──────────────────┘
//!                                    ▼
//!                             ┌─────────────┐
//!                             │ CodeBundle  │
//!                             └─────────────┘
//! ```
//!
//! Any failure aborts the run; no partial bundle is returned.
//!
//! # Usage
//!
//! ```bash
//! CEREBRAS_API_KEY=csk-... cargo run -p va-generator -- \
//!     --description "a recipe sharing app with search and favorites" --output out/
//! ```

pub mod capture;
pub mod client;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod prompt;

pub use capture::{
    CommandTranscript, ReaderTranscript, TextTranscript, TranscriptSource, EXAMPLE_IDEAS,
};
pub use client::ChatClient;
pub use config::{ArtifactMode, ConfigError, GeneratorConfig, StageParams, API_KEY_ENV};
pub use pipeline::{Pipeline, PipelineOutput, Progress};
pub use prompt::PromptBuilder;
