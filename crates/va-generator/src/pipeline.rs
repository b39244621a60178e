//! The generation pipeline.
//!
//! Structure → Markup → Styling → Behavior → Bundle. Each stage blocks on the
//! previous one, except that in [`ArtifactMode::Concurrent`] the three code
//! stages are issued together once the specification exists.
//!
//! A [`Pipeline`] holds only configuration and a shared backend. Everything a
//! run produces lives in a [`PipelineRun`] owned by that single call, so runs
//! can overlap freely.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, info_span, warn, Instrument};

use va_core::{
    extract_content, ApiKey, ArtifactKind, BackendError, ChatRequest, CodeBundle,
    CompletionBackend, GenerationError, GenerationRequest, GenerationResult,
};

use crate::client::ChatClient;
use crate::config::{ArtifactMode, GeneratorConfig};
use crate::prompt::PromptBuilder;

/// Progress notifications for a single-flight progress indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Started(ArtifactKind),
    Finished { stage: ArtifactKind, bytes: usize },
    Assembling,
}

impl Progress {
    /// User-facing status line.
    pub fn message(&self) -> String {
        match self {
            Progress::Started(ArtifactKind::Specification) => {
                "Analyzing your idea with AI...".to_string()
            }
            Progress::Started(ArtifactKind::Markup) => "Generating HTML structure...".to_string(),
            Progress::Started(ArtifactKind::Styling) => "Creating beautiful styles...".to_string(),
            Progress::Started(ArtifactKind::Behavior) => "Adding interactivity...".to_string(),
            Progress::Finished { stage, bytes } => format!("{} ready ({} bytes)", stage, bytes),
            Progress::Assembling => "Preparing preview...".to_string(),
        }
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Cleaned stage 1 text, as embedded in every code prompt
    pub specification: String,
    pub bundle: CodeBundle,
}

/// Generation pipeline over a completion backend.
pub struct Pipeline {
    backend: Arc<dyn CompletionBackend>,
    config: GeneratorConfig,
}

impl Pipeline {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: GeneratorConfig) -> Self {
        Self { backend, config }
    }

    /// Pipeline talking HTTP to `config.base_url`.
    pub fn from_config(config: GeneratorConfig) -> Self {
        let client = ChatClient::from_config(&config);
        Self::new(Arc::new(client), config)
    }

    /// Generate a bundle from a description.
    pub async fn run(
        &self,
        description: &str,
        api_key: &ApiKey,
    ) -> Result<CodeBundle, GenerationError> {
        self.run_with_progress(description, api_key, None)
            .await
            .map(|output| output.bundle)
    }

    /// Generate a bundle, reporting stage progress on `progress`.
    ///
    /// The description is embedded in every prompt exactly as given; only a
    /// blank one is rejected. A dropped receiver does not affect the run.
    pub async fn run_with_progress(
        &self,
        description: &str,
        api_key: &ApiKey,
        progress: Option<UnboundedSender<Progress>>,
    ) -> Result<PipelineOutput, GenerationError> {
        if description.trim().is_empty() {
            return Err(GenerationError::EmptyDescription);
        }

        let run = PipelineRun {
            pipeline: self,
            api_key,
            description: description.to_string(),
            progress,
        };
        let span = info_span!(
            "generation_run",
            model = %self.config.model,
            mode = ?self.config.artifact_mode
        );
        run.execute().instrument(span).await
    }
}

/// State of one run. Dropped when the run ends, successful or not.
struct PipelineRun<'a> {
    pipeline: &'a Pipeline,
    api_key: &'a ApiKey,
    description: String,
    progress: Option<UnboundedSender<Progress>>,
}

impl PipelineRun<'_> {
    async fn execute(self) -> Result<PipelineOutput, GenerationError> {
        info!(description_len = self.description.len(), "run started");

        let specification = self
            .generate(GenerationRequest::specification(self.description.as_str()))
            .await?
            .cleaned_text;

        let request = |kind| {
            GenerationRequest::artifact(kind, self.description.as_str(), specification.as_str())
        };

        let (markup, styling, behavior) = match self.pipeline.config.artifact_mode {
            ArtifactMode::Sequential => {
                let markup = self.generate(request(ArtifactKind::Markup)).await?;
                let styling = self.generate(request(ArtifactKind::Styling)).await?;
                let behavior = self.generate(request(ArtifactKind::Behavior)).await?;
                (markup, styling, behavior)
            }
            ArtifactMode::Concurrent => tokio::try_join!(
                self.generate(request(ArtifactKind::Markup)),
                self.generate(request(ArtifactKind::Styling)),
                self.generate(request(ArtifactKind::Behavior)),
            )?,
        };

        self.report(Progress::Assembling);
        let bundle = CodeBundle::new(
            markup.cleaned_text,
            styling.cleaned_text,
            behavior.cleaned_text,
        );
        info!("run finished");

        Ok(PipelineOutput {
            specification,
            bundle,
        })
    }

    /// Issue one stage request and clean its output.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let config = &self.pipeline.config;
        let stage = request.kind();
        let params = config.params(stage);
        let chat = ChatRequest::single_prompt(
            config.model.as_str(),
            PromptBuilder::build(&request),
            params.temperature,
            params.max_tokens,
        );

        self.report(Progress::Started(stage));
        info!(%stage, prompt_len = chat.prompt_text().len(), "stage started");

        let timeout = config.stage_timeout();
        let call = self.pipeline.backend.complete(stage, &chat, self.api_key);
        // Elapsed timeout drops the in-flight request.
        let body = match tokio::time::timeout(timeout, call).await {
            Ok(Ok(body)) => body,
            // A 2xx body that is not JSON is as unusable as one missing its content.
            Ok(Err(BackendError::Decode(detail))) => {
                warn!(%stage, %detail, "undecodable response");
                return Err(GenerationError::MalformedResponse { stage, detail });
            }
            Ok(Err(source)) => {
                warn!(%stage, error = %source, "stage failed");
                return Err(GenerationError::Backend { stage, source });
            }
            Err(_) => {
                warn!(%stage, ?timeout, "stage timed out");
                return Err(GenerationError::Backend {
                    stage,
                    source: BackendError::Timeout(timeout),
                });
            }
        };

        let raw = extract_content(&body).map_err(|detail| {
            warn!(%stage, %detail, "malformed response");
            GenerationError::MalformedResponse { stage, detail }
        })?;

        let result = GenerationResult::new(stage, raw);
        if result.is_empty() {
            warn!(%stage, "empty output");
            return Err(GenerationError::EmptyOutput { stage });
        }

        info!(
            %stage,
            raw_len = result.raw_text.len(),
            cleaned_len = result.cleaned_text.len(),
            "stage finished"
        );
        self.report(Progress::Finished {
            stage,
            bytes: result.cleaned_text.len(),
        });
        Ok(result)
    }

    fn report(&self, event: Progress) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(event);
        }
    }
}
