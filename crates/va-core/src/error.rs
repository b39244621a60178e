//! Error taxonomy.
//!
//! Every failure is terminal for the current run. Nothing here is retried.

use std::time::Duration;

use crate::artifact::ArtifactKind;

/// Failure of a single completion call.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),

    #[error("endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// A 2xx body that is not JSON. The pipeline reports it as a malformed
    /// response for the stage.
    #[error("response body is not JSON: {0}")]
    Decode(String),
}

/// Failure of a pipeline run. Every stage failure names its stage.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("description is empty")]
    EmptyDescription,

    #[error("{stage} generation error: {source}")]
    Backend {
        stage: ArtifactKind,
        #[source]
        source: BackendError,
    },

    #[error("{stage} generation returned a malformed response: {detail}")]
    MalformedResponse { stage: ArtifactKind, detail: String },

    #[error("{stage} generation returned no content")]
    EmptyOutput { stage: ArtifactKind },
}

impl GenerationError {
    /// The stage that failed, if the run got as far as issuing requests.
    pub fn stage(&self) -> Option<ArtifactKind> {
        match self {
            GenerationError::EmptyDescription => None,
            GenerationError::Backend { stage, .. }
            | GenerationError::MalformedResponse { stage, .. }
            | GenerationError::EmptyOutput { stage } => Some(*stage),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, GenerationError::MalformedResponse { .. })
    }
}

/// Everything the user can be told about.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("no API key supplied")]
    CredentialMissing,

    #[error("transcription failed: {0}")]
    TranscriptionFailure(String),

    #[error("error generating app: {0}")]
    Generation(#[from] GenerationError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_in_message() {
        let err = GenerationError::Backend {
            stage: ArtifactKind::Styling,
            source: BackendError::Status {
                status: 500,
                body: "boom".into(),
            },
        };
        assert_eq!(err.stage(), Some(ArtifactKind::Styling));
        assert_eq!(
            err.to_string(),
            "styling generation error: endpoint returned status 500: boom"
        );
        assert_eq!(GenerationError::EmptyDescription.stage(), None);
    }

    #[test]
    fn test_app_error_wraps_generation() {
        let err: AppError = GenerationError::MalformedResponse {
            stage: ArtifactKind::Markup,
            detail: "missing `choices`".into(),
        }
        .into();
        assert!(err.to_string().starts_with("error generating app: markup"));
    }
}
