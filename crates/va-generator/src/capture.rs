//! Transcript capture.
//!
//! A capture session yields exactly one transcript or exactly one error, then
//! ends. Sources are consumed by [`TranscriptSource::capture`] so a session
//! cannot be resumed or read twice.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info};

use va_core::AppError;

/// Ready-made ideas for trying the tool without a microphone.
pub const EXAMPLE_IDEAS: [&str; 4] = [
    "a recipe sharing app with search and favorites",
    "a pomodoro timer with a task list and daily statistics",
    "a personal expense tracker with spending charts by category",
    "a habit tracker with streaks and a weekly calendar view",
];

/// One capture session.
#[async_trait]
pub trait TranscriptSource: Send {
    /// Run the session to completion.
    async fn capture(self: Box<Self>) -> Result<String, AppError>;
}

/// Blank transcripts count as a failed session.
fn normalize(text: &str) -> Result<String, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::TranscriptionFailure(
            "no speech was recognized".to_string(),
        ));
    }
    Ok(text.to_string())
}

/// Transcript supplied directly, e.g. typed or picked from [`EXAMPLE_IDEAS`].
#[derive(Debug, Clone)]
pub struct TextTranscript(pub String);

#[async_trait]
impl TranscriptSource for TextTranscript {
    async fn capture(self: Box<Self>) -> Result<String, AppError> {
        normalize(&self.0)
    }
}

/// Transcript read to end of an async reader such as stdin.
pub struct ReaderTranscript<R> {
    reader: R,
}

impl<R> ReaderTranscript<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R> TranscriptSource for ReaderTranscript<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn capture(mut self: Box<Self>) -> Result<String, AppError> {
        let mut text = String::new();
        self.reader
            .read_to_string(&mut text)
            .await
            .map_err(|e| AppError::TranscriptionFailure(e.to_string()))?;
        normalize(&text)
    }
}

/// Transcript produced by an external speech-to-text program.
///
/// The program is expected to record, recognize and print the transcript on
/// stdout, then exit zero.
#[derive(Debug, Clone)]
pub struct CommandTranscript {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandTranscript {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(60),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl TranscriptSource for CommandTranscript {
    async fn capture(self: Box<Self>) -> Result<String, AppError> {
        info!(program = %self.program, "listening");

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AppError::CapabilityUnavailable(format!(
                    "speech recognizer `{}` not found",
                    self.program
                )),
                _ => AppError::TranscriptionFailure(format!(
                    "failed to start `{}`: {}",
                    self.program, e
                )),
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(AppError::TranscriptionFailure(e.to_string())),
            Err(_) => {
                return Err(AppError::TranscriptionFailure(format!(
                    "no transcript within {:?}",
                    self.timeout
                )))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("recognizer exited with an error");
            return Err(AppError::TranscriptionFailure(format!(
                "{} ({})",
                reason, output.status
            )));
        }

        let transcript = String::from_utf8_lossy(&output.stdout);
        debug!(bytes = transcript.len(), "recognizer finished");
        normalize(&transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_text_transcript_is_trimmed() {
        let source = Box::new(TextTranscript("  a todo app \n".into()));
        assert_eq!(source.capture().await.unwrap(), "a todo app");
    }

    #[tokio::test]
    async fn test_blank_transcript_is_failure() {
        let source = Box::new(TextTranscript("\n\t ".into()));
        assert!(matches!(
            source.capture().await,
            Err(AppError::TranscriptionFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_reader_transcript() {
        let source = Box::new(ReaderTranscript::new(&b"a drawing app\n"[..]));
        assert_eq!(source.capture().await.unwrap(), "a drawing app");
    }

    #[tokio::test]
    async fn test_command_transcript_reads_stdout() {
        let source = Box::new(CommandTranscript::new("echo").arg("a weather dashboard"));
        assert_eq!(source.capture().await.unwrap(), "a weather dashboard");
    }

    #[tokio::test]
    async fn test_missing_recognizer_is_capability_unavailable() {
        let source = Box::new(CommandTranscript::new("va-no-such-recognizer-installed"));
        assert!(matches!(
            source.capture().await,
            Err(AppError::CapabilityUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_failing_recognizer_is_transcription_failure() {
        let source = Box::new(
            CommandTranscript::new("sh").args(["-c", "echo 'mic busy' >&2; exit 3"]),
        );
        match source.capture().await {
            Err(AppError::TranscriptionFailure(msg)) => assert!(msg.contains("mic busy")),
            other => panic!("expected transcription failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_recognizer_times_out() {
        let source = Box::new(
            CommandTranscript::new("sleep")
                .arg("5")
                .timeout(Duration::from_millis(100)),
        );
        assert!(matches!(
            source.capture().await,
            Err(AppError::TranscriptionFailure(_))
        ));
    }

    #[test]
    fn test_examples_are_non_empty() {
        assert!(EXAMPLE_IDEAS.iter().all(|idea| !idea.trim().is_empty()));
    }
}
