//! CLI for turning a spoken or typed app idea into a three-file web app.
//!
//! # Usage
//!
//! ```bash
//! # Describe the app directly
//! va-generate --description "a recipe sharing app with search and favorites" --output out/
//!
//! # Use an external speech recognizer that prints its transcript
//! va-generate --speech-cmd whisper-listen --speech-arg --lang --speech-arg en
//!
//! # Pipe a description in and print only the stylesheet
//! echo "a habit tracker" | va-generate --stdin --print styling
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgGroup, Parser, ValueEnum};
use tokio::sync::mpsc;

use va_core::{compose_document, export_bundle, write_preview, ApiKey, AppError, ArtifactKind};
use va_generator::{
    logging, ArtifactMode, CommandTranscript, GeneratorConfig, Pipeline, Progress,
    ReaderTranscript, TextTranscript, TranscriptSource, API_KEY_ENV, EXAMPLE_IDEAS,
};

#[derive(Debug, Parser)]
#[command(
    name = "va-generate",
    version,
    about = "Generate a runnable HTML/CSS/JS app from a spoken or typed description",
    group(
        ArgGroup::new("input")
            .required(true)
            .args(["description", "stdin", "speech_cmd", "example", "list_examples"])
    )
)]
struct Args {
    /// App description
    #[arg(short, long)]
    description: Option<String>,

    /// Read the description from stdin
    #[arg(long)]
    stdin: bool,

    /// Speech-to-text program that prints one transcript on stdout
    #[arg(long, value_name = "PROGRAM")]
    speech_cmd: Option<String>,

    /// Argument passed to the speech program (repeatable)
    #[arg(long = "speech-arg", value_name = "ARG", allow_hyphen_values = true)]
    speech_args: Vec<String>,

    /// Seconds to wait for the speech program
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    speech_timeout_secs: u64,

    /// Use one of the built-in example ideas (1-based)
    #[arg(long, value_name = "N")]
    example: Option<usize>,

    /// List the built-in example ideas and exit
    #[arg(long)]
    list_examples: bool,

    /// API key (defaults to $CEREBRAS_API_KEY)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Model identifier
    #[arg(long)]
    model: Option<String>,

    /// Issue the three code stages concurrently
    #[arg(long)]
    concurrent: bool,

    /// Per-stage timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Write index.html, style.css, script.js and preview.html here
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Print one artifact (or the combined preview) to stdout
    #[arg(long, value_enum)]
    print: Option<PrintTarget>,

    /// Only warnings and errors on stderr
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PrintTarget {
    Specification,
    Markup,
    Styling,
    Behavior,
    Preview,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.quiet);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if matches!(e, AppError::CredentialMissing) {
                eprintln!();
                eprintln!("Pass --api-key or set {}:", API_KEY_ENV);
                eprintln!("  export {}=csk-...", API_KEY_ENV);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    if args.list_examples {
        for (i, idea) in EXAMPLE_IDEAS.iter().enumerate() {
            println!("{}. {}", i + 1, idea);
        }
        return Ok(());
    }

    let config = build_config(&args)?;
    let api_key = match &args.api_key {
        Some(key) => ApiKey::new(key.as_str())?,
        None => ApiKey::from_env(API_KEY_ENV)?,
    };

    let description = transcript_source(&args)?.capture().await?;
    if !args.quiet {
        eprintln!("Description: {}", description);
    }

    let pipeline = Pipeline::from_config(config);
    let (tx, mut rx) = mpsc::unbounded_channel::<Progress>();
    let quiet = args.quiet;
    let reporter = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if !quiet {
                eprintln!("  {}", event.message());
            }
        }
    });

    let result = pipeline
        .run_with_progress(&description, &api_key, Some(tx))
        .await;
    // The sender is gone once the run returns, so the reporter drains and ends.
    let _ = reporter.await;
    let output = result?;

    if let Some(dir) = &args.output {
        let files = export_bundle(&output.bundle, dir).await?;
        let preview = write_preview(&output.bundle, dir).await?;
        tokio::fs::write(
            dir.join(ArtifactKind::Specification.file_name()),
            &output.specification,
        )
        .await?;
        if !quiet {
            eprintln!("Wrote {}", files.markup.display());
            eprintln!("Wrote {}", files.styling.display());
            eprintln!("Wrote {}", files.behavior.display());
            eprintln!("Wrote {}", preview.display());
        }
    }

    let target = match (args.print, &args.output) {
        (Some(target), _) => Some(target),
        (None, None) => Some(PrintTarget::Preview),
        (None, Some(_)) => None,
    };
    if let Some(target) = target {
        let text = match target {
            PrintTarget::Specification => output.specification.clone(),
            PrintTarget::Markup => output.bundle.markup().to_string(),
            PrintTarget::Styling => output.bundle.styling().to_string(),
            PrintTarget::Behavior => output.bundle.behavior().to_string(),
            PrintTarget::Preview => compose_document(&output.bundle),
        };
        println!("{}", text);
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<GeneratorConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };

    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if args.concurrent {
        config.artifact_mode = ArtifactMode::Concurrent;
    }
    if let Some(secs) = args.timeout_secs {
        config.stage_timeout_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

fn transcript_source(args: &Args) -> Result<Box<dyn TranscriptSource>, AppError> {
    if let Some(text) = &args.description {
        return Ok(Box::new(TextTranscript(text.clone())));
    }
    if args.stdin {
        return Ok(Box::new(ReaderTranscript::new(tokio::io::stdin())));
    }
    if let Some(program) = &args.speech_cmd {
        return Ok(Box::new(
            CommandTranscript::new(program.as_str())
                .args(args.speech_args.iter().cloned())
                .timeout(Duration::from_secs(args.speech_timeout_secs)),
        ));
    }
    if let Some(n) = args.example {
        let idea = n
            .checked_sub(1)
            .and_then(|i| EXAMPLE_IDEAS.get(i))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "example must be between 1 and {}",
                    EXAMPLE_IDEAS.len()
                ))
            })?;
        return Ok(Box::new(TextTranscript(idea.to_string())));
    }
    Err(AppError::Config(
        "no input: pass --description, --stdin, --speech-cmd or --example".to_string(),
    ))
}
