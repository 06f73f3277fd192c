use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use pagelink::clipboard::{ClipboardSink, StdoutSink, SystemClipboard};
use pagelink::config::Config;
use pagelink::dialog::{AcceptDefaults, ChoiceDialog, TerminalDialog};
use pagelink::document::HtmlDocument;
use pagelink::error::{AppError, AppResult};
use pagelink::extract::extract_metadata;
use pagelink::models::Candidate;
use pagelink::normalize::normalize;
use pagelink::notify::{Notice, NoticeKind, Notifier, TerminalNotifier};
use pagelink::pipeline::{Outcome, Pipeline};

#[derive(Parser)]
#[command(name = "pagelink", about = "Copy a page link with its title, description and thumbnail")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the page link as a rich snippet
    Copy {
        /// Location the page was loaded from
        #[arg(long)]
        url: String,
        /// Saved HTML of the page (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Print the snippet instead of using the system clipboard
        #[arg(long)]
        stdout: bool,
        /// Never ask: always take the preferred candidate
        #[arg(long)]
        accept_defaults: bool,
    },
    /// Print the extracted metadata as JSON
    Inspect {
        /// Location the page was loaded from
        #[arg(long)]
        url: String,
        /// Saved HTML of the page (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from_env();

    // JSON in production, human-readable otherwise.
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("pagelink=info"));
    if config.is_production {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let notifier = TerminalNotifier::new(config.no_color);

    let result = match cli.command {
        Commands::Copy {
            url,
            input,
            stdout,
            accept_defaults,
        } => copy(&url, input, stdout, accept_defaults, &notifier).await,
        Commands::Inspect { url, input } => inspect(&url, input).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "pagelink failed");
            notifier.notify(Notice::new(NoticeKind::Failure, e.user_message()));
            ExitCode::FAILURE
        }
    }
}

async fn copy(
    location: &str,
    input: Option<PathBuf>,
    stdout: bool,
    accept_defaults: bool,
    notifier: &TerminalNotifier,
) -> AppResult<ExitCode> {
    let doc = load_document(location, input).await?;

    let dialog: Box<dyn ChoiceDialog> = if accept_defaults {
        Box::new(AcceptDefaults)
    } else {
        let terminal = TerminalDialog::new();
        tracing::debug!(input = ?terminal.input(), "Dialog answers source");
        Box::new(terminal)
    };
    let clipboard: Box<dyn ClipboardSink> = if stdout {
        Box::new(StdoutSink)
    } else {
        Box::new(SystemClipboard::new())
    };

    let pipeline = Pipeline::new(dialog.as_ref(), clipboard.as_ref(), notifier);
    let report = pipeline.run(&doc).await;

    Ok(match report.outcome {
        Outcome::Delivered { .. } => ExitCode::SUCCESS,
        Outcome::Cancelled { .. } => ExitCode::from(2),
        Outcome::Failed { .. } => ExitCode::FAILURE,
    })
}

async fn inspect(location: &str, input: Option<PathBuf>) -> AppResult<ExitCode> {
    let doc = load_document(location, input).await?;
    let mut record = extract_metadata(&doc);
    record.url = record
        .url
        .iter()
        .map(|c| Candidate::new(normalize(&c.value), c.source_label.clone()))
        .collect();

    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| AppError::Internal(format!("cannot serialize metadata: {e}")))?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

async fn load_document(location: &str, input: Option<PathBuf>) -> AppResult<HtmlDocument> {
    let location =
        Url::parse(location).map_err(|e| AppError::InvalidLocation(format!("{location}: {e}")))?;

    let source = match input {
        Some(path) => {
            info!("📄 Reading page from {}", path.display());
            tokio::fs::read_to_string(&path).await?
        }
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    Ok(HtmlDocument::parse(&source, location))
}
