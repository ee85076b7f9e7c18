// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::{Config, LogLevel, TransformProviderKind};
use crate::ingest::DocumentIngestor;
use crate::pipeline::{DocumentTranslator, TranslationEvent};
use crate::providers::anthropic::Anthropic;
use crate::providers::openai::OpenAI;
use crate::providers::TransformClient;
use crate::storage::models::DocumentType;
use crate::storage::{Repository, StorageConnection};

mod app_config;
mod chunker;
mod errors;
mod ingest;
mod pipeline;
mod providers;
mod segmenter;
mod storage;

/// CLI wrapper for DocumentType to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliDocumentType {
    Main,
    Reference,
}

impl From<CliDocumentType> for DocumentType {
    fn from(cli_type: CliDocumentType) -> Self {
        match cli_type {
            CliDocumentType::Main => DocumentType::Main,
            CliDocumentType::Reference => DocumentType::Reference,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

fn level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest a document file or directory into the workbench
    Ingest {
        /// File (.html, .htm, .txt) or directory to ingest
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Document role; sections are extracted only for main documents
        #[arg(short = 'd', long, value_enum, default_value = "reference")]
        doc_type: CliDocumentType,

        /// Source language code (e.g., 'de', 'pl', 'en')
        #[arg(short = 'L', long)]
        language: Option<String>,
    },

    /// Translate a document's raw content chunk by chunk
    Translate {
        /// Document ID to translate
        #[arg(value_name = "DOCUMENT_ID")]
        document_id: i64,

        /// Emit raw newline-delimited JSON events instead of a progress bar
        #[arg(short, long)]
        json: bool,
    },

    /// List all documents
    List,

    /// Show a document's extracted sections
    Sections {
        /// Document ID
        #[arg(value_name = "DOCUMENT_ID")]
        document_id: i64,
    },

    /// Show a document's translation status
    Status {
        /// Document ID
        #[arg(value_name = "DOCUMENT_ID")]
        document_id: i64,
    },

    /// Persist a new manual ordering, given id=position pairs
    Reorder {
        /// Pairs like 3=0 1=1 2=2
        #[arg(value_name = "ID=POSITION", required = true)]
        items: Vec<String>,
    },

    /// Delete a document and its sections and proposals
    Delete {
        /// Document ID
        #[arg(value_name = "DOCUMENT_ID")]
        document_id: i64,
    },

    /// Generate shell completions for doctran
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// doctran - Technical Document Translation Workbench
///
/// Ingests converted technical documents, extracts their sections, and
/// translates raw content chunk-by-chunk using AI providers.
#[derive(Parser, Debug)]
#[command(name = "doctran")]
#[command(version = "0.1.0")]
#[command(about = "AI-powered technical document translation workbench")]
#[command(long_about = "doctran ingests converted technical documents (HTML markup or plain \
text), splits them into titled sections, and translates their raw content \
chunk-by-chunk with live progress.

EXAMPLES:
    doctran ingest spec.html -d main -L de      # Ingest and extract sections
    doctran ingest refs/ -L de                  # Ingest a reference directory
    doctran translate 1                         # Translate with a progress bar
    doctran translate 1 --json                  # Stream NDJSON progress events
    doctran sections 1                          # List extracted sections
    doctran completions bash > doctran.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config. If the config file doesn't exist,
    a default one will be created automatically.

SUPPORTED PROVIDERS:
    openai    - OpenAI API (requires API key)
    anthropic - Anthropic Claude API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Custom logger implementation writing colored lines to stderr
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn color_code(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                Self::color_code(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default; the level is
    // adjusted after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "doctran", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let config = load_or_create_config(&cli.config_path, cli.log_level.as_ref())?;

    if cli.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let repo = open_repository(&config)?;

    match cli.command {
        Commands::Ingest {
            input_path,
            doc_type,
            language,
        } => {
            let language = language.unwrap_or_else(|| config.source_language.clone());
            run_ingest(repo, &input_path, doc_type.into(), &language).await
        }
        Commands::Translate { document_id, json } => {
            // Translation needs a working provider; validate the full config
            config
                .validate()
                .context("Configuration validation failed")?;
            run_translate(repo, &config, document_id, json).await
        }
        Commands::List => run_list(repo).await,
        Commands::Sections { document_id } => run_sections(repo, document_id).await,
        Commands::Status { document_id } => run_status(repo, document_id).await,
        Commands::Reorder { items } => run_reorder(repo, &items).await,
        Commands::Delete { document_id } => run_delete(repo, document_id).await,
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}

/// Load the configuration, creating a default file when none exists
fn load_or_create_config(config_path: &str, log_level: Option<&CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(level) = log_level {
        config.log_level = level.clone().into();
    }

    Ok(config)
}

/// Open the repository at the configured or default database path
fn open_repository(config: &Config) -> Result<Repository> {
    if config.database_path.is_empty() {
        Repository::new_default()
    } else {
        let connection = StorageConnection::new(&config.database_path)?;
        Ok(Repository::new(connection))
    }
}

/// Build the configured transform client
fn build_transform_client(config: &Config) -> Result<Arc<dyn TransformClient>> {
    let translation = &config.translation;
    let client: Arc<dyn TransformClient> = match translation.provider {
        TransformProviderKind::OpenAI => Arc::new(OpenAI::new(
            translation.get_api_key(),
            translation.get_endpoint(),
            translation.get_model(),
            translation.temperature,
            translation.get_timeout_secs(),
        )),
        TransformProviderKind::Anthropic => Arc::new(Anthropic::new(
            translation.get_api_key(),
            translation.get_endpoint(),
            translation.get_model(),
            translation.temperature,
            translation.get_timeout_secs(),
        )),
    };
    Ok(client)
}

async fn run_ingest(
    repo: Repository,
    input_path: &Path,
    doc_type: DocumentType,
    language: &str,
) -> Result<()> {
    let ingestor = DocumentIngestor::new(repo);

    if input_path.is_file() {
        let report = ingestor.ingest_file(input_path, doc_type, language).await?;
        println!(
            "Ingested document {} with {} sections",
            report.document_id, report.section_count
        );
    } else if input_path.is_dir() {
        let reports = ingestor.ingest_folder(input_path, doc_type, language).await?;
        println!("Ingested {} documents", reports.len());
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}

async fn run_translate(repo: Repository, config: &Config, document_id: i64, json: bool) -> Result<()> {
    let client = build_transform_client(config)?;

    info!(
        "doctran: {} - {}",
        config.translation.provider.display_name(),
        config.translation.get_model()
    );

    let translator = DocumentTranslator::new(
        repo,
        client,
        config.target_language.clone(),
        config.chunking.max_chunk_chars,
    );

    let mut events = translator.translate(document_id).await?;

    if json {
        // Raw NDJSON stream, one event per line
        let mut stdout = std::io::stdout();
        let mut failed = false;
        while let Some(event) = events.recv().await {
            write!(stdout, "{}", event.to_ndjson())?;
            stdout.flush()?;
            if matches!(event, TranslationEvent::Error { .. }) {
                failed = true;
            }
        }
        if failed {
            return Err(anyhow!("Translation run failed"));
        }
        return Ok(());
    }

    let progress_bar = ProgressBar::new(100);
    let template_result = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(template_result);
    progress_bar.set_message("Translating");

    let mut outcome: Result<()> = Ok(());
    while let Some(event) = events.recv().await {
        match event {
            TranslationEvent::Progress { percent, message } => {
                progress_bar.set_position(percent as u64);
                progress_bar.set_message(message);
            }
            TranslationEvent::Complete { text } => {
                progress_bar.set_position(100);
                progress_bar.finish_with_message("Translation completed");
                println!(
                    "Translated document {} ({} characters stored)",
                    document_id,
                    text.chars().count()
                );
            }
            TranslationEvent::Error { message } => {
                progress_bar.abandon_with_message("Translation failed");
                outcome = Err(anyhow!("Translation run failed: {}", message));
            }
        }
    }

    outcome
}

async fn run_list(repo: Repository) -> Result<()> {
    let documents = repo.list_documents().await?;

    if documents.is_empty() {
        println!("No documents ingested yet.");
        return Ok(());
    }

    for doc in documents {
        println!(
            "{:4}  {:10}  {:12}  {:2}  {}",
            doc.id,
            doc.doc_type.to_string(),
            doc.translation_status.to_string(),
            doc.language,
            doc.name
        );
    }

    Ok(())
}

async fn run_sections(repo: Repository, document_id: i64) -> Result<()> {
    let document = repo
        .get_document(document_id)
        .await?
        .ok_or_else(|| anyhow!("Document {} not found", document_id))?;

    let sections = repo.list_sections(document_id).await?;
    println!("{} - {} sections", document.name, sections.len());

    for section in sections {
        println!(
            "{:4}  h{}  {:12}  {}{}",
            section.id,
            section.level,
            section.status.to_string(),
            "  ".repeat((section.level as usize).saturating_sub(1)),
            section.title
        );
    }

    Ok(())
}

async fn run_status(repo: Repository, document_id: i64) -> Result<()> {
    let document = repo
        .get_document(document_id)
        .await?
        .ok_or_else(|| anyhow!("Document {} not found", document_id))?;

    println!("Document:  {}", document.name);
    println!("Status:    {}", document.translation_status);
    if let Some(translated) = &document.translated_content {
        println!("Translated: {} characters", translated.chars().count());
    }
    if document.has_stale_run() {
        warn!(
            "Document {} is marked in-progress; if no run is active the previous one died. \
             Start a new run to retry.",
            document_id
        );
    }

    Ok(())
}

async fn run_reorder(repo: Repository, items: &[String]) -> Result<()> {
    let pairs = items
        .iter()
        .map(|item| {
            let (id, position) = item
                .split_once('=')
                .ok_or_else(|| anyhow!("Invalid reorder item '{}', expected ID=POSITION", item))?;
            Ok((
                id.parse::<i64>()
                    .context(format!("Invalid document ID in '{}'", item))?,
                position
                    .parse::<i64>()
                    .context(format!("Invalid position in '{}'", item))?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    repo.reorder_documents(&pairs).await?;
    println!("Reordered {} documents", pairs.len());

    Ok(())
}

async fn run_delete(repo: Repository, document_id: i64) -> Result<()> {
    if repo.delete_document(document_id).await? {
        println!("Deleted document {}", document_id);
    } else {
        warn!("Document {} not found", document_id);
    }

    Ok(())
}
