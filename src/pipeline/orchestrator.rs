/*!
 * Streaming translation orchestrator.
 *
 * Drives one document's chunks through the transform provider, one at a time,
 * pushing ordered progress events to the consumer and persisting run state.
 * Chunks are never transformed concurrently: the provider is instructed to
 * treat each call independently, and interleaved completions would scramble
 * the single shared accumulator.
 */

use log::{error, info, warn};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::app_config::language_display_name;
use crate::chunker;
use crate::errors::PipelineError;
use crate::providers::TransformClient;
use crate::storage::models::TranslationStatus;
use crate::storage::Repository;

use super::events::TranslationEvent;

/// Separator appended after every transformed chunk
const CHUNK_SEPARATOR: &str = "\n\n";

// Providers sometimes wrap markup output in markdown code fences
static LEADING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(?:html)?\s*").unwrap());
static TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*```$").unwrap());

/// Receiving side of a translation run's event stream
pub type TranslationStream = mpsc::UnboundedReceiver<TranslationEvent>;

/// Build the fixed system instruction for a target language
pub fn system_instruction(target_language: &str) -> String {
    let target_name = language_display_name(target_language);
    format!(
        "You are a professional translator. Translate the following technical document content \
         into clear, professional {}.\n\n\
         IMPORTANT INSTRUCTIONS:\n\
         1. Translate the ENTIRE text verbatim. Do NOT summarize or omit any sections.\n\
         2. Output the result as semantic HTML.\n\
         3. Wrap paragraphs in <p> tags, use <h2>/<h3> for headings, and <ul>/<ol> for lists.\n\
         4. Preserve any tables using standard HTML <table> tags.\n\
         5. Do NOT use <html>, <head>, or <body> tags, just the content.\n\
         6. Keep all technical terms accurate.",
        target_name
    )
}

/// Strip leading/trailing markdown code-fence markers from provider output
pub fn strip_code_fences(text: &str) -> String {
    let stripped = LEADING_FENCE.replace(text, "");
    TRAILING_FENCE.replace(&stripped, "").to_string()
}

/// Orchestrates chunked streaming translation runs
pub struct DocumentTranslator {
    /// Persistence layer
    repo: Repository,
    /// Transform provider, injected at construction so it is swappable
    client: Arc<dyn TransformClient>,
    /// Target language code for the system instruction
    target_language: String,
    /// Chunk character bound
    max_chunk_chars: usize,
    /// Documents with an in-flight run; guards against concurrent starts
    active_runs: Arc<Mutex<HashSet<i64>>>,
}

/// Releases a document's run-lock slot when the run ends, however it ends
struct RunGuard {
    document_id: i64,
    active_runs: Arc<Mutex<HashSet<i64>>>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.active_runs.lock().remove(&self.document_id);
    }
}

impl DocumentTranslator {
    /// Create a new translator over the given repository and provider
    pub fn new(
        repo: Repository,
        client: Arc<dyn TransformClient>,
        target_language: impl Into<String>,
        max_chunk_chars: usize,
    ) -> Self {
        Self {
            repo,
            client,
            target_language: target_language.into(),
            max_chunk_chars,
            active_runs: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Start a translation run for a document.
    ///
    /// Fails before any event is emitted or state is mutated when the document
    /// is missing, has no raw content, or already has a run in flight. On
    /// success the run proceeds in a background task; the returned stream
    /// yields progress events in chunk order and closes after exactly one
    /// terminal event.
    pub async fn translate(&self, document_id: i64) -> Result<TranslationStream, PipelineError> {
        let guard = self.try_lock_run(document_id)?;

        let document = self
            .repo
            .get_document(document_id)
            .await?
            .ok_or(PipelineError::NotFound(document_id))?;

        let raw_content = document
            .raw_content
            .filter(|content| !content.trim().is_empty())
            .ok_or(PipelineError::EmptyContent(document_id))?;

        let chunks = chunker::smart_split(&raw_content, self.max_chunk_chars);
        if chunks.is_empty() {
            return Err(PipelineError::EmptyContent(document_id));
        }

        let run_id = Uuid::new_v4();
        info!(
            "Starting translation run {} for document {} ({} chunks)",
            run_id,
            document_id,
            chunks.len()
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let repo = self.repo.clone();
        let client = Arc::clone(&self.client);
        let system = system_instruction(&self.target_language);

        tokio::spawn(async move {
            // The guard lives as long as the run
            let _guard = guard;
            run_chunks(repo, client, system, document_id, chunks, tx).await;
        });

        Ok(rx)
    }

    /// Reserve the run slot for a document, or fail if one is in flight
    fn try_lock_run(&self, document_id: i64) -> Result<RunGuard, PipelineError> {
        let mut active = self.active_runs.lock();
        if !active.insert(document_id) {
            return Err(PipelineError::RunInProgress(document_id));
        }
        Ok(RunGuard {
            document_id,
            active_runs: Arc::clone(&self.active_runs),
        })
    }
}

/// Sequential chunk loop for one run.
///
/// Exactly one terminal event is emitted on every path. Send failures are
/// ignored: a consumer that hangs up does not abort persistence.
async fn run_chunks(
    repo: Repository,
    client: Arc<dyn TransformClient>,
    system: String,
    document_id: i64,
    chunks: Vec<String>,
    tx: mpsc::UnboundedSender<TranslationEvent>,
) {
    let total_chunks = chunks.len();
    // Cleaned size, for progress display only
    let total_chars: usize = chunks.iter().map(|c| c.chars().count()).sum();
    let total_kb = total_chars.div_ceil(1024);

    if let Err(e) = repo
        .update_translation_status(document_id, TranslationStatus::InProgress)
        .await
    {
        error!("Failed to mark document {} in-progress: {}", document_id, e);
        let _ = tx.send(TranslationEvent::Error {
            message: e.to_string(),
        });
        return;
    }

    let mut accumulator = String::new();

    for (index, chunk) in chunks.iter().enumerate() {
        // Computed before the chunk, so the first emitted value is 0
        let percent = (100 * index / total_chunks) as u8;
        let _ = tx.send(TranslationEvent::Progress {
            percent,
            message: format!(
                "Translating part {} of {} ({}KB)...",
                index + 1,
                total_chunks,
                total_kb
            ),
        });

        match client.transform(&system, chunk).await {
            Ok(transformed) => {
                accumulator.push_str(&strip_code_fences(&transformed));
                accumulator.push_str(CHUNK_SEPARATOR);
            }
            Err(e) => {
                warn!(
                    "Transform failed on chunk {} of {} for document {}: {}",
                    index + 1,
                    total_chunks,
                    document_id,
                    e
                );
                // Accumulated text stays in memory only; failed runs never persist it
                if let Err(storage_err) = repo
                    .update_translation_status(document_id, TranslationStatus::Error)
                    .await
                {
                    error!(
                        "Failed to mark document {} errored: {}",
                        document_id, storage_err
                    );
                }
                let _ = tx.send(TranslationEvent::Error {
                    message: e.to_string(),
                });
                return;
            }
        }
    }

    if let Err(e) = repo
        .update_document_translation(document_id, accumulator.clone(), TranslationStatus::Completed)
        .await
    {
        error!(
            "Failed to persist translation for document {}: {}",
            document_id, e
        );
        let _ = tx.send(TranslationEvent::Error {
            message: e.to_string(),
        });
        return;
    }

    info!(
        "Translation completed for document {} ({} chunks, {} chars)",
        document_id,
        total_chunks,
        accumulator.chars().count()
    );
    let _ = tx.send(TranslationEvent::Complete { text: accumulator });
}
