/*!
 * Document ingestion.
 *
 * Reads converted documents from disk (heading-delimited HTML markup, or plain
 * text), extracts titled sections for main documents, and persists everything
 * in one pass. Section extraction itself never fails: inputs without headings
 * degrade to a single placeholder section.
 */

use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use sha2::{Digest, Sha256};
use std::path::Path;
use walkdir::WalkDir;

use crate::app_config::validate_language_code;
use crate::segmenter::{self, Section};
use crate::storage::models::{DocumentRecord, DocumentType};
use crate::storage::Repository;

/// Outcome of ingesting one file
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Assigned document id
    pub document_id: i64,
    /// Number of sections stored (0 for reference documents)
    pub section_count: usize,
}

/// Source format, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    /// Heading-delimited markup; sections come from the segmenter
    Markup,
    /// Flat text; stored as a single section titled after the file
    PlainText,
}

fn detect_format(path: &Path) -> Option<SourceFormat> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "html" | "htm" => Some(SourceFormat::Markup),
        "txt" | "text" => Some(SourceFormat::PlainText),
        _ => None,
    }
}

/// Ingests documents into the repository
pub struct DocumentIngestor {
    repo: Repository,
}

impl DocumentIngestor {
    /// Create a new ingestor over the given repository
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Ingest a single file as a document.
    ///
    /// Sections are extracted and stored only for main documents, matching
    /// how reference material is kept whole for lookup.
    pub async fn ingest_file(
        &self,
        path: &Path,
        doc_type: DocumentType,
        language: &str,
    ) -> Result<IngestReport> {
        validate_language_code(language)?;

        let format = detect_format(path).ok_or_else(|| {
            anyhow!(
                "Unsupported file type: {:?}. Supported: .html, .htm, .txt",
                path
            )
        })?;

        let raw_content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read document file: {:?}", path))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());

        let sections = match format {
            SourceFormat::Markup => segmenter::segment(&raw_content),
            SourceFormat::PlainText => plain_text_sections(path, &raw_content),
        };

        let content_hash = format!("{:x}", Sha256::digest(raw_content.as_bytes()));

        let document = DocumentRecord::new(
            name.clone(),
            Some(path.to_string_lossy().to_string()),
            doc_type,
            language.to_string(),
            Some(raw_content),
            Some(content_hash),
        );

        let document_id = self.repo.insert_document(&document).await?;

        let section_count = if doc_type == DocumentType::Main && !sections.is_empty() {
            self.repo.insert_sections(document_id, &sections).await?
        } else {
            0
        };

        info!(
            "Ingested {:?} as document {} ({} sections)",
            name, document_id, section_count
        );

        Ok(IngestReport {
            document_id,
            section_count,
        })
    }

    /// Ingest every supported file under a directory.
    ///
    /// Individual failures are logged and skipped so one bad file does not
    /// abort the batch.
    pub async fn ingest_folder(
        &self,
        dir: &Path,
        doc_type: DocumentType,
        language: &str,
    ) -> Result<Vec<IngestReport>> {
        let mut reports = Vec::new();

        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_dir() || detect_format(path).is_none() {
                continue;
            }

            match self.ingest_file(path, doc_type, language).await {
                Ok(report) => reports.push(report),
                Err(e) => error!("Error ingesting {:?}: {}", path, e),
            }
        }

        if reports.is_empty() {
            warn!("No ingestable files found under {:?}", dir);
        } else {
            info!("Finished ingesting {} files", reports.len());
        }

        Ok(reports)
    }
}

/// A flat text file becomes one section titled after the file stem
fn plain_text_sections(path: &Path, raw_content: &str) -> Vec<Section> {
    if raw_content.trim().is_empty() {
        return Vec::new();
    }

    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| segmenter::UNTITLED_SECTION_TITLE.to_string());

    vec![Section {
        title,
        content: raw_content.to_string(),
        level: 1,
        order: 0,
    }]
}
