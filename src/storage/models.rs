/*!
 * Storage entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::StorageError;

/// Document role in the workbench
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// The document being worked on; its sections are extracted at ingestion
    Main,
    /// Supporting material, stored whole
    Reference,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Main => write!(f, "main"),
            DocumentType::Reference => write!(f, "reference"),
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" => Ok(DocumentType::Main),
            "reference" => Ok(DocumentType::Reference),
            other => Err(StorageError::CorruptRecord(format!(
                "Invalid document type: {}",
                other
            ))),
        }
    }
}

/// Translation lifecycle of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationStatus {
    /// No translation requested yet
    None,
    /// Translation queued but not started
    Pending,
    /// A run is (or was, if the process died) processing chunks
    InProgress,
    /// Full translated content persisted
    Completed,
    /// Last run failed; no translated content persisted
    Error,
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationStatus::None => write!(f, "none"),
            TranslationStatus::Pending => write!(f, "pending"),
            TranslationStatus::InProgress => write!(f, "in-progress"),
            TranslationStatus::Completed => write!(f, "completed"),
            TranslationStatus::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for TranslationStatus {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(TranslationStatus::None),
            "pending" => Ok(TranslationStatus::Pending),
            "in-progress" => Ok(TranslationStatus::InProgress),
            "completed" => Ok(TranslationStatus::Completed),
            "error" => Ok(TranslationStatus::Error),
            other => Err(StorageError::CorruptRecord(format!(
                "Invalid translation status: {}",
                other
            ))),
        }
    }
}

/// Review state of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionStatus {
    /// Not yet worked on
    Pending,
    /// Currently being drafted
    InProgress,
    /// Proposal finalized
    Complete,
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionStatus::Pending => write!(f, "pending"),
            SectionStatus::InProgress => write!(f, "in-progress"),
            SectionStatus::Complete => write!(f, "complete"),
        }
    }
}

impl std::str::FromStr for SectionStatus {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SectionStatus::Pending),
            "in-progress" => Ok(SectionStatus::InProgress),
            "complete" => Ok(SectionStatus::Complete),
            other => Err(StorageError::CorruptRecord(format!(
                "Invalid section status: {}",
                other
            ))),
        }
    }
}

/// Persisted document record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Database ID
    pub id: i64,
    /// Original file name
    pub name: String,
    /// Path the source file was ingested from
    pub original_path: Option<String>,
    /// Document role
    pub doc_type: DocumentType,
    /// Source language code
    pub language: String,
    /// Raw markup/text content as ingested
    pub raw_content: Option<String>,
    /// SHA-256 of raw content for change detection
    pub content_hash: Option<String>,
    /// Ingestion timestamp (ISO 8601)
    pub uploaded_at: String,
    /// Manual ordering position
    pub sort_order: i64,
    /// Translated content, present only after a completed run
    pub translated_content: Option<String>,
    /// Translation lifecycle state
    pub translation_status: TranslationStatus,
}

impl DocumentRecord {
    /// Create a new document record (without database ID)
    pub fn new(
        name: String,
        original_path: Option<String>,
        doc_type: DocumentType,
        language: String,
        raw_content: Option<String>,
        content_hash: Option<String>,
    ) -> Self {
        Self {
            id: 0, // Assigned by the database
            name,
            original_path,
            doc_type,
            language,
            raw_content,
            content_hash,
            uploaded_at: chrono::Utc::now().to_rfc3339(),
            sort_order: 0,
            translated_content: None,
            translation_status: TranslationStatus::None,
        }
    }

    /// Whether a run died leaving the document stuck in-progress.
    ///
    /// The pipeline never recovers this automatically; callers surface it so
    /// the operator can start a fresh run.
    pub fn has_stale_run(&self) -> bool {
        self.translation_status == TranslationStatus::InProgress
    }
}

/// Persisted section record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Database ID
    pub id: i64,
    /// Owning document
    pub document_id: i64,
    /// Heading text
    pub title: String,
    /// Section markup, including its heading tag
    pub content: String,
    /// 0-based position within the document
    pub sort_order: i64,
    /// Heading depth, 1 = top-level
    pub level: i64,
    /// Review state
    pub status: SectionStatus,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl SectionRecord {
    /// Create a new section record (without database ID)
    pub fn new(document_id: i64, title: String, content: String, sort_order: i64, level: i64) -> Self {
        Self {
            id: 0, // Assigned by the database
            document_id,
            title,
            content,
            sort_order,
            level,
            status: SectionStatus::Pending,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Draft proposal attached to a section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalRecord {
    /// Database ID
    pub id: i64,
    /// Owning section
    pub section_id: i64,
    /// Proposal body
    pub content: String,
    /// Free-form notes
    pub notes: Option<String>,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}
