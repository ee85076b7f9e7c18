/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 */

use futures::future::try_join_all;
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

use crate::errors::StorageError;
use crate::segmenter::Section;

use super::connection::StorageConnection;
use super::models::{
    DocumentRecord, DocumentType, ProposalRecord, SectionRecord, SectionStatus, TranslationStatus,
};

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: StorageConnection,
}

/// Map a documents row in column order
fn map_document_row(row: &Row<'_>) -> rusqlite::Result<DocumentRecord> {
    Ok(DocumentRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        original_path: row.get(2)?,
        doc_type: row
            .get::<_, String>(3)?
            .parse()
            .unwrap_or(DocumentType::Reference),
        language: row.get(4)?,
        raw_content: row.get(5)?,
        content_hash: row.get(6)?,
        uploaded_at: row.get(7)?,
        sort_order: row.get(8)?,
        translated_content: row.get(9)?,
        translation_status: row
            .get::<_, String>(10)?
            .parse()
            .unwrap_or(TranslationStatus::None),
    })
}

const DOCUMENT_COLUMNS: &str = "id, name, original_path, doc_type, language, raw_content, \
     content_hash, uploaded_at, sort_order, translated_content, translation_status";

/// Map a sections row in column order
fn map_section_row(row: &Row<'_>) -> rusqlite::Result<SectionRecord> {
    Ok(SectionRecord {
        id: row.get(0)?,
        document_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        sort_order: row.get(4)?,
        level: row.get(5)?,
        status: row
            .get::<_, String>(6)?
            .parse()
            .unwrap_or(SectionStatus::Pending),
        created_at: row.get(7)?,
    })
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: StorageConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> anyhow::Result<Self> {
        let db = StorageConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> anyhow::Result<Self> {
        let db = StorageConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection, for stats and maintenance
    pub fn connection(&self) -> &StorageConnection {
        &self.db
    }

    // =========================================================================
    // Document Operations
    // =========================================================================

    /// Insert a new document, returning its assigned id
    pub async fn insert_document(&self, document: &DocumentRecord) -> Result<i64, StorageError> {
        let document = document.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO documents (
                        name, original_path, doc_type, language, raw_content,
                        content_hash, uploaded_at, sort_order, translated_content,
                        translation_status
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                    "#,
                    params![
                        document.name,
                        document.original_path,
                        document.doc_type.to_string(),
                        document.language,
                        document.raw_content,
                        document.content_hash,
                        document.uploaded_at,
                        document.sort_order,
                        document.translated_content,
                        document.translation_status.to_string(),
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    /// Get a document by id
    pub async fn get_document(&self, id: i64) -> Result<Option<DocumentRecord>, StorageError> {
        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        &format!("SELECT {} FROM documents WHERE id = ?1", DOCUMENT_COLUMNS),
                        [id],
                        map_document_row,
                    )
                    .optional()?;
                Ok(result)
            })
            .await
    }

    /// List all documents in manual sort order
    pub async fn list_documents(&self) -> Result<Vec<DocumentRecord>, StorageError> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM documents ORDER BY sort_order ASC, id ASC",
                    DOCUMENT_COLUMNS
                ))?;
                let documents = stmt
                    .query_map([], map_document_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(documents)
            })
            .await
    }

    /// Update a document's translation status
    pub async fn update_translation_status(
        &self,
        id: i64,
        status: TranslationStatus,
    ) -> Result<(), StorageError> {
        debug!("Document {} translation status -> {}", id, status);

        self.db
            .execute_async(move |conn| {
                let updated = conn.execute(
                    "UPDATE documents SET translation_status = ?1 WHERE id = ?2",
                    params![status.to_string(), id],
                )?;
                if updated == 0 {
                    return Err(StorageError::RecordNotFound(format!("document {}", id)));
                }
                Ok(())
            })
            .await
    }

    /// Persist translated content and status in one statement.
    ///
    /// Only a fully completed run stores translated content; failed runs go
    /// through `update_translation_status` and leave the column untouched.
    pub async fn update_document_translation(
        &self,
        id: i64,
        translated_content: String,
        status: TranslationStatus,
    ) -> Result<(), StorageError> {
        self.db
            .execute_async(move |conn| {
                let updated = conn.execute(
                    "UPDATE documents SET translated_content = ?1, translation_status = ?2 WHERE id = ?3",
                    params![translated_content, status.to_string(), id],
                )?;
                if updated == 0 {
                    return Err(StorageError::RecordNotFound(format!("document {}", id)));
                }
                Ok(())
            })
            .await
    }

    /// Delete a document; sections and proposals cascade
    pub async fn delete_document(&self, id: i64) -> Result<bool, StorageError> {
        self.db
            .execute_async(move |conn| {
                let deleted = conn.execute("DELETE FROM documents WHERE id = ?1", [id])?;
                Ok(deleted > 0)
            })
            .await
    }

    /// Persist new manual ordering positions.
    ///
    /// Independent point updates with no ordering requirement between them,
    /// so they are issued concurrently.
    pub async fn reorder_documents(&self, items: &[(i64, i64)]) -> Result<(), StorageError> {
        let updates = items.iter().map(|&(id, sort_order)| {
            self.db.execute_async(move |conn| {
                conn.execute(
                    "UPDATE documents SET sort_order = ?1 WHERE id = ?2",
                    params![sort_order, id],
                )?;
                Ok(())
            })
        });

        try_join_all(updates).await?;
        Ok(())
    }

    // =========================================================================
    // Section Operations
    // =========================================================================

    /// Insert extracted sections for a document in one transaction
    pub async fn insert_sections(
        &self,
        document_id: i64,
        sections: &[Section],
    ) -> Result<usize, StorageError> {
        let rows: Vec<SectionRecord> = sections
            .iter()
            .map(|s| {
                SectionRecord::new(
                    document_id,
                    s.title.clone(),
                    s.content.clone(),
                    s.order as i64,
                    s.level as i64,
                )
            })
            .collect();
        let count = rows.len();

        self.db
            .transaction_async(move |tx| {
                for row in &rows {
                    tx.execute(
                        r#"
                        INSERT INTO sections (document_id, title, content, sort_order, level, status, created_at)
                        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                        "#,
                        params![
                            row.document_id,
                            row.title,
                            row.content,
                            row.sort_order,
                            row.level,
                            row.status.to_string(),
                            row.created_at,
                        ],
                    )?;
                }
                Ok(())
            })
            .await?;

        Ok(count)
    }

    /// List a document's sections in document order
    pub async fn list_sections(&self, document_id: i64) -> Result<Vec<SectionRecord>, StorageError> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, document_id, title, content, sort_order, level, status, created_at
                     FROM sections WHERE document_id = ?1 ORDER BY sort_order ASC",
                )?;
                let sections = stmt
                    .query_map([document_id], map_section_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(sections)
            })
            .await
    }

    /// Update a section's review status
    pub async fn update_section_status(
        &self,
        section_id: i64,
        status: SectionStatus,
    ) -> Result<(), StorageError> {
        self.db
            .execute_async(move |conn| {
                let updated = conn.execute(
                    "UPDATE sections SET status = ?1 WHERE id = ?2",
                    params![status.to_string(), section_id],
                )?;
                if updated == 0 {
                    return Err(StorageError::RecordNotFound(format!("section {}", section_id)));
                }
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Proposal Operations
    // =========================================================================

    /// Create or update the single proposal for a section
    pub async fn upsert_proposal(
        &self,
        section_id: i64,
        content: String,
        notes: Option<String>,
    ) -> Result<(), StorageError> {
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO proposals (section_id, content, notes, updated_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(section_id) DO UPDATE SET
                        content = excluded.content,
                        notes = excluded.notes,
                        updated_at = excluded.updated_at
                    "#,
                    params![section_id, content, notes, now],
                )?;
                Ok(())
            })
            .await
    }

    /// Get the proposal for a section, if any
    pub async fn get_proposal(&self, section_id: i64) -> Result<Option<ProposalRecord>, StorageError> {
        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        "SELECT id, section_id, content, notes, updated_at
                         FROM proposals WHERE section_id = ?1",
                        [section_id],
                        |row| {
                            Ok(ProposalRecord {
                                id: row.get(0)?,
                                section_id: row.get(1)?,
                                content: row.get(2)?,
                                notes: row.get(3)?,
                                updated_at: row.get(4)?,
                            })
                        },
                    )
                    .optional()?;
                Ok(result)
            })
            .await
    }
}
