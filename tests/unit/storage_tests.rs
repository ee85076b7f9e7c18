/*!
 * Repository persistence tests against an in-memory database
 */

use doctran::segmenter::segment;
use doctran::storage::models::{DocumentRecord, DocumentType, SectionStatus, TranslationStatus};

use crate::common::{seed_document, test_repository, SAMPLE_MARKUP};

#[tokio::test]
async fn test_insertDocument_shouldAssignIdAndRoundTrip() {
    let repo = test_repository();

    let document = DocumentRecord::new(
        "spec.html".to_string(),
        Some("/tmp/spec.html".to_string()),
        DocumentType::Main,
        "de".to_string(),
        Some("<h1>Title</h1>".to_string()),
        Some("abc123".to_string()),
    );

    let id = repo.insert_document(&document).await.unwrap();
    assert!(id > 0);

    let stored = repo.get_document(id).await.unwrap().unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.name, "spec.html");
    assert_eq!(stored.doc_type, DocumentType::Main);
    assert_eq!(stored.language, "de");
    assert_eq!(stored.raw_content.as_deref(), Some("<h1>Title</h1>"));
    assert_eq!(stored.content_hash.as_deref(), Some("abc123"));
    assert_eq!(stored.translation_status, TranslationStatus::None);
    assert!(stored.translated_content.is_none());
}

#[tokio::test]
async fn test_getDocument_withUnknownId_shouldReturnNone() {
    let repo = test_repository();
    assert!(repo.get_document(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_listDocuments_shouldFollowManualSortOrder() {
    let repo = test_repository();

    let first = seed_document(&repo, Some("a")).await;
    let second = seed_document(&repo, Some("b")).await;
    let third = seed_document(&repo, Some("c")).await;

    // Move the last document to the front
    repo.reorder_documents(&[(third, 0), (first, 1), (second, 2)])
        .await
        .unwrap();

    let documents = repo.list_documents().await.unwrap();
    let ids: Vec<i64> = documents.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![third, first, second]);
}

#[tokio::test]
async fn test_updateTranslationStatus_shouldPersist() {
    let repo = test_repository();
    let id = seed_document(&repo, Some("content")).await;

    repo.update_translation_status(id, TranslationStatus::InProgress)
        .await
        .unwrap();

    let stored = repo.get_document(id).await.unwrap().unwrap();
    assert_eq!(stored.translation_status, TranslationStatus::InProgress);
    assert!(stored.has_stale_run());
}

#[tokio::test]
async fn test_updateTranslationStatus_withUnknownId_shouldFail() {
    let repo = test_repository();
    let result = repo
        .update_translation_status(12345, TranslationStatus::Error)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_updateDocumentTranslation_shouldStoreTextAndStatusTogether() {
    let repo = test_repository();
    let id = seed_document(&repo, Some("content")).await;

    repo.update_document_translation(
        id,
        "<p>translated</p>\n\n".to_string(),
        TranslationStatus::Completed,
    )
    .await
    .unwrap();

    let stored = repo.get_document(id).await.unwrap().unwrap();
    assert_eq!(stored.translated_content.as_deref(), Some("<p>translated</p>\n\n"));
    assert_eq!(stored.translation_status, TranslationStatus::Completed);
}

#[tokio::test]
async fn test_insertSections_shouldPreserveDocumentOrder() {
    let repo = test_repository();
    let id = seed_document(&repo, Some(SAMPLE_MARKUP)).await;

    let sections = segment(SAMPLE_MARKUP);
    let count = repo.insert_sections(id, &sections).await.unwrap();
    assert_eq!(count, 2);

    let stored = repo.list_sections(id).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].title, "Introduction");
    assert_eq!(stored[0].sort_order, 0);
    assert_eq!(stored[0].level, 1);
    assert_eq!(stored[0].status, SectionStatus::Pending);
    assert_eq!(stored[1].title, "Scope");
    assert_eq!(stored[1].sort_order, 1);
    assert_eq!(stored[1].level, 2);
}

#[tokio::test]
async fn test_updateSectionStatus_shouldPersist() {
    let repo = test_repository();
    let id = seed_document(&repo, Some(SAMPLE_MARKUP)).await;
    repo.insert_sections(id, &segment(SAMPLE_MARKUP)).await.unwrap();

    let sections = repo.list_sections(id).await.unwrap();
    repo.update_section_status(sections[0].id, SectionStatus::Complete)
        .await
        .unwrap();

    let updated = repo.list_sections(id).await.unwrap();
    assert_eq!(updated[0].status, SectionStatus::Complete);
    assert_eq!(updated[1].status, SectionStatus::Pending);
}

#[tokio::test]
async fn test_deleteDocument_shouldCascadeToSectionsAndProposals() {
    let repo = test_repository();
    let id = seed_document(&repo, Some(SAMPLE_MARKUP)).await;
    repo.insert_sections(id, &segment(SAMPLE_MARKUP)).await.unwrap();

    let sections = repo.list_sections(id).await.unwrap();
    repo.upsert_proposal(sections[0].id, "draft".to_string(), None)
        .await
        .unwrap();

    assert!(repo.delete_document(id).await.unwrap());

    assert!(repo.get_document(id).await.unwrap().is_none());
    assert!(repo.list_sections(id).await.unwrap().is_empty());
    assert!(repo.get_proposal(sections[0].id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deleteDocument_withUnknownId_shouldReturnFalse() {
    let repo = test_repository();
    assert!(!repo.delete_document(999).await.unwrap());
}

#[tokio::test]
async fn test_upsertProposal_shouldInsertThenUpdate() {
    let repo = test_repository();
    let id = seed_document(&repo, Some(SAMPLE_MARKUP)).await;
    repo.insert_sections(id, &segment(SAMPLE_MARKUP)).await.unwrap();
    let section_id = repo.list_sections(id).await.unwrap()[0].id;

    repo.upsert_proposal(section_id, "first draft".to_string(), None)
        .await
        .unwrap();

    let first = repo.get_proposal(section_id).await.unwrap().unwrap();
    assert_eq!(first.content, "first draft");
    assert!(first.notes.is_none());

    repo.upsert_proposal(
        section_id,
        "second draft".to_string(),
        Some("reviewed".to_string()),
    )
    .await
    .unwrap();

    let second = repo.get_proposal(section_id).await.unwrap().unwrap();
    assert_eq!(second.content, "second draft");
    assert_eq!(second.notes.as_deref(), Some("reviewed"));
    // Still a single row per section
    assert_eq!(second.section_id, section_id);
    assert_eq!(second.id, first.id);
}

#[tokio::test]
async fn test_getProposal_withoutDraft_shouldReturnNone() {
    let repo = test_repository();
    let id = seed_document(&repo, Some(SAMPLE_MARKUP)).await;
    repo.insert_sections(id, &segment(SAMPLE_MARKUP)).await.unwrap();
    let section_id = repo.list_sections(id).await.unwrap()[0].id;

    assert!(repo.get_proposal(section_id).await.unwrap().is_none());
}
