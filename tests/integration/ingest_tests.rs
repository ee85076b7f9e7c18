/*!
 * End-to-end ingestion tests over real temp files
 */

use doctran::ingest::DocumentIngestor;
use doctran::storage::models::DocumentType;

use crate::common::{
    create_temp_dir, create_test_file, init_test_logging, test_repository, SAMPLE_MARKUP,
};

#[tokio::test]
async fn test_ingestFile_mainMarkup_shouldStoreDocumentAndSections() {
    init_test_logging();
    let repo = test_repository();
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(&dir.path().to_path_buf(), "spec.html", SAMPLE_MARKUP).unwrap();

    let ingestor = DocumentIngestor::new(repo.clone());
    let report = ingestor
        .ingest_file(&path, DocumentType::Main, "de")
        .await
        .unwrap();

    assert_eq!(report.section_count, 2);

    let document = repo.get_document(report.document_id).await.unwrap().unwrap();
    assert_eq!(document.name, "spec.html");
    assert_eq!(document.doc_type, DocumentType::Main);
    assert_eq!(document.language, "de");
    assert_eq!(document.raw_content.as_deref(), Some(SAMPLE_MARKUP));
    // 64 hex chars of SHA-256
    assert_eq!(document.content_hash.as_ref().unwrap().len(), 64);

    let sections = repo.list_sections(report.document_id).await.unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, "Introduction");
    assert_eq!(sections[1].title, "Scope");
    // The preamble paragraph was dropped from section content
    assert!(!sections[0].content.contains("Converted from"));
}

#[tokio::test]
async fn test_ingestFile_referenceMarkup_shouldSkipSectionExtraction() {
    let repo = test_repository();
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(&dir.path().to_path_buf(), "ref.html", SAMPLE_MARKUP).unwrap();

    let ingestor = DocumentIngestor::new(repo.clone());
    let report = ingestor
        .ingest_file(&path, DocumentType::Reference, "de")
        .await
        .unwrap();

    assert_eq!(report.section_count, 0);
    assert!(repo.list_sections(report.document_id).await.unwrap().is_empty());

    // Raw content is still stored for translation
    let document = repo.get_document(report.document_id).await.unwrap().unwrap();
    assert_eq!(document.raw_content.as_deref(), Some(SAMPLE_MARKUP));
}

#[tokio::test]
async fn test_ingestFile_plainText_shouldBecomeSingleSectionTitledAfterFile() {
    let repo = test_repository();
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        &dir.path().to_path_buf(),
        "meeting-notes.txt",
        "Flat text without any markup.",
    )
    .unwrap();

    let ingestor = DocumentIngestor::new(repo.clone());
    let report = ingestor
        .ingest_file(&path, DocumentType::Main, "en")
        .await
        .unwrap();

    assert_eq!(report.section_count, 1);
    let sections = repo.list_sections(report.document_id).await.unwrap();
    assert_eq!(sections[0].title, "meeting-notes");
    assert_eq!(sections[0].level, 1);
}

#[tokio::test]
async fn test_ingestFile_unsupportedExtension_shouldFail() {
    let repo = test_repository();
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(&dir.path().to_path_buf(), "scan.pdf", "binaryish").unwrap();

    let ingestor = DocumentIngestor::new(repo);
    let result = ingestor.ingest_file(&path, DocumentType::Main, "en").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_ingestFile_unknownLanguage_shouldFail() {
    let repo = test_repository();
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(&dir.path().to_path_buf(), "doc.html", SAMPLE_MARKUP).unwrap();

    let ingestor = DocumentIngestor::new(repo);
    let result = ingestor.ingest_file(&path, DocumentType::Main, "zz").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_ingestFolder_shouldIngestSupportedFilesAndSkipOthers() {
    let repo = test_repository();
    let dir = create_temp_dir().unwrap();
    let dir_path = dir.path().to_path_buf();

    create_test_file(&dir_path, "one.html", SAMPLE_MARKUP).unwrap();
    create_test_file(&dir_path, "two.txt", "Plain reference text.").unwrap();
    create_test_file(&dir_path, "ignored.docx", "not supported").unwrap();

    let ingestor = DocumentIngestor::new(repo.clone());
    let reports = ingestor
        .ingest_folder(dir.path(), DocumentType::Reference, "de")
        .await
        .unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(repo.list_documents().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_ingestFolder_withEmptyDirectory_shouldReturnNoReports() {
    let repo = test_repository();
    let dir = create_temp_dir().unwrap();

    let ingestor = DocumentIngestor::new(repo);
    let reports = ingestor
        .ingest_folder(dir.path(), DocumentType::Reference, "en")
        .await
        .unwrap();

    assert!(reports.is_empty());
}
