/*!
 * Streaming translation pipeline tests using the mock transform client
 */

use std::sync::Arc;

use doctran::errors::PipelineError;
use doctran::pipeline::events::TranslationEvent;
use doctran::pipeline::orchestrator::DocumentTranslator;
use doctran::providers::mock::{MockBehavior, MockTransformer};
use doctran::storage::models::TranslationStatus;
use doctran::storage::Repository;

use crate::common::{collect_events, init_test_logging, seed_document, test_repository};

/// Three ~30-char paragraphs with a 40-char bound -> three chunks
const THREE_CHUNK_CONTENT: &str =
    "first paragraph of the document\n\nsecond paragraph of the text\n\nthird paragraph closes it out";

const CHUNK_BOUND: usize = 40;

fn translator_with(repo: &Repository, mock: &MockTransformer, bound: usize) -> DocumentTranslator {
    init_test_logging();
    DocumentTranslator::new(repo.clone(), Arc::new(mock.clone()), "en", bound)
}

#[tokio::test]
async fn test_translate_singleChunk_shouldCompleteAndPersist() {
    let repo = test_repository();
    let id = seed_document(&repo, Some("A short document.")).await;
    let mock = MockTransformer::working();
    let translator = translator_with(&repo, &mock, 12_000);

    let events = collect_events(translator.translate(id).await.unwrap()).await;

    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        TranslationEvent::Progress {
            percent: 0,
            message: "Translating part 1 of 1 (1KB)...".to_string(),
        }
    );

    let expected = format!("{}\n\n", MockTransformer::transformed("A short document."));
    assert_eq!(
        events[1],
        TranslationEvent::Complete {
            text: expected.clone()
        }
    );

    let stored = repo.get_document(id).await.unwrap().unwrap();
    assert_eq!(stored.translation_status, TranslationStatus::Completed);
    assert_eq!(stored.translated_content.as_deref(), Some(expected.as_str()));
}

#[tokio::test]
async fn test_translate_multiChunk_shouldEmitOrderedProgressAndAccumulateInOrder() {
    let repo = test_repository();
    let id = seed_document(&repo, Some(THREE_CHUNK_CONTENT)).await;
    let mock = MockTransformer::working();
    let translator = translator_with(&repo, &mock, CHUNK_BOUND);

    let events = collect_events(translator.translate(id).await.unwrap()).await;

    // Three progress events then the terminal
    assert_eq!(events.len(), 4);
    let percents: Vec<u8> = events
        .iter()
        .filter_map(|e| match e {
            TranslationEvent::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();
    assert_eq!(percents, vec![0, 33, 66]);

    // The provider saw the chunks strictly in document order
    let received = mock.received_texts();
    assert_eq!(received.len(), 3);
    assert!(received[0].starts_with("first paragraph"));
    assert!(received[1].starts_with("second paragraph"));
    assert!(received[2].starts_with("third paragraph"));

    // The accumulator concatenates transformed chunks in the same order
    let expected: String = received
        .iter()
        .map(|chunk| format!("{}\n\n", MockTransformer::transformed(chunk)))
        .collect();
    assert_eq!(
        events.last().unwrap(),
        &TranslationEvent::Complete { text: expected }
    );
}

#[tokio::test]
async fn test_translate_failureOnSecondChunk_shouldStopAndMarkError() {
    let repo = test_repository();
    let id = seed_document(&repo, Some(THREE_CHUNK_CONTENT)).await;
    let mock = MockTransformer::fail_on(2);
    let translator = translator_with(&repo, &mock, CHUNK_BOUND);

    let events = collect_events(translator.translate(id).await.unwrap()).await;

    // Progress for chunks 1 and 2 (0% and 33%), then the error terminal
    assert_eq!(events.len(), 3);
    assert!(matches!(
        events[0],
        TranslationEvent::Progress { percent: 0, .. }
    ));
    assert!(matches!(
        events[1],
        TranslationEvent::Progress { percent: 33, .. }
    ));
    assert!(matches!(events[2], TranslationEvent::Error { .. }));

    // Chunk 3 was never attempted
    assert_eq!(mock.calls(), 2);

    // Status is error and no partial content was persisted
    let stored = repo.get_document(id).await.unwrap().unwrap();
    assert_eq!(stored.translation_status, TranslationStatus::Error);
    assert!(stored.translated_content.is_none());
}

#[tokio::test]
async fn test_translate_emptyContent_shouldFailBeforeAnyEvent() {
    let repo = test_repository();
    let blank_id = seed_document(&repo, Some("   \n\n  ")).await;
    let missing_id = seed_document(&repo, None).await;
    let mock = MockTransformer::working();
    let translator = translator_with(&repo, &mock, 12_000);

    for id in [blank_id, missing_id] {
        let result = translator.translate(id).await;
        assert!(matches!(result, Err(PipelineError::EmptyContent(_))));
    }

    // The provider was never called and no status was written
    assert_eq!(mock.calls(), 0);
    let stored = repo.get_document(blank_id).await.unwrap().unwrap();
    assert_eq!(stored.translation_status, TranslationStatus::None);
}

#[tokio::test]
async fn test_translate_unknownDocument_shouldFailWithNotFound() {
    let repo = test_repository();
    let mock = MockTransformer::working();
    let translator = translator_with(&repo, &mock, 12_000);

    let result = translator.translate(999).await;
    assert!(matches!(result, Err(PipelineError::NotFound(999))));
}

#[tokio::test]
async fn test_translate_concurrentStart_shouldBeRejectedWhileRunInFlight() {
    let repo = test_repository();
    let id = seed_document(&repo, Some(THREE_CHUNK_CONTENT)).await;
    let mock = MockTransformer::new(MockBehavior::Slow { delay_ms: 50 });
    let translator = translator_with(&repo, &mock, CHUNK_BOUND);

    let stream = translator.translate(id).await.unwrap();

    // A second start for the same document races on status writes; reject it
    let second = translator.translate(id).await;
    assert!(matches!(second, Err(PipelineError::RunInProgress(_))));

    // After the run finishes the slot is free again
    let events = collect_events(stream).await;
    assert!(events.last().unwrap().is_terminal());

    let third = translator.translate(id).await;
    assert!(third.is_ok());
    collect_events(third.unwrap()).await;
}

#[tokio::test]
async fn test_translate_fencedProviderOutput_shouldBeStripped() {
    let repo = test_repository();
    let id = seed_document(&repo, Some("Fenced output document.")).await;
    let mock = MockTransformer::fenced();
    let translator = translator_with(&repo, &mock, 12_000);

    let events = collect_events(translator.translate(id).await.unwrap()).await;

    let TranslationEvent::Complete { text } = events.last().unwrap() else {
        panic!("expected a complete terminal event, got {:?}", events);
    };
    assert!(!text.contains("```"));
    assert!(text.contains("<p>[T] Fenced output document.</p>"));
}

#[tokio::test]
async fn test_translate_eventStream_shouldHaveExactlyOneTerminalAndMonotonicPercent() {
    let repo = test_repository();
    let id = seed_document(&repo, Some(THREE_CHUNK_CONTENT)).await;
    let mock = MockTransformer::working();
    let translator = translator_with(&repo, &mock, CHUNK_BOUND);

    let events = collect_events(translator.translate(id).await.unwrap()).await;

    let terminal_count = events.iter().filter(|e| e.is_terminal()).count();
    assert_eq!(terminal_count, 1);
    assert!(events.last().unwrap().is_terminal());

    let percents: Vec<u8> = events
        .iter()
        .filter_map(|e| match e {
            TranslationEvent::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();
    assert!(percents.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_translate_afterFailedRun_shouldAllowFreshRunThatOverwrites() {
    let repo = test_repository();
    let id = seed_document(&repo, Some(THREE_CHUNK_CONTENT)).await;

    // First run fails on the last chunk
    let failing = MockTransformer::fail_on(3);
    let translator = translator_with(&repo, &failing, CHUNK_BOUND);
    let events = collect_events(translator.translate(id).await.unwrap()).await;
    assert!(matches!(events.last(), Some(TranslationEvent::Error { .. })));

    let stored = repo.get_document(id).await.unwrap().unwrap();
    assert_eq!(stored.translation_status, TranslationStatus::Error);

    // A fresh run with a healthy provider overwrites the error state
    let working = MockTransformer::working();
    let translator = translator_with(&repo, &working, CHUNK_BOUND);
    let events = collect_events(translator.translate(id).await.unwrap()).await;
    assert!(matches!(events.last(), Some(TranslationEvent::Complete { .. })));

    let stored = repo.get_document(id).await.unwrap().unwrap();
    assert_eq!(stored.translation_status, TranslationStatus::Completed);
    assert!(stored.translated_content.is_some());
}
