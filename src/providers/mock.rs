/*!
 * Mock transform client for testing.
 *
 * Behavior modes cover the failure surface the pipeline has to tolerate:
 * - `MockTransformer::working()` - Always succeeds with transformed text
 * - `MockTransformer::failing()` - Always fails with an error
 * - `MockTransformer::fail_on(n)` - Fails on the nth call (1-based)
 * - `MockTransformer::fenced()` - Wraps output in markdown code fences
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::TransformError;
use crate::providers::TransformClient;

/// Behavior mode for the mock transformer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a tagged transformation
    Working,
    /// Always fails with an error
    Failing,
    /// Fails on the nth call (1-based), succeeds otherwise
    FailOn { call: usize },
    /// Succeeds but wraps the output in ```html fences
    Fenced,
    /// Returns an empty response
    Empty,
    /// Simulates a slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock transform client for testing pipeline behavior
#[derive(Debug)]
pub struct MockTransformer {
    /// Behavior mode
    behavior: MockBehavior,
    /// Call counter shared across clones
    call_count: Arc<AtomicUsize>,
    /// Texts received, in call order
    received: Arc<Mutex<Vec<String>>>,
}

impl MockTransformer {
    /// Create a new mock with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails on the nth call (1-based)
    pub fn fail_on(call: usize) -> Self {
        Self::new(MockBehavior::FailOn { call })
    }

    /// Create a mock that wraps its output in code fences
    pub fn fenced() -> Self {
        Self::new(MockBehavior::Fenced)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of transform calls made so far
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Texts received so far, in call order
    pub fn received_texts(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// The canonical mock output for an input text
    pub fn transformed(text: &str) -> String {
        format!("<p>[T] {}</p>", text)
    }
}

impl Clone for MockTransformer {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            call_count: Arc::clone(&self.call_count),
            received: Arc::clone(&self.received),
        }
    }
}

#[async_trait]
impl TransformClient for MockTransformer {
    async fn transform(&self, _system: &str, text: &str) -> Result<String, TransformError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.received.lock().unwrap().push(text.to_string());

        match self.behavior {
            MockBehavior::Working => Ok(Self::transformed(text)),

            MockBehavior::Failing => Err(TransformError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::FailOn { call: fail_call } => {
                if call == fail_call {
                    Err(TransformError::ApiError {
                        status_code: 503,
                        message: format!("Simulated failure on call {}", call),
                    })
                } else {
                    Ok(Self::transformed(text))
                }
            }

            MockBehavior::Fenced => Ok(format!("```html\n{}\n```", Self::transformed(text))),

            MockBehavior::Empty => Ok(String::new()),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(Self::transformed(text))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), TransformError> {
        match self.behavior {
            MockBehavior::Failing => Err(TransformError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
