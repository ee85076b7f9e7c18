/*!
 * Transform provider implementations.
 *
 * This module contains client implementations for the external text
 * transformation step:
 * - OpenAI: chat completions API
 * - Anthropic: messages API
 * - Mock: configurable test double
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::TransformError;

/// Common trait for all transform providers.
///
/// The orchestrator holds the client as a trait object so the adapter is
/// swappable at construction time and mockable in tests.
#[async_trait]
pub trait TransformClient: Send + Sync + Debug {
    /// Transform a piece of text under a system instruction
    ///
    /// # Arguments
    /// * `system` - System instruction guiding the transformation
    /// * `text` - The text to transform
    ///
    /// # Returns
    /// * `Result<String, TransformError>` - The transformed text or an error
    async fn transform(&self, system: &str, text: &str) -> Result<String, TransformError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), TransformError>;

    /// Short provider name for logs and status output
    fn name(&self) -> &str;
}

pub mod anthropic;
pub mod mock;
pub mod openai;
