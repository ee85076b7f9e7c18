/*!
 * Progress events emitted by a translation run.
 *
 * Events serialize to the newline-delimited JSON shape consumed by clients:
 * `{"type":"progress",...}`, `{"type":"complete",...}`, `{"type":"error",...}`.
 * A run emits zero or more progress events followed by exactly one terminal
 * event, in emission order.
 */

use serde::{Deserialize, Serialize};

/// One event in a translation run's ordered progress stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TranslationEvent {
    /// A chunk is about to be transformed
    Progress {
        /// Completed percentage, floor(100 * done / total), 0..=100
        percent: u8,
        /// Human-readable status naming the current chunk
        message: String,
    },
    /// Terminal: all chunks transformed and persisted
    Complete {
        /// The full accumulated translation
        text: String,
    },
    /// Terminal: the run stopped early
    Error {
        /// Failure description
        message: String,
    },
}

impl TranslationEvent {
    /// Whether this event closes the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }

    /// Serialize to a single NDJSON line (with trailing newline)
    pub fn to_ndjson(&self) -> String {
        // Serialization of this enum cannot fail
        let mut line = serde_json::to_string(self).unwrap_or_default();
        line.push('\n');
        line
    }
}
