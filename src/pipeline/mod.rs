/*!
 * Chunked streaming translation pipeline.
 *
 * A translation run chunks a document's raw content, pushes each chunk through
 * the transform provider strictly in order, and streams progress events to a
 * single consumer. Completed runs persist their output; failed runs persist
 * only the error status.
 */

pub mod events;
pub mod orchestrator;

pub use events::TranslationEvent;
pub use orchestrator::DocumentTranslator;
