/*!
 * # doctran - Technical Document Translation Workbench
 *
 * A Rust library for ingesting long-form technical documents and translating
 * them with AI providers.
 *
 * ## Features
 *
 * - Split heading-delimited markup into titled sections
 * - Chunk long raw content along paragraph boundaries
 * - Translate documents chunk-by-chunk using AI providers:
 *   - OpenAI API
 *   - Anthropic API
 * - Stream live progress events during translation
 * - Persist documents, sections, and proposals in SQLite
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `segmenter`: Heading-boundary section extraction
 * - `chunker`: Normalization and bounded chunking of raw text
 * - `pipeline`: Chunked streaming translation runs:
 *   - `pipeline::orchestrator`: Sequential chunk loop and run locking
 *   - `pipeline::events`: Ordered progress event stream
 * - `ingest`: File and directory ingestion
 * - `storage`: SQLite persistence for documents, sections, and proposals
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::openai`: OpenAI API client
 *   - `providers::anthropic`: Anthropic API client
 *   - `providers::mock`: Configurable test double
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod chunker;
pub mod errors;
pub mod ingest;
pub mod pipeline;
pub mod providers;
pub mod segmenter;
pub mod storage;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, PipelineError, StorageError, TransformError};
pub use ingest::DocumentIngestor;
pub use pipeline::{DocumentTranslator, TranslationEvent};
pub use segmenter::{segment, Section};
pub use storage::Repository;
