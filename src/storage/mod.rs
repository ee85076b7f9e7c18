/*!
 * Storage module for persistent documents, sections, and proposals.
 *
 * This module provides SQLite-based persistence for:
 * - Ingested documents with raw and translated content
 * - Sections extracted from the main document
 * - Draft proposals attached to sections
 */

// Allow dead code - storage types are for library consumers
#![allow(dead_code)]

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::StorageConnection;
pub use repository::Repository;
