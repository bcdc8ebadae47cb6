//! Error types for extraction and persistence.
//!
//! Extraction errors are fatal to a run. Gateway errors are reported per
//! table and per row so the pipeline can skip and continue.

use std::path::PathBuf;

use thiserror::Error;

/// Error raised while reading tables out of a PDF.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input path does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input exists but could not be parsed as a PDF.
    #[error("failed to open PDF {}: {message}", path.display())]
    Open { path: PathBuf, message: String },

    /// A page could not be loaded or interpreted.
    #[error("failed to read page {page}: {message}")]
    Page { page: usize, message: String },

    /// The page selection does not fit the document.
    #[error("invalid page selection: {0}")]
    InvalidPages(String),
}

/// Error raised by a [`TableSink`](crate::TableSink).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The database connection could not be established.
    #[error("failed to connect to MySQL: {0}")]
    Connect(#[from] mysql::Error),

    /// `CREATE TABLE` was rejected.
    #[error("failed to create table `{table}`: {message}")]
    CreateTable { table: String, message: String },

    /// A single row insert was rejected.
    #[error("failed to insert row {row} into `{table}`: {message}")]
    Insert {
        table: String,
        row: usize,
        message: String,
    },

    /// Starting, preparing, or committing the per-table transaction failed.
    #[error("transaction on `{table}` failed: {message}")]
    Transaction { table: String, message: String },
}
