//! Error taxonomy for analysis operations.

use thiserror::Error;

/// Errors that can occur during analysis.
///
/// Syntactically broken source is NOT an error: tree-sitter degrades to
/// ERROR nodes inside the returned tree, and `AnalysisResult::errors`
/// carries human-readable notes for them.
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown language identifier.
    #[error("language {0:?} not supported")]
    UnsupportedLanguage(String),

    /// File extension not mapped to any supported language.
    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    /// A tree-sitter pattern query failed to compile.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The parser produced no tree at all (parser misconfiguration,
    /// not malformed input).
    #[error("failed to parse source: {0}")]
    Parse(String),

    /// Source file unreadable (caller layer concern).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
