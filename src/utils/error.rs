//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing a TCX document
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("XML is not well-formed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid attribute syntax: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("document has no root element")]
    NoRoot,

    #[error("unexpected closing tag </{0}>")]
    UnexpectedClose(String),

    #[error("unclosed element <{0}>")]
    UnclosedTag(String),

    #[error("content after the root element")]
    TrailingContent,

    #[error("invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        source: chrono::ParseError,
    },
}

/// Errors that can occur during serialization and file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("XML serialization failed: {0}")]
    SerializationFailed(#[from] quick_xml::Error),

    #[error("serialized output is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    #[error("failed to serialize report: {0}")]
    ReportFailed(#[from] serde_json::Error),

    #[error("invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors surfaced by the core conversion pipeline
///
/// The CLI layer maps these to user-facing messages and a non-zero
/// exit status.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("unexpected I/O failure: {0}")]
    Unexpected(#[from] std::io::Error),
}
