use std::io;
use thiserror::Error;

/// Errors produced while parsing a `.dbc` file.
#[derive(Debug, Error)]
pub enum DbcParseError {
    #[error("Not a valid .dbc file: {path}")]
    InvalidExtension { path: String },
    #[error("Failed to open '{path}'. \nError: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed while reading '{path}'. \nError: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Line {line}: malformed {keyword} record ({reason})")]
    Malformed {
        line: usize,
        keyword: String,
        reason: String,
    },
}

/// Errors produced while turning a database into canonical text.
#[derive(Debug, Error)]
pub enum CanonicalizeError {
    #[error("Non-finite number in {field}: DBC has no representation for NaN or infinity")]
    NonFinite { field: String },
}

/// Errors produced by [`format_str`](crate::canonical::format_str): parse, then canonicalize.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Parse(#[from] DbcParseError),
    #[error(transparent)]
    Canonicalize(#[from] CanonicalizeError),
}

/// Errors produced while saving DBC text into a `.dbc` file.
#[derive(Debug, Error)]
pub enum DbcSaveError {
    #[error("Output path must end in .dbc: {path}")]
    InvalidExtension { path: String },
    #[error("Failed to create '{path}'. \nError: {source}")]
    CreateFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to create directories for '{path}'. \nError: {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed while writing '{path}'. \nError: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}
