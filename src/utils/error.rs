// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to run {tool}: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("PDF parsing error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Could not determine page count: {0}")]
    PageCount(String),

    #[error("Word document error: {0}")]
    Word(String),

    #[error("OCR error on page {page}: {message}")]
    Ocr { page: u32, message: String },

    #[error("Scratch file error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read configuration {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration has no general.scope entry")]
    MissingScope,

    #[error("Invalid question at {path}: {reason}")]
    InvalidQuestion { path: String, reason: String },

    #[error("Invalid pattern at {path}: {source}")]
    InvalidPattern {
        path: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Package error: {0}")]
    Package(#[from] zip::result::ZipError),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A message template that cannot be filled from a match. Scoped to one question node.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("placeholder '{{{0}}}' has no captured value")]
    Unavailable(String),

    #[error("unclosed '{{' in template")]
    Unclosed,

    #[error("single '}}' in template")]
    StrayBrace,
}
