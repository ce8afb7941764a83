//! Error types for the deckgen library.

use std::io;
use thiserror::Error;

/// Result type alias for deckgen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or writing a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// The request is malformed or ambiguous.
    #[error("Invalid request field `{field}`: {message}")]
    Validation {
        /// Name of the offending request field
        field: &'static str,
        /// Human-readable description
        message: String,
    },

    /// The request body exceeds the configured size limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The template lacks a region or layout the deck needs.
    #[error("Layout error: {0}")]
    Layout(String),

    /// The finished deck could not be written out.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Builder options are inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Invalid or malformed data in the template package.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Failure outside the deck pipeline (worker threads, server startup).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a validation error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    /// Whether the caller, not the service, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation { .. } | Error::PayloadTooLarge(_))
    }

    /// Stable snake_case code for the error family.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "validation_error",
            Error::PayloadTooLarge(_) => "payload_too_large",
            Error::Layout(_) => "layout_error",
            Error::Serialization(_) => "serialization_error",
            Error::Config(_) => "config_error",
            Error::Io(_)
            | Error::ZipArchive(_)
            | Error::XmlParse(_)
            | Error::MissingComponent(_)
            | Error::InvalidData(_)
            | Error::Internal(_) => "internal_error",
        }
    }

    /// Message safe to show to an untrusted caller.
    ///
    /// Validation messages describe the caller's own input and pass through;
    /// everything else is reduced to a generic sentence without paths or
    /// source error text.
    pub fn public_message(&self) -> String {
        match self {
            Error::Validation { message, .. } => message.clone(),
            Error::PayloadTooLarge(_) => "request body is too large".to_string(),
            Error::Layout(_) => "the slide template cannot hold this content".to_string(),
            Error::Serialization(_) => "failed to write the generated deck".to_string(),
            _ => "deck generation failed".to_string(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}
