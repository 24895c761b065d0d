use std::io;
use std::result;

use thiserror::Error;

/// Error types for PubMed fetching, parsing and export
#[derive(Error, Debug)]
pub enum PubMedError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Non-success HTTP status from an E-utilities endpoint
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// XML parsing failed
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// A mandatory element was missing from an article record
    #[error("Missing required element: {field}")]
    MissingField { field: &'static str },

    /// The requested result cap was not a positive integer
    #[error("Maximum results must be a positive integer, got {value}")]
    InvalidMaxResults { value: usize },

    /// IO error for file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV serialization failed
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = result::Result<T, PubMedError>;

impl From<quick_xml::Error> for PubMedError {
    fn from(err: quick_xml::Error) -> Self {
        PubMedError::XmlError(err.to_string())
    }
}

impl From<quick_xml::de::DeError> for PubMedError {
    fn from(err: quick_xml::de::DeError) -> Self {
        PubMedError::XmlError(format!("Failed to deserialize XML: {}", err))
    }
}
