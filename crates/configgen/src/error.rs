//! Error types for the configgen crate

use thiserror::Error;

/// Errors that can occur while reading a configuration document
#[derive(Error, Debug)]
pub enum Error {
    /// The document is not well-formed XML
    #[error("XML error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// The document parsed but has no usable structure (e.g. no root element)
    #[error("malformed document: {0}")]
    Malformed(String),

    /// An extracted section violates a configuration invariant
    #[error("invalid {section} '{name}': {message}")]
    Validation {
        section: &'static str,
        name: String,
        message: String,
    },
}

/// Result type for configgen operations
pub type Result<T> = std::result::Result<T, Error>;
