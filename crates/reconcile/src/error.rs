//! Error types for reconciliation.
//!
//! Every error raised inside a reconciliation pass carries the context that
//! identifies it: the sub-path that could not be read, or the command and
//! entity type that could not be staged.

use thiserror::Error;

/// Errors that can occur while reconciling declared state with a live core.
#[derive(Debug, Error)]
pub enum Error {
    /// A descriptor or response is not of the kind the handler expects
    #[error("invalid config node, expected {expected} but got {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Reading the current state of a sub-path failed
    #[error("unable to retrieve current state for sub path {path}")]
    Lookup {
        path: String,
        #[source]
        source: Box<Error>,
    },

    /// The manager rejected a staged command
    #[error("unable to add command {command} for type {entity_type}")]
    Mutation {
        command: String,
        entity_type: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// Declared input violates a configuration invariant
    #[error("invalid configuration: {0}")]
    Validation(String),

    /// Command sent to a manager bound to a different API
    #[error("command {command} is not supported by the {api} API")]
    UnsupportedCommand { command: String, api: &'static str },

    /// The server answered with an error payload
    #[error("solr returned error {code}: {message}")]
    Remote { code: i64, message: String },

    /// The request never produced a usable response
    #[error("transport error: {message}")]
    Transport { message: String, retryable: bool },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Transport failure that may succeed on a later attempt
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Transport failure that will not go away by retrying
    pub fn permanent(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Whether the operation is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                retryable: true,
                ..
            }
        )
    }
}

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_is_retryable() {
        assert!(Error::transient("connection reset").is_retryable());
        assert!(!Error::permanent("bad url").is_retryable());
        assert!(
            !Error::Remote {
                code: 500,
                message: "boom".into()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_lookup_keeps_source() {
        let err = Error::Lookup {
            path: "fields".into(),
            source: Box::new(Error::permanent("refused")),
        };

        assert_eq!(
            err.to_string(),
            "unable to retrieve current state for sub path fields"
        );
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("transport error: refused")
        );
    }
}
