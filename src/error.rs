//! Gateway error taxonomy.
//!
//! | Kind | Disposition |
//! |---|---|
//! | `InvalidInputFormat` | answered with the invalid-input envelope |
//! | `Configuration` | fatal at setup, 500 if met while serving |
//! | `NotFound` | 404 plain text |
//! | `Domain` | answered with the mapped envelope |
//! | `Unexpected` | 500 plain text, never protocol-shaped |

use thiserror::Error;

use crate::cipher::CipherError;
use crate::format::error_envelope::{ErrorEnvelope, INVALID_INPUT_CODE, INVALID_INPUT_REASON};
use crate::format::{Format, FormatError};
use crate::storage::StorageError;

/// Errors surfaced by the registry and dispatcher.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Body does not match the endpoint's input format.
    #[error("Invalid input {format}: {reason}")]
    InvalidInputFormat {
        format: Format,
        reason: String,
        body: String,
    },

    /// Setup fault or handler bug.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No exact match and no default endpoint.
    #[error("Method Not Found: {0}")]
    NotFound(String),

    /// Application failure raised by a handler.
    #[error("Domain error: {0}")]
    Domain(DomainError),

    /// Anything else.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<FormatError> for GatewayError {
    fn from(e: FormatError) -> Self {
        match e {
            FormatError::InvalidInput { format, reason, body } => {
                GatewayError::InvalidInputFormat { format, reason, body }
            }
            mismatch @ FormatError::ShapeMismatch { .. } => {
                GatewayError::Configuration(mismatch.to_string())
            }
        }
    }
}

/// Cipher failures on request bodies are turned into `FormatError` by the
/// transcoder; what reaches here comes from building a cipher.
impl From<CipherError> for GatewayError {
    fn from(e: CipherError) -> Self {
        GatewayError::Configuration(e.to_string())
    }
}

impl From<HandlerError> for GatewayError {
    fn from(e: HandlerError) -> Self {
        match e {
            HandlerError::Domain(domain) => GatewayError::Domain(domain),
            other => GatewayError::Unexpected(other.to_string()),
        }
    }
}

/// Application-level failure carried to the client as a legacy error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code} {reason}")]
pub struct DomainError {
    pub code: String,
    pub reason: String,
    pub message: String,
    pub action: String,
}

impl DomainError {
    pub fn new(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            reason: reason.into(),
            message: String::new(),
            action: String::new(),
        }
    }

    /// `538.07 Invalid Input!`
    pub fn invalid_input() -> Self {
        Self::new(INVALID_INPUT_CODE, INVALID_INPUT_REASON)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }
}

impl From<DomainError> for ErrorEnvelope {
    fn from(e: DomainError) -> Self {
        ErrorEnvelope::new(e.code, e.reason, e.message, e.action)
    }
}

/// Failure returned by an endpoint handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Other(String),
}
