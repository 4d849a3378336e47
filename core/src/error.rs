//! Error types for the runlog API client.
//!
//! # Design
//! Everything the backend or the transport reports collapses into
//! `RequestFailed`, which carries only a human-readable message: the
//! backend's `message` field when it sent one, otherwise the operation's
//! fallback string. Decoding and encoding problems are kept apart so a
//! malformed 2xx response is never mistaken for a server-side rejection.

use crate::operation::Operation;

/// Errors returned by `RunlogApi` parse methods and by hosts executing
/// its requests.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered outside the 2xx class, or the request never
    /// completed. `Display` is exactly the message.
    #[error("{message}")]
    RequestFailed { message: String },

    /// A 2xx body did not decode into the expected type, or decoded into
    /// values that fail the structural checks.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// Failure carrying the operation's fixed fallback message.
    pub fn fallback(operation: Operation) -> Self {
        ApiError::RequestFailed {
            message: operation.fallback_message().to_string(),
        }
    }

    /// The human-readable message for any variant.
    pub fn message(&self) -> String {
        match self {
            ApiError::RequestFailed { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_displays_bare_message() {
        let err = ApiError::RequestFailed {
            message: "session not found".to_string(),
        };
        assert_eq!(err.to_string(), "session not found");
        assert_eq!(err.message(), "session not found");
    }

    #[test]
    fn fallback_uses_operation_message() {
        let err = ApiError::fallback(Operation::DeleteGoal);
        assert_eq!(err.message(), "Failed to delete goal");
    }

    #[test]
    fn decode_errors_are_prefixed() {
        let err = ApiError::DeserializationError("missing field `date`".to_string());
        assert_eq!(err.message(), "deserialization failed: missing field `date`");
    }
}
