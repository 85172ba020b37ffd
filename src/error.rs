use serde::{ser::SerializeStruct, Serialize};
use std::io;
use thiserror::Error;

/// Failure taxonomy of the source gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The upstream answered, but not with the envelope we expect.
    #[error("Unexpected API response format: {0}")]
    UnexpectedShape(String),
    /// The request went out and nothing came back.
    #[error("No response received: {0}")]
    NoResponse(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// The upstream answered with a non-success status.
    #[error("Server error {status}: {body}")]
    ErrorResponse { status: u16, body: String },
    #[error("Skin not found: {0}")]
    NotFound(String),
    /// The upstream has no such capability. Expected, not a defect.
    #[error("{0} not available")]
    Unsupported(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Background task failed: {0}")]
    Task(String),
}

impl GatewayError {
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::UnexpectedShape(_) => "unexpectedShape",
            GatewayError::NoResponse(_) => "noResponse",
            GatewayError::Timeout(_) => "timeout",
            GatewayError::ErrorResponse { .. } => "errorResponse",
            GatewayError::NotFound(_) => "notFound",
            GatewayError::Unsupported(_) => "unsupported",
            GatewayError::InvalidRequest(_) => "invalidRequest",
            GatewayError::Task(_) => "taskError",
        }
    }

    /// Transport failures where no response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::NoResponse(_) | GatewayError::Timeout(_))
    }

    /// Failures that take the whole listing down and warrant a recovery prompt.
    pub fn is_batch_failure(&self) -> bool {
        !matches!(self, GatewayError::NotFound(_) | GatewayError::Unsupported(_))
    }
}

impl Serialize for GatewayError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut err = serializer.serialize_struct("GatewayError", 2)?;
        err.serialize_field("message", self.to_string().as_str())?;
        err.serialize_field("kind", self.kind())?;
        err.end()
    }
}

/// Rejected data-source transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FallbackError {
    #[error("Offline data is only offered after a failed fetch")]
    NoFailureRecorded,
    #[error("Already using offline data")]
    AlreadyOffline,
}

impl FallbackError {
    pub fn kind(&self) -> &'static str {
        match self {
            FallbackError::NoFailureRecorded => "noFailureRecorded",
            FallbackError::AlreadyOffline => "alreadyOffline",
        }
    }
}

impl Serialize for FallbackError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut err = serializer.serialize_struct("FallbackError", 2)?;
        err.serialize_field("message", self.to_string().as_str())?;
        err.serialize_field("kind", self.kind())?;
        err.end()
    }
}

/// JSON file persistence failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse JSON from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Lock error: {0}")]
    Lock(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gateway_error_serialization() {
        let e = GatewayError::NotFound("42".to_string());
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v.get("kind").unwrap(), &json!("notFound"));
        assert_eq!(v.get("message").unwrap(), &json!("Skin not found: 42"));
    }

    #[test]
    fn test_transport_errors_are_distinguished() {
        assert!(GatewayError::Timeout(15).is_transport());
        assert!(GatewayError::NoResponse("refused".into()).is_transport());
        let response = GatewayError::ErrorResponse {
            status: 500,
            body: "boom".into(),
        };
        assert!(!response.is_transport());
        assert!(response.is_batch_failure());
        assert!(!GatewayError::Unsupported("Price history".into()).is_batch_failure());
    }

    #[test]
    fn test_unsupported_message_is_human_readable() {
        let e = GatewayError::Unsupported("Price history".to_string());
        assert_eq!(e.to_string(), "Price history not available");
    }
}
