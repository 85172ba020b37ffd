// Envelope handed to the presentation layer
use crate::error::{FallbackError, GatewayError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    pub fn failure(message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_kind: Some(kind.into()),
        }
    }

    /// A failure that still carries data, e.g. an empty page.
    pub fn failure_with(data: T, message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            ..Self::failure(message, kind)
        }
    }
}

impl<T> From<Result<T, GatewayError>> for ApiResponse<T> {
    fn from(result: Result<T, GatewayError>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(e) => ApiResponse::failure(e.to_string(), e.kind()),
        }
    }
}

impl<T> From<Result<T, FallbackError>> for ApiResponse<T> {
    fn from(result: Result<T, FallbackError>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(e) => ApiResponse::failure(e.to_string(), e.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::ok(vec![1, 2]);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": true, "data": [1, 2]})
        );
    }

    #[test]
    fn test_error_envelope_carries_kind() {
        let response: ApiResponse<()> = Err(GatewayError::Timeout(15)).into();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": false,
                "error": "Request timed out after 15s",
                "errorKind": "timeout"
            })
        );
    }
}
