//! API Response types
//!
//! Every endpoint answers with the same envelope, success or failure, so
//! clients never branch on payload shape to find out which one they got.

use serde::{Deserialize, Serialize};

/// Code carried by successful envelopes
pub const API_CODE_SUCCESS: &str = "E0000";

/// Unified API response structure
///
/// Success carries `data`; failures carry an `E`-prefixed `code` plus a
/// human-readable `message` and omit `data` entirely:
/// ```json
/// { "code": "E3001", "message": "Unauthorized" }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// `E0000` on success, an error code otherwise
    pub code: String,
    /// Short text for humans, never parsed by clients
    pub message: String,
    /// Payload, present only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Correlation id for tracing a request through the logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in a success envelope
    pub fn ok(data: T) -> Self {
        Self {
            code: API_CODE_SUCCESS.into(),
            message: "Success".into(),
            data: Some(data),
            trace_id: None,
        }
    }

    /// Build a failure envelope with no payload
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
            trace_id: None,
        }
    }

    /// Attach a correlation id
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Whether this envelope carries the success code
    pub fn is_success(&self) -> bool {
        self.code == API_CODE_SUCCESS
    }
}
