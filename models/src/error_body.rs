use serde::{Deserialize, Serialize};

/// Structured error body returned with non-2xx responses:
/// `{"status": "error", "message": "...", "error": "<code>", "details": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    /// Machine-readable error code.
    #[serde(default, rename = "error", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiErrorBody {
    /// Parse an error body, returning `None` when it is not the structured shape.
    ///
    /// A JSON value that is not an object (or is an object without any of the
    /// known fields) is not treated as a structured error.
    pub fn parse(body: &[u8]) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_slice(body).ok()?;
        let object = value.as_object()?;
        if !["status", "message", "error", "details"]
            .iter()
            .any(|key| object.contains_key(*key))
        {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// The message, if the server sent a non-blank one.
    pub fn non_empty_message(&self) -> Option<&str> {
        let message = self.message.trim();
        (!message.is_empty()).then_some(message)
    }
}
