//! API Errors
//!
//! Everything a backend round trip can fail with. UI boundaries turn these
//! into toasts via [`ApiError::user_message`].

use serde_json::Value;

/// Toast text when the backend gives no usable message
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

const NETWORK_MESSAGE: &str = "Unable to reach the server. Check your connection.";

const SESSION_MESSAGE: &str = "Your session has expired. Please sign in again.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("response carried no data")]
    MissingData,
}

impl ApiError {
    /// Build from a non-2xx response, reading the message out of the body
    pub fn from_response(status: u16, body: &str) -> Self {
        ApiError::Status { status, message: message_from_body(body).unwrap_or_default() }
    }

    /// Text shown to the user
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            err if err.is_unauthorized() => SESSION_MESSAGE.to_string(),
            ApiError::Network(_) => NETWORK_MESSAGE.to_string(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Pull a human readable message out of an error body.
///
/// Backends answer with `{"message": "..."}`, `{"message": ["...", "..."]}`
/// or `{"error": "..."}`; anything else yields `None`.
pub fn message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let field = value.get("message").or_else(|| value.get("error"))?;
    let message = match field {
        Value::String(s) => s.trim().to_string(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(inner) => inner.get("message").and_then(Value::as_str)?.trim().to_string(),
        _ => return None,
    };
    (!message.is_empty()).then_some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_read_from_body() {
        let err = ApiError::from_response(400, r#"{"message":"Patient already has an open bill","status":false}"#);
        assert_eq!(err.user_message(), "Patient already has an open bill");
    }

    #[test]
    fn message_list_is_joined() {
        let body = r#"{"message":["total_payable must be a number"," patient_id is required "]}"#;
        assert_eq!(
            message_from_body(body).as_deref(),
            Some("total_payable must be a number, patient_id is required")
        );
    }

    #[test]
    fn nested_error_object() {
        assert_eq!(message_from_body(r#"{"error":{"message":"Expired token"}}"#).as_deref(), Some("Expired token"));
    }

    #[test]
    fn fallback_when_body_is_useless() {
        for body in ["", "<html>502</html>", r#"{"message":""}"#, r#"{"detail":"x"}"#] {
            let err = ApiError::from_response(502, body);
            assert_eq!(err.user_message(), FALLBACK_MESSAGE, "body: {body}");
        }
        assert_eq!(ApiError::MissingData.user_message(), FALLBACK_MESSAGE);
    }

    #[test]
    fn network_errors_have_their_own_message() {
        assert_eq!(ApiError::Network("fetch failed".into()).user_message(), NETWORK_MESSAGE);
    }

    #[test]
    fn unauthorized_without_message_asks_to_sign_in() {
        assert_eq!(ApiError::from_response(401, "").user_message(), SESSION_MESSAGE);
        assert_eq!(ApiError::from_response(403, "<html></html>").user_message(), SESSION_MESSAGE);
        assert_eq!(ApiError::from_response(404, "").user_message(), FALLBACK_MESSAGE);
        assert_eq!(
            ApiError::from_response(401, r#"{"message":"Token revoked"}"#).user_message(),
            "Token revoked"
        );
    }
}
