use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - check the API key and secret")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("{0}")]
    Validation(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid site URL: {0}")]
    InvalidUrl(String),

    #[error("API credentials contain characters not allowed in a header")]
    InvalidCredentials,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error envelope Frappe returns alongside a non-2xx status.
/// `_server_messages` is a JSON-encoded list of JSON-encoded message objects.
#[derive(Debug, Default, Deserialize)]
struct FrappeErrorBody {
    #[serde(default)]
    exc_type: Option<String>,
    #[serde(default, rename = "_server_messages")]
    server_messages: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerMessage {
    message: String,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Pull the human-readable messages out of a Frappe error body, if any.
    pub fn server_messages(body: &str) -> Option<String> {
        let parsed: FrappeErrorBody = serde_json::from_str(body).ok()?;

        if let Some(raw) = parsed.server_messages {
            let encoded: Vec<String> = serde_json::from_str(&raw).ok()?;
            let messages: Vec<String> = encoded
                .iter()
                .filter_map(|m| serde_json::from_str::<ServerMessage>(m).ok())
                .map(|m| m.message)
                .filter(|m| !m.is_empty())
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }

        parsed
            .message
            .filter(|m| !m.is_empty())
            .or(parsed.exc_type)
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(Self::server_messages(body).unwrap_or(truncated)),
            404 => ApiError::NotFound(Self::server_messages(body).unwrap_or(truncated)),
            417 => ApiError::Validation(Self::server_messages(body).unwrap_or(truncated)),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(Self::server_messages(body).unwrap_or(truncated)),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}
