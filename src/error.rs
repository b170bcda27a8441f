// src/error.rs
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::fmt;

lazy_static! {
    static ref ERROR_CODE_PREFIX: Regex = Regex::new(r"^\s*\[[^\]]*\]\s*").unwrap();
}

/// Shown whenever the backend gives us nothing better to say.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    Validation(String),
    Api { status: u16, message: String },
    Network(String),
    UnexpectedEnvelope(String),
    Decode(String),
    Session(String),
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            ClientError::Api { status, message } => write!(f, "API Error ({}): {}", status, message),
            ClientError::Network(msg) => write!(f, "Network Error: {}", msg),
            ClientError::UnexpectedEnvelope(msg) => write!(f, "Unexpected Response: {}", msg),
            ClientError::Decode(msg) => write!(f, "Decode Error: {}", msg),
            ClientError::Session(msg) => write!(f, "Session Error: {}", msg),
            ClientError::Config(msg) => write!(f, "Config Error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut parts: Vec<String> = err
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => e.code.to_string(),
                    })
                    .collect();
                format!("{}: {}", field, messages.join(", "))
            })
            .collect();
        parts.sort();
        ClientError::Validation(parts.join("; "))
    }
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ClientError::Validation(msg.into())
    }

    pub fn not_found(entity: &str, id: i64) -> Self {
        ClientError::Api {
            status: 404,
            message: format!("{} with ID '{}' not found", entity, id),
        }
    }

    /// Builds an API error from a non-2xx status and whatever body came back.
    pub fn from_response(status: u16, body: &Value) -> Self {
        ClientError::Api {
            status,
            message: extract_error_message(body),
        }
    }

    /// Text suitable for a notification toast.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Session(msg) => msg.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

/// Removes a leading bracketed error code: `"[E1001] Name taken"` -> `"Name taken"`.
pub fn strip_error_code(message: &str) -> &str {
    match ERROR_CODE_PREFIX.find(message) {
        Some(prefix) => &message[prefix.end()..],
        None => message,
    }
}

/// Pulls `message` out of an error body, falling back to the generic text.
pub fn extract_error_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map(strip_error_code)
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}
