//! Rekognition HTTP error classification.
//!
//! JSON 1.1 endpoints return error bodies shaped like
//! `{ "__type": "InvalidSignatureException", "message": "..." }`, sometimes
//! with a namespace prefix on `__type` (`com.amazonaws...#Name`). The service
//! message is kept as-is while the status and type pick the error variant.

use crate::error::ModerationError;

const AUTH_ERROR_TYPES: &[&str] = &[
    "AccessDeniedException",
    "UnrecognizedClientException",
    "InvalidSignatureException",
    "IncompleteSignatureException",
    "ExpiredTokenException",
    "MissingAuthenticationTokenException",
];

const INPUT_ERROR_TYPES: &[&str] = &[
    "InvalidParameterException",
    "InvalidImageFormatException",
    "ImageTooLargeException",
    "InvalidS3ObjectException",
];

fn extract_message(json: &serde_json::Value) -> Option<String> {
    json.get("message")
        .and_then(|v| v.as_str())
        .or_else(|| json.get("Message").and_then(|v| v.as_str()))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_error_type(json: &serde_json::Value) -> Option<String> {
    json.get("__type")
        .and_then(|v| v.as_str())
        .map(|s| s.rsplit('#').next().unwrap_or(s).trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn classify_rekognition_error(status: u16, body_text: &str) -> ModerationError {
    let json = serde_json::from_str::<serde_json::Value>(body_text).ok();
    let err_type = json.as_ref().and_then(extract_error_type);
    let message = json
        .as_ref()
        .and_then(extract_message)
        .unwrap_or_else(|| match body_text.trim() {
            "" => format!("HTTP {status}"),
            text => text.to_string(),
        });
    let message = match &err_type {
        Some(t) => format!("{t}: {message}"),
        None => message,
    };
    let err_type = err_type.unwrap_or_default();

    let lower = err_type.to_lowercase();
    if status == 429 || lower.contains("throttl") || lower.contains("throughputexceeded") {
        return ModerationError::RateLimitError(message);
    }

    if status == 401 || status == 403 || AUTH_ERROR_TYPES.contains(&err_type.as_str()) {
        return ModerationError::AuthenticationError(message);
    }

    if status == 400
        || status == 413
        || status == 415
        || INPUT_ERROR_TYPES.contains(&err_type.as_str())
    {
        return ModerationError::InvalidInput(message);
    }

    ModerationError::ApiError {
        code: status,
        message,
        details: json,
    }
}
