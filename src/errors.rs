use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Error body returned by the seed backend
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Field-level validation messages, keyed by field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
    /// ISO 8601 timestamp when error occurred
    pub timestamp: String,
}

/// Field-level form messages, one per offending field.
///
/// Keys are the Rust field names (`sale_price`, `ice`, ...). When a field
/// breaks several rules only the first message is kept, which is what a
/// form shows under the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            if let Some(err) = errs.first() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                fields.insert(field, message);
            }
        }
        fields
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("External API error ({status}): {message}")]
    ExternalApiError { status: u16, message: String },

    #[error("Validation error: {0}")]
    ValidationError(FieldErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.into())
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(err: FieldErrors) -> Self {
        ServiceError::ValidationError(err)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ServiceError::SerializationError(err.to_string());
        }
        if let Some(status) = err.status() {
            return ServiceError::ExternalApiError {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        if err.is_timeout() {
            return ServiceError::Transport("request timed out".to_string());
        }
        ServiceError::Transport(err.to_string())
    }
}

impl ServiceError {
    /// Whether the failure happened before or during transport and a manual
    /// retry may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::ExternalApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Field-level messages when this is a form validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::ValidationError(fields) => Some(fields),
            _ => None,
        }
    }

    /// The single message shown in a failure notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "Unable to reach the server. Please try again.".to_string(),
            Self::ExternalApiError { message, .. } => message.clone(),
            Self::ValidationError(_) => "Please correct the highlighted fields.".to_string(),
            Self::NotFound(what) => format!("{} could not be found", what),
            Self::Cancelled => "The request was cancelled".to_string(),
            Self::SerializationError(_) | Self::Config(_) | Self::InternalError(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::SerializationError(_) => StatusCode::BAD_REQUEST,
            Self::ExternalApiError { .. } | Self::Transport(_) => StatusCode::BAD_GATEWAY,
            Self::Cancelled
            | Self::Config(_)
            | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::Config(_) | Self::InternalError(_) | Self::Cancelled => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.response_message();
        let details = match self {
            ServiceError::ValidationError(fields) => Some(fields.into_inner()),
            _ => None,
        };

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            details,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn field_errors_keep_first_message_per_field() {
        let mut fields = FieldErrors::new();
        fields.insert("vin", "VIN is required");
        fields.insert("vin", "VIN must be 17 characters");
        assert_eq!(fields.get("vin"), Some("VIN is required"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn validation_errors_convert_to_field_messages() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("ice");
        err.message = Some("ICE must be 15 digits".into());
        errors.add("ice", err);
        errors.add("rating", ValidationError::new("range"));

        let fields = FieldErrors::from(errors);
        assert_eq!(fields.get("ice"), Some("ICE must be 15 digits"));
        assert_eq!(fields.get("rating"), Some("range"));
    }

    #[test]
    fn status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::ValidationError(FieldErrors::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InternalError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::Transport("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn retryable_only_for_transport_and_server_failures() {
        assert!(ServiceError::Transport("reset".into()).is_retryable());
        assert!(ServiceError::ExternalApiError {
            status: 503,
            message: "down".into()
        }
        .is_retryable());
        assert!(!ServiceError::ExternalApiError {
            status: 404,
            message: "gone".into()
        }
        .is_retryable());
        assert!(!ServiceError::ValidationError(FieldErrors::new()).is_retryable());
    }

    #[test]
    fn response_message_hides_internal_details() {
        assert_eq!(
            ServiceError::InternalError("lock poisoned".into()).response_message(),
            "Internal server error"
        );
        assert_eq!(
            ServiceError::NotFound("Client 42".into()).response_message(),
            "Not found: Client 42"
        );
    }

    #[tokio::test]
    async fn validation_error_response_carries_field_details() {
        let mut fields = FieldErrors::new();
        fields.insert("email", "Invalid email format");
        let response = ServiceError::ValidationError(fields).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        let details = payload.details.expect("details expected");
        assert_eq!(details.get("email").map(String::as_str), Some("Invalid email format"));
    }
}
