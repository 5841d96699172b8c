use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Service not configured: {0}")]
    ServiceNotConfigured(String),

    #[error("Vendor rejected the request with status {status}: {message}")]
    VendorRejected { status: u16, message: String },

    #[error("Generation did not finish in time: {0}")]
    PollTimeout(String),

    #[error("Vendor returned a malformed payload: {0}")]
    MalformedVendorPayload(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Generation status unavailable: {0}")]
    StatusUnavailable(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure: message, machine readable code and optional details
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ServiceNotConfigured(_) | Self::StatusUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::PollTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::VendorRejected { .. }
            | Self::MalformedVendorPayload(_)
            | Self::GenerationFailed(_)
            | Self::ExternalService(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable code the frontend can switch on
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::ServiceNotConfigured(_) => "service_not_configured",
            Self::VendorRejected { .. } => "vendor_rejected",
            Self::PollTimeout(_) => "poll_timeout",
            Self::MalformedVendorPayload(_) => "malformed_vendor_payload",
            Self::GenerationFailed(_) => "generation_failed",
            Self::StatusUnavailable(_) => "status_unavailable",
            Self::ExternalService(_) => "external_service_error",
            Self::Database(_) | Self::Internal(_) => "internal_error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let details = match self {
            Self::VendorRejected { status, .. } => Some(json!({ "vendorStatus": status })),
            _ => None,
        };

        ErrorResponse {
            message: self.to_string(),
            code: self.code().to_string(),
            details,
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!(
            error = %self,
            code = self.code(),
            status = %status.as_u16(),
            "Request failed"
        );

        (status, Json(self.to_response())).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
