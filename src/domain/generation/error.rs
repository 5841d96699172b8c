use super::model::Vendor;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("{vendor} is not configured: {detail}")]
    Configuration { vendor: Vendor, detail: String },

    #[error("{vendor} rejected the request with status {status}: {message}")]
    VendorRejected {
        vendor: Vendor,
        status: u16,
        message: String,
    },

    #[error(
        "{vendor} task {task_id} did not reach a terminal status after {attempts} polls{}",
        last_miss_suffix(.last_miss)
    )]
    PollTimeout {
        vendor: Vendor,
        task_id: String,
        attempts: u32,
        last_miss: Option<String>,
    },

    #[error("{vendor} returned a malformed payload: {reason}")]
    MalformedVendorPayload {
        vendor: Vendor,
        reason: String,
        payload: serde_json::Value,
    },

    #[error("{vendor} status is temporarily unavailable: {reason}")]
    StatusUnavailable { vendor: Vendor, reason: String },

    #[error("{vendor} could not be reached: {message}")]
    Transport { vendor: Vendor, message: String },

    #[error("invalid input: {0}")]
    Invalid(String),
}

fn last_miss_suffix(last_miss: &Option<String>) -> String {
    last_miss
        .as_ref()
        .map(|reason| format!(" (last miss: {})", reason))
        .unwrap_or_default()
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Configuration { .. } => {
                AppError::ServiceNotConfigured(err.to_string())
            }
            GenerationError::VendorRejected {
                vendor,
                status,
                message,
            } => AppError::VendorRejected {
                status,
                message: format!("{}: {}", vendor, message),
            },
            GenerationError::PollTimeout { .. } => AppError::PollTimeout(err.to_string()),
            GenerationError::MalformedVendorPayload {
                vendor,
                reason,
                payload,
            } => {
                tracing::error!(
                    vendor = %vendor,
                    reason = %reason,
                    payload = %payload,
                    "Malformed vendor payload"
                );
                AppError::MalformedVendorPayload(format!("{}: {}", vendor, reason))
            }
            GenerationError::StatusUnavailable { .. } => {
                AppError::StatusUnavailable(err.to_string())
            }
            GenerationError::Transport { .. } => AppError::ExternalService(err.to_string()),
            GenerationError::Invalid(msg) => AppError::BadRequest(msg),
        }
    }
}
