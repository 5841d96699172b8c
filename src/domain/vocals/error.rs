use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum VocalError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
}

impl From<async_openai::error::OpenAIError> for VocalError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        VocalError::Dependency(err.to_string())
    }
}

impl From<VocalError> for AppError {
    fn from(err: VocalError) -> Self {
        match err {
            VocalError::Invalid(msg) => AppError::BadRequest(msg),
            VocalError::Dependency(msg) => AppError::ExternalService(msg),
        }
    }
}
