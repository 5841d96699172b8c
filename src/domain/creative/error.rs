use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum CreativeError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("unusable model response: {0}")]
    MalformedResponse(String),
}

impl From<async_openai::error::OpenAIError> for CreativeError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        CreativeError::Dependency(err.to_string())
    }
}

impl From<CreativeError> for AppError {
    fn from(err: CreativeError) -> Self {
        match err {
            CreativeError::Invalid(msg) => AppError::BadRequest(msg),
            CreativeError::Dependency(msg) => AppError::ExternalService(msg),
            CreativeError::MalformedResponse(msg) => AppError::ExternalService(msg),
        }
    }
}
