use poem::http::StatusCode;
use thiserror::Error;

use crate::core::ProcessingError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid MIME type")]
    InvalidMimeType,
    #[error("parameter {0} not found")]
    MissingParameter(String),
    #[error("parameter {0} value must be an integer")]
    InvalidFormat(String),
    #[error("parameter {name} value exceed limit [{min}-{max}]")]
    OutOfRange { name: String, min: i64, max: i64 },
    #[error("failed to read request body: {0}")]
    BodyReadError(String),
    #[error(transparent)]
    ProcessingError(#[from] ProcessingError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidMimeType
            | ApiError::MissingParameter(_)
            | ApiError::InvalidFormat(_)
            | ApiError::OutOfRange { .. } => StatusCode::BAD_REQUEST,
            ApiError::BodyReadError(_) | ApiError::ProcessingError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
