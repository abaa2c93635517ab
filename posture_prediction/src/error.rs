use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Invalid input: {0}")]
    InputInvalid(String),
    #[error("Model artifact not found: {0}")]
    ArtifactMissing(String),
    #[error("Model artifact could not be loaded: {0}")]
    ArtifactInvalid(String),
    #[error("Error decoding image: {0}")]
    DecodeFailed(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Model not loaded properly")]
    ModelNotLoaded,
    #[error("Model not loaded")]
    ModelInfoUnavailable,
    #[error("No image file provided")]
    MissingImage,
    #[error("No file selected")]
    EmptyFilename,
    #[error("Invalid file type. Allowed: png, jpg, jpeg, bmp")]
    InvalidFileType,
    #[error("File too large. Maximum size is {0}MB")]
    PayloadTooLarge(usize),
    #[error("Failed to process image")]
    Processing(#[source] PredictError),
    #[error("Server error: {0}")]
    Internal(String),
    #[error("Endpoint not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingImage | ApiError::EmptyFilename | ApiError::InvalidFileType => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::ModelNotLoaded
            | ApiError::ModelInfoUnavailable
            | ApiError::Processing(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        ApiError::Processing(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Processing(source) => {
                tracing::error!("Prediction failed: {}", source);
            }
            ApiError::Internal(_) | ApiError::ModelNotLoaded | ApiError::ModelInfoUnavailable => {
                tracing::error!("{}", self);
            }
            _ => tracing::debug!("Rejected request: {}", self),
        }

        let body = json!({
            "success": false,
            "error": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
