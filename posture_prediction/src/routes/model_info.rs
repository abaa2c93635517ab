use crate::{error::ApiError, model_service::ModelService, state::SharedState};
use axum::{extract::State, response::Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct ModelInfo {
    classes: Vec<String>,
    input_size: (u32, u32),
    total_classes: usize,
}

#[derive(Serialize)]
pub struct ModelInfoResponse {
    success: bool,
    model_info: ModelInfo,
}

pub async fn model_info<M: ModelService>(
    State(state): State<SharedState<M>>,
) -> Result<Json<ModelInfoResponse>, ApiError> {
    state.metrics.record_request("/model-info");
    let predictor = state.predictor.as_ref().ok_or(ApiError::ModelInfoUnavailable)?;

    Ok(Json(ModelInfoResponse {
        success: true,
        model_info: ModelInfo {
            classes: predictor.labels().to_vec(),
            input_size: predictor.input_size(),
            total_classes: predictor.labels().len(),
        },
    }))
}
