use crate::{error::ApiError, model_service::ModelService, state::SharedState};
use axum::extract::State;

pub async fn metrics_handler<M: ModelService>(
    State(state): State<SharedState<M>>,
) -> Result<String, ApiError> {
    state
        .metrics
        .encode()
        .map_err(|e| ApiError::Internal(e.to_string()))
}
