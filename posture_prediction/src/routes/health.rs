use crate::{model_service::ModelService, routes::timestamp, state::SharedState};
use axum::{extract::State, response::IntoResponse, response::Json};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct Status {
    status: String,
    model_status: String,
    timestamp: String,
}

pub async fn healthcheck<M: ModelService>(State(state): State<SharedState<M>>) -> impl IntoResponse {
    state.metrics.record_request("/health");
    Json(Status {
        status: "healthy".into(),
        model_status: state.model_status().into(),
        timestamp: timestamp(),
    })
}
