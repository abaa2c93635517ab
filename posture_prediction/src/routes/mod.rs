mod health;
mod index;
mod metrics;
mod model_info;
mod predict;

use crate::{error::ApiError, model_service::ModelService, state::SharedState};
use axum::{
    routing::{get, post},
    Router,
};

pub fn api_routes<M: ModelService>() -> Router<SharedState<M>> {
    Router::new()
        .route("/", get(index::index))
        .route("/health", get(health::healthcheck::<M>))
        .route("/model-info", get(model_info::model_info::<M>))
        .route("/metrics", get(metrics::metrics_handler::<M>))
        .route("/predict", post(predict::predict::<M>))
        .fallback(not_found)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Local time without offset, e.g. `2025-01-31T08:15:42.123456`.
pub(crate) fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
