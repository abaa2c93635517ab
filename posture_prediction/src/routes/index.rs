use axum::{response::IntoResponse, response::Json};
use serde::Serialize;

/// Version of the response contract the mobile client is built against.
pub const API_VERSION: &str = "1.0";

pub const ENDPOINTS: [&str; 5] = [
    "GET /",
    "GET /health",
    "GET /model-info",
    "GET /metrics",
    "POST /predict",
];

#[derive(Serialize)]
pub struct Descriptor {
    message: &'static str,
    version: &'static str,
    status: &'static str,
    available_endpoints: &'static [&'static str],
}

pub async fn index() -> impl IntoResponse {
    Json(Descriptor {
        message: "Posture Detection API",
        version: API_VERSION,
        status: "running",
        available_endpoints: &ENDPOINTS,
    })
}
