mod routes;
mod server;
mod state;
mod telemetry;

pub mod advice;
pub mod config;
pub mod error;
pub mod model_service;
pub mod ort_service;
pub mod predictor;
pub mod preprocessing;

#[cfg(test)]
mod testing;

pub use predictor::{BatchEntry, PosturePredictor, Prediction};
pub use server::start_server;
