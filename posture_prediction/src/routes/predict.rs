use crate::{
    advice::{advice_for, Severity},
    error::ApiError,
    model_service::ModelService,
    predictor::{PosturePredictor, Prediction},
    preprocessing::has_allowed_extension,
    routes::timestamp,
    state::SharedState,
};
use axum::{
    body::Bytes,
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        State,
    },
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use std::{collections::BTreeMap, io::Write, path::Path, time::Instant};
use tracing::instrument;

const IMAGE_FIELD: &str = "image";

#[derive(Serialize)]
pub struct PredictResponse {
    success: bool,
    prediction: PredictionSummary,
    analysis: Analysis,
    class_probabilities: BTreeMap<String, f64>,
    timestamp: String,
}

#[derive(Serialize)]
pub struct PredictionSummary {
    class: String,
    confidence: f64,
    status: &'static str,
    severity: Severity,
}

#[derive(Serialize)]
pub struct Analysis {
    problems: &'static [&'static str],
    suggestions: &'static [&'static str],
    color: &'static str,
}

struct Upload {
    filename: String,
    data: Bytes,
}

impl Upload {
    fn extension(&self) -> String {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default()
    }
}

fn round2(value: f32) -> f64 {
    (value as f64 * 100.0).round() / 100.0
}

fn build_response(labels: &[String], prediction: Prediction) -> PredictResponse {
    let advice = advice_for(&prediction.label);

    let class_probabilities = labels
        .iter()
        .zip(prediction.probabilities.iter())
        .map(|(label, probability)| (label.clone(), round2(probability * 100.0)))
        .collect();

    PredictResponse {
        success: true,
        prediction: PredictionSummary {
            confidence: round2(prediction.confidence),
            class: prediction.label,
            status: advice.status,
            severity: advice.severity,
        },
        analysis: Analysis {
            problems: advice.problems,
            suggestions: advice.suggestions,
            color: advice.color,
        },
        class_probabilities,
        timestamp: timestamp(),
    }
}

fn multipart_error(err: MultipartError, max_size_mb: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(max_size_mb)
    } else {
        tracing::debug!("Malformed multipart body: {}", err.body_text());
        ApiError::MissingImage
    }
}

async fn read_image_field(multipart: &mut Multipart, max_size_mb: usize) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size_mb))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = match field.file_name() {
            Some(name) => name.to_string(),
            None => return Err(ApiError::MissingImage),
        };
        if filename.is_empty() {
            return Err(ApiError::EmptyFilename);
        }
        if !has_allowed_extension(&filename) {
            return Err(ApiError::InvalidFileType);
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_size_mb))?;
        return Ok(Upload { filename, data });
    }

    Err(ApiError::MissingImage)
}

/// Writes the upload to a uniquely named file in `temp_dir` and runs the
/// predictor on it. The file is removed when `temp_file` drops, on every path.
fn predict_upload<M: ModelService>(
    predictor: &PosturePredictor<M>,
    temp_dir: &Path,
    upload: &Upload,
) -> Result<Prediction, ApiError> {
    let mut temp_file = tempfile::Builder::new()
        .prefix("posture-")
        .suffix(&format!(".{}", upload.extension()))
        .tempfile_in(temp_dir)
        .map_err(|e| ApiError::Internal(format!("failed to create temp file: {}", e)))?;

    temp_file
        .write_all(&upload.data)
        .and_then(|_| temp_file.flush())
        .map_err(|e| ApiError::Internal(format!("failed to write upload: {}", e)))?;

    tracing::debug!(
        "Saved {} ({} bytes) to {:?}",
        upload.filename,
        upload.data.len(),
        temp_file.path()
    );

    Ok(predictor.predict(temp_file.path())?)
}

#[instrument(skip(state, multipart))]
pub async fn predict<M: ModelService>(
    State(state): State<SharedState<M>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    state.metrics.record_request("/predict");

    let predictor = state.predictor.clone().ok_or(ApiError::ModelNotLoaded)?;
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Rejected multipart extraction: {}", e);
        ApiError::MissingImage
    })?;

    let upload = read_image_field(&mut multipart, state.upload.max_size_mb).await?;

    let started = Instant::now();
    let temp_dir = state.upload.get_temp_dir();
    let worker = predictor.clone();
    let prediction = tokio::task::spawn_blocking(move || predict_upload(&worker, &temp_dir, &upload))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    state
        .metrics
        .record_prediction_duration(started.elapsed().as_millis() as u64, "/predict");
    state.metrics.record_prediction(&prediction.label);
    tracing::info!(
        "Predicted {} ({:.2}%)",
        prediction.label,
        prediction.confidence
    );

    Ok(Json(build_response(predictor.labels(), prediction)))
}
