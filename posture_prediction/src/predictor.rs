use crate::{
    config::{ModelConfig, TensorLayout},
    error::PredictError,
    model_service::ModelService,
    preprocessing::{ensure_readable_image, has_allowed_extension, load_image, transform_image},
};
use std::path::{Path, PathBuf};
use tracing::instrument;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Highest probability as a percentage.
    pub confidence: f32,
    /// One entry per class label, same order as the label set.
    pub probabilities: Vec<f32>,
}

impl Prediction {
    pub fn from_probabilities(
        labels: &[String],
        probabilities: Vec<f32>,
    ) -> Result<Self, PredictError> {
        if probabilities.len() != labels.len() {
            return Err(PredictError::InferenceFailed(format!(
                "model returned {} scores for {} class labels",
                probabilities.len(),
                labels.len()
            )));
        }
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(PredictError::InferenceFailed(
                "model returned non-finite scores".into(),
            ));
        }

        let (index, max) = probabilities
            .iter()
            .copied()
            .enumerate()
            .reduce(|best, row| if row.1 > best.1 { row } else { best })
            .ok_or_else(|| PredictError::InferenceFailed("empty score vector".into()))?;

        Ok(Self {
            label: labels[index].clone(),
            confidence: 100.0 * max,
            probabilities,
        })
    }
}

pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Outcome for one recognized image file of a batch.
#[derive(Debug)]
pub struct BatchEntry {
    pub filename: String,
    pub outcome: Result<Prediction, PredictError>,
}

pub struct PosturePredictor<M: ModelService> {
    model: M,
    labels: Vec<String>,
    input_size: (u32, u32),
    layout: TensorLayout,
    apply_softmax: bool,
}

impl<M: ModelService> PosturePredictor<M> {
    pub fn new(model: M, model_config: &ModelConfig) -> Result<Self, PredictError> {
        if model_config.class_labels.is_empty() {
            return Err(PredictError::ArtifactInvalid(
                "no class labels configured".into(),
            ));
        }

        tracing::info!(
            "Posture predictor ready, input size {:?}, classes {:?}",
            model_config.input_size(),
            model_config.class_labels
        );

        Ok(Self {
            model,
            labels: model_config.class_labels.clone(),
            input_size: model_config.input_size(),
            layout: model_config.layout,
            apply_softmax: model_config.apply_softmax,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn input_size(&self) -> (u32, u32) {
        self.input_size
    }

    #[instrument(skip(self))]
    pub fn predict(&self, image_path: &Path) -> Result<Prediction, PredictError> {
        let file_size = ensure_readable_image(image_path)?;
        tracing::debug!("File size: {} bytes", file_size);

        let image = load_image(image_path)?;
        tracing::debug!("Original image size: {}x{}", image.width(), image.height());

        let input = transform_image(&image, self.input_size, self.layout);
        let scores = self.model.run(input.view())?;

        let probabilities = if self.apply_softmax {
            softmax(&scores)
        } else {
            scores
        };
        let prediction = Prediction::from_probabilities(&self.labels, probabilities)?;

        tracing::debug!(
            "Predicted {} with confidence {:.2}%",
            prediction.label,
            prediction.confidence
        );
        Ok(prediction)
    }

    /// Predicts every image in `image_dir`, sorted by filename. Files without an
    /// image extension are skipped; failures are kept as per-file errors.
    #[instrument(skip(self))]
    pub fn predict_batch(&self, image_dir: &Path) -> Result<Vec<BatchEntry>, PredictError> {
        let entries = std::fs::read_dir(image_dir).map_err(|e| {
            PredictError::InputInvalid(format!("cannot read {}: {}", image_dir.display(), e))
        })?;

        // Non-UTF-8 names are kept with a lossy display name; the real path is
        // used for prediction.
        let mut images: Vec<(String, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| (entry.file_name().to_string_lossy().into_owned(), entry.path()))
            .filter(|(name, _)| has_allowed_extension(name))
            .collect();
        images.sort();

        let results: Vec<BatchEntry> = images
            .into_iter()
            .map(|(filename, path)| {
                let outcome = self.predict(&path);
                if let Err(ref err) = outcome {
                    tracing::warn!("Prediction failed for {}: {}", filename, err);
                }
                BatchEntry { filename, outcome }
            })
            .collect();

        tracing::info!(
            "Batch over {:?}: {} images, {} failed",
            image_dir,
            results.len(),
            results.iter().filter(|e| e.outcome.is_err()).count()
        );
        Ok(results)
    }
}
