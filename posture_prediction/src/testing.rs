//! Fixtures shared by the unit tests.

use crate::{
    config::{ModelConfig, TensorLayout, DEFAULT_CLASS_LABELS},
    error::PredictError,
    model_service::ModelService,
};
use image::{ImageBuffer, ImageFormat, Rgb};
use ndarray::ArrayView4;
use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

pub struct MockModelService {
    scores: Vec<f32>,
    pub calls: Arc<AtomicUsize>,
}

impl MockModelService {
    pub fn new(scores: Vec<f32>) -> Self {
        Self {
            scores,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl ModelService for MockModelService {
    fn run(&self, input: ArrayView4<'_, f32>) -> Result<Vec<f32>, PredictError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(input.shape(), &[1, 32, 32, 3]);
        Ok(self.scores.clone())
    }
}

pub struct FailingModelService;

impl ModelService for FailingModelService {
    fn run(&self, _input: ArrayView4<'_, f32>) -> Result<Vec<f32>, PredictError> {
        Err(PredictError::InferenceFailed("device lost".into()))
    }
}

pub fn model_config() -> ModelConfig {
    ModelConfig {
        onnx_file: "posture.onnx".to_string(),
        model_dir: PathBuf::from("./models"),
        num_instances: 1,
        input_width: 32,
        input_height: 32,
        class_labels: DEFAULT_CLASS_LABELS.iter().map(|s| s.to_string()).collect(),
        layout: TensorLayout::Nhwc,
        apply_softmax: true,
    }
}

pub fn encode_image(format: ImageFormat) -> Vec<u8> {
    let img = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_fn(64, 48, |x, y| {
        Rgb([(x * 4) as u8, (y * 5) as u8, 128])
    });
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

pub fn write_image(dir: &Path, filename: &str, format: ImageFormat) -> PathBuf {
    let path = dir.join(filename);
    std::fs::write(&path, encode_image(format)).unwrap();
    path
}
