use crate::{
    config::UploadConfig, model_service::ModelService, predictor::PosturePredictor,
    telemetry::Metrics,
};
use std::sync::Arc;

pub struct SharedState<M: ModelService> {
    /// `None` when the model failed to load at startup.
    pub predictor: Option<Arc<PosturePredictor<M>>>,
    pub upload: UploadConfig,
    pub metrics: Arc<Metrics>,
}

impl<M: ModelService> SharedState<M> {
    pub fn new(
        predictor: Option<PosturePredictor<M>>,
        upload: UploadConfig,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            predictor: predictor.map(Arc::new),
            upload,
            metrics,
        }
    }

    pub fn model_status(&self) -> &'static str {
        match self.predictor {
            Some(_) => "loaded",
            None => "error",
        }
    }
}

impl<M: ModelService> Clone for SharedState<M> {
    fn clone(&self) -> Self {
        Self {
            predictor: self.predictor.clone(),
            upload: self.upload.clone(),
            metrics: self.metrics.clone(),
        }
    }
}
