use crate::{
    config::{ModelConfig, Validatable},
    error::PredictError,
    model_service::ModelService,
};
use ndarray::ArrayView4;
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::TensorRef,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

pub struct OrtModelService {
    sessions: Vec<Mutex<Session>>,
    counter: AtomicUsize,
    output_name: String,
}

impl OrtModelService {
    pub fn new(model_config: &ModelConfig) -> Result<Self, PredictError> {
        model_config
            .validate()
            .map_err(PredictError::ArtifactMissing)?;

        let model_path = model_config.get_path();
        let num_instances = model_config.num_instances.max(1);
        let sessions = (0..num_instances)
            .map(|_| {
                let session = Session::builder()?
                    .with_optimization_level(GraphOptimizationLevel::Level3)?
                    .commit_from_file(&model_path)?;
                Ok(session)
            })
            .collect::<Result<Vec<_>, ort::Error>>()
            .map_err(|e| PredictError::ArtifactInvalid(format!("{:?}: {}", model_path, e)))?;

        let output_name = sessions
            .first()
            .and_then(|session| session.outputs.first())
            .map(|output| output.name.clone())
            .ok_or_else(|| PredictError::ArtifactInvalid("model declares no outputs".into()))?;

        tracing::info!(
            "Created {} ONNX sessions from {:?}, reading output {:?}",
            num_instances,
            model_path,
            output_name
        );

        Ok(Self {
            sessions: sessions.into_iter().map(Mutex::new).collect(),
            counter: AtomicUsize::new(0),
            output_name,
        })
    }
}

impl ModelService for OrtModelService {
    fn run(&self, input: ArrayView4<'_, f32>) -> Result<Vec<f32>, PredictError> {
        let index = self.counter.fetch_add(1, Ordering::SeqCst) % self.sessions.len();
        let mut session = self.sessions[index].lock().map_err(|e| {
            PredictError::InferenceFailed(format!("session mutex poisoned: {}", e))
        })?;

        tracing::debug!("Handling request with session {}", index);
        let owned_buffer;
        let input_view = if input.is_standard_layout() {
            input.view()
        } else {
            owned_buffer = input.as_standard_layout().into_owned();
            owned_buffer.view()
        };

        let tensor_ref = TensorRef::from_array_view(input_view)
            .map_err(|e| PredictError::InferenceFailed(format!("failed to build tensor: {}", e)))?;

        let outputs = session
            .run(ort::inputs![tensor_ref])
            .map_err(|e| PredictError::InferenceFailed(e.to_string()))?;

        let (_, data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| PredictError::InferenceFailed(format!("failed to extract tensor: {}", e)))?;

        Ok(data.to_vec())
    }
}
