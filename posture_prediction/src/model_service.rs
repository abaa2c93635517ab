use crate::error::PredictError;
use ndarray::ArrayView4;

/// A loaded classification model. Implementations must be safe to call from
/// several blocking threads at once.
pub trait ModelService: Send + Sync + 'static {
    /// Forward pass over a batch of one image; returns the raw output row.
    fn run(&self, input: ArrayView4<'_, f32>) -> Result<Vec<f32>, PredictError>;
}
