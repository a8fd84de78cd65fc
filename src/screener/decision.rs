use std::collections::HashMap;

use ndarray::{Array1, Array2};
use ort::session::Session;
use ort::value::Tensor;

use super::error::ScreenerError;

/// Invokes the pre-trained decision model on an assembled feature row.
///
/// The trait is implemented by both the builder (for the startup probe)
/// and the screener itself, so the tensor plumbing lives in one place.
///
/// The ONNX model is expected to:
/// - Accept one float input of shape [batch_size, feature_width]
/// - Output a discrete class label tensor of shape [batch_size]
///
/// Invocation is deterministic and side-effect-free. A failure here means
/// the artifact and the schema disagree, which is a configuration problem
/// to escalate, never something to retry.
pub(crate) trait DecisionModel {
    /// Returns the loaded ONNX session if available
    fn session(&self) -> Option<&Session>;

    /// Returns the feature width the model was trained on
    fn feature_width(&self) -> Option<usize>;

    /// Returns the model's input tensor name, read from session metadata at load
    fn input_name(&self) -> Option<&str>;

    /// Runs the decision model on one feature row and extracts the label.
    ///
    /// # Errors
    /// - `SchemaMismatch` if the row length differs from the trained width
    /// - `ModelError` if the session is missing, tensor creation fails, or
    ///   model execution fails
    /// - `PredictionError` if the model returns an empty label tensor
    fn decide(&self, features: &Array1<f32>) -> Result<i64, ScreenerError> {
        let session = self
            .session()
            .ok_or_else(|| ScreenerError::ModelError("Session not initialized".into()))?;
        let width = self
            .feature_width()
            .ok_or_else(|| ScreenerError::ModelError("Feature width not set".into()))?;
        let input_name = self
            .input_name()
            .ok_or_else(|| ScreenerError::ModelError("Model input name not set".into()))?;

        if features.len() != width {
            return Err(ScreenerError::SchemaMismatch {
                expected: width,
                actual: features.len(),
            });
        }

        let input_array = Array2::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| ScreenerError::ModelError(format!("Failed to create input array: {}", e)))?;
        let input_dyn = input_array.into_dyn();
        let input_row = input_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            input_name,
            Tensor::from_array(&input_row)
                .map_err(|e| ScreenerError::ModelError(format!("Failed to create input tensor: {}", e)))?,
        );

        let outputs = session
            .run(input_tensors)
            .map_err(|e| ScreenerError::ModelError(format!("Failed to run model: {}", e)))?;
        let label_tensor = outputs[0]
            .try_extract_tensor::<i64>()
            .map_err(|e| ScreenerError::ModelError(format!("Failed to extract label tensor: {}", e)))?;

        label_tensor
            .iter()
            .next()
            .copied()
            .ok_or_else(|| ScreenerError::PredictionError("Model returned an empty label tensor".into()))
    }
}
