use ort::Error as OrtError;
use std::fmt;

/// Represents the different types of errors that can occur in the screening pipeline.
#[derive(Debug)]
pub enum ScreenerError {
    /// A required questionnaire field is absent from the input
    MissingField(String),
    /// A field name outside the questionnaire schema was supplied
    UnknownField(String),
    /// Feature row width does not match what the decision model was trained on
    SchemaMismatch { expected: usize, actual: usize },
    /// Error occurred while loading or running the ONNX model
    ModelError(String),
    /// Error occurred during the build phase
    BuildError(String),
    /// Error occurred while making predictions
    PredictionError(String),
    /// Error occurred due to invalid input parameters
    ValidationError(String),
}

impl fmt::Display for ScreenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Missing required field: {}", field),
            Self::UnknownField(field) => write!(f, "Unknown field: {}", field),
            Self::SchemaMismatch { expected, actual } => write!(
                f,
                "Schema mismatch: expected feature width {}, got {}",
                expected, actual
            ),
            Self::ModelError(msg) => write!(f, "Model error: {}", msg),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ScreenerError {}

impl From<OrtError> for ScreenerError {
    fn from(err: OrtError) -> Self {
        ScreenerError::BuildError(err.to_string())
    }
}
