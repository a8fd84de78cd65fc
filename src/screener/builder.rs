use std::sync::Arc;

use log::{error, info};
use ndarray::Array1;
use ort::session::Session;
use ort::value::ValueType;

use super::decision::DecisionModel;
use super::error::ScreenerError;
use super::screener::Screener;
use crate::artifact_manager::ArtifactManager;
use crate::artifacts::BuiltinArtifact;
use crate::assembler::FeatureAssembler;
use crate::encoder::FittedEncoder;
use crate::runtime::{create_session_builder, RuntimeConfig};
use crate::schema::FEATURE_WIDTH;

/// A builder for constructing a Screener with a fluent interface.
///
/// Both artifacts (the ONNX decision model and the fitted encoder) are
/// loaded and validated here, so a misconfigured pair fails at startup
/// instead of on the first request.
#[derive(Default, Debug)]
pub struct ScreenerBuilder {
    model_path: Option<String>,
    encoder_path: Option<String>,
    session: Option<Session>,
    encoder: Option<FittedEncoder>,
    input_name: Option<String>,
    runtime_config: RuntimeConfig,
}

impl DecisionModel for ScreenerBuilder {
    /// Returns a reference to the ONNX session if it exists
    fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn feature_width(&self) -> Option<usize> {
        Some(FEATURE_WIDTH)
    }

    fn input_name(&self) -> Option<&str> {
        self.input_name.as_deref()
    }
}

impl ScreenerBuilder {
    /// Creates a new empty ScreenerBuilder instance with default configuration
    pub fn new() -> Self {
        Self {
            model_path: None,
            encoder_path: None,
            session: None,
            encoder: None,
            input_name: None,
            runtime_config: RuntimeConfig::default(),
        }
    }

    /// Sets the runtime configuration for ONNX model execution
    ///
    /// # Example
    /// ```
    /// use mindscreen::{ScreenerBuilder, RuntimeConfig};
    ///
    /// let config = RuntimeConfig::default();
    /// let builder = ScreenerBuilder::new()
    ///     .with_runtime_config(config);
    /// ```
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Loads a built-in artifact pair from the local artifact cache.
    ///
    /// # Errors
    /// `BuildError` if the paths are already set, the artifact is not
    /// downloaded, or either file fails to load or validate.
    ///
    /// # Example
    /// ```no_run
    /// use mindscreen::{ScreenerBuilder, BuiltinArtifact};
    ///
    /// let builder = ScreenerBuilder::new()
    ///     .with_artifact(BuiltinArtifact::OsmiTech);
    /// ```
    pub fn with_artifact(self, artifact: BuiltinArtifact) -> Result<Self, ScreenerError> {
        if self.model_path.is_some() || self.encoder_path.is_some() {
            return Err(ScreenerError::BuildError(
                "Model and encoder paths already set".to_string(),
            ));
        }

        let manager = ArtifactManager::new_default()
            .map_err(|e| ScreenerError::BuildError(format!("Failed to create artifact manager: {}", e)))?;

        if !manager.is_artifact_downloaded(artifact) {
            return Err(ScreenerError::BuildError(format!(
                "Artifact '{:?}' is not downloaded. Please download it first using ArtifactManager::download_artifact()",
                artifact
            )));
        }

        let model_path = manager.get_model_path(artifact);
        let encoder_path = manager.get_encoder_path(artifact);
        self.load_pair(
            &model_path.to_string_lossy(),
            &encoder_path.to_string_lossy(),
        )
    }

    /// Sets a custom model and encoder path for the screener.
    ///
    /// # Errors
    /// `BuildError` if either path is empty, the paths are already set, a
    /// file does not exist, or loading/validation fails.
    ///
    /// # Example
    /// ```no_run
    /// use mindscreen::ScreenerBuilder;
    ///
    /// let builder = ScreenerBuilder::new()
    ///     .with_custom_artifact("path/to/model.onnx", "path/to/encoder.json");
    /// ```
    pub fn with_custom_artifact(
        self,
        model_path: &str,
        encoder_path: &str,
    ) -> Result<Self, ScreenerError> {
        if model_path.is_empty() || encoder_path.is_empty() {
            return Err(ScreenerError::BuildError(
                "Model and encoder paths cannot be empty".to_string(),
            ));
        }
        if self.model_path.is_some() || self.encoder_path.is_some() {
            return Err(ScreenerError::BuildError(
                "Model and encoder paths already set".to_string(),
            ));
        }
        if !std::path::Path::new(model_path).exists() {
            return Err(ScreenerError::BuildError(format!(
                "Model file not found: {}",
                model_path
            )));
        }
        if !std::path::Path::new(encoder_path).exists() {
            return Err(ScreenerError::BuildError(format!(
                "Encoder file not found: {}",
                encoder_path
            )));
        }

        self.load_pair(model_path, encoder_path)
    }

    fn load_pair(mut self, model_path: &str, encoder_path: &str) -> Result<Self, ScreenerError> {
        // The encoder validates vocabulary coverage for every column on load.
        let encoder = FittedEncoder::from_file(encoder_path).map_err(|e| {
            error!("Failed to load encoder artifact: {}", e);
            e
        })?;
        info!("Encoder artifact loaded successfully");

        // Create session using the singleton environment
        let session = create_session_builder(&self.runtime_config)?
            .commit_from_file(model_path)?;

        let input_name = Self::validate_model(&session)?;
        info!("Model structure validated successfully");

        self.model_path = Some(model_path.to_string());
        self.encoder_path = Some(encoder_path.to_string());
        self.session = Some(session);
        self.encoder = Some(encoder);
        self.input_name = Some(input_name);
        Ok(self)
    }

    /// Builds and returns the final Screener instance.
    ///
    /// Runs one probe row through the decision model so a schema mismatch
    /// between the artifacts aborts the build instead of failing the first
    /// live request.
    ///
    /// # Errors
    /// `BuildError` if no artifacts were loaded; `SchemaMismatch` or
    /// `ModelError` if the probe fails.
    ///
    /// # Example
    /// ```no_run
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use mindscreen::{ScreenerBuilder, BuiltinArtifact};
    ///
    /// let screener = ScreenerBuilder::new()
    ///     .with_artifact(BuiltinArtifact::OsmiTech)?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(mut self) -> Result<Screener, ScreenerError> {
        if self.model_path.is_none() || self.encoder_path.is_none() {
            return Err(ScreenerError::BuildError(
                "Model and encoder paths must be set".to_string(),
            ));
        }

        let session = Arc::new(
            self.session
                .take()
                .ok_or_else(|| ScreenerError::BuildError("No ONNX model loaded".into()))?,
        );
        let encoder = Arc::new(
            self.encoder
                .take()
                .ok_or_else(|| ScreenerError::BuildError("No encoder loaded".into()))?,
        );

        let screener = Screener {
            model_path: self.model_path.take().unwrap(),
            encoder_path: self.encoder_path.take().unwrap(),
            session,
            assembler: FeatureAssembler::new(encoder),
            input_name: self.input_name.take().unwrap(),
        };

        let probe = Array1::zeros(FEATURE_WIDTH);
        screener.decide(&probe)?;
        info!("Decision model probe succeeded");

        Ok(screener)
    }

    /// Validates that the model has the expected input/output structure and
    /// returns the input tensor name from session metadata.
    ///
    /// # Errors
    /// - `ModelError` if the model has no inputs or no outputs
    /// - `SchemaMismatch` if the input declares a static width that differs
    ///   from the questionnaire schema
    fn validate_model(session: &Session) -> Result<String, ScreenerError> {
        let inputs = &session.inputs;
        if inputs.is_empty() {
            return Err(ScreenerError::ModelError(
                "Model must have at least 1 input for the feature row".to_string(),
            ));
        }

        let outputs = &session.outputs;
        if outputs.is_empty() {
            return Err(ScreenerError::ModelError(
                "Model must have at least 1 output for the class label".to_string(),
            ));
        }

        if let ValueType::Tensor { ref dimensions, .. } = inputs[0].input_type {
            if let Some(&width) = dimensions.last() {
                if width > 0 && width as usize != FEATURE_WIDTH {
                    return Err(ScreenerError::SchemaMismatch {
                        expected: width as usize,
                        actual: FEATURE_WIDTH,
                    });
                }
            }
        }

        Ok(inputs[0].name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_paths_are_rejected() {
        assert!(ScreenerBuilder::new()
            .with_custom_artifact("", "encoder.json")
            .is_err());
        assert!(ScreenerBuilder::new()
            .with_custom_artifact("model.onnx", "")
            .is_err());
    }

    #[test]
    fn test_missing_files_are_rejected() {
        let result = ScreenerBuilder::new()
            .with_custom_artifact("/nonexistent/model.onnx", "/nonexistent/encoder.json");
        assert!(matches!(result, Err(ScreenerError::BuildError(_))));
    }

    #[test]
    fn test_build_without_artifacts_fails() {
        let result = ScreenerBuilder::new().build();
        assert!(matches!(result, Err(ScreenerError::BuildError(_))));
    }
}
