use crate::schema::FEATURE_WIDTH;

/// Published artifact pairs the crate knows how to fetch and verify.
///
/// Each variant names a pre-trained decision model together with the
/// encoder fitted on the same training data. The two are produced by one
/// offline training run and must never be mixed across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinArtifact {
    /// Classifier trained on the OSMI tech-workplace mental-health survey
    OsmiTech,
}

/// Download and verification metadata for one artifact pair
#[derive(Debug, Clone)]
pub struct ArtifactInfo {
    pub name: String,
    pub model_url: String,
    pub encoder_url: String,
    pub model_hash: String,
    pub encoder_hash: String,
}

/// Static characteristics of an artifact pair
#[derive(Debug, Clone)]
pub struct ArtifactCharacteristics {
    /// Feature width the model was trained on
    pub feature_width: usize,
    /// Approximate size of the model file
    pub model_size_mb: usize,
}

impl BuiltinArtifact {
    pub fn get_artifact_info(&self) -> ArtifactInfo {
        match self {
            BuiltinArtifact::OsmiTech => ArtifactInfo {
                name: "osmi-tech".to_string(),
                model_url: "https://huggingface.co/mindscreen-ai/osmi-tech/resolve/main/model.onnx"
                    .to_string(),
                encoder_url:
                    "https://huggingface.co/mindscreen-ai/osmi-tech/resolve/main/encoder.json"
                        .to_string(),
                model_hash: "8c1d47a9f3b2e06d5a74c8e91f0b6d2a3e85c71b49d0f62a8b3c5e17d94a0f68"
                    .to_string(),
                encoder_hash: "4f92b8d1c6a35e07f8d2b49c1e673a05d8b94f26c1a70e53b82d4c09f61e735a"
                    .to_string(),
            },
        }
    }

    pub fn characteristics(&self) -> ArtifactCharacteristics {
        match self {
            BuiltinArtifact::OsmiTech => ArtifactCharacteristics {
                feature_width: FEATURE_WIDTH,
                model_size_mb: 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_info_is_complete() {
        let info = BuiltinArtifact::OsmiTech.get_artifact_info();
        assert_eq!(info.name, "osmi-tech");
        assert!(info.model_url.ends_with("model.onnx"));
        assert!(info.encoder_url.ends_with("encoder.json"));
        assert_eq!(info.model_hash.len(), 64);
        assert_eq!(info.encoder_hash.len(), 64);
    }

    #[test]
    fn test_characteristics_match_schema() {
        let characteristics = BuiltinArtifact::OsmiTech.characteristics();
        assert_eq!(characteristics.feature_width, 22);
    }
}
