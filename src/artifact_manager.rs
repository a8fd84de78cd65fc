use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log;
use reqwest;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::artifacts::{ArtifactInfo, BuiltinArtifact};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not downloaded: {0}")]
    NotDownloaded(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Artifact verification failed")]
    VerificationFailed,
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
}

/// Fetches, caches, and verifies artifact pairs (decision model + fitted
/// encoder). A screener cannot be built until both files are present and
/// their hashes check out, so a corrupt or missing artifact stops the
/// process from serving predictions at all.
#[derive(Clone)]
pub struct ArtifactManager {
    artifacts_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ArtifactManager {
    /// Creates a new ArtifactManager with the default artifacts directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_artifacts_dir())
    }

    /// Returns the default artifacts directory path
    pub fn get_default_artifacts_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("MINDSCREEN_CACHE") {
            return PathBuf::from(path).join("artifacts");
        }

        // 2. Use platform-specific cache directory
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("mindscreen").join("artifacts");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("mindscreen").join("artifacts");
        }

        // 4. If all else fails, use system temp directory (platform agnostic)
        env::temp_dir().join("mindscreen").join("artifacts")
    }

    pub fn new<P: AsRef<Path>>(artifacts_dir: P) -> io::Result<Self> {
        let artifacts_dir = artifacts_dir.as_ref().to_path_buf();
        fs::create_dir_all(&artifacts_dir)?;
        Ok(Self {
            artifacts_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn get_model_path(&self, artifact: BuiltinArtifact) -> PathBuf {
        let info = artifact.get_artifact_info();
        self.artifacts_dir.join(info.name).join("model.onnx")
    }

    pub fn get_encoder_path(&self, artifact: BuiltinArtifact) -> PathBuf {
        let info = artifact.get_artifact_info();
        self.artifacts_dir.join(info.name).join("encoder.json")
    }

    pub fn is_artifact_downloaded(&self, artifact: BuiltinArtifact) -> bool {
        let model_path = self.get_model_path(artifact);
        let encoder_path = self.get_encoder_path(artifact);
        log::info!("Checking if artifact is downloaded:");
        log::info!("  Model path: {:?} (exists: {})", model_path, model_path.exists());
        log::info!("  Encoder path: {:?} (exists: {})", encoder_path, encoder_path.exists());
        model_path.exists() && encoder_path.exists()
    }

    pub async fn download_artifact(&self, artifact: BuiltinArtifact) -> Result<(), ArtifactError> {
        let info = artifact.get_artifact_info();
        let _lock = self.download_lock.lock().await;

        let artifact_dir = self.artifacts_dir.join(&info.name);
        log::info!("Creating artifact directory at {:?}", artifact_dir);
        fs::create_dir_all(&artifact_dir)?;

        let model_path = self.get_model_path(artifact);
        let model_result = if model_path.exists() {
            log::info!("Model file exists at {:?}, verifying...", model_path);
            if !self.verify_file(&model_path, &info.model_hash)? {
                log::warn!("Model file verification failed, redownloading");
                self.download_and_verify_model(&info, &model_path).await
            } else {
                log::info!("Existing model file verified successfully");
                Ok(())
            }
        } else {
            log::info!("Model file does not exist, downloading...");
            self.download_and_verify_model(&info, &model_path).await
        };

        let encoder_path = self.get_encoder_path(artifact);
        let encoder_result = if encoder_path.exists() {
            log::info!("Encoder file exists at {:?}, verifying...", encoder_path);
            if !self.verify_file(&encoder_path, &info.encoder_hash)? {
                log::warn!("Encoder file verification failed, redownloading");
                self.download_and_verify_encoder(&info, &encoder_path).await
            } else {
                log::info!("Existing encoder file verified successfully");
                Ok(())
            }
        } else {
            log::info!("Encoder file does not exist, downloading...");
            self.download_and_verify_encoder(&info, &encoder_path).await
        };

        match (model_result, encoder_result) {
            (Ok(()), Ok(())) => {
                log::info!("Model and encoder ready to use");
                Ok(())
            }
            (Err(e), _) => {
                log::error!("Failed to setup model file: {}", e);
                // Cleanup on failure
                let _ = self.remove_download(artifact);
                Err(e)
            }
            (_, Err(e)) => {
                log::error!("Failed to setup encoder file: {}", e);
                // Cleanup on failure
                let _ = self.remove_download(artifact);
                Err(e)
            }
        }
    }

    fn verify_file(&self, path: &Path, expected_hash: &str) -> Result<bool, ArtifactError> {
        let bytes = fs::read(path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("{:x}", hasher.finalize());
        log::info!("Verifying {:?}: calculated {}, expected {}", path, hash, expected_hash);
        Ok(hash == expected_hash)
    }

    pub fn verify_artifact(&self, artifact: BuiltinArtifact) -> Result<bool, ArtifactError> {
        let info = artifact.get_artifact_info();
        let model_path = self.get_model_path(artifact);
        let encoder_path = self.get_encoder_path(artifact);

        if !model_path.exists() || !encoder_path.exists() {
            log::info!("One or both artifact files do not exist");
            return Ok(false);
        }

        let model_ok = self.verify_file(&model_path, &info.model_hash)?;
        let encoder_ok = self.verify_file(&encoder_path, &info.encoder_hash)?;

        log::info!("Verification results:");
        log::info!("  Model hash verification: {}", model_ok);
        log::info!("  Encoder hash verification: {}", encoder_ok);

        Ok(model_ok && encoder_ok)
    }

    async fn download_and_verify_file(
        &self,
        url: &str,
        path: &Path,
        expected_hash: &str,
        file_type: &str,
    ) -> Result<(), ArtifactError> {
        log::info!("Downloading {} file from {} to {:?}", file_type, url, path);
        let response = reqwest::get(url).await?;
        log::info!("Download response status: {}", response.status());
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("{:x}", hasher.finalize());

        if hash != expected_hash {
            log::error!("{} hash mismatch: expected {}, got {}", file_type, expected_hash, hash);
            return Err(ArtifactError::HashMismatch {
                file_type: file_type.to_string(),
                expected: expected_hash.to_string(),
                actual: hash,
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        log::info!("Writing {} bytes to {:?}", bytes.len(), path);
        fs::write(path, bytes)?;

        // Verify after writing
        if !self.verify_file(path, expected_hash)? {
            return Err(ArtifactError::VerificationFailed);
        }

        log::info!("{} file downloaded and verified successfully", file_type);
        Ok(())
    }

    async fn download_and_verify_model(
        &self,
        info: &ArtifactInfo,
        path: &Path,
    ) -> Result<(), ArtifactError> {
        self.download_and_verify_file(&info.model_url, path, &info.model_hash, "model")
            .await
    }

    async fn download_and_verify_encoder(
        &self,
        info: &ArtifactInfo,
        path: &Path,
    ) -> Result<(), ArtifactError> {
        self.download_and_verify_file(&info.encoder_url, path, &info.encoder_hash, "encoder")
            .await
    }

    pub fn remove_download(&self, artifact: BuiltinArtifact) -> Result<(), ArtifactError> {
        let model_path = self.get_model_path(artifact);
        let encoder_path = self.get_encoder_path(artifact);

        if model_path.exists() {
            fs::remove_file(&model_path)?;
        }
        if encoder_path.exists() {
            fs::remove_file(&encoder_path)?;
        }
        Ok(())
    }

    /// Ensures that an artifact pair is downloaded and verified.
    /// If the files don't exist, they will be downloaded.
    /// If verification fails, they will be re-downloaded.
    pub async fn ensure_artifact_downloaded(
        &self,
        artifact: BuiltinArtifact,
    ) -> Result<(), ArtifactError> {
        log::info!("Checking if artifact {:?} is downloaded...", artifact);
        if !self.is_artifact_downloaded(artifact) {
            log::info!("Artifact not found, downloading...");
            self.download_artifact(artifact).await?;
        } else {
            log::info!("Artifact exists, verifying...");
            if !self.verify_artifact(artifact)? {
                log::info!("Artifact verification failed, re-downloading...");
                self.remove_download(artifact)?;
                self.download_artifact(artifact).await?;
            } else {
                log::info!("Artifact verification successful");
            }
        }
        Ok(())
    }
}
