use mindscreen::{ArtifactManager, BuiltinArtifact};
use std::fs;

#[test]
fn test_artifact_paths() {
    let manager = ArtifactManager::new("/tmp/test-mindscreen-paths/artifacts").unwrap();
    let model_path = manager.get_model_path(BuiltinArtifact::OsmiTech);
    let encoder_path = manager.get_encoder_path(BuiltinArtifact::OsmiTech);

    assert!(model_path.ends_with("osmi-tech/model.onnx"));
    assert!(encoder_path.ends_with("osmi-tech/encoder.json"));
}

#[test]
fn test_new_creates_artifacts_dir() {
    let dir = std::env::temp_dir().join("mindscreen-manager-create/artifacts");
    fs::remove_dir_all(&dir).ok();

    let _manager = ArtifactManager::new(&dir).unwrap();
    assert!(dir.exists());

    fs::remove_dir_all(dir.parent().unwrap()).ok();
}

#[test]
fn test_missing_artifact_is_not_downloaded() {
    let manager = ArtifactManager::new("/tmp/test-mindscreen-missing/artifacts").unwrap();
    manager.remove_download(BuiltinArtifact::OsmiTech).unwrap();

    assert!(!manager.is_artifact_downloaded(BuiltinArtifact::OsmiTech));
    assert!(!manager.verify_artifact(BuiltinArtifact::OsmiTech).unwrap());
}

#[test]
fn test_corrupt_files_fail_verification() -> Result<(), Box<dyn std::error::Error>> {
    let manager = ArtifactManager::new("/tmp/test-mindscreen-corrupt/artifacts")?;
    let model_path = manager.get_model_path(BuiltinArtifact::OsmiTech);
    let encoder_path = manager.get_encoder_path(BuiltinArtifact::OsmiTech);

    fs::create_dir_all(model_path.parent().unwrap())?;
    fs::write(&model_path, "corrupted data")?;
    fs::write(&encoder_path, "{}")?;

    // Files exist, so the presence check passes, but the hashes cannot match.
    assert!(manager.is_artifact_downloaded(BuiltinArtifact::OsmiTech));
    assert!(!manager.verify_artifact(BuiltinArtifact::OsmiTech)?);

    manager.remove_download(BuiltinArtifact::OsmiTech)?;
    Ok(())
}

#[test]
fn test_remove_download_is_idempotent() {
    let manager = ArtifactManager::new("/tmp/test-mindscreen-remove/artifacts").unwrap();
    assert!(manager.remove_download(BuiltinArtifact::OsmiTech).is_ok());
    assert!(manager.remove_download(BuiltinArtifact::OsmiTech).is_ok());
}
