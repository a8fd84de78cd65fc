use mindscreen::{
    AnswerRecord, ArtifactManager, BuiltinArtifact, Screener, ScreenerError, Verdict,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

/// Builds a screener from the locally cached artifact pair, or returns
/// `None` when the cache is empty (e.g. offline CI). Download the pair
/// once with `ArtifactManager::download_artifact` to enable these tests.
fn setup_test_screener() -> Option<Screener> {
    let manager = ArtifactManager::new_default().ok()?;
    if !manager.is_artifact_downloaded(BuiltinArtifact::OsmiTech) {
        eprintln!("osmi-tech artifact not downloaded, skipping");
        return None;
    }

    Some(
        Screener::builder()
            .with_artifact(BuiltinArtifact::OsmiTech)
            .unwrap()
            .build()
            .expect("Failed to create screener"),
    )
}

fn baseline_map() -> HashMap<String, String> {
    let pairs = [
        ("Age", "30"),
        ("Gender", "Male"),
        ("self_employed", "No"),
        ("family_history", "Yes"),
        ("work_interfere", "Sometimes"),
        ("no_employees", "6-25"),
        ("remote_work", "No"),
        ("tech_company", "Yes"),
        ("benefits", "Yes"),
        ("care_options", "No"),
        ("wellness_program", "No"),
        ("seek_help", "Yes"),
        ("anonymity", "Yes"),
        ("leave", "Somewhat easy"),
        ("mental_health_consequence", "No"),
        ("phys_health_consequence", "No"),
        ("coworkers", "Yes"),
        ("supervisor", "Yes"),
        ("mental_health_interview", "Yes"),
        ("phys_health_interview", "Yes"),
        ("mental_vs_physical", "Yes"),
        ("obs_consequence", "No"),
    ];
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_end_to_end_screening() {
    let Some(screener) = setup_test_screener() else { return };
    let record = AnswerRecord::from_map(&baseline_map()).unwrap();

    let verdict = screener.predict(&record).unwrap();
    assert!(matches!(
        verdict,
        Verdict::SupportSuggested | Verdict::SupportNotSuggested
    ));
    assert!(verdict.to_string().starts_with("You may"));
}

#[test]
fn test_screening_is_deterministic() {
    let Some(screener) = setup_test_screener() else { return };
    let record = AnswerRecord::from_map(&baseline_map()).unwrap();

    let first = screener.predict(&record).unwrap();
    let second = screener.predict(&record).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unseen_category_still_screens() {
    let Some(screener) = setup_test_screener() else { return };
    let mut record = AnswerRecord::from_map(&baseline_map()).unwrap();
    record.gender = "ostensibly male, unsure what that really means".into();
    record.benefits = "Prefer not to say".into();

    assert!(screener.predict(&record).is_ok());
}

#[test]
fn test_missing_field_yields_error_not_verdict() {
    let mut values = baseline_map();
    values.remove("anonymity");
    let err = AnswerRecord::from_map(&values).unwrap_err();
    assert!(matches!(err, ScreenerError::MissingField(ref f) if f == "anonymity"));
}

#[test]
fn test_label_matches_verdict() {
    let Some(screener) = setup_test_screener() else { return };
    let record = AnswerRecord::from_map(&baseline_map()).unwrap();

    let label = screener.predict_label(&record).unwrap();
    let verdict = screener.predict(&record).unwrap();
    assert_eq!(verdict.label(), label);
}

#[test]
fn test_screener_info() {
    let Some(screener) = setup_test_screener() else { return };
    let info = screener.info();
    assert_eq!(info.feature_width, 22);
    assert_eq!(info.columns.len(), 22);
    assert_eq!(info.columns[0], "Age");
    assert!(info.model_path.ends_with("model.onnx"));
    assert!(info.encoder_path.ends_with("encoder.json"));
}

#[test]
fn test_thread_safety() {
    let Some(screener) = setup_test_screener() else { return };
    let screener = Arc::new(screener);
    let record = AnswerRecord::from_map(&baseline_map()).unwrap();
    let mut handles = vec![];

    for _ in 0..3 {
        let screener = Arc::clone(&screener);
        let record = record.clone();
        let handle = thread::spawn(move || {
            let result = screener.predict(&record);
            assert!(result.is_ok());
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_screener_can_move_across_threads() {
    let Some(screener) = setup_test_screener() else { return };
    let record = AnswerRecord::from_map(&baseline_map()).unwrap();

    thread::spawn(move || {
        screener.predict(&record).unwrap();
    })
    .join()
    .unwrap();
}
