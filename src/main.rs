use anyhow::Result;
use clap::Parser;
use log::info;
use mindscreen::{AnswerRecord, ArtifactManager, BuiltinArtifact, Screener};
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Force a fresh download of the artifact files
    #[arg(short, long)]
    fresh: bool,
}

async fn ensure_artifact_downloaded(fresh: bool) -> Result<()> {
    let manager = ArtifactManager::new_default()?;
    let artifact = BuiltinArtifact::OsmiTech;

    if fresh {
        info!("Fresh download requested - removing any existing artifact files...");
        manager.remove_download(artifact)?;
    }

    if !manager.is_artifact_downloaded(artifact) {
        info!("Downloading artifact...");
        manager.download_artifact(artifact).await?;
    }

    Ok(())
}

fn baseline_record() -> AnswerRecord {
    AnswerRecord {
        age: 30,
        gender: "Male".into(),
        self_employed: "No".into(),
        family_history: "Yes".into(),
        work_interfere: "Sometimes".into(),
        no_employees: "6-25".into(),
        remote_work: "No".into(),
        tech_company: "Yes".into(),
        benefits: "Yes".into(),
        care_options: "No".into(),
        wellness_program: "No".into(),
        seek_help: "Yes".into(),
        anonymity: "Yes".into(),
        leave: "Somewhat easy".into(),
        mental_health_consequence: "No".into(),
        phys_health_consequence: "No".into(),
        coworkers: "Yes".into(),
        supervisor: "Yes".into(),
        mental_health_interview: "Yes".into(),
        phys_health_interview: "Yes".into(),
        mental_vs_physical: "Yes".into(),
        obs_consequence: "No".into(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("=== Starting Mental-Health Screener Demo ===");

    // Ensure artifacts are downloaded before proceeding
    ensure_artifact_downloaded(args.fresh).await?;

    let start_time = Instant::now();
    info!("Building screener...");

    let screener = Screener::builder()
        .with_artifact(BuiltinArtifact::OsmiTech)?
        .build()?;

    let build_time = start_time.elapsed();
    info!("=== Screener Built Successfully (took {:.2?}) ===\n", build_time);

    let baseline = baseline_record();
    info!("Testing screening with the baseline record");
    process_record(&screener, "baseline", &baseline)?;

    // Variations on the baseline, including the noisy free-text answers a
    // real form produces.
    let mut misspelled_gender = baseline_record();
    misspelled_gender.gender = "Malr".into();

    let mut free_text_gender = baseline_record();
    free_text_gender.gender = "ostensibly male, unsure what that really means".into();

    let mut unrecognized_gender = baseline_record();
    unrecognized_gender.gender = "xyz123".into();

    let mut remote_worker = baseline_record();
    remote_worker.remote_work = "Yes".into();
    remote_worker.no_employees = "More than 1000".into();

    let mut no_family_history = baseline_record();
    no_family_history.family_history = "No".into();
    no_family_history.work_interfere = "Never".into();

    let mut unseen_category = baseline_record();
    unseen_category.benefits = "Prefer not to say".into();

    let test_records = vec![
        ("misspelled gender", misspelled_gender),
        ("free-text gender", free_text_gender),
        ("unrecognized gender", unrecognized_gender),
        ("remote worker at a large company", remote_worker),
        ("no family history, work never interferes", no_family_history),
        ("category the training data never saw", unseen_category),
    ];

    info!("=== Running Screenings ({} records) ===\n", test_records.len());
    let screen_start = Instant::now();

    for (i, (label, record)) in test_records.iter().enumerate() {
        info!(
            "\nTest {}/{} (elapsed: {:.2?}):",
            i + 1,
            test_records.len(),
            screen_start.elapsed()
        );
        process_record(&screener, label, record)?;
    }

    let total_time = start_time.elapsed();
    let screen_time = screen_start.elapsed();

    info!("\n=== Demo Complete ===");
    info!("Total time: {:.2?}", total_time);
    info!("Build time: {:.2?}", build_time);
    info!("Screening time: {:.2?}", screen_time);
    info!(
        "Average time per screening: {:.2?}",
        screen_time / test_records.len() as u32
    );

    Ok(())
}

fn process_record(screener: &Screener, label: &str, record: &AnswerRecord) -> Result<()> {
    info!("\nProcessing record: {}", label);

    match screener.predict(record) {
        Ok(verdict) => {
            println!("\nResults for '{}':", label);
            println!("  Label: {}", verdict.label());
            println!("  Verdict: {}", verdict);
        }
        Err(e) => {
            eprintln!("\nError screening record '{}': {}", label, e);
            eprintln!("Consider:");
            eprintln!("  - Checking that all 22 questionnaire fields are present");
            eprintln!("  - Verifying the artifact pair with ArtifactManager::verify_artifact()");
            return Err(e.into());
        }
    }

    Ok(())
}
