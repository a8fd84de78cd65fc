//! A thread-safe mental-health screening classifier using a pre-trained
//! ONNX model over encoded questionnaire answers.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mindscreen::{AnswerRecord, BuiltinArtifact, Screener};
//!
//! let screener = Screener::builder()
//!     .with_artifact(BuiltinArtifact::OsmiTech)?
//!     .build()?;
//!
//! let record = AnswerRecord {
//!     age: 30,
//!     gender: "Male".into(),
//!     self_employed: "No".into(),
//!     family_history: "Yes".into(),
//!     work_interfere: "Sometimes".into(),
//!     no_employees: "6-25".into(),
//!     remote_work: "No".into(),
//!     tech_company: "Yes".into(),
//!     benefits: "Yes".into(),
//!     care_options: "No".into(),
//!     wellness_program: "No".into(),
//!     seek_help: "Yes".into(),
//!     anonymity: "Yes".into(),
//!     leave: "Somewhat easy".into(),
//!     mental_health_consequence: "No".into(),
//!     phys_health_consequence: "No".into(),
//!     coworkers: "Yes".into(),
//!     supervisor: "Yes".into(),
//!     mental_health_interview: "Yes".into(),
//!     phys_health_interview: "Yes".into(),
//!     mental_vs_physical: "Yes".into(),
//!     obs_consequence: "No".into(),
//! };
//!
//! let verdict = screener.predict(&record)?;
//! println!("{}", verdict);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The screener is thread-safe and can be shared across threads using
//! `Arc`. Both artifacts are loaded once at build time and never mutated,
//! so concurrent requests need no locking:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mindscreen::{BuiltinArtifact, Screener};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let screener = Arc::new(Screener::builder()
//!     .with_artifact(BuiltinArtifact::OsmiTech)?
//!     .build()?);
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let screener = Arc::clone(&screener);
//!     handles.push(thread::spawn(move || {
//!         let info = screener.info();
//!         assert_eq!(info.feature_width, 22);
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifact_manager;
pub mod artifacts;
pub mod assembler;
pub mod encoder;
mod runtime;
pub mod schema;
pub mod screener;

pub use artifact_manager::{ArtifactError, ArtifactManager};
pub use artifacts::{ArtifactCharacteristics, ArtifactInfo, BuiltinArtifact};
pub use assembler::FeatureAssembler;
pub use encoder::{Canonical, EncoderArtifact, FittedEncoder, NormalizationTable, Normalizer};
pub use runtime::{create_session_builder, RuntimeConfig};
pub use schema::{AnswerRecord, AGE_COLUMN, CATEGORICAL_COLUMNS, DEMOGRAPHIC_COLUMN, FEATURE_WIDTH};
pub use screener::{Screener, ScreenerBuilder, ScreenerError, ScreenerInfo, Verdict};

pub fn init_logger() {
    env_logger::init();
}
