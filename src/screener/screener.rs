use std::fmt;
use std::sync::Arc;

use ort::session::Session;

use super::decision::DecisionModel;
use super::error::ScreenerError;
use crate::assembler::FeatureAssembler;
use crate::schema::{AnswerRecord, AGE_COLUMN, CATEGORICAL_COLUMNS, FEATURE_WIDTH};

/// The screening outcome, mapped from the classifier's binary label.
///
/// `1` means support is suggested, `0` means it is not. The mapping is a
/// fixed two-way switch with no thresholds and no probabilities, and the
/// two display strings never vary. A verdict is computed fresh per request
/// and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    SupportSuggested,
    SupportNotSuggested,
}

impl Verdict {
    /// Maps a raw class label to a verdict.
    ///
    /// # Errors
    /// `PredictionError` for any label other than 0 or 1 — a binary model
    /// that emits something else is misconfigured, and that must not be
    /// papered over with a default verdict.
    pub fn from_label(label: i64) -> Result<Self, ScreenerError> {
        match label {
            1 => Ok(Verdict::SupportSuggested),
            0 => Ok(Verdict::SupportNotSuggested),
            other => Err(ScreenerError::PredictionError(format!(
                "Unexpected class label {} from binary model",
                other
            ))),
        }
    }

    /// The raw class label this verdict corresponds to.
    pub fn label(&self) -> i64 {
        match self {
            Verdict::SupportSuggested => 1,
            Verdict::SupportNotSuggested => 0,
        }
    }

    /// The fixed human-readable form of the verdict.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::SupportSuggested => "You may need mental health support.",
            Verdict::SupportNotSuggested => "You may not need mental health support.",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A thread-safe mental-health screener backed by a pre-fitted ordinal
/// encoder and a pre-trained ONNX decision model.
///
/// # Thread Safety
///
/// This type is automatically `Send + Sync` because all of its fields are
/// thread-safe: `String` and `FeatureAssembler` are `Send + Sync`, and the
/// `Session` is wrapped in `Arc`. Both artifacts are loaded once at build
/// time and never mutated, so concurrent requests share them read-only
/// with no locking.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use mindscreen::{AnswerRecord, BuiltinArtifact, Screener};
/// use std::collections::HashMap;
/// use std::sync::Arc;
/// use std::thread;
///
/// let screener = Arc::new(Screener::builder()
///     .with_artifact(BuiltinArtifact::OsmiTech)?
///     .build()?);
///
/// # let values: HashMap<String, String> = HashMap::new();
/// let record = AnswerRecord::from_map(&values)?;
/// let screener_clone = Arc::clone(&screener);
/// thread::spawn(move || {
///     screener_clone.predict(&record).unwrap();
/// });
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Screener {
    pub model_path: String,
    pub encoder_path: String,
    pub session: Arc<Session>,
    pub assembler: FeatureAssembler,
    pub input_name: String,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Screener>();
    }
};

impl DecisionModel for Screener {
    fn session(&self) -> Option<&Session> {
        Some(&self.session)
    }

    fn feature_width(&self) -> Option<usize> {
        Some(FEATURE_WIDTH)
    }

    fn input_name(&self) -> Option<&str> {
        Some(&self.input_name)
    }
}

impl Screener {
    /// Creates a new ScreenerBuilder for fluent construction
    pub fn builder() -> super::builder::ScreenerBuilder {
        super::builder::ScreenerBuilder::new()
    }

    /// Returns information about the screener's current state
    pub fn info(&self) -> super::ScreenerInfo {
        super::ScreenerInfo {
            model_path: self.model_path.clone(),
            encoder_path: self.encoder_path.clone(),
            feature_width: FEATURE_WIDTH,
            columns: std::iter::once(AGE_COLUMN)
                .chain(CATEGORICAL_COLUMNS)
                .map(String::from)
                .collect(),
        }
    }

    /// Predicts whether the respondent may need mental-health support.
    ///
    /// Runs the full pipeline: assemble the feature row, invoke the
    /// decision model, map the binary label to a [`Verdict`]. Any failure
    /// in assembly or classification surfaces as a [`ScreenerError`];
    /// partially invalid input is never converted into a default verdict.
    ///
    /// # Example
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # use mindscreen::{AnswerRecord, BuiltinArtifact, Screener};
    /// # use std::collections::HashMap;
    /// # let screener = Screener::builder()
    /// #     .with_artifact(BuiltinArtifact::OsmiTech)?
    /// #     .build()?;
    /// # let values: HashMap<String, String> = HashMap::new();
    /// let record = AnswerRecord::from_map(&values)?;
    /// let verdict = screener.predict(&record)?;
    /// println!("{}", verdict);
    /// # Ok(())
    /// # }
    /// ```
    pub fn predict(&self, record: &AnswerRecord) -> Result<Verdict, ScreenerError> {
        Verdict::from_label(self.predict_label(record)?)
    }

    /// Predicts the raw binary label, for callers that want `{0, 1}`
    /// instead of the verdict mapping.
    pub fn predict_label(&self, record: &AnswerRecord) -> Result<i64, ScreenerError> {
        let features = self.assembler.assemble(record)?;
        self.decide(&features)
    }
}
