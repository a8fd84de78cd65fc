use std::sync::Arc;

use ndarray::Array1;

use crate::encoder::FittedEncoder;
use crate::schema::{AnswerRecord, FEATURE_WIDTH};
use crate::screener::ScreenerError;

/// Combines the numeric field and the encoded categoricals into the fixed
/// feature row the decision model expects: `Age` first, then the 21
/// categorical codes in schema order.
///
/// The row length and ordering are a contract shared with the decision
/// model; both sides derive them from the schema, so they cannot drift
/// independently.
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    encoder: Arc<FittedEncoder>,
}

impl FeatureAssembler {
    pub fn new(encoder: Arc<FittedEncoder>) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &FittedEncoder {
        &self.encoder
    }

    /// Assembles one record into a feature row of length
    /// [`FEATURE_WIDTH`](crate::schema::FEATURE_WIDTH).
    ///
    /// `Age` passes through unchanged. Unseen categorical values encode to
    /// the sentinel, so a fully-populated record always assembles; only a
    /// schema-level caller bug surfaces as an error.
    pub fn assemble(&self, record: &AnswerRecord) -> Result<Array1<f32>, ScreenerError> {
        let mut row = Vec::with_capacity(FEATURE_WIDTH);
        row.push(record.age as f32);
        for (column, raw) in record.categoricals() {
            row.push(self.encoder.encode(column, raw)? as f32);
        }
        Ok(Array1::from_vec(row))
    }
}
