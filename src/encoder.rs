use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::schema::{CATEGORICAL_COLUMNS, DEMOGRAPHIC_COLUMN};
use crate::screener::ScreenerError;

lazy_static! {
    /// Spelling and casing variants observed in the survey's free-text
    /// demographic field, keyed by trimmed lowercase form.
    static ref DEMOGRAPHIC_VARIANTS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("male", "Male");
        m.insert("mail", "Male");
        m.insert("malr", "Male");
        m.insert("female", "Female");
        m.insert("cis-female/femme", "Female");
        m.insert("non-binary", "Non-Binary");
        m.insert("male leaning androgynous", "Non-Binary");
        m.insert("ostensibly male, unsure what that really means", "Non-Binary");
        m
    };
}

const DEFAULT_DEMOGRAPHIC_FALLBACK: &str = "Non-Binary";

fn default_unknown_value() -> i64 {
    -1
}

/// Serialized form of the pre-fitted encoder artifact (`encoder.json`).
///
/// Produced by the offline fitting process; the crate only reads it. The
/// sentinel code and the demographic fallback category are policy choices
/// baked in at fit time, so they travel with the artifact rather than
/// living in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderArtifact {
    /// Fitted vocabulary per categorical column, listed in code order:
    /// a value's position in its vector is its ordinal code.
    pub categories: HashMap<String, Vec<String>>,
    /// Reserved code returned for values outside a fitted vocabulary.
    #[serde(default = "default_unknown_value")]
    pub unknown_value: i64,
    /// Normalization table for the free-text demographic column. Artifacts
    /// fitted before the table existed omit it; the crate's built-in table
    /// is used instead.
    #[serde(default)]
    pub normalization: Option<NormalizationTable>,
}

/// Variant-to-canonical mapping for one free-text column, with the
/// catch-all category for anything the map does not recognize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationTable {
    pub column: String,
    pub map: HashMap<String, String>,
    pub fallback: String,
}

/// Outcome of canonicalizing a free-text categorical value.
///
/// Total over all input strings: a value is either a recognized variant of
/// a canonical category or it collapses to the fallback. Raw free text
/// never reaches the ordinal lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Canonical {
    Known(String),
    Fallback(String),
}

impl Canonical {
    pub fn as_str(&self) -> &str {
        match self {
            Canonical::Known(s) => s,
            Canonical::Fallback(s) => s,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Canonical::Fallback(_))
    }
}

/// Collapses free-text variants of one categorical column into a fixed
/// canonical set. Lookup is by trimmed lowercase form, so "Male " and
/// "MALE" land on the same category as "Male".
#[derive(Debug, Clone)]
pub struct Normalizer {
    column: String,
    map: HashMap<String, String>,
    fallback: String,
}

impl Normalizer {
    pub fn from_table(table: &NormalizationTable) -> Self {
        let map = table
            .map
            .iter()
            .map(|(variant, canonical)| (variant.trim().to_lowercase(), canonical.clone()))
            .collect();
        Self {
            column: table.column.clone(),
            map,
            fallback: table.fallback.clone(),
        }
    }

    /// The column this normalizer applies to.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The catch-all category for unrecognized values.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn canonicalize(&self, raw: &str) -> Canonical {
        let key = raw.trim().to_lowercase();
        match self.map.get(&key) {
            Some(canonical) => Canonical::Known(canonical.clone()),
            None => Canonical::Fallback(self.fallback.clone()),
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            column: DEMOGRAPHIC_COLUMN.to_string(),
            map: DEMOGRAPHIC_VARIANTS
                .iter()
                .map(|(variant, canonical)| (variant.to_string(), canonical.to_string()))
                .collect(),
            fallback: DEFAULT_DEMOGRAPHIC_FALLBACK.to_string(),
        }
    }
}

/// The pre-fitted ordinal encoder, immutable once loaded.
///
/// Maps each categorical answer to the code it was assigned at fit time.
/// Values outside the fitted vocabulary encode to the reserved sentinel
/// rather than failing: production inputs will contain categories the
/// training data never saw.
#[derive(Debug)]
pub struct FittedEncoder {
    codes: HashMap<String, HashMap<String, i64>>,
    unknown_value: i64,
    normalizer: Normalizer,
}

impl FittedEncoder {
    /// Validates an artifact and builds the lookup tables.
    ///
    /// # Errors
    /// `BuildError` if any categorical column lacks a fitted vocabulary —
    /// an incomplete artifact must fail at load, not at request time.
    pub fn from_artifact(artifact: EncoderArtifact) -> Result<Self, ScreenerError> {
        for column in CATEGORICAL_COLUMNS {
            match artifact.categories.get(column) {
                Some(values) if !values.is_empty() => {}
                _ => {
                    return Err(ScreenerError::BuildError(format!(
                        "Encoder artifact has no fitted vocabulary for column '{}'",
                        column
                    )))
                }
            }
        }

        let codes = artifact
            .categories
            .into_iter()
            .map(|(column, values)| {
                let lookup = values
                    .into_iter()
                    .enumerate()
                    .map(|(code, value)| (value, code as i64))
                    .collect();
                (column, lookup)
            })
            .collect();

        let normalizer = artifact
            .normalization
            .as_ref()
            .map(Normalizer::from_table)
            .unwrap_or_default();

        Ok(Self {
            codes,
            unknown_value: artifact.unknown_value,
            normalizer,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScreenerError> {
        let artifact: EncoderArtifact = serde_json::from_reader(reader)
            .map_err(|e| ScreenerError::BuildError(format!("Failed to parse encoder artifact: {}", e)))?;
        Self::from_artifact(artifact)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScreenerError> {
        let file = File::open(path.as_ref()).map_err(|e| {
            ScreenerError::BuildError(format!(
                "Failed to open encoder artifact {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// The reserved code for values outside a fitted vocabulary.
    pub fn unknown_value(&self) -> i64 {
        self.unknown_value
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Encodes one categorical answer to its fitted ordinal code.
    ///
    /// The demographic column is canonicalized first; every other column is
    /// looked up as-is. A value missing from the fitted vocabulary encodes
    /// to the sentinel and is traced at debug level.
    ///
    /// # Errors
    /// `UnknownField` if `column` is not part of the schema — that is a
    /// caller bug, not a data problem.
    pub fn encode(&self, column: &str, raw: &str) -> Result<i64, ScreenerError> {
        let lookup = self
            .codes
            .get(column)
            .ok_or_else(|| ScreenerError::UnknownField(column.to_string()))?;

        let value = if column == self.normalizer.column() {
            self.normalizer.canonicalize(raw).as_str().to_string()
        } else {
            raw.to_string()
        };

        match lookup.get(&value) {
            Some(&code) => Ok(code),
            None => {
                debug!(
                    "Column '{}': value '{}' outside fitted vocabulary, encoding as sentinel {}",
                    column, value, self.unknown_value
                );
                Ok(self.unknown_value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yes_no_artifact() -> EncoderArtifact {
        let mut categories = HashMap::new();
        for column in CATEGORICAL_COLUMNS {
            categories.insert(column.to_string(), vec!["No".to_string(), "Yes".to_string()]);
        }
        categories.insert(
            DEMOGRAPHIC_COLUMN.to_string(),
            vec![
                "Female".to_string(),
                "Male".to_string(),
                "Non-Binary".to_string(),
            ],
        );
        EncoderArtifact {
            categories,
            unknown_value: -1,
            normalization: None,
        }
    }

    #[test]
    fn test_codes_follow_fitted_order() {
        let encoder = FittedEncoder::from_artifact(yes_no_artifact()).unwrap();
        assert_eq!(encoder.encode("self_employed", "No").unwrap(), 0);
        assert_eq!(encoder.encode("self_employed", "Yes").unwrap(), 1);
    }

    #[test]
    fn test_unseen_value_gets_sentinel() {
        let encoder = FittedEncoder::from_artifact(yes_no_artifact()).unwrap();
        assert_eq!(encoder.encode("benefits", "Maybe").unwrap(), -1);
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let encoder = FittedEncoder::from_artifact(yes_no_artifact()).unwrap();
        let err = encoder.encode("favorite_color", "blue").unwrap_err();
        assert!(matches!(err, ScreenerError::UnknownField(_)));
    }

    #[test]
    fn test_demographic_variants_collapse() {
        let encoder = FittedEncoder::from_artifact(yes_no_artifact()).unwrap();
        let male = encoder.encode(DEMOGRAPHIC_COLUMN, "Male").unwrap();
        assert_eq!(encoder.encode(DEMOGRAPHIC_COLUMN, "Male ").unwrap(), male);
        assert_eq!(encoder.encode(DEMOGRAPHIC_COLUMN, "Mail").unwrap(), male);
        assert_eq!(encoder.encode(DEMOGRAPHIC_COLUMN, "Malr").unwrap(), male);

        let female = encoder.encode(DEMOGRAPHIC_COLUMN, "Female").unwrap();
        assert_eq!(
            encoder.encode(DEMOGRAPHIC_COLUMN, "cis-female/femme").unwrap(),
            female
        );
    }

    #[test]
    fn test_unrecognized_demographic_falls_back() {
        let encoder = FittedEncoder::from_artifact(yes_no_artifact()).unwrap();
        let fallback = encoder.encode(DEMOGRAPHIC_COLUMN, "Non-Binary").unwrap();
        assert_eq!(encoder.encode(DEMOGRAPHIC_COLUMN, "xyz123").unwrap(), fallback);
    }

    #[test]
    fn test_missing_vocabulary_fails_at_load() {
        let mut artifact = yes_no_artifact();
        artifact.categories.remove("leave");
        let err = FittedEncoder::from_artifact(artifact).unwrap_err();
        assert!(matches!(err, ScreenerError::BuildError(_)));
    }

    #[test]
    fn test_artifact_normalization_table_overrides_default() {
        let mut artifact = yes_no_artifact();
        let mut map = HashMap::new();
        map.insert("m".to_string(), "Male".to_string());
        artifact.normalization = Some(NormalizationTable {
            column: DEMOGRAPHIC_COLUMN.to_string(),
            map,
            fallback: "Female".to_string(),
        });
        let encoder = FittedEncoder::from_artifact(artifact).unwrap();
        assert_eq!(encoder.encode(DEMOGRAPHIC_COLUMN, "M").unwrap(), 1);
        assert_eq!(encoder.encode(DEMOGRAPHIC_COLUMN, "anything else").unwrap(), 0);
    }

    #[test]
    fn test_unknown_value_defaults_when_absent() {
        let json = serde_json::to_string(&yes_no_artifact()).unwrap();
        let mut without: serde_json::Value = serde_json::from_str(&json).unwrap();
        without.as_object_mut().unwrap().remove("unknown_value");
        let artifact: EncoderArtifact = serde_json::from_value(without).unwrap();
        assert_eq!(artifact.unknown_value, -1);
    }

    #[test]
    fn test_canonical_tags() {
        let normalizer = Normalizer::default();
        assert_eq!(
            normalizer.canonicalize("Mail"),
            Canonical::Known("Male".to_string())
        );
        let unknown = normalizer.canonicalize("xyz123");
        assert!(unknown.is_fallback());
        assert_eq!(unknown.as_str(), "Non-Binary");
    }
}
