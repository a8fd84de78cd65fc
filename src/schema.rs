use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::screener::ScreenerError;

/// Name of the single numeric column.
pub const AGE_COLUMN: &str = "Age";

/// Name of the free-text demographic column that is normalized before encoding.
pub const DEMOGRAPHIC_COLUMN: &str = "Gender";

/// The categorical columns in the exact order the classifier was trained on.
///
/// This ordering is a contract shared between the feature assembler and the
/// decision model. `Age` precedes these in the assembled row.
pub const CATEGORICAL_COLUMNS: [&str; 21] = [
    "Gender",
    "self_employed",
    "family_history",
    "work_interfere",
    "no_employees",
    "remote_work",
    "tech_company",
    "benefits",
    "care_options",
    "wellness_program",
    "seek_help",
    "anonymity",
    "leave",
    "mental_health_consequence",
    "phys_health_consequence",
    "coworkers",
    "supervisor",
    "mental_health_interview",
    "phys_health_interview",
    "mental_vs_physical",
    "obs_consequence",
];

/// Width of the assembled feature row: `Age` plus the categorical columns.
pub const FEATURE_WIDTH: usize = CATEGORICAL_COLUMNS.len() + 1;

/// A single questionnaire response with one named field per question.
///
/// Field names mirror the survey columns the model was trained on. Using a
/// struct rather than a positional argument list means a caller cannot bind
/// an answer to the wrong question. The serde representation rejects unknown
/// keys, so a malformed request body fails loudly instead of being silently
/// reordered or dropped.
///
/// Age bounds (the survey collects 18-60) are the presentation layer's
/// responsibility; the core only requires the field to be numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerRecord {
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Gender")]
    pub gender: String,
    pub self_employed: String,
    pub family_history: String,
    pub work_interfere: String,
    pub no_employees: String,
    pub remote_work: String,
    pub tech_company: String,
    pub benefits: String,
    pub care_options: String,
    pub wellness_program: String,
    pub seek_help: String,
    pub anonymity: String,
    pub leave: String,
    pub mental_health_consequence: String,
    pub phys_health_consequence: String,
    pub coworkers: String,
    pub supervisor: String,
    pub mental_health_interview: String,
    pub phys_health_interview: String,
    pub mental_vs_physical: String,
    pub obs_consequence: String,
}

impl AnswerRecord {
    /// Builds a record from a field-name to raw-value mapping, the shape a
    /// form or API layer naturally produces.
    ///
    /// # Errors
    /// - `MissingField` if any of the 22 required fields is absent
    /// - `UnknownField` if the map contains a field name outside the schema
    /// - `ValidationError` if `Age` is not numeric
    pub fn from_map(values: &HashMap<String, String>) -> Result<Self, ScreenerError> {
        for key in values.keys() {
            if key != AGE_COLUMN && !CATEGORICAL_COLUMNS.contains(&key.as_str()) {
                return Err(ScreenerError::UnknownField(key.clone()));
            }
        }

        let fetch = |name: &str| {
            values
                .get(name)
                .cloned()
                .ok_or_else(|| ScreenerError::MissingField(name.to_string()))
        };

        let age_raw = fetch(AGE_COLUMN)?;
        let age = age_raw.trim().parse::<u32>().map_err(|_| {
            ScreenerError::ValidationError(format!(
                "Field '{}' must be numeric, got '{}'",
                AGE_COLUMN, age_raw
            ))
        })?;

        Ok(Self {
            age,
            gender: fetch("Gender")?,
            self_employed: fetch("self_employed")?,
            family_history: fetch("family_history")?,
            work_interfere: fetch("work_interfere")?,
            no_employees: fetch("no_employees")?,
            remote_work: fetch("remote_work")?,
            tech_company: fetch("tech_company")?,
            benefits: fetch("benefits")?,
            care_options: fetch("care_options")?,
            wellness_program: fetch("wellness_program")?,
            seek_help: fetch("seek_help")?,
            anonymity: fetch("anonymity")?,
            leave: fetch("leave")?,
            mental_health_consequence: fetch("mental_health_consequence")?,
            phys_health_consequence: fetch("phys_health_consequence")?,
            coworkers: fetch("coworkers")?,
            supervisor: fetch("supervisor")?,
            mental_health_interview: fetch("mental_health_interview")?,
            phys_health_interview: fetch("phys_health_interview")?,
            mental_vs_physical: fetch("mental_vs_physical")?,
            obs_consequence: fetch("obs_consequence")?,
        })
    }

    /// Returns the categorical answers paired with their column names, in
    /// the fixed column order. This is the single place the struct fields
    /// are tied to the column ordering.
    pub fn categoricals(&self) -> [(&'static str, &str); 21] {
        [
            ("Gender", &self.gender),
            ("self_employed", &self.self_employed),
            ("family_history", &self.family_history),
            ("work_interfere", &self.work_interfere),
            ("no_employees", &self.no_employees),
            ("remote_work", &self.remote_work),
            ("tech_company", &self.tech_company),
            ("benefits", &self.benefits),
            ("care_options", &self.care_options),
            ("wellness_program", &self.wellness_program),
            ("seek_help", &self.seek_help),
            ("anonymity", &self.anonymity),
            ("leave", &self.leave),
            ("mental_health_consequence", &self.mental_health_consequence),
            ("phys_health_consequence", &self.phys_health_consequence),
            ("coworkers", &self.coworkers),
            ("supervisor", &self.supervisor),
            ("mental_health_interview", &self.mental_health_interview),
            ("phys_health_interview", &self.phys_health_interview),
            ("mental_vs_physical", &self.mental_vs_physical),
            ("obs_consequence", &self.obs_consequence),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_map() -> HashMap<String, String> {
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
    fn test_from_map_full_record() {
        let record = AnswerRecord::from_map(&full_map()).unwrap();
        assert_eq!(record.age, 30);
        assert_eq!(record.gender, "Male");
        assert_eq!(record.leave, "Somewhat easy");
    }

    #[test]
    fn test_from_map_missing_field() {
        let mut values = full_map();
        values.remove("work_interfere");
        let err = AnswerRecord::from_map(&values).unwrap_err();
        assert!(matches!(err, ScreenerError::MissingField(ref f) if f == "work_interfere"));
    }

    #[test]
    fn test_from_map_unknown_field() {
        let mut values = full_map();
        values.insert("favorite_color".to_string(), "blue".to_string());
        let err = AnswerRecord::from_map(&values).unwrap_err();
        assert!(matches!(err, ScreenerError::UnknownField(ref f) if f == "favorite_color"));
    }

    #[test]
    fn test_from_map_non_numeric_age() {
        let mut values = full_map();
        values.insert("Age".to_string(), "thirty".to_string());
        let err = AnswerRecord::from_map(&values).unwrap_err();
        assert!(matches!(err, ScreenerError::ValidationError(_)));
    }

    #[test]
    fn test_categoricals_match_column_order() {
        let record = AnswerRecord::from_map(&full_map()).unwrap();
        let names: Vec<&str> = record.categoricals().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, CATEGORICAL_COLUMNS);
    }

    #[test]
    fn test_feature_width() {
        assert_eq!(FEATURE_WIDTH, 22);
    }
}
