//! Scoring of the survey's categorical rating answers.
//!
//! Preference questions compare a manually written text ("Version A") with
//! an AI generated one ("Version B"); agreement questions use a five-point
//! Likert scale. Both are mapped to numbers so they can be averaged.

use super::descriptive::mean;
use crate::utils::{DtypeCategory, get_dtype_category, label_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

const PREFERENCE_SUFFIXES: &[&str] = &["_preference"];
const LIKERT_SUFFIXES: &[&str] = &["_significance", "_trust", "_clarity"];

/// Answer vocabulary of a rating column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKind {
    /// `Version A` = 1, `Version B` = -1, `Both equally` = 0.
    Preference,
    /// `Strongly Agree` = 5 down to `Strongly Disagree` = 1.
    Likert,
}

impl ScaleKind {
    /// Detect the scale of a column from its name.
    pub fn for_column(name: &str) -> Option<Self> {
        if PREFERENCE_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            Some(Self::Preference)
        } else if LIKERT_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            Some(Self::Likert)
        } else {
            None
        }
    }

    /// Numeric score of one answer, `None` when the answer is not on the scale.
    pub fn score(self, answer: &str) -> Option<f64> {
        let score = match (self, answer.trim()) {
            (Self::Preference, "Version A") => 1.0,
            (Self::Preference, "Version B") => -1.0,
            (Self::Preference, "Both equally") => 0.0,
            (Self::Likert, "Strongly Agree") => 5.0,
            (Self::Likert, "Agree") => 4.0,
            (Self::Likert, "Neutral") => 3.0,
            (Self::Likert, "Disagree") => 2.0,
            (Self::Likert, "Strongly Disagree") => 1.0,
            _ => return None,
        };
        Some(score)
    }
}

/// Scored summary of one rating column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSummary {
    pub column: String,
    pub kind: ScaleKind,
    pub scored: usize,
    pub unscored: usize,
    /// Mean score, NaN when nothing was scored.
    pub mean: f64,
}

/// Score every text column of a frame whose name identifies a rating scale.
pub fn score_scales(df: &DataFrame) -> PolarsResult<Vec<ScaleSummary>> {
    let mut summaries = Vec::new();

    for column in df.get_columns() {
        if get_dtype_category(column.dtype()) != DtypeCategory::String {
            continue;
        }
        let Some(kind) = ScaleKind::for_column(column.name()) else {
            continue;
        };

        let answers = label_values(column)?;
        let scores: Vec<f64> = answers.iter().filter_map(|a| kind.score(a)).collect();

        summaries.push(ScaleSummary {
            column: column.name().to_string(),
            kind,
            scored: scores.len(),
            unscored: answers.len() - scores.len(),
            mean: mean(&scores),
        });
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_detection_by_suffix() {
        assert_eq!(
            ScaleKind::for_column("engaging_preference"),
            Some(ScaleKind::Preference)
        );
        assert_eq!(ScaleKind::for_column("ai_significance"), Some(ScaleKind::Likert));
        assert_eq!(ScaleKind::for_column("ai_trust"), Some(ScaleKind::Likert));
        assert_eq!(ScaleKind::for_column("response"), None);
    }

    #[test]
    fn test_scores() {
        assert_eq!(ScaleKind::Preference.score("Version B"), Some(-1.0));
        assert_eq!(ScaleKind::Preference.score("No Selection"), None);
        assert_eq!(ScaleKind::Likert.score(" Agree "), Some(4.0));
        assert_eq!(ScaleKind::Likert.score("Version A"), None);
    }

    #[test]
    fn test_score_scales_summary() {
        let df = df![
            "title_preference" => ["Version A", "Version A", "Version B", "No Selection"],
            "manual_significance" => ["Strongly Agree", "Agree", "Neutral", "Disagree"],
            "response" => ["Yes", "No", "Yes", "Yes"],
        ]
        .unwrap();

        let summaries = score_scales(&df).unwrap();
        assert_eq!(summaries.len(), 2);

        let preference = &summaries[0];
        assert_eq!(preference.kind, ScaleKind::Preference);
        assert_eq!(preference.scored, 3);
        assert_eq!(preference.unscored, 1);
        assert!((preference.mean - 1.0 / 3.0).abs() < 1e-9);

        let likert = &summaries[1];
        assert_eq!(likert.scored, 4);
        assert!((likert.mean - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_nothing_scored_gives_nan_mean() {
        let df = df!["ai_trust" => ["maybe", "unsure"]].unwrap();
        let summaries = score_scales(&df).unwrap();
        assert_eq!(summaries[0].scored, 0);
        assert!(summaries[0].mean.is_nan());
    }

    #[test]
    fn test_numeric_rating_columns_are_ignored() {
        let df = df!["overall_preference" => [1i64, 2]].unwrap();
        assert!(score_scales(&df).unwrap().is_empty());
    }
}
