//! Prepost: pre/post questionnaire scoring and cohort comparison
//!
//! This library scores a fixed-form yes/no questionnaire administered twice
//! to the same cohort (an initial and a final round), aligns the two uploads
//! by respondent, and derives per-respondent and cohort-level deltas.

pub mod analyzer;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod ingest;
pub mod reporter;
pub mod watcher;

use std::collections::BTreeMap;

use crate::catalog::Factor;

/// Question number, as coerced from an upload's row labels.
///
/// Signed so that any integer label normalizes cleanly; numbers outside the
/// catalog are carried through and ignored by aggregation.
pub type QuestionId = i32;

/// Respondent identifier: an upload column label, kept verbatim.
pub type RespondentId = String;

/// One answer cell of an upload.
///
/// Empty cells are `Missing`; everything else is kept as the raw token.
/// The aggregator pattern-matches on this rather than coercing silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Present(String),
    Missing,
}

impl Answer {
    /// Build an answer from a raw cell value (empty string means missing).
    pub fn from_cell(cell: &str) -> Self {
        if cell.is_empty() {
            Answer::Missing
        } else {
            Answer::Present(cell.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Answer::Missing)
    }

    /// The raw token, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            Answer::Present(token) => Some(token),
            Answer::Missing => None,
        }
    }
}

/// Per-respondent, per-question binary scores.
///
/// BTreeMap-backed so iteration order is deterministic and re-aggregating an
/// unchanged dataset yields an identical table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTable {
    rows: BTreeMap<RespondentId, BTreeMap<QuestionId, u8>>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, respondent: &str, question: QuestionId, score: u8) {
        self.rows
            .entry(respondent.to_string())
            .or_default()
            .insert(question, score);
    }

    pub fn get(&self, respondent: &str, question: QuestionId) -> Option<u8> {
        self.rows.get(respondent)?.get(&question).copied()
    }

    /// Respondent ids in sorted order.
    pub fn respondents(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn contains_respondent(&self, respondent: &str) -> bool {
        self.rows.contains_key(respondent)
    }

    pub fn row(&self, respondent: &str) -> Option<&BTreeMap<QuestionId, u8>> {
        self.rows.get(respondent)
    }

    /// Mean score for one question across every respondent that has a value
    /// for it. `None` when no respondent does.
    pub fn question_mean(&self, question: QuestionId) -> Option<f64> {
        let scores: Vec<u8> = self
            .rows
            .values()
            .filter_map(|row| row.get(&question).copied())
            .collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Per-respondent, per-factor score sums.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactorScoreTable {
    rows: BTreeMap<RespondentId, BTreeMap<Factor, u32>>,
}

impl FactorScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, respondent: &str, factor: Factor, sum: u32) {
        self.rows
            .entry(respondent.to_string())
            .or_default()
            .insert(factor, sum);
    }

    pub fn get(&self, respondent: &str, factor: Factor) -> Option<u32> {
        self.rows.get(respondent)?.get(&factor).copied()
    }

    /// Sum of all factor scores for one respondent (their total score).
    pub fn total(&self, respondent: &str) -> Option<u32> {
        self.rows
            .get(respondent)
            .map(|row| row.values().sum::<u32>())
    }

    /// Respondent ids in sorted order.
    pub fn respondents(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn contains_respondent(&self, respondent: &str) -> bool {
        self.rows.contains_key(respondent)
    }

    /// Mean of one factor's scores across this table's own respondents.
    /// `None` when the table is empty.
    pub fn factor_mean(&self, factor: Factor) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }
        let sum: u32 = self
            .rows
            .values()
            .map(|row| row.get(&factor).copied().unwrap_or(0))
            .sum();
        Some(sum as f64 / self.rows.len() as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Public API: compare two uploads end to end. Used by tests and other
/// programmatic consumers.
///
/// * `pre` - path to the initial-round CSV
/// * `post` - path to the final-round CSV
/// * `respondent` - optional respondent id for the per-respondent views
pub fn compare_files(
    pre: &std::path::Path,
    post: &std::path::Path,
    respondent: Option<&str>,
) -> anyhow::Result<compare::Report> {
    let catalog = catalog::Catalog::standard();
    let pre_data = ingest::load_dataset(pre)?;
    let post_data = ingest::load_dataset(post)?;
    let aggregator = analyzer::Aggregator::new(&catalog);
    let pre_scores = aggregator.aggregate(&pre_data);
    let post_scores = aggregator.aggregate(&post_data);
    let report = compare::build_report(&catalog, &pre_scores, &post_scores, respondent)?;
    Ok(report)
}
