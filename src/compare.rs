//! Comparison of two aggregated uploads - alignment, deltas, cohort trends

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::analyzer::Aggregates;
use crate::catalog::{Catalog, Factor};
use crate::{QuestionId, RespondentId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    /// Non-fatal: the caller should present an empty state, not abort.
    #[error("no common respondents between the two uploads")]
    NoCommonRespondents,
    /// The selected respondent is not in the common set.
    #[error("respondent {0:?} is not present in both uploads")]
    UnknownRespondent(String),
}

/// One factor of the selected respondent, across both rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorComparisonRow {
    pub factor: Factor,
    pub pre: u32,
    pub post: u32,
    pub delta: i64,
}

/// One item of the selected respondent, across both rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemComparisonRow {
    pub id: QuestionId,
    pub text: &'static str,
    pub pre: u8,
    pub post: u8,
    pub delta: i8,
}

/// Cohort mean of one factor, each side over its own respondents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorTrendRow {
    pub factor: Factor,
    pub pre_mean: f64,
    pub post_mean: f64,
    pub delta: f64,
}

/// Total score of one respondent across both rounds. Sides where the
/// respondent is absent stay `None`; the delta exists only when both do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalTrendRow {
    pub respondent: RespondentId,
    pub pre: Option<u32>,
    pub post: Option<u32>,
    pub delta: Option<i64>,
}

/// Cohort mean score of one item across both rounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTrendRow {
    pub id: QuestionId,
    pub text: &'static str,
    pub pre_mean: f64,
    pub post_mean: f64,
    pub delta: f64,
}

/// All derived views of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Common respondent ids, sorted: the selectable set.
    pub respondents: Vec<RespondentId>,
    /// Respondent count of each upload on its own.
    pub pre_count: usize,
    pub post_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respondent: Option<RespondentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor_comparison: Option<Vec<FactorComparisonRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_comparison: Option<Vec<ItemComparisonRow>>,
    pub factor_trend: Vec<FactorTrendRow>,
    pub total_trend: Vec<TotalTrendRow>,
    pub item_trend: Vec<ItemTrendRow>,
}

/// Sorted intersection of the respondents present in both uploads.
pub fn common_respondents(pre: &Aggregates, post: &Aggregates) -> Vec<RespondentId> {
    let pre_ids: BTreeSet<&str> = pre.factors.respondents().collect();
    let post_ids: BTreeSet<&str> = post.factors.respondents().collect();
    pre_ids
        .intersection(&post_ids)
        .map(|id| id.to_string())
        .collect()
}

/// Build the full report for one run.
///
/// Fails with `NoCommonRespondents` when the uploads share no respondent,
/// and `UnknownRespondent` when a selection is outside the common set. The
/// per-respondent views are present only when a respondent is selected.
pub fn build_report(
    catalog: &Catalog,
    pre: &Aggregates,
    post: &Aggregates,
    selected: Option<&str>,
) -> Result<Report, CompareError> {
    let respondents = common_respondents(pre, post);
    if respondents.is_empty() {
        return Err(CompareError::NoCommonRespondents);
    }

    let (factor_comparison, item_comparison) = match selected {
        Some(id) => {
            if !respondents.iter().any(|r| r == id) {
                return Err(CompareError::UnknownRespondent(id.to_string()));
            }
            (
                Some(factor_comparison(pre, post, id)),
                Some(item_comparison(catalog, pre, post, id)),
            )
        }
        None => (None, None),
    };

    Ok(Report {
        respondents,
        pre_count: pre.factors.len(),
        post_count: post.factors.len(),
        respondent: selected.map(str::to_string),
        factor_comparison,
        item_comparison,
        factor_trend: factor_trend(pre, post),
        total_trend: total_trend(pre, post),
        item_trend: item_trend(catalog, pre, post),
    })
}

/// Per-factor scores of one respondent, both rounds plus delta.
pub fn factor_comparison(
    pre: &Aggregates,
    post: &Aggregates,
    respondent: &str,
) -> Vec<FactorComparisonRow> {
    Factor::ALL
        .iter()
        .map(|&factor| {
            let before = pre.factors.get(respondent, factor).unwrap_or(0);
            let after = post.factors.get(respondent, factor).unwrap_or(0);
            FactorComparisonRow {
                factor,
                pre: before,
                post: after,
                delta: after as i64 - before as i64,
            }
        })
        .collect()
}

/// Per-item scores of one respondent, both rounds plus delta, sorted by id.
/// Items the respondent has no score for default to 0.
pub fn item_comparison(
    catalog: &Catalog,
    pre: &Aggregates,
    post: &Aggregates,
    respondent: &str,
) -> Vec<ItemComparisonRow> {
    catalog
        .questions()
        .map(|question| {
            let before = pre.scores.get(respondent, question.id).unwrap_or(0);
            let after = post.scores.get(respondent, question.id).unwrap_or(0);
            ItemComparisonRow {
                id: question.id,
                text: question.text,
                pre: before,
                post: after,
                delta: after as i8 - before as i8,
            }
        })
        .collect()
}

/// Cohort factor means. Each side's mean is over its own respondents, not
/// the intersection.
pub fn factor_trend(pre: &Aggregates, post: &Aggregates) -> Vec<FactorTrendRow> {
    Factor::ALL
        .iter()
        .map(|&factor| {
            let pre_mean = pre.factors.factor_mean(factor).unwrap_or(0.0);
            let post_mean = post.factors.factor_mean(factor).unwrap_or(0.0);
            FactorTrendRow {
                factor,
                pre_mean,
                post_mean,
                delta: post_mean - pre_mean,
            }
        })
        .collect()
}

/// Per-respondent total scores over the union of both sides, sorted by
/// delta descending; rows without a delta (respondent on one side only)
/// come last, in id order.
pub fn total_trend(pre: &Aggregates, post: &Aggregates) -> Vec<TotalTrendRow> {
    let union: BTreeSet<&str> = pre
        .factors
        .respondents()
        .chain(post.factors.respondents())
        .collect();

    let mut rows: Vec<TotalTrendRow> = union
        .into_iter()
        .map(|respondent| {
            let before = pre.factors.total(respondent);
            let after = post.factors.total(respondent);
            let delta = match (before, after) {
                (Some(b), Some(a)) => Some(a as i64 - b as i64),
                _ => None,
            };
            TotalTrendRow {
                respondent: respondent.to_string(),
                pre: before,
                post: after,
                delta,
            }
        })
        .collect();

    // Stable sort keeps equal deltas in respondent order.
    rows.sort_by(|a, b| match (a.delta, b.delta) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    rows
}

/// Cohort item means, sorted by id. A question absent from a side's score
/// table contributes 0 for that side.
pub fn item_trend(catalog: &Catalog, pre: &Aggregates, post: &Aggregates) -> Vec<ItemTrendRow> {
    catalog
        .questions()
        .map(|question| {
            let pre_mean = pre.scores.question_mean(question.id).unwrap_or(0.0);
            let post_mean = post.scores.question_mean(question.id).unwrap_or(0.0);
            ItemTrendRow {
                id: question.id,
                text: question.text,
                pre_mean,
                post_mean,
                delta: post_mean - pre_mean,
            }
        })
        .collect()
}
