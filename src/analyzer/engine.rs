//! Aggregation engine - applies the scorer across a whole dataset

use crate::analyzer::scoring::ItemScorer;
use crate::catalog::{Catalog, Factor};
use crate::ingest::RawDataset;
use crate::{Answer, FactorScoreTable, ScoreTable};

/// The two tables derived from one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregates {
    pub scores: ScoreTable,
    pub factors: FactorScoreTable,
}

/// Scores every respondent of a dataset against the catalog.
pub struct Aggregator<'a> {
    catalog: &'a Catalog,
    scorer: ItemScorer,
}

impl<'a> Aggregator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            scorer: ItemScorer::new(),
        }
    }

    /// Replace the default scorer (custom yes-token from config).
    pub fn with_scorer(mut self, scorer: ItemScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Build the per-question score table and the per-factor sums.
    ///
    /// Every catalog question gets a score for every respondent; question
    /// numbers in the dataset that the catalog does not know are ignored.
    /// An empty dataset yields empty tables.
    pub fn aggregate(&self, dataset: &RawDataset) -> Aggregates {
        let mut scores = ScoreTable::new();
        for respondent in dataset.respondents() {
            for question in self.catalog.questions() {
                // Missing answers score 0 unconditionally, reverse or not.
                let score = match dataset.answer(question.id, respondent) {
                    Some(Answer::Present(token)) => self.scorer.score(token, question.reverse),
                    Some(Answer::Missing) | None => 0,
                };
                scores.insert(respondent, question.id, score);
            }
        }

        let mut factors = FactorScoreTable::new();
        for respondent in dataset.respondents() {
            for factor in Factor::ALL {
                let sum: u32 = self
                    .catalog
                    .factor_items(factor)
                    .iter()
                    .filter_map(|&id| scores.get(respondent, id))
                    .map(u32::from)
                    .sum();
                factors.insert(respondent, factor, sum);
            }
        }

        Aggregates { scores, factors }
    }
}
