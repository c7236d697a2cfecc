//! Binary scoring of single answers

/// Answer token counted as affirmative.
pub const DEFAULT_YES_TOKEN: &str = "はい";

/// Scores one raw answer token against the yes-token.
///
/// For a regular item, affirming scores 1 (trait present). For a
/// reverse-coded item, affirming scores 0 (the item states the negative
/// pole). Pure and total; missing answers are handled by the aggregator
/// before reaching the scorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemScorer {
    yes_token: String,
}

impl ItemScorer {
    /// Scorer with the standard affirmative token.
    pub fn new() -> Self {
        Self {
            yes_token: DEFAULT_YES_TOKEN.to_string(),
        }
    }

    /// Scorer with a custom affirmative token (from config).
    pub fn with_yes_token(token: impl Into<String>) -> Self {
        Self {
            yes_token: token.into(),
        }
    }

    pub fn yes_token(&self) -> &str {
        &self.yes_token
    }

    /// Score one answer token. Comparison is exact; no trimming or case
    /// folding, so "はい " is not an affirmation.
    pub fn score(&self, token: &str, reverse: bool) -> u8 {
        let affirmed = token == self.yes_token;
        if affirmed != reverse {
            1
        } else {
            0
        }
    }
}

impl Default for ItemScorer {
    fn default() -> Self {
        Self::new()
    }
}
