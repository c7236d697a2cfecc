//! The fixed 16-item question catalog and its factor structure

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::QuestionId;

/// A latent trait measured by summing the scores of its assigned items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Factor {
    /// Willingness to act decisively and take things on (7 items).
    Proactivity,
    /// Anxiety about failing or having failed (5 items).
    FailureAnxiety,
    /// Perceived standing of one's abilities relative to others (4 items).
    SocialStanding,
}

impl Factor {
    pub const ALL: [Factor; 3] = [
        Factor::Proactivity,
        Factor::FailureAnxiety,
        Factor::SocialStanding,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Factor::Proactivity => "Behavioral Proactivity",
            Factor::FailureAnxiety => "Failure Anxiety",
            Factor::SocialStanding => "Social Standing of Ability",
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One yes/no survey item.
///
/// `reverse` marks items where affirming indicates the negative pole of the
/// trait, so their score is inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub text: &'static str,
    pub factor: Factor,
    pub reverse: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate question id {0} in catalog")]
    DuplicateId(QuestionId),
}

/// The immutable question set, built once and passed by reference into the
/// aggregator and comparator.
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    /// Build a catalog from a question list, rejecting duplicate ids.
    /// Questions are kept sorted by id.
    pub fn new(mut questions: Vec<Question>) -> Result<Self, CatalogError> {
        questions.sort_by_key(|q| q.id);
        for pair in questions.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(CatalogError::DuplicateId(pair[0].id));
            }
        }
        Ok(Self { questions })
    }

    /// The standard 16-item instrument.
    pub fn standard() -> Self {
        use Factor::*;
        let questions = vec![
            q(1, "何か仕事をするときは，自信を持ってやるほうである。", Proactivity, false),
            q(2, "過去に犯した失敗や嫌な経験を思いだして，暗い気持ちになることがよくある。", FailureAnxiety, true),
            q(3, "友人より優れた能力がある。", SocialStanding, false),
            q(4, "仕事を終えた後，失敗したと感じることのほうが多い。", FailureAnxiety, true),
            q(5, "人と比べて心配性なほうである。", Proactivity, true),
            q(6, "何かを決めるとき，迷わずに決定するほうである。", Proactivity, false),
            q(7, "何かをするとき，うまくゆかないのではないかと不安になることが多い。", FailureAnxiety, true),
            q(8, "ひっこみじあんなほうだと思う。", Proactivity, true),
            q(9, "人より記憶力がよいほうである。", SocialStanding, false),
            q(10, "結果の見通しがつかない仕事でも，積極的に取り組んでゆくほうだと思う。", Proactivity, false),
            q(11, "どうやったらよいか決心がつかずに仕事にとりかかれないことがよくある。", FailureAnxiety, true),
            q(12, "友人よりも特に優れた知識を持っている分野がある。", SocialStanding, false),
            q(13, "どんなことでも積極的にこなすほうである。", Proactivity, false),
            q(14, "小さな失敗でも人よりずっと気にするほうである。", FailureAnxiety, true),
            q(15, "積極的に活動するのは，苦手なほうである。", Proactivity, true),
            q(16, "世の中に貢献できる力があると思う。", SocialStanding, false),
        ];
        Self::new(questions).expect("standard catalog has unique ids")
    }

    /// Look up a question by id.
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions
            .binary_search_by_key(&id, |q| q.id)
            .ok()
            .map(|idx| &self.questions[idx])
    }

    /// All questions, sorted by id.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// The ordered question ids belonging to one factor.
    pub fn factor_items(&self, factor: Factor) -> Vec<QuestionId> {
        self.questions
            .iter()
            .filter(|q| q.factor == factor)
            .map(|q| q.id)
            .collect()
    }

    /// Factor name to ordered id set, for every factor with assigned items.
    pub fn factor_mapping(&self) -> BTreeMap<Factor, Vec<QuestionId>> {
        let mut mapping = BTreeMap::new();
        for question in &self.questions {
            mapping
                .entry(question.factor)
                .or_insert_with(Vec::new)
                .push(question.id);
        }
        mapping
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn q(id: QuestionId, text: &'static str, factor: Factor, reverse: bool) -> Question {
    Question {
        id,
        text,
        factor,
        reverse,
    }
}
