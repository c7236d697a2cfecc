//! Upload ingestion - CSV decoding, parsing, and index normalization

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::SHIFT_JIS;
use thiserror::Error;

use crate::{Answer, QuestionId, RespondentId};

/// Terminal failures while turning an upload file into a table.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path} as CSV: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Fatal schema violation: the row index could not be coerced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("row index must be an integer question number, got {label:?}")]
    NonIntegerIndex { label: String },
}

/// An upload as parsed: string row labels, respondent columns, answer cells.
/// Not yet validated beyond CSV well-formedness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    respondents: Vec<RespondentId>,
    rows: Vec<(String, Vec<Answer>)>,
}

impl RawTable {
    pub fn respondents(&self) -> &[RespondentId] {
        &self.respondents
    }

    pub fn rows(&self) -> &[(String, Vec<Answer>)] {
        &self.rows
    }
}

/// A normalized upload: integer question numbers to per-respondent answers.
///
/// Question numbers the catalog does not know are carried through here and
/// ignored by the aggregator. Respondent order is upload column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDataset {
    respondents: Vec<RespondentId>,
    answers: BTreeMap<QuestionId, BTreeMap<RespondentId, Answer>>,
}

impl RawDataset {
    pub fn new(respondents: Vec<RespondentId>) -> Self {
        Self {
            respondents,
            answers: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, question: QuestionId, respondent: &str, answer: Answer) {
        self.answers
            .entry(question)
            .or_default()
            .insert(respondent.to_string(), answer);
    }

    pub fn respondents(&self) -> &[RespondentId] {
        &self.respondents
    }

    pub fn answer(&self, question: QuestionId, respondent: &str) -> Option<&Answer> {
        self.answers.get(&question)?.get(respondent)
    }

    /// Question numbers present in the upload, ascending.
    pub fn question_ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.answers.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.respondents.is_empty()
    }
}

/// Read and parse one upload file.
///
/// The file is decoded as UTF-8, falling back to Shift-JIS when that fails.
/// The first header cell is ignored; the remaining header cells are the
/// respondent ids; each following row is one question (label in the first
/// cell). Empty cells become `Answer::Missing`.
pub fn read_table(path: &Path) -> Result<RawTable, IngestError> {
    let bytes = fs::read(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|source| IngestError::Parse {
            path: path.to_path_buf(),
            source,
        })?,
        None => {
            return Ok(RawTable {
                respondents: Vec::new(),
                rows: Vec::new(),
            })
        }
    };

    // First header cell is the corner above the row labels; drop it.
    // Duplicate respondent columns keep the first occurrence.
    let mut respondents: Vec<RespondentId> = Vec::new();
    let mut columns: Vec<usize> = Vec::new();
    for (idx, cell) in header.iter().enumerate().skip(1) {
        if !respondents.iter().any(|r| r == cell) {
            respondents.push(cell.to_string());
            columns.push(idx);
        }
    }

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|source| IngestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let label = record.get(0).unwrap_or("").to_string();
        let cells = columns
            .iter()
            .map(|&idx| Answer::from_cell(record.get(idx).unwrap_or("")))
            .collect();
        rows.push((label, cells));
    }

    Ok(RawTable { respondents, rows })
}

/// Coerce a table's row labels to integer question numbers.
///
/// Any label that does not parse (after trimming) aborts the run; ids outside
/// the catalog pass through untouched.
pub fn normalize(table: RawTable) -> Result<RawDataset, NormalizeError> {
    let RawTable { respondents, rows } = table;
    let mut answers: BTreeMap<QuestionId, BTreeMap<RespondentId, Answer>> = BTreeMap::new();
    for (label, cells) in rows {
        let question: QuestionId =
            label
                .trim()
                .parse()
                .map_err(|_| NormalizeError::NonIntegerIndex {
                    label: label.clone(),
                })?;
        let row = answers.entry(question).or_default();
        for (respondent, answer) in respondents.iter().zip(cells) {
            row.insert(respondent.clone(), answer);
        }
    }
    Ok(RawDataset {
        respondents,
        answers,
    })
}

/// Read, decode, parse, and normalize one upload file.
pub fn load_dataset(path: &Path) -> Result<RawDataset, IngestError> {
    let table = read_table(path)?;
    Ok(normalize(table)?)
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            // Fallback for legacy spreadsheet exports.
            let (text, _, _) = SHIFT_JIS.decode(err.as_bytes());
            text.into_owned()
        }
    }
}
