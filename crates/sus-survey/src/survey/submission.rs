use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::questions::QUESTION_COUNT;
use super::scoring::{IncompleteAnswers, SusScore};

/// Form field carrying the respondent's nickname.
pub const NICKNAME_FIELD: &str = "nickname";

/// Form key for the answer to the question at `index` (`q0`..`q9`).
pub fn answer_field(index: usize) -> String {
    format!("q{index}")
}

/// One respondent's answers as received, before any parsing.
///
/// Values stay raw strings so that malformed input reaches the calculator and
/// is classified as unanswered there rather than rejected by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSubmission {
    pub nickname: String,
    pub answers: [Option<String>; QUESTION_COUNT],
}

impl RawSubmission {
    pub fn new(nickname: impl Into<String>, answers: [Option<String>; QUESTION_COUNT]) -> Self {
        Self {
            nickname: nickname.into(),
            answers,
        }
    }

    /// Lifts a string-keyed form payload into a typed submission. Unknown keys are ignored.
    pub fn from_form(form: &HashMap<String, String>) -> Self {
        let nickname = form.get(NICKNAME_FIELD).cloned().unwrap_or_default();
        let answers = std::array::from_fn(|index| form.get(&answer_field(index)).cloned());
        Self { nickname, answers }
    }
}

/// A trimmed, non-empty respondent nickname.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nickname(String);

impl Nickname {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingNickname);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Correctable problems with a submission; shown back to the respondent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("a nickname is required to take the survey")]
    MissingNickname,
    #[error("please answer all 10 questions")]
    Incomplete(#[from] IncompleteAnswers),
}

/// A complete, scored submission ready to be appended to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSubmission {
    nickname: Nickname,
    timestamp: DateTime<Utc>,
    score: SusScore,
}

impl ScoredSubmission {
    pub fn new(nickname: Nickname, timestamp: DateTime<Utc>, score: SusScore) -> Self {
        Self {
            nickname,
            timestamp,
            score,
        }
    }

    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn score(&self) -> f64 {
        self.score.value()
    }

    pub fn responses(&self) -> &[u8; QUESTION_COUNT] {
        self.score.responses()
    }
}

/// A submission as read back from storage.
///
/// `responses` holds `None` for a cell that did not parse as an integer; range
/// checks are left to the aggregator so one corrupt cell never hides a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredSubmission {
    pub nickname: String,
    pub timestamp: DateTime<Utc>,
    pub score: f64,
    pub responses: Vec<Option<i64>>,
}

impl From<&ScoredSubmission> for StoredSubmission {
    fn from(value: &ScoredSubmission) -> Self {
        Self {
            nickname: value.nickname().as_str().to_string(),
            timestamp: value.timestamp(),
            score: value.score(),
            responses: value
                .responses()
                .iter()
                .map(|answer| Some(i64::from(*answer)))
                .collect(),
        }
    }
}
