use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info};

use super::export;
use super::interpretation::{interpret, Grade, Interpretation, Rating};
use super::questions::{SurveyQuestion, QUESTION_COUNT};
use super::repository::{RepositoryError, ResponseRepository};
use super::scoring::ScoreCalculator;
use super::statistics::{aggregate, AggregateStatistics};
use super::submission::{
    Nickname, RawSubmission, ScoredSubmission, StoredSubmission, ValidationError,
};

/// Shown alongside a computed score when it could not be saved.
pub const STORAGE_WARNING: &str =
    "your score was calculated but could not be saved; please try again later";

/// Service composing scoring, interpretation, storage, and aggregation.
pub struct SurveyService<R> {
    repository: Arc<R>,
    calculator: ScoreCalculator,
}

impl<R> SurveyService<R>
where
    R: ResponseRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_calculator(repository, ScoreCalculator::standard())
    }

    pub fn with_calculator(repository: Arc<R>, calculator: ScoreCalculator) -> Self {
        Self {
            repository,
            calculator,
        }
    }

    pub fn questions(&self) -> &'static [SurveyQuestion; QUESTION_COUNT] {
        self.calculator.questions()
    }

    /// Score, interpret, and store a submission stamped with the current time.
    pub fn submit(&self, raw: RawSubmission) -> Result<SubmissionReceipt, SurveyServiceError> {
        self.submit_at(raw, Utc::now())
    }

    /// As [`submit`](Self::submit) with an explicit timestamp.
    ///
    /// A failed append does not fail the call: the receipt still carries the
    /// score and interpretation, with `persisted` false and a warning.
    pub fn submit_at(
        &self,
        raw: RawSubmission,
        timestamp: DateTime<Utc>,
    ) -> Result<SubmissionReceipt, SurveyServiceError> {
        let nickname = Nickname::parse(&raw.nickname).map_err(|reason| {
            debug!("submission rejected without nickname");
            SurveyServiceError::Validation {
                reason,
                nickname: None,
            }
        })?;

        let score = self.calculator.score(&raw).map_err(|incomplete| {
            debug!(
                nickname = %nickname,
                unanswered = ?incomplete.unanswered,
                "submission rejected as incomplete"
            );
            SurveyServiceError::Validation {
                reason: ValidationError::from(incomplete),
                nickname: Some(nickname.as_str().to_string()),
            }
        })?;

        let record = ScoredSubmission::new(nickname, timestamp, score);
        let interpretation = interpret(record.score());

        let storage_warning = match self.repository.append(&record) {
            Ok(()) => {
                info!(
                    nickname = %record.nickname(),
                    score = record.score(),
                    grade = interpretation.grade.letter(),
                    "survey submission stored"
                );
                None
            }
            Err(err) => {
                error!(
                    nickname = %record.nickname(),
                    score = record.score(),
                    error = %err,
                    "failed to store survey submission"
                );
                Some(STORAGE_WARNING.to_string())
            }
        };

        Ok(SubmissionReceipt::new(&record, interpretation, storage_warning))
    }

    /// Statistics over every stored submission, recomputed on each call.
    pub fn statistics(&self) -> Result<AggregateStatistics, SurveyServiceError> {
        let records = self.repository.list_all()?;
        Ok(aggregate(&records))
    }

    /// Every stored submission with its interpretation, oldest first.
    pub fn results(&self) -> Result<Vec<ResultView>, SurveyServiceError> {
        let records = self.repository.list_all()?;
        Ok(records.iter().map(ResultView::from_stored).collect())
    }

    pub fn export_csv(&self) -> Result<Vec<u8>, SurveyServiceError> {
        let records = self.repository.list_all()?;
        let mut buffer = Vec::new();
        export::write_csv(&mut buffer, &records)?;
        Ok(buffer)
    }
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub nickname: String,
    pub timestamp: DateTime<Utc>,
    pub score: f64,
    pub rating: Rating,
    pub rating_label: &'static str,
    pub grade: Grade,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SubmissionReceipt {
    fn new(
        record: &ScoredSubmission,
        interpretation: Interpretation,
        warning: Option<String>,
    ) -> Self {
        Self {
            nickname: record.nickname().as_str().to_string(),
            timestamp: record.timestamp(),
            score: record.score(),
            rating: interpretation.rating,
            rating_label: interpretation.rating.label(),
            grade: interpretation.grade,
            persisted: warning.is_none(),
            warning,
        }
    }

    pub fn interpretation(&self) -> Interpretation {
        Interpretation {
            rating: self.rating,
            grade: self.grade,
        }
    }
}

/// One row of the stored results table.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub nickname: String,
    pub timestamp: DateTime<Utc>,
    pub score: f64,
    pub rating_label: &'static str,
    pub grade: Grade,
    pub responses: Vec<Option<i64>>,
}

impl ResultView {
    fn from_stored(record: &StoredSubmission) -> Self {
        let interpretation = interpret(record.score);
        Self {
            nickname: record.nickname.clone(),
            timestamp: record.timestamp,
            score: record.score,
            rating_label: interpretation.rating.label(),
            grade: interpretation.grade,
            responses: record.responses.clone(),
        }
    }
}

/// Error raised by the survey service.
#[derive(Debug, thiserror::Error)]
pub enum SurveyServiceError {
    /// Correctable input problem; `nickname` echoes what the respondent entered.
    #[error("{reason}")]
    Validation {
        reason: ValidationError,
        nickname: Option<String>,
    },
    #[error(transparent)]
    Storage(#[from] RepositoryError),
    #[error("failed to encode export: {0}")]
    Export(#[from] csv::Error),
}
