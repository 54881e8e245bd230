//! System Usability Scale survey: scoring, interpretation, storage, and dashboard statistics.
//!
//! Form payloads are lifted into [`RawSubmission`] at the HTTP boundary, scored by
//! [`ScoreCalculator`], interpreted, and appended through a [`ResponseRepository`].
//! Statistics are recomputed from the repository on every read.

pub mod csv_store;
pub mod export;
pub mod interpretation;
pub mod questions;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod statistics;
pub mod submission;

#[cfg(test)]
mod tests;

pub use csv_store::{CsvResponseRepository, MalformedRecord};
pub use interpretation::{interpret, Grade, Interpretation, Rating};
pub use questions::{question_labels, Polarity, SurveyQuestion, QUESTION_COUNT, SUS_QUESTIONS};
pub use repository::{RepositoryError, ResponseRepository};
pub use router::survey_router;
pub use scoring::{IncompleteAnswers, ScoreCalculator, SusScore};
pub use service::{ResultView, SubmissionReceipt, SurveyService, SurveyServiceError};
pub use statistics::{aggregate, AggregateStatistics, ModeSummary, QuestionStatistics, TrendPoint};
pub use submission::{Nickname, RawSubmission, ScoredSubmission, StoredSubmission, ValidationError};
