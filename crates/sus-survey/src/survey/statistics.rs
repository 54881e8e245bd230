//! Dashboard statistics recomputed from the full set of stored submissions.
//!
//! Aggregation holds no state between calls. Corrupt cells (non-numeric or out
//! of range) are dropped per question so one bad record cannot abort the rest.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::questions::{SurveyQuestion, QUESTION_COUNT, SUS_QUESTIONS};
use super::scoring::{round_to, MAX_ANSWER, MIN_ANSWER};
use super::submission::StoredSubmission;

pub const ANSWER_CHOICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModeSummary {
    pub value: Option<u8>,
    pub count: u32,
    pub percent: f64,
}

impl ModeSummary {
    const EMPTY: Self = Self {
        value: None,
        count: 0,
        percent: 0.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionStatistics {
    pub index: usize,
    pub label: String,
    /// Number of valid answers that fed the figures below.
    pub responses: u32,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub frequency: [u32; ANSWER_CHOICES],
    pub mode: ModeSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStatistics {
    pub submission_count: usize,
    pub labels: Vec<String>,
    pub questions: Vec<QuestionStatistics>,
    /// Question x answer-value counts; row `i` is question `i`'s frequency array.
    pub heatmap: Vec<[u32; ANSWER_CHOICES]>,
    pub score_trend: Vec<TrendPoint>,
}

impl AggregateStatistics {
    pub fn question(&self, index: usize) -> Option<&QuestionStatistics> {
        self.questions.get(index)
    }
}

pub fn aggregate(submissions: &[StoredSubmission]) -> AggregateStatistics {
    let questions: Vec<QuestionStatistics> = SUS_QUESTIONS
        .iter()
        .map(|question| question_statistics(question, submissions))
        .collect();

    let heatmap = questions.iter().map(|stats| stats.frequency).collect();

    AggregateStatistics {
        submission_count: submissions.len(),
        labels: SUS_QUESTIONS.iter().map(SurveyQuestion::label).collect(),
        questions,
        heatmap,
        score_trend: score_trend(submissions),
    }
}

fn question_statistics(
    question: &SurveyQuestion,
    submissions: &[StoredSubmission],
) -> QuestionStatistics {
    let values = valid_answers(submissions, question.index);
    describe(question.index, question.label(), &values)
}

/// Valid answers to one question across all submissions, in submission order.
pub fn valid_answers(submissions: &[StoredSubmission], index: usize) -> Vec<u8> {
    submissions
        .iter()
        .filter_map(|submission| submission.responses.get(index).copied().flatten())
        .filter(|value| (MIN_ANSWER..=MAX_ANSWER).contains(value))
        .filter_map(|value| u8::try_from(value).ok())
        .collect()
}

/// Descriptive statistics for a list of answers already known to be in `[1, 5]`.
fn describe(index: usize, label: String, values: &[u8]) -> QuestionStatistics {
    let mut frequency = [0u32; ANSWER_CHOICES];
    for value in values {
        frequency[usize::from(*value) - 1] += 1;
    }

    if values.is_empty() {
        return QuestionStatistics {
            index,
            label,
            responses: 0,
            mean: None,
            std_dev: None,
            frequency,
            mode: ModeSummary::EMPTY,
        };
    }

    let n = values.len() as f64;
    let mean = values.iter().map(|value| f64::from(*value)).sum::<f64>() / n;
    // Population variance: the stored submissions are the whole population under study.
    let variance = values
        .iter()
        .map(|value| (f64::from(*value) - mean).powi(2))
        .sum::<f64>()
        / n;

    QuestionStatistics {
        index,
        label,
        responses: values.len() as u32,
        mean: Some(round_to(mean, 2)),
        std_dev: Some(round_to(variance.sqrt(), 2)),
        frequency,
        mode: mode(&frequency, values.len()),
    }
}

/// Most frequent answer; ties go to the lowest value.
fn mode(frequency: &[u32; ANSWER_CHOICES], total: usize) -> ModeSummary {
    let (best_index, best_count) = frequency
        .iter()
        .enumerate()
        .fold((0usize, 0u32), |best, (index, count)| {
            if *count > best.1 {
                (index, *count)
            } else {
                best
            }
        });

    if best_count == 0 || total == 0 {
        return ModeSummary::EMPTY;
    }

    ModeSummary {
        value: Some(best_index as u8 + 1),
        count: best_count,
        percent: round_to(100.0 * f64::from(best_count) / total as f64, 1),
    }
}

/// One point per submission, oldest first. Same-day points are kept separately.
fn score_trend(submissions: &[StoredSubmission]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = submissions
        .iter()
        .map(|submission| TrendPoint {
            date: submission.timestamp.date_naive(),
            timestamp: submission.timestamp,
            score: submission.score,
        })
        .collect();
    points.sort_by_key(|point| point.timestamp);
    points
}
