use serde::Serialize;

use super::questions::{Polarity, SurveyQuestion, QUESTION_COUNT, SUS_QUESTIONS};
use super::submission::RawSubmission;

pub const MIN_ANSWER: i64 = 1;
pub const MAX_ANSWER: i64 = 5;

const SCORE_SCALE: f64 = 2.5;

/// Returned when any answer is missing or outside the Likert range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} of 10 questions unanswered", .unanswered.len())]
pub struct IncompleteAnswers {
    /// Zero-based indices of the questions without a usable answer.
    pub unanswered: Vec<usize>,
}

/// A completed SUS score together with the answers it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SusScore {
    value: f64,
    responses: [u8; QUESTION_COUNT],
}

impl SusScore {
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn responses(&self) -> &[u8; QUESTION_COUNT] {
        &self.responses
    }
}

/// Converts Likert answers into a 0-100 usability score.
#[derive(Debug, Clone, Copy)]
pub struct ScoreCalculator {
    questions: &'static [SurveyQuestion; QUESTION_COUNT],
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoreCalculator {
    pub fn new(questions: &'static [SurveyQuestion; QUESTION_COUNT]) -> Self {
        Self { questions }
    }

    pub fn standard() -> Self {
        Self::new(&SUS_QUESTIONS)
    }

    pub fn questions(&self) -> &'static [SurveyQuestion; QUESTION_COUNT] {
        self.questions
    }

    /// Scores a raw submission. Never produces a partial score.
    pub fn score(&self, raw: &RawSubmission) -> Result<SusScore, IncompleteAnswers> {
        let parsed: Vec<Option<u8>> = raw
            .answers
            .iter()
            .map(|answer| answer.as_deref().and_then(parse_answer))
            .collect();

        let unanswered: Vec<usize> = parsed
            .iter()
            .enumerate()
            .filter_map(|(index, answer)| answer.is_none().then_some(index))
            .collect();
        if !unanswered.is_empty() {
            return Err(IncompleteAnswers { unanswered });
        }

        let responses: [u8; QUESTION_COUNT] =
            std::array::from_fn(|index| parsed[index].unwrap_or_default());

        Ok(SusScore {
            value: self.score_responses(&responses),
            responses,
        })
    }

    /// Scores answers that are already known to be in range.
    pub fn score_responses(&self, responses: &[u8; QUESTION_COUNT]) -> f64 {
        let total: u32 = self
            .questions
            .iter()
            .zip(responses.iter())
            .map(|(question, answer)| contribution(question.polarity, *answer))
            .sum();

        round_to(f64::from(total) * SCORE_SCALE, 1)
    }
}

/// Normalized contribution in `[0, 4]`; higher always means more usable.
fn contribution(polarity: Polarity, answer: u8) -> u32 {
    let answer = u32::from(answer.clamp(1, 5));
    match polarity {
        Polarity::Positive => answer - 1,
        Polarity::Negative => 5 - answer,
    }
}

/// Parses a raw answer; anything that is not an integer in `[1, 5]` is unanswered.
pub fn parse_answer(raw: &str) -> Option<u8> {
    let value: i64 = raw.trim().parse().ok()?;
    if (MIN_ANSWER..=MAX_ANSWER).contains(&value) {
        u8::try_from(value).ok()
    } else {
        None
    }
}

/// Rounds half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(answers: [&str; QUESTION_COUNT]) -> RawSubmission {
        RawSubmission::new("tester", answers.map(|answer| Some(answer.to_string())))
    }

    fn best_case() -> [&'static str; QUESTION_COUNT] {
        std::array::from_fn(|index| if index % 2 == 0 { "5" } else { "1" })
    }

    #[test]
    fn best_answers_score_one_hundred() {
        let score = ScoreCalculator::standard()
            .score(&raw(best_case()))
            .expect("complete");
        assert_eq!(score.value(), 100.0);
    }

    #[test]
    fn worst_answers_score_zero() {
        let answers = std::array::from_fn(|index| if index % 2 == 0 { "1" } else { "5" });
        let score = ScoreCalculator::standard()
            .score(&raw(answers))
            .expect("complete");
        assert_eq!(score.value(), 0.0);
    }

    #[test]
    fn neutral_answers_score_fifty() {
        let score = ScoreCalculator::standard()
            .score(&raw(["3"; QUESTION_COUNT]))
            .expect("complete");
        assert_eq!(score.value(), 50.0);
        assert_eq!(score.responses(), &[3; QUESTION_COUNT]);
    }

    #[test]
    fn every_answer_set_is_a_multiple_of_two_and_a_half() {
        let calculator = ScoreCalculator::standard();
        // Walk a spread of answer sets rather than all 5^10 combinations.
        for seed in 0u32..2_000 {
            let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(12_345);
            let responses: [u8; QUESTION_COUNT] = std::array::from_fn(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                ((state >> 16) % 5 + 1) as u8
            });
            let value = calculator.score_responses(&responses);
            assert!((0.0..=100.0).contains(&value), "{value} out of range");
            assert_eq!((value / 2.5).fract(), 0.0, "{value} not a multiple of 2.5");
        }
    }

    #[test]
    fn mixed_answers_follow_polarity() {
        // Positive items: 4,4,3,5,2 -> 3+3+2+4+1 = 13; negative items: 2,1,3,2,4 -> 3+4+2+3+1 = 13.
        let answers = ["4", "2", "4", "1", "3", "3", "5", "2", "2", "4"];
        let score = ScoreCalculator::standard()
            .score(&raw(answers))
            .expect("complete");
        assert_eq!(score.value(), 65.0);
    }

    #[test]
    fn missing_or_invalid_answers_are_incomplete() {
        let mut answers = best_case().map(|answer| Some(answer.to_string()));
        answers[2] = None;
        answers[4] = Some("6".to_string());
        answers[7] = Some("zero".to_string());
        answers[9] = Some("0".to_string());

        let err = ScoreCalculator::standard()
            .score(&RawSubmission::new("tester", answers))
            .expect_err("incomplete");
        assert_eq!(err.unanswered, vec![2, 4, 7, 9]);
    }

    #[test]
    fn a_single_gap_is_enough_to_reject() {
        let mut answers = best_case().map(|answer| Some(answer.to_string()));
        answers[0] = Some(String::new());

        let err = ScoreCalculator::standard()
            .score(&RawSubmission::new("tester", answers))
            .expect_err("incomplete");
        assert_eq!(err.unanswered, vec![0]);
    }

    #[test]
    fn parse_answer_accepts_padded_integers_only() {
        assert_eq!(parse_answer(" 4 "), Some(4));
        assert_eq!(parse_answer("1"), Some(1));
        assert_eq!(parse_answer("5"), Some(5));
        assert_eq!(parse_answer("2.5"), None);
        assert_eq!(parse_answer("-1"), None);
        assert_eq!(parse_answer(""), None);
    }
}
