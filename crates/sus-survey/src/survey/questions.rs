use serde::Serialize;

pub const QUESTION_COUNT: usize = 10;

/// Direction of agreement: whether a high answer signals good usability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SurveyQuestion {
    pub index: usize,
    pub text: &'static str,
    pub polarity: Polarity,
}

impl SurveyQuestion {
    const fn new(index: usize, text: &'static str, polarity: Polarity) -> Self {
        Self {
            index,
            text,
            polarity,
        }
    }

    pub fn label(&self) -> String {
        format!("P{}", self.index + 1)
    }
}

/// The standard SUS questionnaire. Items alternate positive and negative wording.
pub static SUS_QUESTIONS: [SurveyQuestion; QUESTION_COUNT] = [
    SurveyQuestion::new(
        0,
        "I think that I would like to use this system frequently.",
        Polarity::Positive,
    ),
    SurveyQuestion::new(
        1,
        "I found the system unnecessarily complex.",
        Polarity::Negative,
    ),
    SurveyQuestion::new(2, "I thought the system was easy to use.", Polarity::Positive),
    SurveyQuestion::new(
        3,
        "I think that I would need the support of a technical person to be able to use this system.",
        Polarity::Negative,
    ),
    SurveyQuestion::new(
        4,
        "I found the various functions in this system were well integrated.",
        Polarity::Positive,
    ),
    SurveyQuestion::new(
        5,
        "I thought there was too much inconsistency in this system.",
        Polarity::Negative,
    ),
    SurveyQuestion::new(
        6,
        "I would imagine that most people would learn to use this system very quickly.",
        Polarity::Positive,
    ),
    SurveyQuestion::new(
        7,
        "I found the system very cumbersome to use.",
        Polarity::Negative,
    ),
    SurveyQuestion::new(
        8,
        "I felt very confident using the system.",
        Polarity::Positive,
    ),
    SurveyQuestion::new(
        9,
        "I needed to learn a lot of things before I could get going with this system.",
        Polarity::Negative,
    ),
];

/// Dashboard axis labels, `P1` through `P10`.
pub fn question_labels() -> Vec<String> {
    SUS_QUESTIONS.iter().map(SurveyQuestion::label).collect()
}
