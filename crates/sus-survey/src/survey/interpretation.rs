use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Neutral,
    BelowAverage,
    Poor,
}

impl Rating {
    pub fn label(self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Neutral => "Neutral",
            Rating::BelowAverage => "Below Average",
            Rating::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn letter(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

/// Qualitative reading of a score. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    pub rating: Rating,
    pub grade: Grade,
}

/// Inclusive lower bounds, highest first.
const BANDS: [(f64, Rating, Grade); 4] = [
    (80.3, Rating::Excellent, Grade::A),
    (70.0, Rating::Good, Grade::B),
    (68.0, Rating::Neutral, Grade::C),
    (50.0, Rating::BelowAverage, Grade::D),
];

pub fn interpret(score: f64) -> Interpretation {
    BANDS
        .iter()
        .find(|(threshold, _, _)| score >= *threshold)
        .map(|(_, rating, grade)| Interpretation {
            rating: *rating,
            grade: *grade,
        })
        .unwrap_or(Interpretation {
            rating: Rating::Poor,
            grade: Grade::F,
        })
}
