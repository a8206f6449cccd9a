//! Scoring output types: per-question verdicts, the aggregate result, and grades.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Letter grade derived from a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Map a percentage to a grade. Lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::A
        } else if score >= 80.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::C
        } else if score >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// All grades, best first.
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

/// How a single question was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    Correct,
    Wrong,
    Skipped,
}

/// The verdict for one question of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredAnswer {
    /// The question this verdict belongs to.
    pub question_id: String,
    /// The raw value the candidate sent, if any.
    pub submitted: Option<String>,
    pub status: AnswerStatus,
    pub is_correct: bool,
    /// Either the question's full point value or zero.
    pub points_awarded: u32,
}

/// Aggregate outcome for one submission. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub wrong_answers: usize,
    pub skipped_questions: usize,
    pub total_points: u64,
    pub points_earned: u64,
    /// Percentage in `0.0..=100.0`.
    pub score: f64,
    pub passed: bool,
    pub grade: Grade,
    pub feedback: String,
}

pub const PASS_FEEDBACK: &str = "Congratulations! You passed the assessment.";
pub const FAIL_FEEDBACK: &str =
    "Unfortunately, you did not meet the passing score. Keep practicing!";

impl ScoreResult {
    /// Score rounded to one decimal place, for candidate-facing summaries.
    pub fn rounded_score(&self) -> f64 {
        (self.score * 10.0).round() / 10.0
    }
}

/// Everything the scoring engine produces for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringOutcome {
    /// One entry per question, in assessment order.
    pub scored_answers: Vec<ScoredAnswer>,
    pub result: ScoreResult,
}
