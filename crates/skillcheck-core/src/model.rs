//! Core data model types for skillcheck.
//!
//! These types mirror the read-only snapshot the assessment store hands to
//! the scoring engine: an assessment, its ordered questions, and each
//! question's answer options.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named collection of questions with a pass/fail threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    /// Unique identifier for this assessment.
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Description shown to candidates.
    #[serde(default)]
    pub description: String,
    /// Minimum percentage (0-100) needed to pass. Inclusive.
    #[serde(default = "default_passing_score")]
    pub passing_score: f64,
    /// Suggested time limit in minutes.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// The question bank, in presentation order.
    pub questions: Vec<Question>,
}

/// A single question in an assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique identifier for this question.
    pub id: String,
    /// Prompt text.
    #[serde(default)]
    pub question: String,
    /// How submitted answers are compared.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Point weight. Awarded in full or not at all.
    #[serde(default = "default_points")]
    pub points: u32,
    /// Answer options, in presentation order.
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    /// Explanation shown after grading.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Ordinal position within the assessment.
    #[serde(default)]
    pub order: u32,
}

/// One selectable answer for a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub order: u32,
}

/// Supported question types.
///
/// Unknown type strings are kept as `Other` so a bank containing them still
/// loads; the scoring engine never awards points for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    Other(String),
}

impl QuestionType {
    /// Returns `true` if the scoring engine knows how to grade this type.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, QuestionType::Other(_))
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "multiple_choice"),
            QuestionType::TrueFalse => write!(f, "true_false"),
            QuestionType::Other(other) => write!(f, "{other}"),
        }
    }
}

impl From<String> for QuestionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "multiple_choice" => QuestionType::MultipleChoice,
            "true_false" => QuestionType::TrueFalse,
            _ => QuestionType::Other(s),
        }
    }
}

impl From<&str> for QuestionType {
    fn from(s: &str) -> Self {
        QuestionType::from(s.to_string())
    }
}

impl From<QuestionType> for String {
    fn from(t: QuestionType) -> Self {
        t.to_string()
    }
}

fn default_passing_score() -> f64 {
    70.0
}

fn default_points() -> u32 {
    1
}

impl Question {
    /// The first option flagged correct, if any.
    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.options.iter().find(|opt| opt.is_correct)
    }
}

impl Assessment {
    /// Sum of all question point values.
    pub fn total_points(&self) -> u64 {
        self.questions.iter().map(|q| u64::from(q.points)).sum()
    }

    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// The candidate-facing view of this assessment, with correctness flags removed.
    pub fn public_view(&self) -> PublicAssessment {
        let mut questions: Vec<PublicQuestion> = self
            .questions
            .iter()
            .map(|q| PublicQuestion {
                id: q.id.clone(),
                question: q.question.clone(),
                question_type: q.question_type.clone(),
                points: q.points,
                order: q.order,
                options: q
                    .options
                    .iter()
                    .map(|opt| PublicOption {
                        id: opt.id.clone(),
                        text: opt.text.clone(),
                        order: opt.order,
                    })
                    .collect(),
            })
            .collect();
        questions.sort_by_key(|q| q.order);

        PublicAssessment {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            passing_score: self.passing_score,
            duration_minutes: self.duration_minutes,
            questions,
        }
    }
}

/// An assessment as served to a candidate taking the test.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAssessment {
    pub id: String,
    pub title: String,
    pub description: String,
    pub passing_score: f64,
    pub duration_minutes: Option<u32>,
    pub questions: Vec<PublicQuestion>,
}

/// A question without its answer key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub points: u32,
    pub order: u32,
    pub options: Vec<PublicOption>,
}

/// An option without its correctness flag.
#[derive(Debug, Clone, Serialize)]
pub struct PublicOption {
    pub id: String,
    pub text: String,
    pub order: u32,
}
