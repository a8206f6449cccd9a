//! Typed candidate submissions.
//!
//! The request body arrives as loosely typed JSON. It is converted here,
//! once, into a `Submission` whose answers are plain strings keyed by
//! question id. Shapes the engine cannot compare are rejected at this point.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SubmissionError;

/// One candidate's full set of answers to an assessment.
///
/// Deserializing goes through [`Submission::from_value`], so serde and
/// `from_json` accept exactly the same bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Value")]
pub struct Submission {
    /// Question id to submitted value (option id or free-text token).
    #[serde(default)]
    pub answers: HashMap<String, String>,
    /// Seconds the candidate spent. Passed through, never scored.
    #[serde(default, rename = "timeSpent")]
    pub time_spent_secs: u32,
}

impl Submission {
    pub fn new(answers: HashMap<String, String>, time_spent_secs: u32) -> Self {
        Self {
            answers,
            time_spent_secs,
        }
    }

    /// Add an answer, builder style.
    pub fn with_answer(mut self, question_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.answers.insert(question_id.into(), value.into());
        self
    }

    /// The submitted value for a question, if one was sent.
    pub fn answer(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    /// Parse an untyped submission body.
    pub fn from_json(body: &str) -> Result<Self, SubmissionError> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(&value)
    }

    /// Convert an already-decoded JSON body.
    ///
    /// `null` answers are dropped (treated as skipped). `timeSpent` may be a
    /// number or a numeric string; anything else counts as zero.
    pub fn from_value(body: &Value) -> Result<Self, SubmissionError> {
        let raw_answers = body
            .get("answers")
            .and_then(Value::as_object)
            .ok_or(SubmissionError::MissingAnswers)?;

        let mut answers = HashMap::with_capacity(raw_answers.len());
        for (question_id, value) in raw_answers {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(SubmissionError::InvalidAnswer {
                        question_id: question_id.clone(),
                    })
                }
            };
            answers.insert(question_id.clone(), text);
        }

        let time_spent_secs = body
            .get("timeSpent")
            .or_else(|| body.get("time_spent"))
            .map(parse_time_spent)
            .unwrap_or(0);

        Ok(Self {
            answers,
            time_spent_secs,
        })
    }
}

impl TryFrom<Value> for Submission {
    type Error = SubmissionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

fn parse_time_spent(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
            .map(|secs| secs.min(u64::from(u32::MAX)) as u32)
            .unwrap_or(0),
        Value::String(s) => leading_integer(s.trim()).unwrap_or(0),
        _ => 0,
    }
}

/// Leading decimal digits of a string, e.g. "120s" -> 120.
fn leading_integer(s: &str) -> Option<u32> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<u64>().ok().map(|n| n.min(u64::from(u32::MAX)) as u32)
}
