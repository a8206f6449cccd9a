//! Aggregate statistics over scored results.
//!
//! Used by the reporting side: pass rates, score spread, grade distribution,
//! and per-question difficulty.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::report::SubmissionRecord;
use crate::results::{AnswerStatus, Grade, ScoreResult};

/// Statistics across many completed submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultStats {
    pub completed: usize,
    pub passed: usize,
    /// Whole-number percentage of completed submissions that passed.
    pub pass_rate: u32,
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub grade_distribution: BTreeMap<Grade, usize>,
}

/// Compute aggregate statistics from a set of results.
pub fn compute_result_stats(results: &[ScoreResult]) -> ResultStats {
    let mut grade_distribution: BTreeMap<Grade, usize> =
        Grade::ALL.iter().map(|g| (*g, 0)).collect();

    if results.is_empty() {
        return ResultStats {
            completed: 0,
            passed: 0,
            pass_rate: 0,
            average_score: 0.0,
            highest_score: 0.0,
            lowest_score: 0.0,
            grade_distribution,
        };
    }

    let completed = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let pass_rate = ((passed as f64 / completed as f64) * 100.0).round() as u32;

    let average_score = results.iter().map(|r| r.score).sum::<f64>() / completed as f64;
    let highest_score = results.iter().map(|r| r.score).fold(f64::MIN, f64::max);
    let lowest_score = results.iter().map(|r| r.score).fold(f64::MAX, f64::min);

    for r in results {
        *grade_distribution.entry(r.grade).or_default() += 1;
    }

    ResultStats {
        completed,
        passed,
        pass_rate,
        average_score,
        highest_score,
        lowest_score,
        grade_distribution,
    }
}

/// How candidates fared on a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
    pub question_id: String,
    pub correct: usize,
    pub wrong: usize,
    pub skipped: usize,
    /// Fraction (0.0-1.0) of attempts that were correct. Skips count as attempts.
    pub correct_rate: f64,
}

/// Per-question statistics across records, sorted by question id.
pub fn compute_question_stats(records: &[SubmissionRecord]) -> Vec<QuestionStats> {
    let mut tallies: HashMap<&str, (usize, usize, usize)> = HashMap::new();
    for record in records {
        for answer in &record.scored_answers {
            let entry = tallies.entry(answer.question_id.as_str()).or_default();
            match answer.status {
                AnswerStatus::Correct => entry.0 += 1,
                AnswerStatus::Wrong => entry.1 += 1,
                AnswerStatus::Skipped => entry.2 += 1,
            }
        }
    }

    let mut stats: Vec<QuestionStats> = tallies
        .into_iter()
        .map(|(question_id, (correct, wrong, skipped))| {
            let total = correct + wrong + skipped;
            QuestionStats {
                question_id: question_id.to_string(),
                correct,
                wrong,
                skipped,
                correct_rate: if total == 0 {
                    0.0
                } else {
                    correct as f64 / total as f64
                },
            }
        })
        .collect();
    stats.sort_by(|a, b| a.question_id.cmp(&b.question_id));
    stats
}
