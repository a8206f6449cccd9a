//! The scoring engine.
//!
//! `score` is a pure function of its two arguments: no I/O, no clock, no
//! randomness. Data-quality problems in the question bank (an unknown
//! question type, no option flagged correct) degrade to a wrong answer for
//! that question only, so a candidate always receives a result.

use crate::model::{Assessment, Question, QuestionType};
use crate::results::{
    AnswerStatus, Grade, ScoreResult, ScoredAnswer, ScoringOutcome, FAIL_FEEDBACK, PASS_FEEDBACK,
};
use crate::submission::Submission;

/// Grade a submission against an assessment's question bank.
///
/// Questions are visited in assessment order; that order only affects the
/// order of `scored_answers`, never the aggregate.
pub fn score(assessment: &Assessment, submission: &Submission) -> ScoringOutcome {
    let mut scored_answers = Vec::with_capacity(assessment.questions.len());
    let mut total_points: u64 = 0;
    let mut points_earned: u64 = 0;
    let mut correct_answers = 0usize;
    let mut wrong_answers = 0usize;
    let mut skipped_questions = 0usize;

    for question in &assessment.questions {
        total_points += u64::from(question.points);

        let submitted = submission.answer(&question.id);
        let status = match submitted {
            Some(value) if !value.trim().is_empty() => {
                if is_correct(question, value) {
                    AnswerStatus::Correct
                } else {
                    AnswerStatus::Wrong
                }
            }
            _ => AnswerStatus::Skipped,
        };

        let points_awarded = match status {
            AnswerStatus::Correct => {
                correct_answers += 1;
                points_earned += u64::from(question.points);
                question.points
            }
            AnswerStatus::Wrong => {
                wrong_answers += 1;
                0
            }
            AnswerStatus::Skipped => {
                skipped_questions += 1;
                0
            }
        };

        tracing::trace!(
            question_id = %question.id,
            question_type = %question.question_type,
            ?status,
            points_awarded,
            "scored question"
        );

        scored_answers.push(ScoredAnswer {
            question_id: question.id.clone(),
            submitted: submitted.map(str::to_string),
            status,
            is_correct: status == AnswerStatus::Correct,
            points_awarded,
        });
    }

    let score = percentage(points_earned, total_points);
    let passed = score >= assessment.passing_score;
    let grade = Grade::from_score(score);

    tracing::debug!(
        assessment_id = %assessment.id,
        correct_answers,
        wrong_answers,
        skipped_questions,
        points_earned,
        total_points,
        score,
        passed,
        %grade,
        "scored submission"
    );

    ScoringOutcome {
        scored_answers,
        result: ScoreResult {
            total_questions: assessment.questions.len(),
            correct_answers,
            wrong_answers,
            skipped_questions,
            total_points,
            points_earned,
            score,
            passed,
            grade,
            feedback: (if passed { PASS_FEEDBACK } else { FAIL_FEEDBACK }).to_string(),
        },
    }
}

/// `earned / total * 100`, or 0 when there is nothing to earn.
fn percentage(earned: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    // Multiply first so whole percentages (7 of 10 -> 70) come out exact.
    (earned as f64 * 100.0) / total as f64
}

/// Compare a non-blank submitted value against the question's answer key.
fn is_correct(question: &Question, submitted: &str) -> bool {
    let Some(correct) = question.correct_option() else {
        tracing::warn!(question_id = %question.id, "question has no option flagged correct");
        return false;
    };

    match &question.question_type {
        QuestionType::MultipleChoice => submitted == correct.id,
        QuestionType::TrueFalse => {
            submitted.trim().to_lowercase() == correct.text.trim().to_lowercase()
        }
        QuestionType::Other(kind) => {
            tracing::warn!(question_id = %question.id, kind = %kind, "unrecognized question type");
            false
        }
    }
}
