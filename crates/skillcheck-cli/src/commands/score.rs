//! The `skillcheck score` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use skillcheck_core::parser::load_assessment;
use skillcheck_core::results::AnswerStatus;
use skillcheck_core::{score, Assessment, ScoringOutcome};

use super::load_submission;

pub fn execute(assessment_path: PathBuf, submission_path: PathBuf, format: String) -> Result<()> {
    let assessment = load_assessment(&assessment_path)?;
    let submission = load_submission(&submission_path)?;

    let outcome = score(&assessment, &submission);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome)?),
        "text" => print_outcome(&assessment, &outcome),
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

fn print_outcome(assessment: &Assessment, outcome: &ScoringOutcome) {
    let mut table = Table::new();
    table.set_header(vec!["Question", "Answer", "Status", "Points"]);

    for answer in &outcome.scored_answers {
        let max_points = assessment
            .question(&answer.question_id)
            .map(|q| q.points)
            .unwrap_or(0);
        let status = match answer.status {
            AnswerStatus::Correct => "correct",
            AnswerStatus::Wrong => "wrong",
            AnswerStatus::Skipped => "skipped",
        };
        table.add_row(vec![
            Cell::new(&answer.question_id),
            Cell::new(answer.submitted.as_deref().unwrap_or("-")),
            Cell::new(status),
            Cell::new(format!("{}/{}", answer.points_awarded, max_points)),
        ]);
    }

    let r = &outcome.result;
    println!("Assessment: {}", assessment.title);
    println!("{table}");
    println!(
        "Correct: {}  Wrong: {}  Skipped: {}  (of {})",
        r.correct_answers, r.wrong_answers, r.skipped_questions, r.total_questions
    );
    println!(
        "Score: {:.1}% ({}/{} points)",
        r.score, r.points_earned, r.total_points
    );
    println!(
        "Result: {} (passing score {}%)",
        if r.passed { "PASSED" } else { "FAILED" },
        assessment.passing_score
    );
    println!("Grade: {}", r.grade);
    println!("{}", r.feedback);
}
