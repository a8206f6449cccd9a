//! The `skillcheck stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use skillcheck_core::report::{load_record_directory, RecordSummary};
use skillcheck_core::statistics::{compute_question_stats, QuestionStats};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsOutput<'a> {
    #[serde(flatten)]
    summary: &'a RecordSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    questions: Option<&'a [QuestionStats]>,
}

pub fn execute(records_dir: PathBuf, format: String, include_questions: bool) -> Result<()> {
    let records = load_record_directory(&records_dir)?;
    let summary = RecordSummary::from_records(&records);
    let questions = include_questions.then(|| compute_question_stats(&records));

    match format.as_str() {
        "json" => {
            let output = StatsOutput {
                summary: &summary,
                questions: questions.as_deref(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        "markdown" | "md" => {
            print!("{}", summary.to_markdown());
            if let Some(questions) = &questions {
                println!("\n| Question | Correct | Wrong | Skipped | Correct rate |");
                println!("|----------|---------|-------|---------|--------------|");
                for q in questions {
                    println!(
                        "| {} | {} | {} | {} | {:.1}% |",
                        q.question_id,
                        q.correct,
                        q.wrong,
                        q.skipped,
                        q.correct_rate * 100.0
                    );
                }
            }
        }
        "text" => print_text(&summary, questions.as_deref()),
        other => anyhow::bail!("unknown format: {other} (expected text, markdown or json)"),
    }

    Ok(())
}

fn print_text(summary: &RecordSummary, questions: Option<&[QuestionStats]>) {
    let stats = &summary.stats;
    println!(
        "{} completed, {} passed, pass rate {}%",
        stats.completed, stats.passed, stats.pass_rate
    );
    if stats.completed == 0 {
        return;
    }
    println!(
        "Average {:.1}%, highest {:.1}%, lowest {:.1}%",
        stats.average_score, stats.highest_score, stats.lowest_score
    );
    let distribution: Vec<String> = stats
        .grade_distribution
        .iter()
        .map(|(grade, count)| format!("{grade}: {count}"))
        .collect();
    println!("Grades: {}", distribution.join(", "));

    let mut table = Table::new();
    table.set_header(vec!["Candidate", "Assessment", "Score", "Grade", "Status", "Completed"]);
    for row in &summary.rows {
        table.add_row(vec![
            Cell::new(&row.candidate_name),
            Cell::new(&row.assessment_title),
            Cell::new(format!("{:.1}%", row.score)),
            Cell::new(&row.grade),
            Cell::new(if row.passed { "Passed" } else { "Failed" }),
            Cell::new(row.completed_at.format("%Y-%m-%d %H:%M")),
        ]);
    }
    println!("\n{table}");

    if let Some(questions) = questions {
        let mut table = Table::new();
        table.set_header(vec!["Question", "Correct", "Wrong", "Skipped", "Correct rate"]);
        for q in questions {
            table.add_row(vec![
                Cell::new(&q.question_id),
                Cell::new(q.correct),
                Cell::new(q.wrong),
                Cell::new(q.skipped),
                Cell::new(format!("{:.1}%", q.correct_rate * 100.0)),
            ]);
        }
        println!("\n{table}");
    }
}
