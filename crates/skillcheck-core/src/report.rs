//! Submission records with JSON persistence and markdown summaries.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::results::{ScoreResult, ScoredAnswer, ScoringOutcome};
use crate::session::{Candidate, TestSession};
use crate::statistics::{compute_result_stats, ResultStats};

/// The persisted bundle for one scored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// The completed session.
    pub session: TestSession,
    pub assessment_id: String,
    pub assessment_title: String,
    pub scored_answers: Vec<ScoredAnswer>,
    pub result: ScoreResult,
}

impl SubmissionRecord {
    /// Bundle a completed session with its scoring outcome.
    pub fn new(
        session: TestSession,
        assessment_title: impl Into<String>,
        outcome: ScoringOutcome,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            assessment_id: session.assessment_id.clone(),
            session,
            assessment_title: assessment_title.into(),
            scored_answers: outcome.scored_answers,
            result: outcome.result,
        }
    }

    pub fn candidate(&self) -> &Candidate {
        &self.session.candidate
    }

    /// Pretty-printed JSON, the on-disk record format.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load a record from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read record from {}", path.display()))?;
        let record: SubmissionRecord =
            serde_json::from_str(&content).context("failed to parse record JSON")?;
        Ok(record)
    }
}

/// Load every `.json` record in a directory, newest first.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_record_directory(dir: &Path) -> Result<Vec<SubmissionRecord>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut records = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            match SubmissionRecord::load_json(&path) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("skipping {}: {:#}", path.display(), e),
            }
        }
    }

    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(records)
}

/// A summary of many records, for dashboards and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub stats: ResultStats,
    pub rows: Vec<SummaryRow>,
}

/// One line of a summary table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub candidate_name: String,
    pub assessment_title: String,
    pub score: f64,
    pub grade: String,
    pub passed: bool,
    pub completed_at: DateTime<Utc>,
}

impl RecordSummary {
    pub fn from_records(records: &[SubmissionRecord]) -> Self {
        let results: Vec<ScoreResult> = records.iter().map(|r| r.result.clone()).collect();
        let rows = records
            .iter()
            .map(|r| SummaryRow {
                candidate_name: r.candidate().name.clone(),
                assessment_title: r.assessment_title.clone(),
                score: r.result.rounded_score(),
                grade: r.result.grade.to_string(),
                passed: r.result.passed,
                completed_at: r.session.completed_at.unwrap_or(r.created_at),
            })
            .collect();

        Self {
            stats: compute_result_stats(&results),
            rows,
        }
    }

    /// Format the summary as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} completed, {} passed, pass rate {}%, average score {:.1}%\n\n",
            self.stats.completed, self.stats.passed, self.stats.pass_rate, self.stats.average_score
        ));

        if !self.rows.is_empty() {
            md.push_str("| Candidate | Assessment | Score | Grade | Status |\n");
            md.push_str("|-----------|------------|-------|-------|--------|\n");
            for row in &self.rows {
                md.push_str(&format!(
                    "| {} | {} | {:.1}% | {} | {} |\n",
                    row.candidate_name,
                    row.assessment_title,
                    row.score,
                    row.grade,
                    if row.passed { "Passed" } else { "Failed" }
                ));
            }
        }

        md
    }
}
