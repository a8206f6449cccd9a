//! The `skillcheck submit` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;

use skillcheck_core::engine::SubmissionService;
use skillcheck_core::parser::load_assessment;
use skillcheck_core::session::{Candidate, Invitation};
use skillcheck_core::sink::JsonDirSink;
use skillcheck_core::traits::Notifier;
use skillcheck_notify::{create_notifier, load_config_from};

use super::load_submission;

pub struct SubmitArgs {
    pub assessment: PathBuf,
    pub submission: PathBuf,
    pub invitation: Option<PathBuf>,
    pub candidate_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub recruiter_phone: Option<String>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: SubmitArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    tracing::debug!(notifier = ?config.notifier, "loaded config");

    let assessment = load_assessment(&args.assessment)?;
    let submission = load_submission(&args.submission)?;

    let records_dir = args.output.unwrap_or(config.records_dir);
    std::fs::create_dir_all(&records_dir)
        .with_context(|| format!("failed to create {}", records_dir.display()))?;

    let notifier: Arc<dyn Notifier> = Arc::from(create_notifier(&config.notifier)?);
    let sink = Arc::new(JsonDirSink::new(&records_dir));
    let service = SubmissionService::new(sink, notifier);

    let now = Utc::now();
    let mut invitation = match &args.invitation {
        Some(path) => Invitation::load_json(path)?,
        None => {
            let name = args
                .candidate_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .context("candidate name must not be empty")?;
            let candidate = Candidate {
                name: name.to_string(),
                email: args.email,
                phone: args.phone,
            };
            Invitation::issue(&assessment.id, candidate, None, now)
        }
    };

    let recruiter_phone = args.recruiter_phone.or(config.recruiter_phone);
    let (receipt, deliveries) = service
        .submit(
            &mut invitation,
            &assessment,
            &submission,
            recruiter_phone.as_deref(),
            now,
        )
        .await?;

    if let Some(path) = &args.invitation {
        invitation.save_json(path)?;
    }

    println!("Session: {}", receipt.test_session_id);
    println!(
        "Score: {}% ({} correct, {} wrong, {} skipped of {})",
        receipt.score,
        receipt.correct_answers,
        receipt.wrong_answers,
        receipt.skipped_questions,
        receipt.total_questions
    );
    println!(
        "Result: {} (grade {})",
        if receipt.passed { "PASSED" } else { "FAILED" },
        receipt.grade
    );
    for d in &deliveries {
        println!(
            "Notification to {}: {}",
            d.role,
            if d.delivered { "sent" } else { "failed" }
        );
    }
    println!("Record written to {}", records_dir.display());

    Ok(())
}

