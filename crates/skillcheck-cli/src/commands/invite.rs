//! The `skillcheck invite` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use skillcheck_core::engine::InvitationService;
use skillcheck_core::parser::load_assessment;
use skillcheck_core::session::{Candidate, Invitation};
use skillcheck_core::traits::Notifier;
use skillcheck_notify::{create_notifier, load_config_from};

pub struct InviteArgs {
    pub assessment: PathBuf,
    pub candidate_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub expires_in_days: Option<u32>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: InviteArgs) -> Result<()> {
    anyhow::ensure!(
        !args.candidate_name.trim().is_empty(),
        "candidate name must not be empty"
    );

    let config = load_config_from(args.config.as_deref())?;
    tracing::debug!(notifier = ?config.notifier, "loaded config");
    let assessment = load_assessment(&args.assessment)?;

    let candidate = Candidate {
        name: args.candidate_name.trim().to_string(),
        email: args.email,
        phone: args.phone,
    };
    let now = Utc::now();
    let mut invitation = Invitation::issue(&assessment.id, candidate, args.expires_in_days, now);

    let notifier: Arc<dyn Notifier> = Arc::from(create_notifier(&config.notifier)?);
    let service = InvitationService::new(notifier, config.company_name, config.app_url);
    let delivery = service.send(&mut invitation, &assessment, now).await?;

    let records_dir = args.output.unwrap_or(config.records_dir);
    let path = records_dir
        .join("invitations")
        .join(format!("invitation-{}.json", invitation.access_code));
    invitation.save_json(&path)?;

    println!("Access code: {}", invitation.access_code);
    println!("Test link: {}", service.test_url(&invitation.access_code));
    if let Some(expires_at) = invitation.expires_at {
        println!("Expires: {}", expires_at.to_rfc3339());
    }
    println!(
        "Invitation to {}: {}",
        delivery.role,
        if delivery.delivered { "sent" } else { "failed" }
    );
    println!("Invitation written to {}", path.display());

    Ok(())
}
