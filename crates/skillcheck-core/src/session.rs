//! Invitation and test-session lifecycle.
//!
//! The scoring engine is stateless; these types carry the state around it.
//! A session moves from `InProgress` to `Completed` exactly once, at the
//! moment its submission is scored.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::results::ScoreResult;

/// The person taking an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

/// One candidate's attempt at an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSession {
    pub id: Uuid,
    pub assessment_id: String,
    pub candidate: Candidate,
    pub status: SessionStatus,
    /// Seconds spent, as reported by the client.
    pub time_spent_secs: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub passed: Option<bool>,
}

impl TestSession {
    /// Open a new in-progress session.
    pub fn start(
        assessment_id: impl Into<String>,
        candidate: Candidate,
        time_spent_secs: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            assessment_id: assessment_id.into(),
            candidate,
            status: SessionStatus::InProgress,
            time_spent_secs,
            started_at: now,
            completed_at: None,
            score: None,
            passed: None,
        }
    }

    /// Record the scored result and close the session.
    pub fn complete(
        &mut self,
        result: &ScoreResult,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.status == SessionStatus::Completed {
            return Err(SessionError::AlreadyCompleted(format!("session {}", self.id)));
        }
        self.status = SessionStatus::Completed;
        self.completed_at = Some(now);
        self.score = Some(result.score);
        self.passed = Some(result.passed);
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Sent,
    Failed,
    Completed,
}

/// An access code granting one candidate one attempt at an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: String,
    pub access_code: String,
    pub assessment_id: String,
    pub candidate: Candidate,
    pub status: InvitationStatus,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
}

impl Invitation {
    /// Create a pending invitation with a fresh access code.
    ///
    /// `expires_in_days` of `None` means the invitation never expires.
    pub fn issue(
        assessment_id: impl Into<String>,
        candidate: Candidate,
        expires_in_days: Option<u32>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            access_code: generate_access_code(),
            assessment_id: assessment_id.into(),
            candidate,
            status: InvitationStatus::Pending,
            expires_at: expires_in_days.map(|days| now + Duration::days(i64::from(days))),
            sent_at: None,
        }
    }

    /// Check whether the invitation can still be used to take the test.
    pub fn check_access(&self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if let Some(expires_at) = self.expires_at {
            if expires_at < now {
                return Err(SessionError::Expired(self.access_code.clone()));
            }
        }
        if self.status == InvitationStatus::Completed {
            return Err(SessionError::AlreadyCompleted(format!(
                "invitation {}",
                self.access_code
            )));
        }
        Ok(())
    }

    /// Record a successful delivery of the invitation message.
    pub fn mark_sent(&mut self, now: DateTime<Utc>) {
        self.status = InvitationStatus::Sent;
        self.sent_at = Some(now);
    }

    /// Record a failed delivery. The access code stays usable.
    pub fn mark_failed(&mut self) {
        self.status = InvitationStatus::Failed;
    }

    pub fn mark_completed(&mut self) {
        self.status = InvitationStatus::Completed;
    }

    /// Save the invitation as JSON to a file.
    pub fn save_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize invitation")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write invitation to {}", path.display()))
    }

    /// Load an invitation from a JSON file.
    pub fn load_json(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read invitation from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse invitation JSON")
    }
}

/// Sixteen uppercase hex characters (64 random bits).
fn generate_access_code() -> String {
    let bits = Uuid::new_v4().as_u128();
    // Folding the halves together spreads the fixed version/variant bits.
    format!("{:016X}", (bits >> 64) as u64 ^ bits as u64)
}
