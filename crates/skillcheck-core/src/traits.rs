//! Collaborator traits for persisting results and sending notifications.
//!
//! The scoring engine itself never touches these; the submission service in
//! `engine` drives them after scoring. Implementations live in
//! `crate::sink` and in the `skillcheck-notify` crate.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{NotifyError, SinkError};
use crate::report::SubmissionRecord;

// ---------------------------------------------------------------------------
// Result sink
// ---------------------------------------------------------------------------

/// Durable storage for scored submissions.
///
/// Implementations must accept at most one record per session and return
/// `SinkError::DuplicateSubmission` for any later one.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Persist a scored submission.
    async fn persist(&self, record: &SubmissionRecord) -> Result<(), SinkError>;

    /// Whether a record already exists for this session.
    async fn is_completed(&self, session_id: Uuid) -> Result<bool, SinkError>;
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientRole {
    Candidate,
    Recruiter,
}

impl fmt::Display for RecipientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipientRole::Candidate => f.write_str("candidate"),
            RecipientRole::Recruiter => f.write_str("recruiter"),
        }
    }
}

/// What a notification is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NotificationKind {
    /// A scored submission.
    Result { score: f64, passed: bool },
    /// An invitation to take an assessment.
    #[serde(rename_all = "camelCase")]
    Invitation {
        access_code: String,
        test_url: String,
        company_name: String,
    },
}

/// The minimal summary a notifier needs to compose an outbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub role: RecipientRole,
    /// Destination phone number, unnormalised.
    pub phone: String,
    pub candidate_name: String,
    pub assessment_title: String,
    pub kind: NotificationKind,
}

/// Delivers notifications (SMS, log, ...).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Human-readable notifier name (e.g. "sms").
    fn name(&self) -> &str;

    /// Deliver one notification.
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}
