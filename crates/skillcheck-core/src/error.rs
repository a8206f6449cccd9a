//! Error types for the submission path.
//!
//! Data-quality problems inside a question bank never show up here: the
//! scoring engine degrades those to "wrong" or "skipped". These errors cover
//! malformed payloads at the boundary and lifecycle violations around it.

use thiserror::Error;
use uuid::Uuid;

/// A submission payload that could not be turned into a typed `Submission`.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The payload was not valid JSON.
    #[error("invalid submission JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The `answers` field was missing or was not an object.
    #[error("submission has no answers object")]
    MissingAnswers,

    /// An answer value had a shape the engine cannot compare (array or object).
    #[error("answer for question {question_id} must be a string, number, or boolean")]
    InvalidAnswer { question_id: String },
}

/// Violations of the invitation / test-session lifecycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The invitation's expiry time has passed.
    #[error("invitation {0} has expired")]
    Expired(String),

    /// The invitation or session has already been completed.
    #[error("{0} has already been completed")]
    AlreadyCompleted(String),

    /// The invitation was issued for a different assessment.
    #[error("invitation is for assessment {expected}, not {actual}")]
    AssessmentMismatch { expected: String, actual: String },
}

/// Errors raised by a result sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// A record for this session has already been persisted.
    #[error("session {0} has already been scored")]
    DuplicateSubmission(Uuid),

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors raised while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The recipient has no usable phone number.
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    /// Authentication with the gateway failed.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The gateway returned an error response.
    #[error("gateway error (HTTP {status}): {message}")]
    GatewayError { status: u16, message: String },

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl NotifyError {
    /// Returns `true` if retrying the same message cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            NotifyError::InvalidRecipient(_) | NotifyError::AuthenticationFailed(_)
        )
    }
}
