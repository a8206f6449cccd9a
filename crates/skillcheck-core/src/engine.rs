//! Submission and invitation orchestrators.
//!
//! Drives one candidate submission through access checks, scoring,
//! persistence, and notification, and sends the invitations that precede
//! it. The scoring itself is the pure `scoring::score`; everything with side
//! effects happens here.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::model::Assessment;
use crate::report::SubmissionRecord;
use crate::results::Grade;
use crate::scoring::score;
use crate::session::{Invitation, TestSession};
use crate::submission::Submission;
use crate::traits::{Notification, NotificationKind, Notifier, RecipientRole, ResultSink};

/// What the candidate gets back after submitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub test_session_id: Uuid,
    /// Score rounded to one decimal place.
    pub score: f64,
    pub passed: bool,
    pub grade: Grade,
    pub correct_answers: usize,
    pub wrong_answers: usize,
    pub skipped_questions: usize,
    pub total_questions: usize,
}

/// Per-notification delivery outcome, for callers that want to surface it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub role: RecipientRole,
    pub delivered: bool,
}

/// Scores submissions and hands the results to a sink and a notifier.
pub struct SubmissionService {
    sink: Arc<dyn ResultSink>,
    notifier: Arc<dyn Notifier>,
}

impl SubmissionService {
    pub fn new(sink: Arc<dyn ResultSink>, notifier: Arc<dyn Notifier>) -> Self {
        Self { sink, notifier }
    }

    /// Score a submission made through `invitation` and record it.
    ///
    /// Notification failures are logged and never fail the submission.
    pub async fn submit(
        &self,
        invitation: &mut Invitation,
        assessment: &Assessment,
        submission: &Submission,
        recruiter_phone: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(SubmissionReceipt, Vec<DeliveryReport>)> {
        invitation.check_access(now)?;
        if invitation.assessment_id != assessment.id {
            return Err(SessionError::AssessmentMismatch {
                expected: invitation.assessment_id.clone(),
                actual: assessment.id.clone(),
            }
            .into());
        }

        let mut session = TestSession::start(
            assessment.id.clone(),
            invitation.candidate.clone(),
            submission.time_spent_secs,
            now,
        );

        let outcome = score(assessment, submission);
        session.complete(&outcome.result, now)?;

        let record = SubmissionRecord::new(session, assessment.title.clone(), outcome, now);
        self.sink
            .persist(&record)
            .await
            .with_context(|| {
                format!("failed to persist result for session {}", record.session.id)
            })?;

        invitation.mark_completed();

        tracing::info!(
            session_id = %record.session.id,
            assessment_id = %assessment.id,
            score = record.result.score,
            passed = record.result.passed,
            "submission scored"
        );

        let deliveries = self.send_notifications(&record, recruiter_phone).await;

        let result = &record.result;
        let receipt = SubmissionReceipt {
            test_session_id: record.session.id,
            score: result.rounded_score(),
            passed: result.passed,
            grade: result.grade,
            correct_answers: result.correct_answers,
            wrong_answers: result.wrong_answers,
            skipped_questions: result.skipped_questions,
            total_questions: result.total_questions,
        };

        Ok((receipt, deliveries))
    }

    async fn send_notifications(
        &self,
        record: &SubmissionRecord,
        recruiter_phone: Option<&str>,
    ) -> Vec<DeliveryReport> {
        let candidate = record.candidate();
        let mut targets = Vec::new();
        if let Some(phone) = candidate.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            targets.push((RecipientRole::Candidate, phone.to_string()));
        }
        if let Some(phone) = recruiter_phone.filter(|p| !p.trim().is_empty()) {
            targets.push((RecipientRole::Recruiter, phone.to_string()));
        }

        let mut reports = Vec::with_capacity(targets.len());
        for (role, phone) in targets {
            let notification = Notification {
                role,
                phone,
                candidate_name: candidate.name.clone(),
                assessment_title: record.assessment_title.clone(),
                kind: NotificationKind::Result {
                    score: record.result.rounded_score(),
                    passed: record.result.passed,
                },
            };
            let delivered = deliver(self.notifier.as_ref(), &notification).await;
            reports.push(DeliveryReport { role, delivered });
        }
        reports
    }
}

/// Send one notification; failures are logged, never returned.
async fn deliver(notifier: &dyn Notifier, notification: &Notification) -> bool {
    match notifier.notify(notification).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(
                role = %notification.role,
                notifier = notifier.name(),
                permanent = e.is_permanent(),
                error = %e,
                "notification failed"
            );
            false
        }
    }
}

/// Sends assessment invitations and records the delivery outcome on them.
pub struct InvitationService {
    notifier: Arc<dyn Notifier>,
    company_name: String,
    app_url: String,
}

impl InvitationService {
    /// `app_url` is the base the candidate-facing test link is built on.
    pub fn new(
        notifier: Arc<dyn Notifier>,
        company_name: impl Into<String>,
        app_url: impl Into<String>,
    ) -> Self {
        Self {
            notifier,
            company_name: company_name.into(),
            app_url: app_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Link the candidate opens to take the test.
    pub fn test_url(&self, access_code: &str) -> String {
        format!("{}/test/{access_code}", self.app_url)
    }

    /// Deliver `invitation` to its candidate and mark it `Sent` or `Failed`.
    ///
    /// A candidate without a phone number is a failed delivery. Delivery
    /// problems never surface as errors; only a mismatched assessment does.
    pub async fn send(
        &self,
        invitation: &mut Invitation,
        assessment: &Assessment,
        now: DateTime<Utc>,
    ) -> Result<DeliveryReport> {
        if invitation.assessment_id != assessment.id {
            return Err(SessionError::AssessmentMismatch {
                expected: invitation.assessment_id.clone(),
                actual: assessment.id.clone(),
            }
            .into());
        }

        let phone = invitation
            .candidate
            .phone
            .as_deref()
            .filter(|p| !p.trim().is_empty());

        let delivered = match phone {
            Some(phone) => {
                let notification = Notification {
                    role: RecipientRole::Candidate,
                    phone: phone.to_string(),
                    candidate_name: invitation.candidate.name.clone(),
                    assessment_title: assessment.title.clone(),
                    kind: NotificationKind::Invitation {
                        access_code: invitation.access_code.clone(),
                        test_url: self.test_url(&invitation.access_code),
                        company_name: self.company_name.clone(),
                    },
                };
                deliver(self.notifier.as_ref(), &notification).await
            }
            None => {
                tracing::warn!(
                    invitation_id = %invitation.id,
                    "candidate has no phone number; invitation not sent"
                );
                false
            }
        };

        if delivered {
            invitation.mark_sent(now);
        } else {
            invitation.mark_failed();
        }

        tracing::info!(
            invitation_id = %invitation.id,
            assessment_id = %assessment.id,
            status = ?invitation.status,
            "invitation dispatched"
        );

        Ok(DeliveryReport {
            role: RecipientRole::Candidate,
            delivered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;
    use crate::model::{AnswerOption, Question, QuestionType};
    use crate::session::{Candidate, InvitationStatus};
    use crate::sink::MemorySink;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn name(&self) -> &str {
            "recording"
        }

        async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(notification.clone());
            if self.fail {
                Err(NotifyError::NetworkError("down".into()))
            } else {
                Ok(())
            }
        }
    }

    fn assessment() -> Assessment {
        Assessment {
            id: "a1".into(),
            title: "Networking".into(),
            description: String::new(),
            passing_score: 50.0,
            duration_minutes: None,
            questions: vec![Question {
                id: "q1".into(),
                question: "TCP is connection-oriented".into(),
                question_type: QuestionType::TrueFalse,
                points: 2,
                options: vec![
                    AnswerOption {
                        id: "t".into(),
                        text: "True".into(),
                        is_correct: true,
                        order: 0,
                    },
                    AnswerOption {
                        id: "f".into(),
                        text: "False".into(),
                        is_correct: false,
                        order: 1,
                    },
                ],
                explanation: None,
                order: 0,
            }],
        }
    }

    fn invitation(phone: Option<&str>) -> Invitation {
        Invitation {
            id: "inv".into(),
            access_code: "CODE1234".into(),
            assessment_id: "a1".into(),
            candidate: Candidate {
                name: "Achieng".into(),
                email: Some("achieng@example.com".into()),
                phone: phone.map(str::to_string),
            },
            status: InvitationStatus::Sent,
            expires_at: None,
            sent_at: None,
        }
    }

    #[tokio::test]
    async fn submit_scores_persists_and_notifies() {
        let sink = Arc::new(MemorySink::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = SubmissionService::new(sink.clone(), notifier.clone());

        let mut inv = invitation(Some("0712345678"));
        let submission = Submission::new(Default::default(), 75).with_answer("q1", "true");
        let (receipt, deliveries) = service
            .submit(&mut inv, &assessment(), &submission, Some("0700000000"), Utc::now())
            .await
            .unwrap();

        assert_eq!(receipt.score, 100.0);
        assert!(receipt.passed);
        assert_eq!(receipt.grade, Grade::A);
        assert_eq!(inv.status, InvitationStatus::Completed);

        let records = sink.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].session.time_spent_secs, 75);
        assert!(records[0].session.is_completed());

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].role, RecipientRole::Candidate);
        assert_eq!(sent[1].role, RecipientRole::Recruiter);
        assert_eq!(sent[1].candidate_name, "Achieng");
        assert_eq!(
            sent[1].kind,
            NotificationKind::Result {
                score: 100.0,
                passed: true
            }
        );
        assert!(deliveries.iter().all(|d| d.delivered));
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_submission() {
        let sink = Arc::new(MemorySink::new());
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let service = SubmissionService::new(sink.clone(), notifier);

        let mut inv = invitation(Some("0712345678"));
        let (receipt, deliveries) = service
            .submit(&mut inv, &assessment(), &Submission::default(), None, Utc::now())
            .await
            .unwrap();

        assert!(!receipt.passed);
        assert_eq!(receipt.skipped_questions, 1);
        assert_eq!(deliveries.len(), 1);
        assert!(!deliveries[0].delivered);
        assert_eq!(sink.records().await.len(), 1);
    }

    #[tokio::test]
    async fn no_phone_no_notification() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = SubmissionService::new(Arc::new(MemorySink::new()), notifier.clone());
        let mut inv = invitation(None);
        service
            .submit(&mut inv, &assessment(), &Submission::default(), Some("  "), Utc::now())
            .await
            .unwrap();
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn completed_invitation_rejected() {
        let sink = Arc::new(MemorySink::new());
        let service = SubmissionService::new(sink.clone(), Arc::new(RecordingNotifier::default()));
        let mut inv = invitation(None);
        let a = assessment();

        service
            .submit(&mut inv, &a, &Submission::default(), None, Utc::now())
            .await
            .unwrap();
        let err = service
            .submit(&mut inv, &a, &Submission::default(), None, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::AlreadyCompleted(_))
        ));
        assert_eq!(sink.records().await.len(), 1);
    }

    #[tokio::test]
    async fn expired_invitation_rejected() {
        let service = SubmissionService::new(
            Arc::new(MemorySink::new()),
            Arc::new(RecordingNotifier::default()),
        );
        let now = Utc::now();
        let mut inv = invitation(None);
        inv.expires_at = Some(now - Duration::hours(1));
        let err = service
            .submit(&mut inv, &assessment(), &Submission::default(), None, now)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::Expired(_))
        ));
        assert_eq!(inv.status, InvitationStatus::Sent);
    }

    #[tokio::test]
    async fn mismatched_assessment_rejected() {
        let service = SubmissionService::new(
            Arc::new(MemorySink::new()),
            Arc::new(RecordingNotifier::default()),
        );
        let mut other = assessment();
        other.id = "a2".into();
        let err = service
            .submit(&mut invitation(None), &other, &Submission::default(), None, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::AssessmentMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn invitation_sent() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service =
            InvitationService::new(notifier.clone(), "Acme Ltd", "https://tests.example.com/");
        let now = Utc::now();
        let candidate = invitation(Some("0712345678")).candidate;
        let mut inv = Invitation::issue("a1", candidate, Some(7), now);

        let report = service.send(&mut inv, &assessment(), now).await.unwrap();
        assert!(report.delivered);
        assert_eq!(inv.status, InvitationStatus::Sent);
        assert_eq!(inv.sent_at, Some(now));

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].role, RecipientRole::Candidate);
        assert_eq!(sent[0].assessment_title, "Networking");
        assert_eq!(
            sent[0].kind,
            NotificationKind::Invitation {
                access_code: inv.access_code.clone(),
                test_url: format!("https://tests.example.com/test/{}", inv.access_code),
                company_name: "Acme Ltd".into(),
            }
        );
    }

    #[tokio::test]
    async fn invitation_failed_delivery() {
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let service = InvitationService::new(notifier, "Acme Ltd", "http://localhost:3000");
        let now = Utc::now();
        let candidate = invitation(Some("0712345678")).candidate;
        let mut inv = Invitation::issue("a1", candidate, None, now);

        let report = service.send(&mut inv, &assessment(), now).await.unwrap();
        assert!(!report.delivered);
        assert_eq!(inv.status, InvitationStatus::Failed);
        assert!(inv.sent_at.is_none());
    }

    #[tokio::test]
    async fn invitation_without_phone_fails_without_sending() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service =
            InvitationService::new(notifier.clone(), "Acme Ltd", "http://localhost:3000");
        let now = Utc::now();
        let mut inv = Invitation::issue("a1", invitation(None).candidate, None, now);

        service.send(&mut inv, &assessment(), now).await.unwrap();
        assert_eq!(inv.status, InvitationStatus::Failed);
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invitation_for_other_assessment_rejected() {
        let service = InvitationService::new(
            Arc::new(RecordingNotifier::default()),
            "Acme Ltd",
            "http://localhost:3000",
        );
        let now = Utc::now();
        let mut inv = Invitation::issue("a2", invitation(None).candidate, None, now);
        let err = service.send(&mut inv, &assessment(), now).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::AssessmentMismatch { .. })
        ));
        assert_eq!(inv.status, InvitationStatus::Pending);
    }
}
