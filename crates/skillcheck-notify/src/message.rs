//! Outbound message text.

use skillcheck_core::traits::{Notification, NotificationKind, RecipientRole};

/// Compose the SMS body for a notification.
pub fn compose_message(notification: &Notification) -> String {
    let name = &notification.candidate_name;
    let title = &notification.assessment_title;

    match (&notification.kind, notification.role) {
        (
            NotificationKind::Invitation {
                access_code,
                test_url,
                company_name,
            },
            _,
        ) => format!(
            "Hello {name},\n\n\
             {company_name} has invited you to take a skill assessment: {title}\n\n\
             Access your test here: {test_url}\n\
             Access Code: {access_code}\n\n\
             Good luck!"
        ),
        (NotificationKind::Result { score, passed }, RecipientRole::Candidate) => {
            let status = if *passed { "PASSED" } else { "NOT PASSED" };
            format!(
                "Hello {name},\n\n\
                 You have completed the {title} assessment.\n\n\
                 Score: {score}%\n\
                 Status: {status}\n\n\
                 Thank you for your participation!"
            )
        }
        (NotificationKind::Result { score, passed }, RecipientRole::Recruiter) => {
            let status = if *passed { "PASSED" } else { "FAILED" };
            format!(
                "Skill Check Alert:\n\n\
                 {name} completed \"{title}\"\n\n\
                 Score: {score}%\n\
                 Status: {status}\n\n\
                 Check full results in your dashboard."
            )
        }
    }
}
