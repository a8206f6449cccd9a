//! Recording notifier for tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use skillcheck_core::error::NotifyError;
use skillcheck_core::traits::{Notification, Notifier, RecipientRole};

/// A notifier that remembers what it was asked to send.
///
/// Use [`MockNotifier::failing_for`] to make deliveries to one recipient
/// role fail, which exercises the "notification failure never fails the
/// submission" path.
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<Notification>>,
    call_count: AtomicU32,
    fail_for: Option<RecipientRole>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that rejects every notification for `role`.
    pub fn failing_for(role: RecipientRole) -> Self {
        Self {
            fail_for: Some(role),
            ..Self::default()
        }
    }

    /// Notifications accepted so far, in call order.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Number of `notify` calls, including failed ones.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if self.fail_for == Some(notification.role) {
            return Err(NotifyError::GatewayError {
                status: 503,
                message: "mock gateway unavailable".into(),
            });
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification.clone());
        }
        Ok(())
    }
}
