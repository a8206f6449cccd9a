//! Notifiers that never leave the process.

use async_trait::async_trait;

use skillcheck_core::error::NotifyError;
use skillcheck_core::traits::{Notification, Notifier};

use crate::message::compose_message;
use crate::phone::format_phone_number;

/// Writes each composed message to the log instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            role = %notification.role,
            to = %format_phone_number(&notification.phone),
            "{}",
            compose_message(notification)
        );
        Ok(())
    }
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    fn name(&self) -> &str {
        "none"
    }

    async fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}
