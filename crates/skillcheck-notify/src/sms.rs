//! SMS delivery through an Africa's Talking compatible gateway.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use skillcheck_core::error::NotifyError;
use skillcheck_core::traits::{Notification, Notifier};

use crate::message::compose_message;
use crate::phone::format_phone_number;

const LIVE_BASE_URL: &str = "https://api.africastalking.com";
const SANDBOX_BASE_URL: &str = "https://api.sandbox.africastalking.com";
const SANDBOX_USERNAME: &str = "sandbox";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sends notifications as SMS.
pub struct SmsNotifier {
    api_key: String,
    username: String,
    sender_id: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl SmsNotifier {
    /// Build a notifier. Without an explicit `base_url`, the `sandbox`
    /// username routes to the sandbox gateway and anything else to live.
    pub fn new(
        api_key: &str,
        username: &str,
        sender_id: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| NotifyError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.unwrap_or_else(|| {
            if username == SANDBOX_USERNAME {
                SANDBOX_BASE_URL.to_string()
            } else {
                LIVE_BASE_URL.to_string()
            }
        });

        Ok(Self {
            api_key: api_key.to_string(),
            username: username.to_string(),
            sender_id,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkSmsRequest<'a> {
    username: &'a str,
    message: String,
    phone_numbers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sender_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct BulkSmsResponse {
    #[serde(rename = "SMSMessageData")]
    data: SmsMessageData,
}

#[derive(Deserialize)]
struct SmsMessageData {
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Recipients", default)]
    recipients: Vec<SmsRecipient>,
}

#[derive(Deserialize)]
struct SmsRecipient {
    #[serde(rename = "statusCode")]
    status_code: u16,
    #[serde(default)]
    status: String,
    #[serde(default)]
    number: String,
}

/// Gateway per-recipient codes 100-102 mean processed, sent, or queued.
fn recipient_accepted(code: u16) -> bool {
    (100..=102).contains(&code)
}

/// Codes that point at the number itself rather than the gateway.
fn recipient_rejected(code: u16) -> bool {
    matches!(code, 403 | 404 | 406)
}

#[async_trait]
impl Notifier for SmsNotifier {
    fn name(&self) -> &str {
        "sms"
    }

    #[instrument(skip(self, notification), fields(role = %notification.role))]
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let to = format_phone_number(&notification.phone);
        if to.len() < 2 {
            return Err(NotifyError::InvalidRecipient(notification.phone.clone()));
        }

        let body = BulkSmsRequest {
            username: &self.username,
            message: compose_message(notification),
            phone_numbers: vec![to.clone()],
            sender_id: self.sender_id.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/version1/messaging/bulk", self.base_url))
            .header("apiKey", &self.api_key)
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::NetworkError(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::AuthenticationFailed(body));
        }
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::GatewayError { status, message });
        }

        let parsed: BulkSmsResponse =
            response.json().await.map_err(|e| NotifyError::GatewayError {
                status,
                message: format!("failed to parse response: {e}"),
            })?;

        let Some(recipient) = parsed.data.recipients.first() else {
            return Err(NotifyError::GatewayError {
                status,
                message: parsed.data.message,
            });
        };

        if recipient_accepted(recipient.status_code) {
            tracing::debug!(number = %recipient.number, "sms accepted: {}", recipient.status);
            Ok(())
        } else if recipient_rejected(recipient.status_code) {
            Err(NotifyError::InvalidRecipient(format!(
                "{to}: {}",
                recipient.status
            )))
        } else {
            Err(NotifyError::GatewayError {
                status: recipient.status_code,
                message: recipient.status.clone(),
            })
        }
    }
}
