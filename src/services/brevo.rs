use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::config::BrevoConfig;
use crate::models::notification::NotificationResult;
use crate::services::notification::NotificationGateway;

/// Messaging channels offered by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Sms,
    WhatsApp,
}

impl Channel {
    fn as_str(self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::WhatsApp => "whatsapp",
        }
    }
}

#[derive(Clone)]
pub struct BrevoService {
    client: Client,
    config: BrevoConfig,
}

impl BrevoService {
    pub fn new(config: BrevoConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, channel: Channel) -> &str {
        match channel {
            Channel::Sms => &self.config.sms_url,
            Channel::WhatsApp => &self.config.whatsapp_url,
        }
    }

    fn payload(&self, channel: Channel, recipient: &str, message: &str) -> Value {
        match channel {
            Channel::Sms => json!({
                "type": "transactional",
                "unicodeEnabled": true,
                "recipient": recipient,
                "content": message,
                "sender": self.config.sms_sender,
            }),
            Channel::WhatsApp => json!({
                "whatsappBusinessAccountId": self.config.whatsapp_business_id,
                "to": recipient,
                "type": "text",
                "text": { "body": message },
            }),
        }
    }

    /// Issues exactly one provider call and folds the response into a
    /// `NotificationResult`. Transport and parse failures become
    /// `success = false`; this method never returns an error.
    pub async fn send(&self, channel: Channel, recipient: &str, message: &str) -> NotificationResult {
        let payload = self.payload(channel, recipient, message);

        let response = self
            .client
            .post(self.endpoint(channel))
            .header("api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                let body = response.json::<Value>().await.unwrap_or_else(|_| json!({}));
                let result = result_from(status, body);
                if result.success {
                    log::info!("{} message accepted by provider", channel.as_str());
                } else {
                    log::warn!(
                        "{} message rejected by provider with status {}",
                        channel.as_str(),
                        status
                    );
                }
                result
            }
            Err(err) => {
                log::warn!("{} message transport failure: {}", channel.as_str(), err);
                NotificationResult {
                    success: false,
                    status_code: None,
                    response: json!({ "error": err.to_string() }),
                }
            }
        }
    }
}

/// A provider "created" status is the only acceptance signal; anything else
/// is a failed delivery attempt.
fn result_from(status: StatusCode, response: Value) -> NotificationResult {
    NotificationResult {
        success: status == StatusCode::CREATED,
        status_code: Some(status.as_u16()),
        response,
    }
}

#[async_trait]
impl NotificationGateway for BrevoService {
    async fn send_sms(&self, recipient: &str, message: &str) -> NotificationResult {
        self.send(Channel::Sms, recipient, message).await
    }

    async fn send_whatsapp(&self, recipient: &str, message: &str) -> NotificationResult {
        self.send(Channel::WhatsApp, recipient, message).await
    }
}
