use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use super::SmsSender;
use crate::config::SmsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsOutcome {
    Sent,
    /// Provider rejected the destination number.
    InvalidNumber,
    Failed,
}

/// smartsmssolutions.com HTTP client. Any provider with a compatible
/// form-POST contract can stand in behind [`SmsSender`].
pub struct SmartSms {
    http: reqwest::Client,
    config: SmsConfig,
}

#[derive(Debug, Deserialize)]
struct ProviderReply {
    #[serde(default)]
    successful: Option<serde_json::Value>,
    #[serde(default)]
    invalid: Option<serde_json::Value>,
}

impl SmartSms {
    pub fn new(config: SmsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl SmsSender for SmartSms {
    async fn send(&self, to: &str, message: &str) -> anyhow::Result<SmsOutcome> {
        let params = [
            ("token", self.config.api_key.as_str()),
            ("sender", self.config.sender.as_str()),
            ("to", to),
            ("message", message),
            ("type", "0"),
            ("routing", "3"),
        ];

        let reply: ProviderReply = self
            .http
            .post(&self.config.api_url)
            .form(&params)
            .send()
            .await?
            .json()
            .await?;

        if reply.successful.is_some() {
            info!(%to, "sms sent");
            Ok(SmsOutcome::Sent)
        } else if reply.invalid.is_some() {
            warn!(%to, "sms rejected: invalid phone number");
            Ok(SmsOutcome::InvalidNumber)
        } else {
            warn!(%to, "sms not sent");
            Ok(SmsOutcome::Failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_reply_parses_success_and_invalid() {
        let ok: ProviderReply =
            serde_json::from_str(r#"{"successful":"1 message sent"}"#).unwrap();
        assert!(ok.successful.is_some());
        assert!(ok.invalid.is_none());

        let bad: ProviderReply = serde_json::from_str(r#"{"invalid":"2348000000"}"#).unwrap();
        assert!(bad.invalid.is_some());

        let empty: ProviderReply = serde_json::from_str("{}").unwrap();
        assert!(empty.successful.is_none() && empty.invalid.is_none());
    }
}
