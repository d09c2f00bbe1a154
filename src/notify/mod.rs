use async_trait::async_trait;

pub mod email;
pub mod sms;

pub use email::SmtpMailer;
pub use sms::{SmartSms, SmsOutcome};

/// Fire-and-forget email delivery to a third-party service.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// Fire-and-forget SMS delivery. Wired only when provider credentials are
/// configured; flows fall back to email-only delivery without it.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, message: &str) -> anyhow::Result<SmsOutcome>;
}
