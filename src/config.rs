use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// SMS provider settings. Absent entirely when no API key is configured, in
/// which case OTP delivery is email-only.
#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    pub api_url: String,
    pub api_key: String,
    pub sender: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Base URL embedded in email verification links.
    pub public_base_url: String,
    pub smtp: SmtpConfig,
    pub sms: Option<SmsConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let username = std::env::var("EMAIL")?;
        let smtp = SmtpConfig {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".into()),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(587),
            from: std::env::var("EMAIL_FROM").unwrap_or_else(|_| username.clone()),
            password: std::env::var("EMAIL_PASSWORD")?,
            username,
        };
        let sms = std::env::var("SMS_API_KEY").ok().map(|api_key| SmsConfig {
            api_url: std::env::var("SMS_API_URL").unwrap_or_else(|_| {
                "https://app.smartsmssolutions.com/io/api/client/v1/sms/".into()
            }),
            api_key,
            sender: std::env::var("SMS_SENDER").unwrap_or_else(|_| "OTP NG".into()),
        });
        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".into());
        Ok(Self {
            database_url,
            public_base_url,
            smtp,
            sms,
        })
    }
}
