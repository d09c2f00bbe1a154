//! Thin data-fetch layer for frontend shells: issues the same requests the
//! browser UI does and parses the `{result}` / `{error, errMsg}` envelope.
//! The session cookie rides along automatically via the cookie store.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered `not-logged-in`; callers route to the login page.
    #[error("not logged in")]
    NotLoggedIn,
    #[error("{kind}: {message}")]
    Api { kind: String, message: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error: Option<String>,
    #[serde(rename = "errMsg")]
    err_msg: Option<String>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<T, ClientError> {
        if let Some(result) = self.result {
            return Ok(result);
        }
        match self.error {
            Some(kind) if kind == "not-logged-in" => Err(ClientError::NotLoggedIn),
            Some(kind) => Err(ClientError::Api {
                kind,
                message: self.err_msg.unwrap_or_default(),
            }),
            None => Err(ClientError::Api {
                kind: "generic".into(),
                message: "empty response".into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UsernameData {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailData {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileData {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(rename = "profilePicture")]
    pub profile_picture: Option<String>,
    #[serde(rename = "emailVerified")]
    pub email_verified: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProfileView {
    #[serde(rename = "profileData")]
    pub profile_data: ProfileData,
    pub interests: Vec<String>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}/api/{}", self.base_url, path);
        let envelope: Envelope<T> = self.http.get(url).send().await?.json().await?;
        envelope.into_result()
    }

    pub async fn logout(&self) -> Result<String, ClientError> {
        self.get_json("logout").await
    }

    pub async fn get_username(&self) -> Result<UsernameData, ClientError> {
        self.get_json("get-username").await
    }

    pub async fn get_email(&self) -> Result<EmailData, ClientError> {
        self.get_json("get-email").await
    }

    pub async fn profile(&self) -> Result<ProfileView, ClientError> {
        self.get_json("profile").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_yields_result() {
        let envelope: Envelope<UsernameData> =
            serde_json::from_str(r#"{"result": {"username": "ada"}}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap().username, "ada");
    }

    #[test]
    fn not_logged_in_is_split_out() {
        let envelope: Envelope<UsernameData> =
            serde_json::from_str(r#"{"error": "not-logged-in"}"#).unwrap();
        assert!(matches!(
            envelope.into_result(),
            Err(ClientError::NotLoggedIn)
        ));
    }

    #[test]
    fn other_errors_carry_kind_and_message() {
        let envelope: Envelope<String> =
            serde_json::from_str(r#"{"error": "invalid", "errMsg": "Invalid OTP."}"#).unwrap();
        match envelope.into_result() {
            Err(ClientError::Api { kind, message }) => {
                assert_eq!(kind, "invalid");
                assert_eq!(message, "Invalid OTP.");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn profile_view_parses_nested_shape() {
        let body = r#"{
            "result": {
                "profileData": {
                    "username": "ada",
                    "email": "ada@example.com",
                    "phone": null,
                    "profilePicture": "ada.png",
                    "emailVerified": true
                },
                "interests": ["chess"]
            }
        }"#;
        let envelope: Envelope<ProfileView> = serde_json::from_str(body).unwrap();
        let view = envelope.into_result().unwrap();
        assert_eq!(view.profile_data.profile_picture.as_deref(), Some("ada.png"));
        assert_eq!(view.interests, vec!["chess"]);
    }
}
