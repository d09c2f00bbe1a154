use serde::{Deserialize, Serialize};

/// Login body. `userId` is the email address the account was registered with.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginUserData {
    pub username: String,
    #[serde(rename = "emailVerified")]
    pub email_verified: bool,
}

/// Success body for login: `{useData: {...}, result: "success"}`. Field name
/// kept as-is for wire compatibility with the deployed frontend.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "useData")]
    pub use_data: LoginUserData,
    pub result: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct RegistrationData {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Registration submit: the OTP previously issued to this session plus the
/// full registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub otp: String,
    pub data: RegistrationData,
}

#[derive(Debug, Deserialize)]
pub struct OtpRequestParams {
    /// `registration` selects the registration flow; anything else (or
    /// nothing) means password reset.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

/// Body for both password-change endpoints.
#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_uses_frontend_field_names() {
        let response = LoginResponse {
            use_data: LoginUserData {
                username: "ada".into(),
                email_verified: true,
            },
            result: "success",
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "useData": {"username": "ada", "emailVerified": true},
                "result": "success"
            })
        );
    }

    #[test]
    fn register_request_parses_nested_payload() {
        let body = r#"{
            "otp": "12345",
            "data": {
                "username": "ada",
                "email": "ada@example.com",
                "password": "hunter22",
                "phone": "2348000000000",
                "interests": ["chess", "hiking"]
            }
        }"#;
        let parsed: RegisterRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.otp, "12345");
        assert_eq!(parsed.data.interests, vec!["chess", "hiking"]);
    }

    #[test]
    fn otp_request_type_is_optional() {
        let parsed: OtpRequestParams =
            serde_json::from_str(r#"{"email": "ada@example.com"}"#).unwrap();
        assert_eq!(parsed.kind, None);
        assert_eq!(parsed.phone, None);
    }
}
