use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{error, warn};

use crate::auth::repo_types::EmailVerificationHash;
use crate::error::ApiError;
use crate::notify::SmsOutcome;
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Full-cost hash for stored passwords.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Minimal-cost hash for the email verification link token. The OTP is
/// short-lived, so the hash only needs to be unguessable, not slow.
pub fn hash_otp(otp: &str) -> anyhow::Result<String> {
    let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(otp.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Token embedded in the verification link. Falls back to a timestamp token
/// if hashing ever fails rather than aborting the whole flow.
pub fn verification_token(otp: &str) -> String {
    hash_otp(otp).unwrap_or_else(|e| {
        warn!(error = %e, "otp hash failed, using timestamp token");
        OffsetDateTime::now_utc().unix_timestamp_nanos().to_string()
    })
}

/// Issues a registration OTP: persists the weak hash for the email-link path,
/// then delivers the code by email, and by SMS when a provider is configured
/// and a phone number was supplied.
pub async fn send_registration_otp(
    state: &AppState,
    email: &str,
    phone: Option<&str>,
    otp: &str,
) -> Result<(), ApiError> {
    let token = verification_token(otp);
    EmailVerificationHash::save(&state.db, &token, email)
        .await
        .map_err(|e| {
            error!(error = %e, "saving verification hash failed");
            ApiError::generic()
        })?;

    let message = format!("Your OTP for registration on BrilCon is {otp}");

    if let (Some(sms), Some(phone)) = (&state.sms, phone) {
        match sms.send(phone, &message).await {
            Ok(SmsOutcome::Sent) => {}
            Ok(SmsOutcome::InvalidNumber) => {
                return Err(ApiError::Invalid(
                    "Invalid phone number. Enter a valid phone number".into(),
                ))
            }
            Ok(SmsOutcome::Failed) => {
                return Err(ApiError::Generic("Failed:OTP was not sent. Try again".into()))
            }
            Err(e) => {
                error!(error = %e, "sms provider request failed");
                return Err(ApiError::Generic("Failed:OTP was not sent. Try again".into()));
            }
        }
    }

    let link = format!(
        "{}/api/verify-email/{}",
        state.config.public_base_url,
        urlencoding::encode(&token)
    );
    let body = format!("{message}\nTo verify your email follow this link {link}");
    state
        .mailer
        .send(email, "Verify your email", &body)
        .await
        .map_err(|e| {
            error!(error = %e, "sending registration otp email failed");
            ApiError::Failed("email-error".into())
        })?;
    Ok(())
}

/// Password-reset OTP goes out by email only.
pub async fn send_reset_otp(state: &AppState, email: &str, otp: &str) -> Result<(), ApiError> {
    let message = format!("The OTP required to reset your BrilCon Password is {otp}");
    state
        .mailer
        .send(email, "Confirm Password Reset", &message)
        .await
        .map_err(|e| {
            error!(error = %e, "sending reset otp email failed");
            ApiError::Failed("email-error".into())
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn otp_hash_verifies_with_weak_params() {
        let hash = hash_otp("12345").expect("otp hashing should succeed");
        assert!(verify_password("12345", &hash).expect("verify should succeed"));
        assert!(!verify_password("00000", &hash).expect("verify should not error"));
    }

    #[test]
    fn verification_token_is_nonempty() {
        assert!(!verification_token("12345").is_empty());
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("ada@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@example.com"));
    }
}
