use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::ApiError;

const SESSION_KEY: &str = "auth";

/// Per-client state persisted in the session store. Flow logic mutates this
/// struct and writes it back with [`AuthSession::store`], so the multi-step
/// OTP flows stay independent of the cookie/session machinery.
///
/// A user is logged in iff `user` is set. `sms_otp` holds the pending OTP for
/// both registration and password reset; `reset_email` and `otp_verified`
/// exist only for the reset flow and are consumed together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: Option<Uuid>,
    pub sms_otp: Option<String>,
    pub reset_email: Option<String>,
    pub otp_verified: bool,
}

impl AuthSession {
    pub async fn load(session: &Session) -> Result<Self, ApiError> {
        Ok(session
            .get::<AuthSession>(SESSION_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn store(&self, session: &Session) -> Result<(), ApiError> {
        session.insert(SESSION_KEY, self).await?;
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Exact-match check against the session-held OTP without granting
    /// anything (registration path).
    pub fn otp_matches(&self, submitted: &str) -> bool {
        self.sms_otp.as_deref() == Some(submitted)
    }

    /// Exact-match check that flips `otp_verified` on success. A mismatch
    /// leaves the state untouched.
    pub fn verify_otp(&mut self, submitted: &str) -> bool {
        let ok = self.otp_matches(submitted);
        if ok {
            self.otp_verified = true;
        }
        ok
    }

    /// Consumes the password-reset grant: clears `otp_verified` and takes the
    /// stored email. Single-use whether or not the caller's write succeeds.
    pub fn take_reset(&mut self) -> Option<String> {
        self.otp_verified = false;
        self.reset_email.take()
    }
}

/// Login guard: extracts the logged-in user id from the session, rejecting
/// with `not-logged-in` otherwise. Stands in for the original middleware.
pub struct CurrentUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| {
                tracing::error!(%msg, "session extraction failed");
                ApiError::Generic("Try again later".into())
            })?;
        let auth = AuthSession::load(&session).await?;
        auth.user.map(CurrentUser).ok_or(ApiError::NotLoggedIn)
    }
}
