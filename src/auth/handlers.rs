use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use tower_sessions::Session;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, LoginUserData, OtpRequestParams, PasswordRequest,
            RegisterRequest, VerifyOtpRequest,
        },
        repo_types::{EmailVerificationHash, User},
        services::{self, hash_password, verify_password},
    },
    error::{ApiError, ApiResult},
    session::{AuthSession, CurrentUser},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/otp-request", get(otp_request))
        .route("/register", post(register))
        .route("/verify-otp", post(verify_otp))
        .route("/verify-email/:id", get(verify_email))
        .route("/change-password", post(change_password))
        .route("/update-password", post(update_password))
}

#[instrument(skip(state, session, payload))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let mut auth = AuthSession::load(&session).await?;
    if auth.is_logged_in() {
        return Err(ApiError::AlreadyLoggedIn);
    }

    let user = match User::find_by_email(&state.db, &payload.user_id).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            // Same message as a wrong password, no user enumeration.
            warn!("login with unknown identifier");
            return Err(ApiError::Generic("Invalid login data".into()));
        }
        Err(e) => {
            error!(error = %e, "password hash retrieval failed");
            return Err(ApiError::Failed("retrieval".into()));
        }
    };

    let ok = match verify_password(&payload.password, &user.password_hash) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, user_id = %user.id, "hash comparison failed");
            false
        }
    };
    if !ok {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::Generic("Invalid login data".into()));
    }

    // New session id before the privilege change, against session fixation.
    session.cycle_id().await.map_err(|e| {
        error!(error = %e, "session id cycle failed");
        ApiError::Generic("Try again later".into())
    })?;

    auth.user = Some(user.id);
    auth.store(&session).await?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        use_data: LoginUserData {
            username: user.username,
            email_verified: user.email_verified,
        },
        result: "success",
    }))
}

/// Dropping the whole session record logs the user out and rotates the id.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<ApiResult<&'static str>>, ApiError> {
    session.flush().await.map_err(|e| {
        error!(error = %e, "session flush failed");
        ApiError::Generic("Try again later".into())
    })?;
    Ok(ApiResult::json("logged-out"))
}

#[instrument(skip(state, session, params))]
pub async fn otp_request(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<OtpRequestParams>,
) -> Result<Json<ApiResult<&'static str>>, ApiError> {
    let mut auth = AuthSession::load(&session).await?;
    if auth.is_logged_in() {
        return Err(ApiError::AlreadyLoggedIn);
    }
    if !services::is_valid_email(&params.email) {
        return Err(ApiError::Invalid("Invalid email address".into()));
    }

    // The OTP lives in the session only: most requesters never finish the
    // flow, so nothing is written to the users table yet.
    let otp = state.otp.generate();
    auth.sms_otp = Some(otp.clone());

    if params.kind.as_deref() == Some("registration") {
        auth.store(&session).await?;
        services::send_registration_otp(&state, &params.email, params.phone.as_deref(), &otp)
            .await?;
    } else {
        auth.reset_email = Some(params.email.clone());
        auth.store(&session).await?;
        services::send_reset_otp(&state, &params.email, &otp).await?;
    }

    Ok(ApiResult::json("sent"))
}

#[instrument(skip(state, session, payload))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResult<&'static str>>, ApiError> {
    let auth = AuthSession::load(&session).await?;
    if auth.is_logged_in() {
        return Err(ApiError::AlreadyLoggedIn);
    }
    if !auth.otp_matches(&payload.otp) {
        return Err(ApiError::Invalid("Invalid OTP.".into()));
    }

    let data = payload.data;
    let password_hash = hash_password(&data.password).map_err(|e| {
        error!(error = %e, "password hashing failed");
        ApiError::Failed("hashErr".into())
    })?;

    match User::create_with_interests(
        &state.db,
        &data.username,
        &data.email,
        &password_hash,
        data.phone.as_deref(),
        &data.interests,
    )
    .await
    {
        Ok(user) => {
            // No auto-login: the client goes through /login next, which keeps
            // this request cheap and the session transition in one place.
            info!(user_id = %user.id, "user registered");
            Ok(ApiResult::json("success"))
        }
        Err(e) => {
            error!(error = %e, "user insert failed");
            Err(ApiError::Register(
                "Something went wrong. Please register later".into(),
            ))
        }
    }
}

#[instrument(skip(session, payload))]
pub async fn verify_otp(
    session: Session,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<ApiResult<&'static str>>, ApiError> {
    let mut auth = AuthSession::load(&session).await?;
    if !auth.verify_otp(&payload.otp) {
        return Err(ApiError::Invalid("Invalid OTP.".into()));
    }
    auth.store(&session).await?;
    Ok(ApiResult::json("valid"))
}

/// Email-link verification. The only non-JSON endpoint: a browser follows the
/// link, so success redirects to the front page and failure renders plain text.
#[instrument(skip(state))]
pub async fn verify_email(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match EmailVerificationHash::consume(&state.db, &id).await {
        Ok(true) => {
            info!("email verified");
            Redirect::to("/").into_response()
        }
        Ok(false) => "Invalid".into_response(),
        Err(e) => {
            error!(error = %e, "email verification failed");
            "something went wrong".into_response()
        }
    }
}

/// Forgot-password change, gated on a verified OTP rather than a login.
#[instrument(skip(state, session, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<PasswordRequest>,
) -> Result<Json<ApiResult<&'static str>>, ApiError> {
    let mut auth = AuthSession::load(&session).await?;
    if !auth.otp_verified {
        return Err(ApiError::Generic("Invalid request. OTP not validated".into()));
    }

    // Single-use grant: cleared and saved before the write, so a failed
    // attempt cannot be replayed.
    let email = auth.take_reset();
    auth.store(&session).await?;
    let email = email.ok_or_else(ApiError::generic)?;

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "password hashing failed");
        ApiError::Failed("hashErr".into())
    })?;

    let changed = User::update_password_by_email(&state.db, &email, &password_hash)
        .await
        .map_err(|e| {
            error!(error = %e, "password update failed");
            ApiError::generic()
        })?;
    if changed == 0 {
        return Err(ApiError::generic());
    }

    info!("password reset completed");
    Ok(ApiResult::json("success"))
}

/// Password change for an already logged-in user. No OTP involved.
#[instrument(skip(state, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<PasswordRequest>,
) -> Result<Json<ApiResult<&'static str>>, ApiError> {
    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "password hashing failed");
        ApiError::generic()
    })?;

    let changed = User::update_password_by_id(&state.db, user_id, &password_hash)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "password update failed");
            ApiError::generic()
        })?;
    if changed == 0 {
        return Err(ApiError::generic());
    }

    info!(user_id = %user_id, "password updated");
    Ok(ApiResult::json("success"))
}
