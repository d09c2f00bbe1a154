use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    error::{ApiError, ApiResult},
    profiles::{
        dto::{
            FrontPage, FrontPageResponse, ProfileView, UpdateEmailRequest, UpdateUsernameRequest,
            UserDetailsParams, ValidateParams,
        },
        repo::{self, UniqueColumn},
        repo_types::{EmailRow, IdentityRow, LikeMindRow, ProfileRow, UsernameRow},
        services,
    },
    session::CurrentUser,
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/get-username", get(get_username))
        .route("/get-email", get(get_email))
        .route("/update-username", post(update_username))
        .route("/update-email", post(update_email))
        .route("/profile", get(profile))
        .route("/front-page-items", get(front_page_items))
        .route("/validate", get(validate))
        .route("/get-user-details", get(get_user_details))
}

fn query_failed(e: anyhow::Error) -> ApiError {
    error!(error = %e, "profile query failed");
    ApiError::generic()
}

#[instrument(skip(state))]
pub async fn get_username(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResult<UsernameRow>>, ApiError> {
    let row = UsernameRow::get(&state.db, user_id)
        .await
        .map_err(query_failed)?
        .ok_or_else(ApiError::generic)?;
    Ok(ApiResult::json(row))
}

#[instrument(skip(state))]
pub async fn get_email(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResult<EmailRow>>, ApiError> {
    let row = EmailRow::get(&state.db, user_id)
        .await
        .map_err(query_failed)?
        .ok_or_else(ApiError::generic)?;
    Ok(ApiResult::json(row))
}

#[instrument(skip(state, payload))]
pub async fn update_username(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<UpdateUsernameRequest>,
) -> Result<Json<ApiResult<&'static str>>, ApiError> {
    repo::update_username(&state.db, user_id, &payload.username)
        .await
        .map_err(query_failed)?;
    info!(user_id = %user_id, "username updated");
    Ok(ApiResult::json("success"))
}

#[instrument(skip(state, payload))]
pub async fn update_email(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<UpdateEmailRequest>,
) -> Result<Json<ApiResult<&'static str>>, ApiError> {
    repo::update_email(&state.db, user_id, &payload.email)
        .await
        .map_err(query_failed)?;
    info!(user_id = %user_id, "email updated");
    Ok(ApiResult::json("success"))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResult<ProfileView>>, ApiError> {
    let profile_data = ProfileRow::get(&state.db, user_id)
        .await
        .map_err(query_failed)?
        .ok_or_else(ApiError::generic)?;
    let interests = repo::interests_of(&state.db, user_id)
        .await
        .map_err(query_failed)?;
    Ok(ApiResult::json(ProfileView {
        profile_data,
        interests,
    }))
}

#[instrument(skip(state))]
pub async fn front_page_items(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<FrontPageResponse>, ApiError> {
    let front_page_failed = |e: anyhow::Error| {
        error!(error = %e, "front page query failed");
        ApiError::Generic("Something went wrong. We are working on it".into())
    };

    let rows = LikeMindRow::find_for(&state.db, user_id)
        .await
        .map_err(front_page_failed)?;
    let front_page = services::group_like_minds(rows);

    let user_data = IdentityRow::get(&state.db, user_id)
        .await
        .map_err(front_page_failed)?
        .ok_or_else(|| ApiError::Generic("Something went wrong. We are working on it".into()))?;

    Ok(Json(FrontPageResponse {
        user_data,
        result: FrontPage { front_page },
    }))
}

/// Uniqueness probe used by the registration form.
#[instrument(skip(state))]
pub async fn validate(
    State(state): State<AppState>,
    Query(params): Query<ValidateParams>,
) -> Result<Json<ApiResult<&'static str>>, ApiError> {
    let column = UniqueColumn::parse(&params.column).ok_or_else(ApiError::generic)?;

    let taken = format!("{} already exists. Choose another value", params.column);
    let exists = repo::value_exists(&state.db, column, &params.value)
        .await
        .map_err(|e| {
            error!(error = %e, "uniqueness check failed");
            ApiError::NotAvailable(taken.clone())
        })?;
    if exists {
        return Err(ApiError::NotAvailable(taken));
    }
    Ok(ApiResult::json("available"))
}

#[instrument(skip(state))]
pub async fn get_user_details(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Query(params): Query<UserDetailsParams>,
) -> Result<Json<ApiResult<ProfileView>>, ApiError> {
    let details_failed = |e: anyhow::Error| {
        error!(error = %e, "user details query failed");
        ApiError::Failed("db-error".into())
    };

    let profile_data = ProfileRow::get_by_username(&state.db, &params.username)
        .await
        .map_err(details_failed)?
        .ok_or_else(|| ApiError::Failed("db-error".into()))?;
    let interests = repo::interests_by_username(&state.db, &params.username)
        .await
        .map_err(details_failed)?;

    Ok(ApiResult::json(ProfileView {
        profile_data,
        interests,
    }))
}
