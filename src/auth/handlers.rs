use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{PublicUser, RegisterRequest},
        extractors::AuthUser,
        repo_types::User,
        services,
    },
    error::{ApiError, INVALID_CREDENTIALS},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let Json(payload) = payload?;

    let user = services::register(
        &state.db,
        &payload.username,
        &payload.email,
        &payload.password,
    )
    .await
    .map_err(|e| {
        warn!(error = %e, username = %payload.username, "registration rejected");
        e
    })?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

/// Credentials are checked by the extractor; this only echoes the account.
#[instrument(skip(state, identity), fields(user_id = identity.id))]
pub async fn login(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = load_user(&state, identity.id).await?;
    info!(user_id = user.id, username = %identity.username, "user logged in");
    Ok(Json(PublicUser::from(user)))
}

#[instrument(skip(state, identity), fields(user_id = identity.id))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = load_user(&state, identity.id).await?;
    Ok(Json(PublicUser::from(user)))
}

async fn load_user(state: &AppState, user_id: i64) -> Result<User, ApiError> {
    User::find_by_id(&state.db, user_id)
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "find_by_id failed");
            ApiError::Internal(e.to_string())
        })?
        .ok_or(ApiError::Unauthorized(INVALID_CREDENTIALS))
}
