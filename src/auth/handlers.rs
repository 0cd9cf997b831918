use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse, SignupRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        validate::{validate_login, validate_signup},
    },
    error::ApiError,
    state::AppState,
    users::repo::User,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    validate_signup(
        &payload.name,
        &payload.email,
        &payload.mobile_num,
        &payload.password,
    )?;

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "signup with an already registered email");
        return Err(ApiError::Conflict(
            "Email already exists, please use a different email".into(),
        ));
    }

    let hash = hash_password(&payload.password).map_err(ApiError::Internal)?;

    // The duplicate check above races against concurrent signups; the unique
    // index on users.email is the backstop, surfaced here as a conflict.
    let user = User::create(
        &state.db,
        &payload.name,
        &payload.email,
        &payload.mobile_num,
        &hash,
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    validate_login(&payload.email, &payload.password)?;

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login with unknown email");
            ApiError::NotFound("User not found".into())
        })?;

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "login with incorrect password");
        return Err(ApiError::IncorrectPassword);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user.email).map_err(ApiError::Internal)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse { token, id: user.id }))
}
