use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{auth::extractor::AuthUser, error::ApiError, state::AppState, users::repo::User};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/:id", get(get_user))
        .route("/allusers", get(list_users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_email): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(_email): AuthUser,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = User::list_all(&state.db).await?;
    Ok(Json(users))
}
