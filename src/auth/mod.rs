use axum::Router;

use crate::state::AppState;

mod dto;
pub mod extractor;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod validate;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
