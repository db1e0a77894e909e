mod dto;
pub mod guard;
pub mod handlers;
mod payload;
pub mod reaction;
pub mod repo;
mod services;
pub mod validation;

use crate::state::AppState;
use axum::Router;

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().merge(handlers::sauce_routes(max_upload_bytes))
}
