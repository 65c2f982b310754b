use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod jwt;
mod repo;
mod repo_types;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
