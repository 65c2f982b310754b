use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{error, info, instrument};

use super::dto::GoalsResponse;
use super::repo::goals_or_default;
use super::repo_types::DailyGoals;
use crate::{auth::jwt::AuthUser, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/goals", get(get_goals).put(put_goals))
}

#[instrument(skip(state))]
pub async fn get_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<GoalsResponse>, (StatusCode, String)> {
    let goals = goals_or_default(state.goals.as_ref(), user_id)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "load goals failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load goals".to_string())
        })?;
    Ok(Json(goals.into()))
}

#[instrument(skip(state))]
pub async fn put_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<DailyGoals>,
) -> Result<Json<GoalsResponse>, (StatusCode, String)> {
    if !body.is_valid() {
        return Err((StatusCode::BAD_REQUEST, "Goals must be non-negative".into()));
    }
    let saved = state.goals.upsert(user_id, &body).await.map_err(|e| {
        error!(error = %e, %user_id, "save goals failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save profile".to_string())
    })?;
    info!(%user_id, calories = saved.daily_calories, "goals saved");
    Ok(Json(saved.into()))
}
