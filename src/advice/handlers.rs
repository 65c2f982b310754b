use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::{error, info, instrument};

use crate::{
    ai::{
        services::{nutritional_advice, Advice},
        Source,
    },
    auth::jwt::AuthUser,
    goals::repo::goals_or_default,
    state::AppState,
};

/// Days of history the advice prompt looks at.
const ADVICE_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    #[serde(flatten)]
    pub advice: Advice,
    pub source: Source,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/advice", get(get_advice))
}

#[instrument(skip(state))]
pub async fn get_advice(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<AdviceResponse>, (StatusCode, String)> {
    let now = OffsetDateTime::now_utc();
    let internal = |e: anyhow::Error| {
        error!(error = %e, %user_id, "load advice inputs failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load nutrition data".to_string())
    };

    let goals = goals_or_default(state.goals.as_ref(), user_id)
        .await
        .map_err(internal)?;
    let entries = state
        .entries
        .list_with_food(user_id, now - Duration::days(ADVICE_WINDOW_DAYS), now)
        .await
        .map_err(internal)?;

    let outcome = nutritional_advice(state.model.as_ref(), &goals, &entries).await;
    let source = outcome.source();
    info!(%user_id, entries = entries.len(), ?source, "advice generated");
    Ok(Json(AdviceResponse {
        advice: outcome.into_value(),
        source,
    }))
}
