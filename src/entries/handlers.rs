use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, instrument, warn};
use uuid::Uuid;

use super::dto::{DayView, EntryView, HistoryQuery, HistoryResponse, LogEntryRequest, TodayResponse};
use super::repo_types::{EntryWithFood, FoodEntry};
use super::services::{day_bounds, log_food, summarize_history, today_progress, LogEntryError, LogFood};
use crate::{
    auth::jwt::AuthUser,
    foods::reconcile::ReconcileError,
    goals::{repo::goals_or_default, repo_types::DailyGoals},
    state::AppState,
    storage::{StorageClient, PHOTO_URL_TTL_SECS},
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(history))
        .route("/entries/today", get(today))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/entries", post(create_entry))
}

fn status_for(e: &LogEntryError) -> (StatusCode, String) {
    match e {
        LogEntryError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
        LogEntryError::Reconcile(ReconcileError::Lookup(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to search for food in database".into(),
        ),
        LogEntryError::Reconcile(ReconcileError::Insert(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save food item to database".into(),
        ),
        LogEntryError::Reconcile(ReconcileError::InvalidId(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to get valid food item ID. Please try selecting the food again.".into(),
        ),
        LogEntryError::Insert(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to log food entry".into(),
        ),
    }
}

/// POST /entries
#[instrument(skip(state, body))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<LogEntryRequest>,
) -> Result<(StatusCode, Json<FoodEntry>), (StatusCode, String)> {
    let input = LogFood {
        food: body.food,
        quantity: body.quantity,
        meal_type: body.meal_type,
        photo_url: body.photo_key.filter(|k| !k.trim().is_empty()),
        notes: body.notes,
    };

    let entry = log_food(
        state.catalog.as_ref(),
        state.entries.as_ref(),
        user_id,
        input,
        OffsetDateTime::now_utc(),
    )
    .await
    .map_err(|e| {
        warn!(error = %e, %user_id, "log food failed");
        status_for(&e)
    })?;

    Ok((StatusCode::CREATED, Json(entry)))
}

async fn view(storage: &dyn StorageClient, entry: EntryWithFood) -> EntryView {
    let photo_url = match entry.photo_url.as_deref() {
        Some(key) => match storage.presign_get(key, PHOTO_URL_TTL_SECS).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, key, "presign failed");
                None
            }
        },
        None => None,
    };
    EntryView::new(entry, photo_url)
}

/// GET /entries?period=week|month
#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, (StatusCode, String)> {
    let now = OffsetDateTime::now_utc();
    let rows = state
        .entries
        .list_with_food(user_id, q.period.start(now), now)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "load history failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load history".to_string())
        })?;

    let total_entries = rows.len();
    let summary = summarize_history(rows);
    let mut days = Vec::with_capacity(summary.days.len());
    for day in summary.days {
        let mut entries = Vec::with_capacity(day.entries.len());
        for e in day.entries {
            entries.push(view(state.storage.as_ref(), e).await);
        }
        days.push(DayView {
            date: day.date.to_string(),
            calories: day.calories.round() as i64,
            entries,
        });
    }

    Ok(Json(HistoryResponse {
        days,
        total_entries,
        total_calories: summary.total_calories.round() as i64,
        average_calories: summary.average_calories.round() as i64,
    }))
}

/// GET /entries/today
#[instrument(skip(state))]
pub async fn today(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<TodayResponse>, (StatusCode, String)> {
    let (start, end) = day_bounds(OffsetDateTime::now_utc());
    let (rows, goals) = load_today(&state, user_id, start, end).await.map_err(|e| {
        error!(error = %e, %user_id, "load today failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load today's entries".to_string())
    })?;

    let progress = today_progress(&rows, &goals);
    let mut entries = Vec::with_capacity(rows.len());
    for e in rows {
        entries.push(view(state.storage.as_ref(), e).await);
    }
    Ok(Json(TodayResponse { entries, progress }))
}

async fn load_today(
    state: &AppState,
    user_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> anyhow::Result<(Vec<EntryWithFood>, DailyGoals)> {
    let rows = state.entries.list_with_food(user_id, start, end).await?;
    let goals = goals_or_default(state.goals.as_ref(), user_id).await?;
    Ok((rows, goals))
}
