use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::dto::{CustomFoodRequest, RecognizeResponse, SearchRequest, SearchResponse};
use super::repo_types::{FoodCandidate, FoodItem};
use crate::{
    ai::services::{recognize_food, search_food},
    auth::jwt::AuthUser,
    state::AppState,
    storage::upload_photo,
};

pub(crate) const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/foods/:id", get(get_food))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/foods/search", post(search))
        .route("/foods/custom", post(create_custom))
        .route(
            "/foods/recognize",
            post(recognize).layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES)),
        )
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FoodItem>, (StatusCode, String)> {
    match state.catalog.get(id).await {
        Ok(Some(item)) => Ok(Json(item)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Food not found".into())),
        Err(e) => {
            error!(error = %e, %id, "get_food failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Failed to load food".into()))
        }
    }
}

#[instrument(skip(state, body))]
pub async fn search(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let query = body.query.trim();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Please enter a search term".into()));
    }

    let outcome = search_food(state.model.as_ref(), query).await;
    let source = outcome.source();
    let results = outcome.into_value();
    info!(%user_id, count = results.len(), ?source, "food search");
    Ok(Json(SearchResponse { results, source }))
}

fn multipart_rejection(e: MultipartError) -> (StatusCode, String) {
    warn!(error = %e.body_text(), status = %e.status(), "multipart read failed");
    (e.status(), e.body_text())
}

/// POST /foods/recognize (multipart, field `image`)
#[instrument(skip(state, mp))]
pub async fn recognize(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> Result<Json<RecognizeResponse>, (StatusCode, String)> {
    let mut image = None;
    while let Some(field) = mp.next_field().await.map_err(multipart_rejection)? {
        if matches!(field.name(), Some("image") | Some("file")) {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "image/jpeg".into());
            let data = field.bytes().await.map_err(multipart_rejection)?;
            image = Some((data, content_type));
            break;
        }
    }
    let Some((data, content_type)) = image.filter(|(d, _)| !d.is_empty()) else {
        return Err((StatusCode::BAD_REQUEST, "image is required".into()));
    };

    let photo_key =
        match upload_photo(state.storage.as_ref(), user_id, data.clone(), &content_type).await {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, %user_id, "photo upload failed; continuing without photo");
                None
            }
        };

    let outcome = recognize_food(state.model.as_ref(), data, &content_type).await;
    let source = outcome.source();
    let recognition = outcome.into_value();
    info!(%user_id, count = recognition.suggestions.len(), ?source, "food recognized");

    Ok(Json(RecognizeResponse {
        confidence: recognition.confidence,
        suggestions: recognition.suggestions,
        photo_key,
        source,
    }))
}

#[instrument(skip(body))]
pub async fn create_custom(
    AuthUser(user_id): AuthUser,
    Json(body): Json<CustomFoodRequest>,
) -> Result<(StatusCode, Json<FoodCandidate>), (StatusCode, String)> {
    let food = body
        .into_candidate()
        .map_err(|msg| (StatusCode::BAD_REQUEST, msg.to_string()))?;
    info!(%user_id, candidate = %food.id, "custom food drafted");
    Ok((StatusCode::CREATED, Json(food)))
}
