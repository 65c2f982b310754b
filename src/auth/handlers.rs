use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest,
            UpdateProfileRequest,
        },
        jwt::{AuthUser, JwtKeys},
        repo::NewUser,
        repo_types::{User, MIN_PASSWORD_LEN},
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(update_me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn clean_optional(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(user.id).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let refresh_token = keys.sign_refresh(user.id).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();
    let full_name = payload.full_name.trim().to_string();
    let company = clean_optional(payload.company);

    if full_name.is_empty() || payload.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please fill in all required fields".into(),
        ));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err((StatusCode::BAD_REQUEST, "Password too short".into()));
    }

    match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(_)) => {
            warn!(email = %payload.email, "email already registered");
            return Err((StatusCode::CONFLICT, "Email already registered".into()));
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    }

    let hash = User::hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash password failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let user = User::create(
        &state.db,
        NewUser {
            email: &payload.email,
            password_hash: &hash,
            full_name: &full_name,
            company: company.as_deref(),
        },
    )
    .await
    .map_err(|e| {
        error!(error = %e, "create user failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Please fill in all fields".into()));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let ok = user.password_matches(&payload.password).map_err(|e| {
        error!(error = %e, "verify password failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "load user failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let full_name = payload.full_name.trim();
    if full_name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Full name is required".into()));
    }
    let company = clean_optional(payload.company);

    let user = User::update_profile(&state.db, user_id, full_name, company.as_deref())
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "update profile failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save profile".to_string())
        })?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    info!(%user_id, "profile updated");
    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user example@x.io"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn optional_fields_are_trimmed_to_none() {
        assert_eq!(clean_optional(Some("  ".into())), None);
        assert_eq!(clean_optional(Some(" Acme ".into())), Some("Acme".into()));
        assert_eq!(clean_optional(None), None);
    }

    #[test]
    fn public_user_serialization() {
        let response = PublicUser {
            id: uuid::Uuid::new_v4(),
            email: "test@example.com".to_string(),
            full_name: "Test User".to_string(),
            company: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("\"company\":null"));
    }
}
