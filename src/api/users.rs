use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::{ApiError, AppState};
use crate::models::{NewUser, User, UserUpdate};

pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if user.username.trim().is_empty() || user.email.trim().is_empty() {
        return Err(ApiError::BadRequest("Username and email are required".to_string()));
    }
    if state.store.get_user_by_username(&user.username).await?.is_some() {
        return Err(ApiError::BadRequest("Username already taken".to_string()));
    }
    if state.store.get_user_by_email(&user.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let saved = state.store.insert_user(&user).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    state
        .store
        .get_user(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    if let Some(email) = &update.email {
        if email.trim().is_empty() {
            return Err(ApiError::BadRequest("Email cannot be empty".to_string()));
        }
        if let Some(owner) = state.store.get_user_by_email(email).await? {
            if owner.id != id {
                return Err(ApiError::BadRequest("Email already registered".to_string()));
            }
        }
    }

    state
        .store
        .update_user(id, update)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))
}
