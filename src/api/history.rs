use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::{ApiError, AppState};
use crate::models::{NewPrediction, PredictionRecord, PredictionUpdate};

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Prediction {} not found", id))
}

pub async fn list_predictions(
    State(state): State<AppState>,
) -> Result<Json<Vec<PredictionRecord>>, ApiError> {
    Ok(Json(state.store.get_predictions().await?))
}

pub async fn create_prediction(
    State(state): State<AppState>,
    Json(prediction): Json<NewPrediction>,
) -> Result<(StatusCode, Json<PredictionRecord>), ApiError> {
    let saved = state.store.insert_prediction(&prediction).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn get_prediction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PredictionRecord>, ApiError> {
    state
        .store
        .get_prediction(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// Record the real result or edit notes; grading happens when the actual winner is set
pub async fn update_prediction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<PredictionUpdate>,
) -> Result<Json<PredictionRecord>, ApiError> {
    state
        .store
        .update_prediction(id, update)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub async fn delete_prediction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_prediction(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

pub async fn predictions_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<PredictionRecord>>, ApiError> {
    Ok(Json(state.store.get_predictions_for_user(user_id).await?))
}

pub async fn predictions_for_fighters(
    State(state): State<AppState>,
    Path((fighter1_id, fighter2_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<PredictionRecord>>, ApiError> {
    Ok(Json(
        state
            .store
            .get_predictions_for_fighters(fighter1_id, fighter2_id)
            .await?,
    ))
}
