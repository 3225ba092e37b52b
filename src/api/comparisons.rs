use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::api::{require_fighter, ApiError, AppState};
use crate::models::{
    ComparisonUpdate, FighterComparison, FighterStats, NewComparison, PredictionOptions,
};
use crate::scoring::predict_fight_outcome;

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Comparison {} not found", id))
}

pub async fn list_comparisons(
    State(state): State<AppState>,
) -> Result<Json<Vec<FighterComparison>>, ApiError> {
    Ok(Json(state.store.get_comparisons().await?))
}

/// Save a comparison. Without a supplied summary the scorer's pick is stored.
pub async fn create_comparison(
    State(state): State<AppState>,
    Json(mut comparison): Json<NewComparison>,
) -> Result<(StatusCode, Json<FighterComparison>), ApiError> {
    let fighter1 = require_fighter(&state.store, comparison.fighter1_id).await?;
    let fighter2 = require_fighter(&state.store, comparison.fighter2_id).await?;

    if comparison.title.trim().is_empty() {
        comparison.title = format!("{} vs {}", fighter1.name, fighter2.name);
    }

    if comparison.prediction_summary.is_none() {
        let mut rng = StdRng::from_entropy();
        let result = predict_fight_outcome(
            &FighterStats::from(&fighter1),
            &FighterStats::from(&fighter2),
            &PredictionOptions::default(),
            &mut rng,
        );
        comparison.prediction_summary = Some(match result.round {
            Some(round) => format!("{} by {} in round {}", result.winner_name, result.method, round),
            None => format!("{} by {}", result.winner_name, result.method),
        });
        comparison.prediction_score = Some(result.confidence as i64);
    }

    let saved = state.store.insert_comparison(&comparison).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn get_comparison(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FighterComparison>, ApiError> {
    state
        .store
        .get_comparison(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub async fn update_comparison(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<ComparisonUpdate>,
) -> Result<Json<FighterComparison>, ApiError> {
    state
        .store
        .update_comparison(id, update)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub async fn delete_comparison(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_comparison(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

pub async fn comparisons_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<FighterComparison>>, ApiError> {
    Ok(Json(state.store.get_comparisons_for_user(user_id).await?))
}
