pub mod comparisons;
pub mod fighters;
pub mod history;
pub mod live;
pub mod predictions;
pub mod users;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::error;

use crate::db::FightStore;
use crate::workers::{LiveFightError, LiveFightHandle};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FightStore>,
    pub live: LiveFightHandle,
}

/// Errors surfaced to HTTP clients as `{"error": ...}`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(e) => {
                error!("Request failed: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<LiveFightError> for ApiError {
    fn from(e: LiveFightError) -> Self {
        match e {
            LiveFightError::FighterNotFound(id) => {
                ApiError::NotFound(format!("Fighter {} not found", id))
            }
            LiveFightError::Store(source) => ApiError::Internal(source),
            LiveFightError::WorkerStopped => {
                ApiError::Internal(anyhow::anyhow!("live fight worker is not running"))
            }
        }
    }
}

/// Resolve a roster fighter or fail with 404
pub(crate) async fn require_fighter(store: &FightStore, id: i64) -> Result<crate::models::Fighter, ApiError> {
    store
        .get_fighter(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Fighter {} not found", id)))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/fighters",
            get(fighters::list_fighters).post(fighters::create_fighter),
        )
        .route("/api/fighters/:id", get(fighters::get_fighter))
        .route("/api/predict-fight", post(predictions::predict_fight))
        .route("/api/predict-matchup", post(predictions::predict_matchup))
        .route("/api/generate-strategy", post(predictions::generate_strategy))
        .route(
            "/api/prediction-history",
            get(history::list_predictions).post(history::create_prediction),
        )
        .route(
            "/api/prediction-history/:id",
            get(history::get_prediction)
                .put(history::update_prediction)
                .delete(history::delete_prediction),
        )
        .route(
            "/api/prediction-history/user/:user_id",
            get(history::predictions_for_user),
        )
        .route(
            "/api/prediction-history/fighters/:fighter1_id/:fighter2_id",
            get(history::predictions_for_fighters),
        )
        .route(
            "/api/fighter-comparisons",
            get(comparisons::list_comparisons).post(comparisons::create_comparison),
        )
        .route(
            "/api/fighter-comparisons/:id",
            get(comparisons::get_comparison)
                .put(comparisons::update_comparison)
                .delete(comparisons::delete_comparison),
        )
        .route(
            "/api/fighter-comparisons/user/:user_id",
            get(comparisons::comparisons_for_user),
        )
        .route("/api/users", post(users::create_user))
        .route("/api/users/:id", get(users::get_user).put(users::update_user))
        .route("/api/live-fight", get(live::live_fight))
        .route("/ws", get(live::ws_handler))
        .with_state(state)
}
