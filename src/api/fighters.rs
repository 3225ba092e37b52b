use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::api::{require_fighter, ApiError, AppState};
use crate::models::{Fighter, NewFighter};

pub async fn list_fighters(State(state): State<AppState>) -> Result<Json<Vec<Fighter>>, ApiError> {
    Ok(Json(state.store.get_fighters().await?))
}

pub async fn get_fighter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Fighter>, ApiError> {
    Ok(Json(require_fighter(&state.store, id).await?))
}

pub async fn create_fighter(
    State(state): State<AppState>,
    Json(fighter): Json<NewFighter>,
) -> Result<(StatusCode, Json<Fighter>), ApiError> {
    if fighter.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Fighter name is required".to_string()));
    }

    let stored = state.store.insert_fighter(&fighter).await?;
    info!("Added {} to the roster (id {})", stored.name, stored.id);
    Ok((StatusCode::CREATED, Json(stored)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::build_router;
    use crate::api::tests::{get_json, send_json, test_state};

    #[tokio::test]
    async fn test_list_and_get() {
        let (state, _dir) = test_state().await;

        let (status, json) = get_json(build_router(state.clone()), "/api/fighters").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["name"], "CHARLES OLIVEIRA");
        assert_eq!(json[0]["winsByKO"], 9);

        let (status, json) = get_json(build_router(state.clone()), "/api/fighters/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "ISLAM MAKHACHEV");

        let (status, json) = get_json(build_router(state), "/api/fighters/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Fighter 99 not found");
    }

    #[tokio::test]
    async fn test_create_fighter() {
        let (state, _dir) = test_state().await;

        let (status, json) = send_json(
            build_router(state.clone()),
            "POST",
            "/api/fighters",
            json!({"name": "ARMAN TSARUKYAN", "division": "LIGHTWEIGHT", "wins": 22, "losses": 3}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["id"], 3);
        assert_eq!(json["record"], "22-3-0");

        let (status, _) = send_json(
            build_router(state),
            "POST",
            "/api/fighters",
            json!({"name": "  ", "division": "LIGHTWEIGHT"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
