use axum::extract::State;
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::api::{require_fighter, ApiError, AppState};
use crate::models::{
    FighterStats, MatchupOptions, MatchupReport, NewPrediction, PredictionOptions,
    PredictionResult,
};
use crate::scoring::{fight_strategy, matchup_report, predict_fight_outcome};

#[derive(Debug, Deserialize)]
pub struct PredictFightRequest {
    fighter1: Option<Value>,
    fighter2: Option<Value>,
    #[serde(default)]
    options: Option<PredictionOptions>,
}

/// Fighters come in loosely typed; both need at least an id and a name
fn parse_fighter(value: Option<Value>) -> Result<FighterStats, ApiError> {
    let missing = || ApiError::BadRequest("Both fighters must have an id and a name".to_string());

    let value = value.ok_or_else(missing)?;
    if value.get("id").map_or(true, Value::is_null) || value.get("name").map_or(true, Value::is_null) {
        return Err(missing());
    }

    serde_json::from_value(value).map_err(|e| ApiError::BadRequest(format!("Invalid fighter data: {}", e)))
}

pub async fn predict_fight(
    Json(request): Json<PredictFightRequest>,
) -> Result<Json<PredictionResult>, ApiError> {
    let fighter1 = parse_fighter(request.fighter1)?;
    let fighter2 = parse_fighter(request.fighter2)?;
    let options = request.options.unwrap_or_default();

    let mut rng = StdRng::from_entropy();
    let result = predict_fight_outcome(&fighter1, &fighter2, &options, &mut rng);
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictMatchupRequest {
    fighter1_id: i64,
    fighter2_id: i64,
    options: MatchupOptions,
    user_id: Option<i64>,
    title: Option<String>,
}

/// Build a matchup report and save it to the prediction history.
///
/// A failed save is logged and leaves `predictionId` null.
pub async fn predict_matchup(
    State(state): State<AppState>,
    Json(request): Json<PredictMatchupRequest>,
) -> Result<Json<MatchupReport>, ApiError> {
    let fighter1 = require_fighter(&state.store, request.fighter1_id).await?;
    let fighter2 = require_fighter(&state.store, request.fighter2_id).await?;

    let mut report = {
        let mut rng = StdRng::from_entropy();
        matchup_report(&fighter1, &fighter2, &request.options, &mut rng)
    };

    let record = NewPrediction::from_report(
        &fighter1,
        &fighter2,
        &request.options,
        &report,
        request.user_id,
        request.title,
    );
    match state.store.insert_prediction(&record).await {
        Ok(saved) => {
            info!("Saved prediction {} for {} vs {}", saved.id, fighter1.name, fighter2.name);
            report.prediction_id = Some(saved.id);
        }
        Err(e) => {
            error!("Failed to save prediction: {:#}", e);
        }
    }

    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRequest {
    fighter_id: i64,
    opponent_id: i64,
    fight_type: String,
}

#[derive(Debug, Serialize)]
pub struct StrategyResponse {
    strategy: String,
}

pub async fn generate_strategy(
    State(state): State<AppState>,
    Json(request): Json<StrategyRequest>,
) -> Result<Json<StrategyResponse>, ApiError> {
    let fighter = require_fighter(&state.store, request.fighter_id).await?;
    let opponent = require_fighter(&state.store, request.opponent_id).await?;

    Ok(Json(StrategyResponse {
        strategy: fight_strategy(&fighter, &opponent, &request.fight_type),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::build_router;
    use crate::api::tests::{get_json, send_json, test_state};

    #[tokio::test]
    async fn test_predict_fight_basic() {
        let (state, _dir) = test_state().await;
        let body = json!({
            "fighter1": {"id": 1, "name": "A", "strikingAccuracy": "55%", "strikesLandedPerMin": 5.2,
                         "takedownAccuracy": "40%", "takedownDefense": "80%",
                         "knockoutWins": 10, "submissionWins": 2, "decisionWins": 5},
            "fighter2": {"id": 2, "name": "B", "strikingAccuracy": "40%", "strikesLandedPerMin": "2.1",
                         "takedownAccuracy": "20%", "takedownDefense": "50%", "decisionWins": 3}
        });

        let (status, json) = send_json(build_router(state), "POST", "/api/predict-fight", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["winnerName"], "A");
        assert_eq!(json["winnerId"], 1);
        let confidence = json["confidence"].as_u64().unwrap();
        assert!(confidence >= 50);
        assert_eq!(json["method"] == "Decision", json["round"].is_null());
        assert!(json.get("roundByRoundPrediction").is_none());
    }

    #[tokio::test]
    async fn test_predict_fight_odd_stat_types_read_as_zero() {
        let (state, _dir) = test_state().await;
        let body = json!({
            "fighter1": {"id": 1, "name": "A", "strikesLandedPerMin": 4.0, "strikingAccuracy": true,
                         "takedownDefense": {"value": 80}, "knockoutWins": [3]},
            "fighter2": {"id": 2, "name": "B", "strikesLandedPerMin": 4.0, "strikingAccuracy": "50%"}
        });

        let (status, json) = send_json(build_router(state), "POST", "/api/predict-fight", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["winnerName"], "B");
        assert_eq!(json["method"], "Decision");
        assert!(json["round"].is_null());
    }

    #[tokio::test]
    async fn test_predict_fight_advanced() {
        let (state, _dir) = test_state().await;
        let body = json!({
            "fighter1": {"id": 1, "name": "A", "knockoutWins": 4},
            "fighter2": {"id": 2, "name": "B", "knockoutWins": 1},
            "options": {"modelVersion": "advanced", "confidenceThreshold": 99}
        });

        let (status, json) = send_json(build_router(state), "POST", "/api/predict-fight", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["meetsConfidenceThreshold"], false);
        for key in ["round1", "round2", "round3", "round4", "round5"] {
            assert!(json["roundByRoundPrediction"][key].is_string());
        }
        assert!(json["fightIQAnalysis"].is_object());
    }

    #[tokio::test]
    async fn test_predict_fight_requires_identity() {
        let (state, _dir) = test_state().await;
        let (status, json) = send_json(
            build_router(state.clone()),
            "POST",
            "/api/predict-fight",
            json!({"fighter1": {"name": "A"}, "fighter2": {"id": 2, "name": "B"}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("id and a name"));

        let (status, _) = send_json(
            build_router(state),
            "POST",
            "/api/predict-fight",
            json!({"fighter1": {"id": 1, "name": "A"}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predict_matchup_saves_history() {
        let (state, _dir) = test_state().await;
        let body = json!({
            "fighter1Id": 1,
            "fighter2Id": 2,
            "options": {"fightType": "Title Fight", "weightClass": "Lightweight", "venueType": "Arena"}
        });

        let (status, json) = send_json(build_router(state.clone()), "POST", "/api/predict-matchup", body).await;
        assert_eq!(status, StatusCode::OK);
        let p1 = json["fighter1WinProbability"].as_u64().unwrap();
        let p2 = json["fighter2WinProbability"].as_u64().unwrap();
        assert_eq!(p1 + p2, 100);
        assert_eq!(json["comparisonStats"].as_array().unwrap().len(), 4);
        let id = json["predictionId"].as_i64().unwrap();

        let (status, saved) =
            get_json(build_router(state), &format!("/api/prediction-history/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["fightType"], "Title Fight");
        assert!(saved["title"].as_str().unwrap().starts_with("CHARLES OLIVEIRA vs ISLAM MAKHACHEV - "));
    }

    #[tokio::test]
    async fn test_predict_matchup_survives_failed_save() {
        let (state, _dir) = test_state().await;
        // No such user, so the foreign key rejects the insert
        let body = json!({
            "fighter1Id": 1,
            "fighter2Id": 2,
            "userId": 404,
            "options": {"fightType": "3 Rounds", "weightClass": "Lightweight", "venueType": "Arena"}
        });

        let (status, json) = send_json(build_router(state), "POST", "/api/predict-matchup", body).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["predictionId"].is_null());
        assert!(json["likelyOutcome"]["winner"].is_string());
    }

    #[tokio::test]
    async fn test_predict_matchup_unknown_fighter() {
        let (state, _dir) = test_state().await;
        let body = json!({
            "fighter1Id": 1,
            "fighter2Id": 77,
            "options": {"fightType": "3 Rounds", "weightClass": "Lightweight", "venueType": "Arena"}
        });

        let (status, json) = send_json(build_router(state), "POST", "/api/predict-matchup", body).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Fighter 77 not found");
    }

    #[tokio::test]
    async fn test_generate_strategy() {
        let (state, _dir) = test_state().await;
        let body = json!({"fighterId": 2, "opponentId": 1, "fightType": "5 Round"});

        let (status, json) = send_json(build_router(state), "POST", "/api/generate-strategy", body).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["strategy"]
            .as_str()
            .unwrap()
            .starts_with("Fight Strategy for ISLAM MAKHACHEV against CHARLES OLIVEIRA"));
    }
}
