use anyhow::{Context, Result};
use chrono::Utc;

use crate::db::{parse_timestamp, FightStore};
use crate::models::{NewPrediction, PredictionRecord, PredictionUpdate, VictoryMethod};

impl FightStore {
    /// Save a prediction and return the stored record
    pub async fn insert_prediction(&self, prediction: &NewPrediction) -> Result<PredictionRecord> {
        let key_factors = serde_json::to_string(&prediction.key_factors)?;
        let gameplan = prediction
            .gameplan_suggestions
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            INSERT INTO prediction_history (
                user_id, fighter1_id, fighter2_id, created_at,
                event_name, weight_class, venue_type, fight_type,
                predicted_winner_id, win_probability, prediction_confidence,
                predicted_method, predicted_round,
                analysis, technical_breakdown, key_factors, gameplan_suggestions,
                is_public, title, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(prediction.user_id)
        .bind(prediction.fighter1_id)
        .bind(prediction.fighter2_id)
        .bind(Utc::now().to_rfc3339())
        .bind(&prediction.event_name)
        .bind(&prediction.weight_class)
        .bind(&prediction.venue_type)
        .bind(&prediction.fight_type)
        .bind(prediction.predicted_winner_id)
        .bind(prediction.win_probability)
        .bind(prediction.prediction_confidence)
        .bind(prediction.predicted_method.map(|m| m.as_str()))
        .bind(prediction.predicted_round)
        .bind(&prediction.analysis)
        .bind(&prediction.technical_breakdown)
        .bind(key_factors)
        .bind(gameplan)
        .bind(prediction.is_public)
        .bind(&prediction.title)
        .bind(&prediction.notes)
        .execute(&self.pool)
        .await
        .context("Failed to insert prediction")?;

        let id = result.last_insert_rowid();
        self.get_prediction(id)
            .await?
            .with_context(|| format!("Prediction {} missing after insert", id))
    }

    /// All predictions, newest first
    pub async fn get_predictions(&self) -> Result<Vec<PredictionRecord>> {
        let rows = sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT * FROM prediction_history
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch predictions")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn get_prediction(&self, id: i64) -> Result<Option<PredictionRecord>> {
        let row = sqlx::query_as::<_, PredictionRow>("SELECT * FROM prediction_history WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch prediction")?;

        Ok(row.map(|r| r.into()))
    }

    /// Predictions made by one user, newest first
    pub async fn get_predictions_for_user(&self, user_id: i64) -> Result<Vec<PredictionRecord>> {
        let rows = sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT * FROM prediction_history
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch predictions for user")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Predictions for a pairing in either corner order, newest first
    pub async fn get_predictions_for_fighters(
        &self,
        fighter_a: i64,
        fighter_b: i64,
    ) -> Result<Vec<PredictionRecord>> {
        let rows = sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT * FROM prediction_history
            WHERE (fighter1_id = ? AND fighter2_id = ?)
               OR (fighter1_id = ? AND fighter2_id = ?)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(fighter_a)
        .bind(fighter_b)
        .bind(fighter_b)
        .bind(fighter_a)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch predictions for fighters")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Apply a partial update. Returns None when the prediction does not exist.
    pub async fn update_prediction(
        &self,
        id: i64,
        update: PredictionUpdate,
    ) -> Result<Option<PredictionRecord>> {
        let mut record = match self.get_prediction(id).await? {
            Some(record) => record,
            None => return Ok(None),
        };
        update.apply(&mut record);

        sqlx::query(
            r#"
            UPDATE prediction_history SET
                actual_winner_id = ?,
                actual_method = ?,
                actual_round = ?,
                was_prediction_correct = ?,
                is_public = ?,
                title = ?,
                notes = ?
            WHERE id = ?
            "#,
        )
        .bind(record.actual_winner_id)
        .bind(record.actual_method.map(|m| m.as_str()))
        .bind(record.actual_round)
        .bind(record.was_prediction_correct)
        .bind(record.is_public)
        .bind(&record.title)
        .bind(&record.notes)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update prediction")?;

        Ok(Some(record))
    }

    /// Returns whether a row was removed
    pub async fn delete_prediction(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM prediction_history WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete prediction")?;

        Ok(result.rows_affected() > 0)
    }
}

/// Database row representation
#[derive(sqlx::FromRow)]
struct PredictionRow {
    id: i64,
    user_id: Option<i64>,
    fighter1_id: i64,
    fighter2_id: i64,
    created_at: String,
    event_name: Option<String>,
    weight_class: Option<String>,
    venue_type: Option<String>,
    fight_type: Option<String>,
    predicted_winner_id: i64,
    win_probability: Option<f64>,
    prediction_confidence: Option<f64>,
    predicted_method: Option<String>,
    predicted_round: Option<i64>,
    analysis: Option<String>,
    technical_breakdown: Option<String>,
    key_factors: String,
    gameplan_suggestions: Option<String>,
    actual_winner_id: Option<i64>,
    actual_method: Option<String>,
    actual_round: Option<i64>,
    was_prediction_correct: Option<bool>,
    is_public: bool,
    title: Option<String>,
    notes: Option<String>,
}

impl From<PredictionRow> for PredictionRecord {
    fn from(row: PredictionRow) -> Self {
        PredictionRecord {
            id: row.id,
            user_id: row.user_id,
            fighter1_id: row.fighter1_id,
            fighter2_id: row.fighter2_id,
            created_at: parse_timestamp(&row.created_at),
            event_name: row.event_name,
            weight_class: row.weight_class,
            venue_type: row.venue_type,
            fight_type: row.fight_type,
            predicted_winner_id: row.predicted_winner_id,
            win_probability: row.win_probability,
            prediction_confidence: row.prediction_confidence,
            predicted_method: row.predicted_method.as_deref().and_then(VictoryMethod::parse),
            predicted_round: row.predicted_round,
            analysis: row.analysis,
            technical_breakdown: row.technical_breakdown,
            key_factors: serde_json::from_str(&row.key_factors).unwrap_or_default(),
            gameplan_suggestions: row
                .gameplan_suggestions
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok()),
            actual_winner_id: row.actual_winner_id,
            actual_method: row.actual_method.as_deref().and_then(VictoryMethod::parse),
            actual_round: row.actual_round,
            was_prediction_correct: row.was_prediction_correct,
            is_public: row.is_public,
            title: row.title,
            notes: row.notes,
        }
    }
}
