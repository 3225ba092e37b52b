use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Fighter, GameplanAnalysis, MatchupOptions, MatchupReport, VictoryMethod};

/// A stored prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: i64,
    pub user_id: Option<i64>,
    pub fighter1_id: i64,
    pub fighter2_id: i64,
    pub created_at: DateTime<Utc>,
    pub event_name: Option<String>,
    pub weight_class: Option<String>,
    pub venue_type: Option<String>,
    pub fight_type: Option<String>,

    pub predicted_winner_id: i64,

    /// Winner's probability as a fraction (0.0 - 1.0)
    pub win_probability: Option<f64>,

    /// Confidence as a fraction (0.0 - 1.0)
    pub prediction_confidence: Option<f64>,
    pub predicted_method: Option<VictoryMethod>,
    pub predicted_round: Option<i64>,

    pub analysis: Option<String>,
    pub technical_breakdown: Option<String>,
    pub key_factors: Vec<String>,
    pub gameplan_suggestions: Option<GameplanAnalysis>,

    /// Filled in once the real fight has happened
    pub actual_winner_id: Option<i64>,
    pub actual_method: Option<VictoryMethod>,
    pub actual_round: Option<i64>,
    pub was_prediction_correct: Option<bool>,

    pub is_public: bool,
    pub title: Option<String>,
    pub notes: Option<String>,
}

/// Prediction to be inserted
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewPrediction {
    pub user_id: Option<i64>,
    pub fighter1_id: i64,
    pub fighter2_id: i64,
    pub event_name: Option<String>,
    pub weight_class: Option<String>,
    pub venue_type: Option<String>,
    pub fight_type: Option<String>,
    pub predicted_winner_id: i64,
    pub win_probability: Option<f64>,
    pub prediction_confidence: Option<f64>,
    pub predicted_method: Option<VictoryMethod>,
    pub predicted_round: Option<i64>,
    pub analysis: Option<String>,
    pub technical_breakdown: Option<String>,
    #[serde(default)]
    pub key_factors: Vec<String>,
    pub gameplan_suggestions: Option<GameplanAnalysis>,
    #[serde(default)]
    pub is_public: bool,
    pub title: Option<String>,
    pub notes: Option<String>,
}

impl NewPrediction {
    /// Summarize a matchup report for storage
    pub fn from_report(
        fighter1: &Fighter,
        fighter2: &Fighter,
        options: &MatchupOptions,
        report: &MatchupReport,
        user_id: Option<i64>,
        title: Option<String>,
    ) -> Self {
        let (winner_id, win_probability) = if report.likely_outcome.winner == fighter1.name {
            (fighter1.id, report.fighter1_win_probability)
        } else {
            (fighter2.id, report.fighter2_win_probability)
        };

        let title = title.unwrap_or_else(|| {
            format!(
                "{} vs {} - {}",
                fighter1.name,
                fighter2.name,
                Utc::now().format("%Y-%m-%d")
            )
        });

        NewPrediction {
            user_id,
            fighter1_id: fighter1.id,
            fighter2_id: fighter2.id,
            event_name: None,
            weight_class: Some(options.weight_class.clone()),
            venue_type: Some(options.venue_type.clone()),
            fight_type: Some(options.fight_type.clone()),
            predicted_winner_id: winner_id,
            win_probability: Some(win_probability as f64 / 100.0),
            prediction_confidence: Some(report.prediction_confidence as f64 / 100.0),
            predicted_method: Some(report.likely_outcome.method),
            predicted_round: report.likely_outcome.round.map(i64::from),
            analysis: Some(report.analysis.clone()),
            technical_breakdown: Some(report.technical_breakdown.clone()),
            key_factors: report.key_stats.clone(),
            gameplan_suggestions: Some(report.gameplan_analysis.clone()),
            is_public: true,
            title: Some(title),
            notes: None,
        }
    }
}

/// Partial update of a stored prediction
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PredictionUpdate {
    pub actual_winner_id: Option<i64>,
    pub actual_method: Option<VictoryMethod>,
    pub actual_round: Option<i64>,
    pub is_public: Option<bool>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

impl PredictionUpdate {
    /// Merge the update into an existing record, grading the prediction when the result is known
    pub fn apply(self, record: &mut PredictionRecord) {
        if let Some(winner) = self.actual_winner_id {
            record.actual_winner_id = Some(winner);
            record.was_prediction_correct = Some(winner == record.predicted_winner_id);
        }
        if self.actual_method.is_some() {
            record.actual_method = self.actual_method;
        }
        if self.actual_round.is_some() {
            record.actual_round = self.actual_round;
        }
        if let Some(is_public) = self.is_public {
            record.is_public = is_public;
        }
        if self.title.is_some() {
            record.title = self.title;
        }
        if self.notes.is_some() {
            record.notes = self.notes;
        }
    }
}

/// A saved side-by-side comparison
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FighterComparison {
    pub id: i64,
    pub fighter1_id: i64,
    pub fighter2_id: i64,
    pub user_id: Option<i64>,
    pub title: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub prediction_summary: Option<String>,
    pub prediction_score: Option<i64>,
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewComparison {
    pub fighter1_id: i64,
    pub fighter2_id: i64,
    pub user_id: Option<i64>,

    /// Defaults to "A vs B" when blank
    #[serde(default)]
    pub title: String,
    pub notes: Option<String>,
    pub prediction_summary: Option<String>,
    pub prediction_score: Option<i64>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonUpdate {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub prediction_summary: Option<String>,
    pub prediction_score: Option<i64>,
    pub is_public: Option<bool>,
}

impl ComparisonUpdate {
    pub fn apply(self, comparison: &mut FighterComparison) {
        if let Some(title) = self.title {
            comparison.title = title;
        }
        if self.notes.is_some() {
            comparison.notes = self.notes;
        }
        if self.prediction_summary.is_some() {
            comparison.prediction_summary = self.prediction_summary;
        }
        if self.prediction_score.is_some() {
            comparison.prediction_score = self.prediction_score;
        }
        if let Some(is_public) = self.is_public {
            comparison.is_public = is_public;
        }
    }
}

/// Account record (no credentials are kept here)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub email: Option<String>,
    pub display_name: Option<String>,
}
