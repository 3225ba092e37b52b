use serde::{Deserialize, Deserializer, Serialize};

use crate::scoring::stats::{parse_count, parse_percentage, parse_rate};

/// A fighter record as stored in the roster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Fighter {
    pub id: i64,

    /// Full name (e.g., "DUSTIN POIRIER")
    pub name: String,

    pub nickname: Option<String>,

    /// Weight division (e.g., "LIGHTWEIGHT")
    pub division: String,

    /// Professional record as displayed, "W-L-D"
    pub record: String,

    pub wins: i64,
    pub losses: i64,
    pub draws: i64,

    pub age: Option<i64>,
    pub height: Option<String>,
    pub reach: Option<String>,
    pub stance: Option<String>,
    pub team: Option<String>,
    pub image: Option<String>,

    /// Fighting style (e.g., "Striker", "Wrestler")
    pub style: Option<String>,

    pub ranking: Option<i64>,

    /// Significant strikes landed per minute
    pub strikes_landed_per_min: Option<f64>,

    /// Striking accuracy in percentage points (0 - 100)
    pub striking_accuracy: Option<f64>,

    /// Takedown accuracy in percentage points (0 - 100)
    pub takedown_accuracy: Option<f64>,

    /// Takedown defense in percentage points (0 - 100)
    pub takedown_defense: Option<f64>,

    #[serde(rename = "winsByKO")]
    pub wins_by_ko: i64,
    pub wins_by_sub: i64,
    pub wins_by_dec: i64,
}

/// Fighter payload accepted when creating a roster entry
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewFighter {
    pub name: String,
    pub nickname: Option<String>,
    pub division: String,
    #[serde(default)]
    pub record: String,
    #[serde(default)]
    pub wins: i64,
    #[serde(default)]
    pub losses: i64,
    #[serde(default)]
    pub draws: i64,
    pub age: Option<i64>,
    pub height: Option<String>,
    pub reach: Option<String>,
    pub stance: Option<String>,
    pub team: Option<String>,
    pub image: Option<String>,
    pub style: Option<String>,
    pub ranking: Option<i64>,
    pub strikes_landed_per_min: Option<f64>,
    pub striking_accuracy: Option<f64>,
    pub takedown_accuracy: Option<f64>,
    pub takedown_defense: Option<f64>,
    #[serde(default, rename = "winsByKO")]
    pub wins_by_ko: i64,
    #[serde(default)]
    pub wins_by_sub: i64,
    #[serde(default)]
    pub wins_by_dec: i64,
}

/// A raw stat as it arrives from clients: a number, a string such as "54%",
/// or any other JSON value, which reads as 0
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
    Other,
}

impl<'de> Deserialize<'de> for StatValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(StatValue::from)
    }
}

impl From<serde_json::Value> for StatValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map_or(StatValue::Other, StatValue::Number),
            serde_json::Value::String(s) => StatValue::Text(s),
            _ => StatValue::Other,
        }
    }
}

impl StatValue {
    /// Percentage as a fraction in [0, 1]; anything unparsable is 0
    pub fn as_fraction(&self) -> f64 {
        match self {
            StatValue::Number(n) => parse_percentage(&n.to_string()),
            StatValue::Text(s) => parse_percentage(s),
            StatValue::Other => 0.0,
        }
    }

    /// Plain non-negative rate (strikes per minute)
    pub fn as_rate(&self) -> f64 {
        match self {
            StatValue::Number(n) => parse_rate(&n.to_string()),
            StatValue::Text(s) => parse_rate(s),
            StatValue::Other => 0.0,
        }
    }

    /// Non-negative whole count (wins by method)
    pub fn as_count(&self) -> u32 {
        match self {
            StatValue::Number(n) => parse_count(&n.to_string()),
            StatValue::Text(s) => parse_count(s),
            StatValue::Other => 0,
        }
    }

    fn display(&self) -> String {
        match self {
            StatValue::Number(n) => n.to_string(),
            StatValue::Text(s) => s.clone(),
            StatValue::Other => "0".to_string(),
        }
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        StatValue::Number(value)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        StatValue::Text(value.to_string())
    }
}

/// Fighter statistics used as input to the matchup scorer
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FighterStats {
    pub id: i64,
    pub name: String,
    pub record: Option<String>,
    pub division: Option<String>,
    pub strikes_landed_per_min: Option<StatValue>,
    pub striking_accuracy: Option<StatValue>,
    pub takedown_accuracy: Option<StatValue>,
    pub takedown_defense: Option<StatValue>,
    pub knockout_wins: Option<StatValue>,
    pub submission_wins: Option<StatValue>,
    pub decision_wins: Option<StatValue>,
}

impl FighterStats {
    /// Labelled stat lines for every field that is present
    pub fn present_fields(&self) -> Vec<(&'static str, String)> {
        let text_fields = [("RECORD", &self.record), ("DIVISION", &self.division)];
        let stat_fields = [
            ("STRIKING ACCURACY", &self.striking_accuracy),
            ("STRIKES LANDED PER MIN", &self.strikes_landed_per_min),
            ("TAKEDOWN ACCURACY", &self.takedown_accuracy),
            ("TAKEDOWN DEFENSE", &self.takedown_defense),
            ("KNOCKOUT WINS", &self.knockout_wins),
            ("SUBMISSION WINS", &self.submission_wins),
            ("DECISION WINS", &self.decision_wins),
        ];

        let mut lines = Vec::new();
        for (label, value) in text_fields {
            if let Some(v) = value.as_ref().filter(|v| !v.is_empty()) {
                lines.push((label, v.clone()));
            }
        }
        for (label, value) in stat_fields {
            if let Some(v) = value {
                lines.push((label, v.display()));
            }
        }
        lines
    }
}

impl From<&Fighter> for FighterStats {
    fn from(fighter: &Fighter) -> Self {
        let pct = |v: Option<f64>| v.map(|p| StatValue::Text(format!("{}%", p)));

        FighterStats {
            id: fighter.id,
            name: fighter.name.clone(),
            record: Some(fighter.record.clone()),
            division: Some(fighter.division.clone()),
            strikes_landed_per_min: fighter.strikes_landed_per_min.map(StatValue::Number),
            striking_accuracy: pct(fighter.striking_accuracy),
            takedown_accuracy: pct(fighter.takedown_accuracy),
            takedown_defense: pct(fighter.takedown_defense),
            knockout_wins: Some(StatValue::Number(fighter.wins_by_ko as f64)),
            submission_wins: Some(StatValue::Number(fighter.wins_by_sub as f64)),
            decision_wins: Some(StatValue::Number(fighter.wins_by_dec as f64)),
        }
    }
}
