use serde::{Deserialize, Serialize};

use crate::simulator::{BettingOdds, LiveFightState, Scorecard};

/// Messages pushed to every live subscriber
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Full state snapshot
    FightUpdate(Box<LiveFightState>),
    RoundChange(RoundChange),
    ScoreUpdate(ScoreUpdate),
    OddsUpdate(BettingOdds),
    FightEnd(FightResult),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoundChange {
    pub round: u8,
    pub time_remaining: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    pub fighter1_score: Scorecard,
    pub fighter2_score: Scorecard,
}

/// Final outcome of a simulated fight
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FightResult {
    /// Winner's name, or "Draw"
    pub winner: String,
    pub method: String,

    /// Clock when the fight stopped
    pub time: String,
    pub round: u8,
}

/// Admin commands accepted over the live connection
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
pub enum AdminAction {
    #[serde(rename_all = "camelCase")]
    StartFight { fighter1_id: i64, fighter2_id: i64 },

    #[serde(rename_all = "camelCase")]
    UpdateScore {
        round: u8,
        fighter1_score: u32,
        fighter2_score: u32,
    },

    UpdateOdds(BettingOdds),

    EndFight {
        #[serde(default)]
        method: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
}

/// Parse an inbound text frame.
///
/// Returns `Ok(None)` for well-formed messages that are not admin actions.
pub fn parse_client_message(text: &str) -> Result<Option<AdminAction>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let envelope: Envelope = serde_json::from_value(value.clone())?;

    if envelope.kind != "adminAction" {
        return Ok(None);
    }

    serde_json::from_value(value).map(Some)
}
