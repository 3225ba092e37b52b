use std::fmt;

use serde::{Deserialize, Serialize};

/// Options for the fight prediction endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOptions {
    /// "advanced" enables every extended block
    pub model_version: Option<String>,
    #[serde(default)]
    pub include_round_by_round_analysis: bool,
    #[serde(default)]
    pub detailed_style_matchup: bool,
    pub confidence_threshold: Option<u32>,
    #[serde(default)]
    pub include_head_to_head_comparison: bool,
    #[serde(default)]
    pub include_historical_analysis: bool,
    #[serde(default)]
    pub include_strategy_breakdown: bool,
    #[serde(default, rename = "includeFightIQAnalysis")]
    pub include_fight_iq_analysis: bool,
}

impl PredictionOptions {
    pub fn advanced() -> Self {
        Self {
            model_version: Some("advanced".to_string()),
            ..Default::default()
        }
    }

    pub fn is_advanced(&self) -> bool {
        self.model_version.as_deref() == Some("advanced")
    }

    pub fn wants_round_by_round(&self) -> bool {
        self.is_advanced() || self.include_round_by_round_analysis
    }

    pub fn wants_style_dynamics(&self) -> bool {
        self.is_advanced() || self.detailed_style_matchup
    }

    pub fn wants_head_to_head(&self) -> bool {
        self.is_advanced() || self.include_head_to_head_comparison
    }

    pub fn wants_historical(&self) -> bool {
        self.is_advanced() || self.include_historical_analysis
    }

    pub fn wants_strategy(&self) -> bool {
        self.is_advanced() || self.include_strategy_breakdown
    }

    pub fn wants_fight_iq(&self) -> bool {
        self.is_advanced() || self.include_fight_iq_analysis
    }

    /// True when any extended block is requested
    pub fn wants_extended(&self) -> bool {
        self.wants_round_by_round()
            || self.wants_style_dynamics()
            || self.wants_head_to_head()
            || self.wants_historical()
            || self.wants_strategy()
            || self.wants_fight_iq()
    }

    pub fn level(&self) -> &'static str {
        if self.is_advanced() {
            "advanced"
        } else {
            "basic"
        }
    }
}

/// How the predicted winner gets the win
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VictoryMethod {
    #[serde(rename = "KO/TKO")]
    KoTko,
    Submission,
    Decision,
}

impl VictoryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            VictoryMethod::KoTko => "KO/TKO",
            VictoryMethod::Submission => "Submission",
            VictoryMethod::Decision => "Decision",
        }
    }

    pub fn is_finish(&self) -> bool {
        !matches!(self, VictoryMethod::Decision)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "KO/TKO" => Some(VictoryMethod::KoTko),
            "Submission" => Some(VictoryMethod::Submission),
            "Decision" => Some(VictoryMethod::Decision),
            _ => None,
        }
    }
}

impl fmt::Display for VictoryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the matchup scorer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub winner_name: String,
    pub winner_id: i64,
    pub confidence: u32,
    pub method: VictoryMethod,

    /// Finishing round, absent for decisions
    pub round: Option<u8>,

    pub analysis: String,
    pub matchup_insights: Vec<String>,
    pub key_factors: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meets_confidence_threshold: Option<bool>,

    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub extended: Option<ExtendedAnalysis>,
}

/// Narrative blocks produced on the extended prediction path
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_by_round_prediction: Option<RoundByRound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_dynamics: Option<StyleDynamics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_to_head_comparison: Option<HeadToHead>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_analysis: Option<HistoricalAnalysis>,
    #[serde(rename = "fightIQAnalysis", skip_serializing_if = "Option::is_none")]
    pub fight_iq_analysis: Option<FightIq>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_breakdown: Option<StrategyBreakdown>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundByRound {
    pub round1: String,
    pub round2: String,
    pub round3: String,
    pub round4: String,
    pub round5: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StyleDynamics {
    pub pace_control: String,
    pub range_control: String,
    pub ground_control: String,
    pub clinch_advantage: String,
    pub counter_vs_pressure: String,
    pub style_dynamics: String,
}

/// Pair of ratings, one per fighter in request order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingPair {
    pub fighter1: f64,
    pub fighter2: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaComparison {
    /// Fighter name holding the edge, or "Even"
    pub advantage: String,
    pub rating: RatingPair,
    pub analysis: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeadToHead {
    pub striking: AreaComparison,
    pub grappling: AreaComparison,
    pub conditioning: AreaComparison,
    pub experience: AreaComparison,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordProfile {
    pub name: String,
    pub total_wins: u32,

    /// Share of wins that ended inside the distance
    pub finish_rate: f64,
    pub primary_method: VictoryMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalAnalysis {
    pub fighter1: RecordProfile,
    pub fighter2: RecordProfile,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FightIq {
    pub strategic: RatingPair,
    pub tactical: RatingPair,
    pub adaptability: RatingPair,
    pub analysis: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrategyBreakdown {
    pub fighter1_path: Vec<String>,
    pub fighter2_path: Vec<String>,
    pub key_tactics: Vec<String>,
}

/// Bout context for the matchup report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupOptions {
    pub fight_type: String,
    pub weight_class: String,
    pub venue_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LikelyOutcome {
    pub winner: String,
    pub method: VictoryMethod,
    pub round: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameplanAnalysis {
    pub fighter1_strategy: String,
    pub fighter2_strategy: String,
}

/// One row of the side-by-side comparison table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonStat {
    pub label: String,
    pub key: String,
    pub value1: String,
    pub value2: String,
    pub percent1: u32,
    pub percent2: u32,
}

/// Full matchup report returned by the matchup endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchupReport {
    pub fighter1_win_probability: u32,
    pub fighter2_win_probability: u32,
    pub analysis: String,
    pub likely_outcome: LikelyOutcome,
    pub technical_breakdown: String,
    pub gameplan_analysis: GameplanAnalysis,
    pub key_stats: Vec<String>,
    pub prediction_confidence: u32,
    pub comparison_stats: Vec<ComparisonStat>,
    pub prediction_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_flags() {
        let basic = PredictionOptions::default();
        assert!(!basic.wants_extended());
        assert_eq!(basic.level(), "basic");

        let advanced = PredictionOptions::advanced();
        assert!(advanced.wants_round_by_round());
        assert!(advanced.wants_fight_iq());

        let json = r#"{"includeFightIQAnalysis": true}"#;
        let single: PredictionOptions = serde_json::from_str(json).unwrap();
        assert!(single.wants_fight_iq());
        assert!(single.wants_extended());
        assert!(!single.wants_strategy());
    }

    #[test]
    fn test_victory_method_serializes_display_name() {
        assert_eq!(
            serde_json::to_string(&VictoryMethod::KoTko).unwrap(),
            "\"KO/TKO\""
        );
        assert_eq!(VictoryMethod::parse("Submission"), Some(VictoryMethod::Submission));
        assert_eq!(VictoryMethod::parse("Split"), None);
    }
}
