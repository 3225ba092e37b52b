pub mod matchup;
pub mod narrative;
pub mod report;
pub mod stats;

pub use matchup::{predict_fight_outcome, Corner, Matchup, ScoreBreakdown};
pub use report::{comparison_stats, fight_strategy, matchup_report};
pub use stats::{format_fighter_profile, parse_percentage, NormalizedStats};
