pub mod fighter;
pub mod history;
pub mod live;
pub mod prediction;

pub use fighter::{Fighter, FighterStats, NewFighter, StatValue};
pub use history::{
    ComparisonUpdate, FighterComparison, NewComparison, NewPrediction, NewUser,
    PredictionRecord, PredictionUpdate, User, UserUpdate,
};
pub use live::{AdminAction, FightResult, RoundChange, ScoreUpdate, ServerMessage};
pub use prediction::{
    AreaComparison, ComparisonStat, ExtendedAnalysis, FightIq, GameplanAnalysis, HeadToHead,
    HistoricalAnalysis, LikelyOutcome, MatchupOptions, MatchupReport, PredictionOptions,
    PredictionResult, RatingPair, RecordProfile, RoundByRound, StrategyBreakdown,
    StyleDynamics, VictoryMethod,
};
