pub mod odds;
pub mod state;
pub mod tick;

pub use odds::{BettingOdds, OddsLine};
pub use state::{
    format_clock, FighterImages, FighterTally, LiveFightState, Scorecard, SignificantMoment,
    TallyPair, ROUNDS, ROUND_SECONDS,
};
