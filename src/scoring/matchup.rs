use rand::Rng;
use tracing::{debug, info};

use crate::models::{ExtendedAnalysis, FighterStats, PredictionOptions, PredictionResult, VictoryMethod};
use crate::scoring::narrative::{self, Advantages};
use crate::scoring::stats::{format_fighter_profile, MethodShares, NormalizedStats};

/// Weight of landed strike output
pub const STRIKE_OFFENSE_WEIGHT: f64 = 0.25;
/// Weight of avoiding the opponent's strikes
pub const STRIKE_DEFENSE_WEIGHT: f64 = 0.15;
/// Weight of takedown accuracy
pub const GRAPPLE_OFFENSE_WEIGHT: f64 = 0.20;
/// Weight of takedown defense
pub const GRAPPLE_DEFENSE_WEIGHT: f64 = 0.15;
/// Weight of the win record
pub const WIN_RECORD_WEIGHT: f64 = 0.25;

/// Sum of all weights, the largest possible score gap used to normalize confidence
pub const TOTAL_WEIGHT: f64 = STRIKE_OFFENSE_WEIGHT
    + STRIKE_DEFENSE_WEIGHT
    + GRAPPLE_OFFENSE_WEIGHT
    + GRAPPLE_DEFENSE_WEIGHT
    + WIN_RECORD_WEIGHT;

/// Weighted sub-scores of one fighter against a given opponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub strike_offense: f64,
    pub strike_defense: f64,
    pub grapple_offense: f64,
    pub grapple_defense: f64,
    pub win_record: f64,
}

impl ScoreBreakdown {
    pub fn compute(fighter: &NormalizedStats, opponent: &NormalizedStats) -> Self {
        let wins = fighter.total_wins();
        let win_record = if wins > 0 {
            (wins as f64 / (wins as f64 + 1.0)) * WIN_RECORD_WEIGHT
        } else {
            0.1 * WIN_RECORD_WEIGHT
        };

        Self {
            strike_offense: fighter.strike_rate * fighter.strike_accuracy * STRIKE_OFFENSE_WEIGHT,
            strike_defense: (1.0 - opponent.strike_accuracy) * STRIKE_DEFENSE_WEIGHT,
            grapple_offense: fighter.takedown_accuracy * GRAPPLE_OFFENSE_WEIGHT,
            grapple_defense: fighter.takedown_defense * GRAPPLE_DEFENSE_WEIGHT,
            win_record,
        }
    }

    pub fn total(&self) -> f64 {
        self.strike_offense
            + self.strike_defense
            + self.grapple_offense
            + self.grapple_defense
            + self.win_record
    }

    /// Grappling part of the score, used to bias simulated takedowns
    pub fn grappling(&self) -> f64 {
        self.grapple_offense + self.grapple_defense
    }
}

/// Which side of the matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Fighter1,
    Fighter2,
}

/// Both fighters scored against each other
#[derive(Debug, Clone)]
pub struct Matchup {
    pub fighter1: NormalizedStats,
    pub fighter2: NormalizedStats,
    pub score1: ScoreBreakdown,
    pub score2: ScoreBreakdown,
}

impl Matchup {
    pub fn new(fighter1: &FighterStats, fighter2: &FighterStats) -> Self {
        let fighter1 = NormalizedStats::from_stats(fighter1);
        let fighter2 = NormalizedStats::from_stats(fighter2);
        let score1 = ScoreBreakdown::compute(&fighter1, &fighter2);
        let score2 = ScoreBreakdown::compute(&fighter2, &fighter1);

        Self {
            fighter1,
            fighter2,
            score1,
            score2,
        }
    }

    /// Higher total score wins; an exact tie goes to fighter 1
    pub fn favorite(&self) -> Corner {
        if self.score1.total() >= self.score2.total() {
            Corner::Fighter1
        } else {
            Corner::Fighter2
        }
    }

    pub fn fighter(&self, corner: Corner) -> &NormalizedStats {
        match corner {
            Corner::Fighter1 => &self.fighter1,
            Corner::Fighter2 => &self.fighter2,
        }
    }

    pub fn score(&self, corner: Corner) -> &ScoreBreakdown {
        match corner {
            Corner::Fighter1 => &self.score1,
            Corner::Fighter2 => &self.score2,
        }
    }

    /// 50 plus the normalized score gap scaled by 40; not clamped above
    pub fn confidence(&self) -> u32 {
        let diff = (self.score1.total() - self.score2.total()).abs();
        let normalized = diff / TOTAL_WEIGHT;
        (50.0 + normalized * 40.0).round() as u32
    }

    /// Fighter 1's share of the combined total score, as a whole percentage
    pub fn fighter1_share(&self) -> u32 {
        let sum = self.score1.total() + self.score2.total();
        if sum <= 0.0 {
            return 50;
        }
        (self.score1.total() / sum * 100.0).round() as u32
    }
}

/// Draw the victory method from the winner's history, plus a finishing round for finishes
pub fn draw_method<R: Rng + ?Sized>(shares: &MethodShares, rng: &mut R) -> (VictoryMethod, Option<u8>) {
    let roll: f64 = rng.gen();

    if roll < shares.ko {
        (VictoryMethod::KoTko, Some(rng.gen_range(1..=3)))
    } else if roll < shares.ko + shares.sub {
        (VictoryMethod::Submission, Some(rng.gen_range(1..=3)))
    } else {
        (VictoryMethod::Decision, None)
    }
}

/// Predict the outcome of a fight between two fighters.
///
/// Pure apart from the method and round draws, which come from `rng`.
pub fn predict_fight_outcome<R: Rng + ?Sized>(
    fighter1: &FighterStats,
    fighter2: &FighterStats,
    options: &PredictionOptions,
    rng: &mut R,
) -> PredictionResult {
    info!(
        "Generating {} prediction for {} vs {}",
        options.level(),
        fighter1.name,
        fighter2.name
    );
    debug!(
        "Fighter profiles:\n{}\n{}",
        format_fighter_profile(fighter1),
        format_fighter_profile(fighter2)
    );

    let matchup = Matchup::new(fighter1, fighter2);
    let winner_corner = matchup.favorite();
    let winner = matchup.fighter(winner_corner);

    let confidence = matchup.confidence();
    let (method, round) = draw_method(&winner.method_shares(), rng);

    let advantages = Advantages::from_matchup(&matchup);
    let outcome = narrative::Outcome {
        winner: winner_corner,
        method,
        round,
    };

    let extended = options
        .wants_extended()
        .then(|| build_extended(&matchup, &advantages, &outcome, options));

    PredictionResult {
        winner_name: winner.name.clone(),
        winner_id: winner.id,
        confidence,
        method,
        round,
        analysis: narrative::analysis(&matchup, &advantages, &outcome),
        matchup_insights: narrative::matchup_insights(&matchup, &advantages, &outcome),
        key_factors: narrative::key_factors(&matchup, &advantages, &outcome),
        meets_confidence_threshold: options.confidence_threshold.map(|t| confidence >= t),
        extended,
    }
}

fn build_extended(
    matchup: &Matchup,
    advantages: &Advantages,
    outcome: &narrative::Outcome,
    options: &PredictionOptions,
) -> ExtendedAnalysis {
    ExtendedAnalysis {
        round_by_round_prediction: options
            .wants_round_by_round()
            .then(|| narrative::round_by_round(matchup, advantages, outcome)),
        style_dynamics: options
            .wants_style_dynamics()
            .then(|| narrative::style_dynamics(matchup, advantages, outcome)),
        head_to_head_comparison: options
            .wants_head_to_head()
            .then(|| narrative::head_to_head(matchup, advantages, outcome)),
        historical_analysis: options
            .wants_historical()
            .then(|| narrative::historical_analysis(matchup)),
        fight_iq_analysis: options
            .wants_fight_iq()
            .then(|| narrative::fight_iq(matchup, outcome)),
        strategy_breakdown: options
            .wants_strategy()
            .then(|| narrative::strategy_breakdown(matchup, advantages, outcome)),
    }
}
