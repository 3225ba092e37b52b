use rand::Rng;
use tracing::{debug, info};

use crate::models::{RoundChange, ServerMessage};
use crate::simulator::odds::BettingOdds;
use crate::simulator::state::{LiveFightState, SignificantMoment, ROUNDS, ROUND_SECONDS};

/// Chance per tick that both fighters exchange strikes
pub const EXCHANGE_CHANCE: f64 = 0.30;
/// Takedown chance per fighter per exchange, scaled by that fighter's grappling share
pub const TAKEDOWN_CHANCE: f64 = 0.10;
/// Chance per tick that the live line moves
pub const ODDS_CHANCE: f64 = 0.05;
/// Chance per tick of a highlighted moment
pub const MOMENT_CHANCE: f64 = 0.02;

const MOMENT_TYPES: [&str; 6] = [
    "significant strike",
    "knockdown",
    "takedown",
    "submission attempt",
    "cut opened",
    "referee warning",
];

impl LiveFightState {
    /// Advance the fight by one second and return the messages to broadcast, in order.
    ///
    /// Does nothing while no fight is running. Expiry of round 5 ends the fight by decision.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<ServerMessage> {
        if !self.in_progress {
            return Vec::new();
        }

        let mut messages = Vec::new();

        if self.seconds_remaining == 0 {
            if self.current_round >= ROUNDS {
                let result = self.finish(None);
                info!("Fight over after round {}: {}", result.round, result.winner);
                messages.push(ServerMessage::FightEnd(result));
                return messages;
            }

            self.current_round += 1;
            self.seconds_remaining = ROUND_SECONDS;
            info!("Round {} begins", self.current_round);
            messages.push(ServerMessage::RoundChange(RoundChange {
                round: self.current_round,
                time_remaining: self.clock(),
            }));
        } else {
            self.seconds_remaining -= 1;
        }

        if rng.gen_bool(EXCHANGE_CHANCE) {
            self.exchange(rng);
        }
        if rng.gen_bool(ODDS_CHANCE) {
            self.move_line(rng);
        }
        if rng.gen_bool(MOMENT_CHANCE) {
            self.highlight(rng);
        }

        messages.push(ServerMessage::FightUpdate(Box::new(self.clone())));
        messages
    }

    /// Both fighters throw; the bigger output takes the round point
    fn exchange<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let landed1 = rng.gen_range(0..=2);
        let landed2 = rng.gen_range(0..=2);

        let stats = &mut self.fighter_stats;
        stats.fighter1.strikes += landed1;
        stats.fighter2.strikes += landed2;

        let share = self.grappling_share.clamp(0.0, 1.0);
        if rng.gen_bool(TAKEDOWN_CHANCE * share) {
            stats.fighter1.takedowns += 1;
            stats.fighter1.control_time += rng.gen_range(0..30);
        }
        if rng.gen_bool(TAKEDOWN_CHANCE * (1.0 - share)) {
            stats.fighter2.takedowns += 1;
            stats.fighter2.control_time += rng.gen_range(0..30);
        }

        if landed1 > landed2 {
            self.fighter1_score.award(self.current_round);
        } else if landed2 > landed1 {
            self.fighter2_score.award(self.current_round);
        }
    }

    /// Reprice from fight activity with a small random swing
    fn move_line<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let pressure1 = self.fighter_stats.fighter1.pressure();
        let pressure2 = self.fighter_stats.fighter2.pressure();

        let base = if pressure1 + pressure2 == 0 {
            50
        } else {
            (pressure1 as f64 / (pressure1 + pressure2) as f64 * 100.0).round() as i32
        };
        let jitter = rng.gen_range(-5..5);

        self.betting_odds = BettingOdds::from_probability(base + jitter);
        debug!(
            "Live line moved to {}/{}",
            self.betting_odds.fighter1.moneyline, self.betting_odds.fighter2.moneyline
        );
    }

    fn highlight<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let fighter = if rng.gen_bool(0.5) {
            self.fighter1_name().to_string()
        } else {
            self.fighter2_name().to_string()
        };
        let kind = MOMENT_TYPES[rng.gen_range(0..MOMENT_TYPES.len())];

        self.significant_moments.push(SignificantMoment {
            time: self.clock(),
            round: self.current_round,
            action: format!("{} lands a {}", fighter, kind),
            fighter,
        });
    }
}
