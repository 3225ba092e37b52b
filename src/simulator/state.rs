use serde::{Serialize, Serializer};

use crate::models::{Fighter, FightResult, FighterStats};
use crate::scoring::Matchup;
use crate::simulator::odds::BettingOdds;

pub const ROUNDS: u8 = 5;
pub const ROUND_SECONDS: u32 = 300;

/// Upper bound for points an admin may set for one fighter in one round
pub const MAX_ROUND_POINTS: u32 = 1_000;

/// Per-round points for one fighter
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct Scorecard {
    pub round1: u32,
    pub round2: u32,
    pub round3: u32,
    pub round4: u32,
    pub round5: u32,
}

impl Scorecard {
    pub fn get(&self, round: u8) -> Option<u32> {
        match round {
            1 => Some(self.round1),
            2 => Some(self.round2),
            3 => Some(self.round3),
            4 => Some(self.round4),
            5 => Some(self.round5),
            _ => None,
        }
    }

    fn slot(&mut self, round: u8) -> Option<&mut u32> {
        match round {
            1 => Some(&mut self.round1),
            2 => Some(&mut self.round2),
            3 => Some(&mut self.round3),
            4 => Some(&mut self.round4),
            5 => Some(&mut self.round5),
            _ => None,
        }
    }

    /// Overwrite one round. Returns false for rounds outside 1..=5.
    pub fn set(&mut self, round: u8, points: u32) -> bool {
        match self.slot(round) {
            Some(slot) => {
                *slot = points;
                true
            }
            None => false,
        }
    }

    pub fn award(&mut self, round: u8) {
        if let Some(slot) = self.slot(round) {
            *slot = slot.saturating_add(1);
        }
    }

    pub fn total(&self) -> u64 {
        [self.round1, self.round2, self.round3, self.round4, self.round5]
            .iter()
            .map(|&points| u64::from(points))
            .sum()
    }
}

/// Cumulative in-fight numbers for one fighter
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FighterTally {
    pub strikes: u32,
    pub takedowns: u32,

    /// Seconds of control time
    pub control_time: u32,
}

impl FighterTally {
    /// Activity measure driving live odds
    pub fn pressure(&self) -> u32 {
        self.strikes + 5 * self.takedowns
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct TallyPair {
    pub fighter1: FighterTally,
    pub fighter2: FighterTally,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct FighterImages {
    pub fighter1: String,
    pub fighter2: String,
}

/// A notable event shown in the live feed
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SignificantMoment {
    pub time: String,
    pub round: u8,
    pub fighter: String,
    pub action: String,
}

/// The one simulated fight. Cloned for every broadcast snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFightState {
    pub in_progress: bool,
    pub fighter1: Option<Fighter>,
    pub fighter2: Option<Fighter>,
    pub current_round: u8,

    #[serde(rename = "timeRemaining", serialize_with = "serialize_clock")]
    pub seconds_remaining: u32,

    pub fighter1_score: Scorecard,
    pub fighter2_score: Scorecard,
    pub fighter_stats: TallyPair,
    pub betting_odds: BettingOdds,
    pub significant_moments: Vec<SignificantMoment>,
    pub fighter_images: FighterImages,

    /// Fighter 1's share of combined grappling strength (0.0 - 1.0)
    #[serde(skip)]
    pub grappling_share: f64,
}

impl Default for LiveFightState {
    fn default() -> Self {
        Self {
            in_progress: false,
            fighter1: None,
            fighter2: None,
            current_round: 1,
            seconds_remaining: ROUND_SECONDS,
            fighter1_score: Scorecard::default(),
            fighter2_score: Scorecard::default(),
            fighter_stats: TallyPair::default(),
            betting_odds: BettingOdds::opening(),
            significant_moments: Vec::new(),
            fighter_images: FighterImages::default(),
            grappling_share: 0.5,
        }
    }
}

/// Format seconds as "m:ss"
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn serialize_clock<S: Serializer>(seconds: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_clock(*seconds))
}

fn image_for(fighter: &Fighter, offset: i64) -> String {
    fighter.image.clone().unwrap_or_else(|| {
        format!(
            "https://avatars.githubusercontent.com/u/{}?v=4",
            offset + fighter.id
        )
    })
}

impl LiveFightState {
    /// Fresh running state for a new fight.
    ///
    /// Opening odds and the grappling bias come from scoring the two fighters against each other.
    pub fn start(fighter1: Fighter, fighter2: Fighter) -> Self {
        let matchup = Matchup::new(&FighterStats::from(&fighter1), &FighterStats::from(&fighter2));
        let grappling1 = matchup.score1.grappling();
        let grappling2 = matchup.score2.grappling();
        let grappling_share = if grappling1 + grappling2 > 0.0 {
            grappling1 / (grappling1 + grappling2)
        } else {
            0.5
        };

        let fighter_images = FighterImages {
            fighter1: image_for(&fighter1, 1000),
            fighter2: image_for(&fighter2, 2000),
        };

        Self {
            in_progress: true,
            betting_odds: BettingOdds::from_probability(matchup.fighter1_share() as i32),
            fighter1: Some(fighter1),
            fighter2: Some(fighter2),
            fighter_images,
            grappling_share,
            ..Self::default()
        }
    }

    pub fn clock(&self) -> String {
        format_clock(self.seconds_remaining)
    }

    pub fn fighter1_name(&self) -> &str {
        self.fighter1.as_ref().map(|f| f.name.as_str()).unwrap_or("Fighter 1")
    }

    pub fn fighter2_name(&self) -> &str {
        self.fighter2.as_ref().map(|f| f.name.as_str()).unwrap_or("Fighter 2")
    }

    /// Name of the fighter ahead on summed round scores, or "Draw"
    pub fn leader(&self) -> String {
        let total1 = self.fighter1_score.total();
        let total2 = self.fighter2_score.total();
        if total1 > total2 {
            self.fighter1_name().to_string()
        } else if total2 > total1 {
            self.fighter2_name().to_string()
        } else {
            "Draw".to_string()
        }
    }

    /// Overwrite both fighters' points for a round.
    ///
    /// Rounds outside 1..=5 and points above `MAX_ROUND_POINTS` are rejected.
    pub fn set_round_score(&mut self, round: u8, fighter1: u32, fighter2: u32) -> bool {
        if !(1..=ROUNDS).contains(&round) {
            return false;
        }
        if fighter1 > MAX_ROUND_POINTS || fighter2 > MAX_ROUND_POINTS {
            return false;
        }
        self.fighter1_score.set(round, fighter1);
        self.fighter2_score.set(round, fighter2);
        true
    }

    pub fn set_odds(&mut self, odds: BettingOdds) {
        self.betting_odds = odds.normalized();
    }

    /// Stop the fight and freeze the state
    pub fn finish(&mut self, method: Option<String>) -> FightResult {
        self.in_progress = false;
        FightResult {
            winner: self.leader(),
            method: method.unwrap_or_else(|| "Decision".to_string()),
            time: self.clock(),
            round: self.current_round,
        }
    }
}
