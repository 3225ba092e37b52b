use serde::{Deserialize, Serialize};

/// Lowest and highest implied probability a live line may show
pub const MIN_PROBABILITY: i32 = 10;
pub const MAX_PROBABILITY: i32 = 90;

/// One side of a betting line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OddsLine {
    /// American moneyline (negative = favorite)
    pub moneyline: i32,

    /// Decimal odds, two decimals
    pub decimal: f64,

    /// Implied probability in whole percent
    pub implied_probability: i32,
}

/// Betting odds for both fighters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BettingOdds {
    pub fighter1: OddsLine,
    pub fighter2: OddsLine,
}

impl BettingOdds {
    /// Opening line shown before any fight has been seeded
    pub fn opening() -> Self {
        Self {
            fighter1: OddsLine {
                moneyline: -150,
                decimal: 1.67,
                implied_probability: 60,
            },
            fighter2: OddsLine {
                moneyline: 125,
                decimal: 2.25,
                implied_probability: 40,
            },
        }
    }

    /// Build both lines from fighter 1's implied probability.
    ///
    /// The probability is clamped to [10, 90] and fighter 2 gets the complement.
    pub fn from_probability(fighter1_probability: i32) -> Self {
        let p1 = fighter1_probability.clamp(MIN_PROBABILITY, MAX_PROBABILITY);
        let p2 = 100 - p1;

        let (ml1, ml2) = if p1 >= 50 {
            (favorite_moneyline(p1), underdog_moneyline(p2))
        } else {
            (underdog_moneyline(p1), favorite_moneyline(p2))
        };

        Self {
            fighter1: OddsLine {
                moneyline: ml1,
                decimal: decimal_odds(ml1),
                implied_probability: p1,
            },
            fighter2: OddsLine {
                moneyline: ml2,
                decimal: decimal_odds(ml2),
                implied_probability: p2,
            },
        }
    }

    pub fn total_probability(&self) -> i32 {
        self.fighter1.implied_probability + self.fighter2.implied_probability
    }

    /// Keep lines whose probabilities add up to 100, otherwise rebuild from fighter 1's side
    pub fn normalized(self) -> Self {
        if self.total_probability() == 100 {
            self
        } else {
            Self::from_probability(self.fighter1.implied_probability)
        }
    }
}

impl Default for BettingOdds {
    fn default() -> Self {
        Self::opening()
    }
}

fn favorite_moneyline(probability: i32) -> i32 {
    let p = probability as f64;
    -((p / (100.0 - p)) * 100.0).round() as i32
}

fn underdog_moneyline(probability: i32) -> i32 {
    let p = probability as f64;
    ((100.0 - p) / p * 100.0).round() as i32
}

/// Convert an American moneyline to decimal odds rounded to two places
pub fn decimal_odds(moneyline: i32) -> f64 {
    let decimal = if moneyline < 0 {
        100.0 / (moneyline.abs() as f64) + 1.0
    } else {
        moneyline as f64 / 100.0 + 1.0
    };
    (decimal * 100.0).round() / 100.0
}
