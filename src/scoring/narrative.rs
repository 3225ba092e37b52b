//! Templated text and extended analysis blocks built from a scored matchup.

use crate::models::{
    AreaComparison, FightIq, HeadToHead, HistoricalAnalysis, RatingPair, RecordProfile,
    RoundByRound, StrategyBreakdown, StyleDynamics, VictoryMethod,
};
use crate::scoring::matchup::{Corner, Matchup};
use crate::scoring::stats::NormalizedStats;

/// Predicted winner, method and finishing round
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
    pub winner: Corner,
    pub method: VictoryMethod,
    pub round: Option<u8>,
}

impl Outcome {
    pub fn loser(&self) -> Corner {
        match self.winner {
            Corner::Fighter1 => Corner::Fighter2,
            Corner::Fighter2 => Corner::Fighter1,
        }
    }

    fn finishes_in(&self, round: u8) -> bool {
        self.method.is_finish() && self.round == Some(round)
    }
}

/// Which fighter holds the edge in each area. Ties go to fighter 2.
#[derive(Debug, Clone, Copy)]
pub struct Advantages {
    pub striking: Corner,
    pub grappling: Corner,
    pub defense: Corner,
}

impl Advantages {
    pub fn from_matchup(matchup: &Matchup) -> Self {
        let f1 = &matchup.fighter1;
        let f2 = &matchup.fighter2;

        let pick = |fighter1_better: bool| {
            if fighter1_better {
                Corner::Fighter1
            } else {
                Corner::Fighter2
            }
        };

        Self {
            striking: pick(f1.striking_output() > f2.striking_output()),
            grappling: pick(f1.takedown_accuracy > f2.takedown_accuracy),
            defense: pick(defensive_index(f1) > defensive_index(f2)),
        }
    }
}

fn defensive_index(fighter: &NormalizedStats) -> f64 {
    (fighter.takedown_defense + (1.0 - fighter.strike_accuracy)) / 2.0
}

fn name(matchup: &Matchup, corner: Corner) -> &str {
    &matchup.fighter(corner).name
}

/// The winner's headline strength as a short noun phrase
fn winner_edge<'a>(
    advantages: &Advantages,
    outcome: &Outcome,
    striking: &'a str,
    grappling: &'a str,
    fallback: &'a str,
) -> &'a str {
    if advantages.striking == outcome.winner {
        striking
    } else if advantages.grappling == outcome.winner {
        grappling
    } else {
        fallback
    }
}

fn round_rating(value: f64) -> f64 {
    ((value * 10.0 * 10.0).round() / 10.0).clamp(0.0, 10.0)
}

pub fn analysis(matchup: &Matchup, advantages: &Advantages, outcome: &Outcome) -> String {
    let winner = name(matchup, outcome.winner);
    let loser = name(matchup, outcome.loser());
    let round_text = outcome
        .round
        .map(|r| format!(" in round {}", r))
        .unwrap_or_default();
    let edge = winner_edge(
        advantages,
        outcome,
        "striking output and accuracy",
        "grappling efficiency and control",
        "overall fighting metrics",
    );

    format!(
        "{winner} is predicted to win against {loser} through {method}{round_text} based on statistical analysis. \
         {winner} demonstrates clear advantages in {edge}. \
         This prediction is generated by statistical modeling of fight metrics and performance history.",
        method = outcome.method,
    )
}

pub fn matchup_insights(matchup: &Matchup, advantages: &Advantages, outcome: &Outcome) -> Vec<String> {
    let striker = matchup.fighter(advantages.striking);
    let finishing = if outcome.method.is_finish() {
        format!(
            "{} has a history of finishing fights via {}.",
            name(matchup, outcome.winner),
            outcome.method
        )
    } else {
        "The fight is likely to go the distance based on both fighters' finishing rates.".to_string()
    };

    vec![
        format!(
            "{} has superior striking metrics with {} strikes landed per minute.",
            striker.name, striker.strike_rate
        ),
        format!(
            "{} holds an advantage in the grappling department with better takedown accuracy.",
            name(matchup, advantages.grappling)
        ),
        format!(
            "{} demonstrates better defensive skills in both striking and grappling exchanges.",
            name(matchup, advantages.defense)
        ),
        finishing,
    ]
}

pub fn key_factors(matchup: &Matchup, advantages: &Advantages, outcome: &Outcome) -> Vec<String> {
    let winner = name(matchup, outcome.winner);
    let winner_stats = matchup.fighter(outcome.winner);
    let loser_stats = matchup.fighter(outcome.loser());

    let defense = if winner_stats.takedown_defense > loser_stats.takedown_defense {
        "takedown defense"
    } else {
        "striking defense"
    };
    let finishing = if outcome.method.is_finish() {
        format!(
            "{}'s finishing ability via {} gives them a significant edge",
            winner, outcome.method
        )
    } else {
        "Fight IQ and consistency will be decisive in a likely decision".to_string()
    };

    vec![
        format!(
            "{} has superior {} metrics",
            winner,
            winner_edge(advantages, outcome, "striking", "grappling", "overall fighting")
        ),
        format!(
            "{} demonstrates better {} that will be crucial in this matchup",
            winner, defense
        ),
        finishing,
    ]
}

pub fn round_by_round(matchup: &Matchup, advantages: &Advantages, outcome: &Outcome) -> RoundByRound {
    let winner = name(matchup, outcome.winner);
    let method = outcome.method;
    let round1_edge = if advantages.striking == outcome.winner {
        "superior striking"
    } else {
        "control"
    };

    RoundByRound {
        round1: format!(
            "{} establishes distance control and begins implementing their game plan, likely winning the round through {}.",
            winner, round1_edge
        ),
        round2: if outcome.finishes_in(2) {
            format!("{} finds an opening and finishes the fight via {}.", winner, method)
        } else {
            format!(
                "The fighters settle into their rhythms, with {} generally having better success with their game plan.",
                winner
            )
        },
        round3: if outcome.finishes_in(3) {
            format!(
                "{} capitalizes on accumulated damage and finishes via {}.",
                winner, method
            )
        } else {
            format!(
                "Conditioning becomes a factor, with {} maintaining better output and technique.",
                winner
            )
        },
        round4: if outcome.finishes_in(4) {
            format!("{} finds an opening and finishes via {}.", winner, method)
        } else {
            format!(
                "Championship rounds test both fighters, with {} showing better conditioning and execution.",
                winner
            )
        },
        round5: if outcome.finishes_in(5) {
            format!("{} secures a late {} victory.", winner, method)
        } else {
            format!(
                "The final round sees {} maintaining their game plan for a decision victory.",
                winner
            )
        },
    }
}

pub fn style_dynamics(matchup: &Matchup, advantages: &Advantages, outcome: &Outcome) -> StyleDynamics {
    let winner = name(matchup, outcome.winner);
    let loser = name(matchup, outcome.loser());
    let high_pace = matchup.fighter1.strike_rate > 4.0 || matchup.fighter2.strike_rate > 4.0;
    let style = if advantages.striking == outcome.winner {
        "striking"
    } else {
        "grappling"
    };

    StyleDynamics {
        pace_control: winner.to_string(),
        range_control: name(matchup, advantages.striking).to_string(),
        ground_control: name(matchup, advantages.grappling).to_string(),
        clinch_advantage: name(matchup, advantages.grappling).to_string(),
        counter_vs_pressure: format!(
            "{} is likely to implement a {} style",
            winner,
            if high_pace {
                "pressure-heavy"
            } else {
                "technical counter"
            }
        ),
        style_dynamics: format!(
            "{}'s {} style matches up favorably against {}'s approach.",
            winner, style, loser
        ),
    }
}

pub fn head_to_head(matchup: &Matchup, advantages: &Advantages, outcome: &Outcome) -> HeadToHead {
    let f1 = &matchup.fighter1;
    let f2 = &matchup.fighter2;
    let winner = name(matchup, outcome.winner);
    let decision = !outcome.method.is_finish();

    let striker = name(matchup, advantages.striking);
    let other = match advantages.striking {
        Corner::Fighter1 => &f2.name,
        Corner::Fighter2 => &f1.name,
    };
    let grappler = name(matchup, advantages.grappling);

    let conditioning_rating = |corner: Corner| {
        if decision && outcome.winner == corner {
            8.5
        } else {
            7.0
        }
    };

    let experienced = if f1.total_wins() > f2.total_wins() {
        Corner::Fighter1
    } else {
        Corner::Fighter2
    };

    HeadToHead {
        striking: AreaComparison {
            advantage: striker.to_string(),
            rating: RatingPair {
                fighter1: round_rating(f1.striking_output()),
                fighter2: round_rating(f2.striking_output()),
            },
            analysis: format!(
                "{} has more effective striking techniques and lands with greater accuracy. \
                 {} will need to be defensively sound to avoid significant damage.",
                striker, other
            ),
        },
        grappling: AreaComparison {
            advantage: grappler.to_string(),
            rating: RatingPair {
                fighter1: round_rating(f1.takedown_accuracy),
                fighter2: round_rating(f2.takedown_accuracy),
            },
            analysis: format!(
                "{} has a clear edge in takedown accuracy and control. \
                 The ground game could be a deciding factor if the fight goes to the mat.",
                grappler
            ),
        },
        conditioning: AreaComparison {
            advantage: if decision {
                winner.to_string()
            } else {
                "Even".to_string()
            },
            rating: RatingPair {
                fighter1: conditioning_rating(Corner::Fighter1),
                fighter2: conditioning_rating(Corner::Fighter2),
            },
            analysis: format!(
                "{} Pace management will be crucial as the fight progresses.",
                if decision {
                    format!(
                        "{} has better endurance metrics suggesting an advantage in longer fights.",
                        winner
                    )
                } else {
                    "Both fighters appear to have comparable endurance levels.".to_string()
                }
            ),
        },
        experience: AreaComparison {
            advantage: name(matchup, experienced).to_string(),
            rating: RatingPair {
                fighter1: if f1.total_wins() > f2.total_wins() { 8.0 } else { 7.0 },
                fighter2: if f2.total_wins() > f1.total_wins() { 8.0 } else { 7.0 },
            },
            analysis: format!(
                "{} has more professional wins and has faced higher caliber opposition. \
                 This experience advantage could prove valuable in critical moments.",
                name(matchup, experienced)
            ),
        },
    }
}

fn record_profile(fighter: &NormalizedStats) -> RecordProfile {
    let shares = fighter.method_shares();
    let primary_method = if fighter.total_wins() == 0 {
        VictoryMethod::Decision
    } else if shares.ko >= shares.sub && shares.ko >= shares.dec {
        VictoryMethod::KoTko
    } else if shares.sub >= shares.dec {
        VictoryMethod::Submission
    } else {
        VictoryMethod::Decision
    };

    RecordProfile {
        name: fighter.name.clone(),
        total_wins: fighter.total_wins(),
        finish_rate: ((shares.ko + shares.sub) * 100.0).round() / 100.0,
        primary_method,
    }
}

pub fn historical_analysis(matchup: &Matchup) -> HistoricalAnalysis {
    let fighter1 = record_profile(&matchup.fighter1);
    let fighter2 = record_profile(&matchup.fighter2);

    let (finisher, other) = if fighter1.finish_rate >= fighter2.finish_rate {
        (&fighter1, &fighter2)
    } else {
        (&fighter2, &fighter1)
    };

    let summary = format!(
        "{} has finished {:.0}% of their wins, most often by {}, while {} has finished {:.0}% and wins most often by {}.",
        finisher.name,
        finisher.finish_rate * 100.0,
        finisher.primary_method,
        other.name,
        other.finish_rate * 100.0,
        other.primary_method
    );

    HistoricalAnalysis {
        fighter1,
        fighter2,
        summary,
    }
}

pub fn fight_iq(matchup: &Matchup, outcome: &Outcome) -> FightIq {
    let decision = !outcome.method.is_finish();
    let pair = |winner_value: f64, other_value: f64, needs_decision: bool| {
        let rate = |corner: Corner| {
            if outcome.winner == corner && (!needs_decision || decision) {
                winner_value
            } else {
                other_value
            }
        };
        RatingPair {
            fighter1: rate(Corner::Fighter1),
            fighter2: rate(Corner::Fighter2),
        }
    };

    FightIq {
        strategic: pair(8.0, 6.5, false),
        tactical: pair(8.5, 7.0, true),
        adaptability: pair(7.5, 6.5, false),
        analysis: format!(
            "{} demonstrates superior fight intelligence and tactical awareness based on historical performance metrics. \
             Their ability to implement game plans and adapt mid-fight will likely be a determining factor.",
            name(matchup, outcome.winner)
        ),
    }
}

pub fn strategy_breakdown(
    matchup: &Matchup,
    advantages: &Advantages,
    outcome: &Outcome,
) -> StrategyBreakdown {
    let f1 = &matchup.fighter1;
    let f2 = &matchup.fighter2;
    let f1_shares = f1.method_shares();
    let f2_shares = f2.method_shares();

    let fighter1_path = vec![
        format!(
            "Utilize {} to maintain optimal fighting distance",
            if f1.strike_rate > 3.0 {
                "high-volume striking"
            } else {
                "precise counter striking"
            }
        ),
        if f1.takedown_accuracy > 0.5 {
            "Look for takedown opportunities when striking exchanges get wild"
        } else {
            "Defend takedowns and keep the fight standing"
        }
        .to_string(),
        if f1_shares.ko > 0.5 {
            "Commit to power shots to end the fight early"
        } else if f1_shares.sub > 0.3 {
            "Seek submission opportunities if the fight goes to the ground"
        } else {
            "Win rounds through consistent technique and control"
        }
        .to_string(),
    ];

    let fighter2_path = vec![
        if f2.takedown_defense > 0.7 {
            "Use strong takedown defense to keep the fight standing"
        } else {
            "Use wrestling to control where the fight takes place"
        }
        .to_string(),
        if f2_shares.sub > 0.3 {
            "Look for submission opportunities when the fight hits the ground"
        } else {
            "Use ground control to score points and maintain dominance"
        }
        .to_string(),
        if f2.strike_rate > 4.0 {
            "High volume striking to overwhelm the opponent"
        } else {
            "Precision counter striking to capitalize on openings"
        }
        .to_string(),
    ];

    let key_tactics = vec![
        "Octagon control will be crucial for implementing game plans".to_string(),
        format!(
            "{} should focus on their clear advantage in {}",
            name(matchup, outcome.winner),
            winner_edge(advantages, outcome, "striking", "grappling", "overall technique")
        ),
        "Fight IQ and adaptability will play a major role as the fight progresses".to_string(),
    ];

    StrategyBreakdown {
        fighter1_path,
        fighter2_path,
        key_tactics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FighterStats, StatValue};

    fn matchup() -> Matchup {
        let striker = FighterStats {
            id: 10,
            name: "Striker".to_string(),
            strikes_landed_per_min: Some(StatValue::Number(6.0)),
            striking_accuracy: Some(StatValue::from("55%")),
            takedown_accuracy: Some(StatValue::from("20%")),
            takedown_defense: Some(StatValue::from("80%")),
            knockout_wins: Some(StatValue::Number(12.0)),
            submission_wins: Some(StatValue::Number(1.0)),
            decision_wins: Some(StatValue::Number(3.0)),
            ..Default::default()
        };
        let grappler = FighterStats {
            id: 20,
            name: "Grappler".to_string(),
            strikes_landed_per_min: Some(StatValue::Number(2.5)),
            striking_accuracy: Some(StatValue::from("40%")),
            takedown_accuracy: Some(StatValue::from("60%")),
            takedown_defense: Some(StatValue::from("50%")),
            knockout_wins: Some(StatValue::Number(1.0)),
            submission_wins: Some(StatValue::Number(9.0)),
            decision_wins: Some(StatValue::Number(2.0)),
            ..Default::default()
        };
        Matchup::new(&striker, &grappler)
    }

    fn ko_in(round: u8) -> Outcome {
        Outcome {
            winner: Corner::Fighter1,
            method: VictoryMethod::KoTko,
            round: Some(round),
        }
    }

    #[test]
    fn test_advantages() {
        let adv = Advantages::from_matchup(&matchup());
        assert_eq!(adv.striking, Corner::Fighter1);
        assert_eq!(adv.grappling, Corner::Fighter2);
        assert_eq!(adv.defense, Corner::Fighter1);
    }

    #[test]
    fn test_key_factor_defense_is_the_winners() {
        let m = matchup();
        let adv = Advantages::from_matchup(&m);

        let striker_wins = key_factors(&m, &adv, &ko_in(1));
        assert_eq!(
            striker_wins[1],
            "Striker demonstrates better takedown defense that will be crucial in this matchup"
        );

        let grappler_wins = Outcome {
            winner: Corner::Fighter2,
            method: VictoryMethod::Decision,
            round: None,
        };
        let factors = key_factors(&m, &adv, &grappler_wins);
        assert_eq!(
            factors[1],
            "Grappler demonstrates better striking defense that will be crucial in this matchup"
        );
        assert_eq!(factors.len(), 3);
    }

    #[test]
    fn test_round_by_round_mentions_winner_everywhere() {
        let m = matchup();
        let adv = Advantages::from_matchup(&m);
        let rounds = round_by_round(&m, &adv, &ko_in(2));

        let value = serde_json::to_value(&rounds).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["round1", "round2", "round3", "round4", "round5"]);

        for text in [&rounds.round1, &rounds.round2, &rounds.round3, &rounds.round4, &rounds.round5] {
            assert!(!text.is_empty());
            assert!(text.contains("Striker"));
        }
        assert!(rounds.round2.contains("finishes the fight via KO/TKO"));
        assert!(!rounds.round3.contains("finishes"));
    }

    #[test]
    fn test_analysis_mentions_round_only_for_finish() {
        let m = matchup();
        let adv = Advantages::from_matchup(&m);
        assert!(analysis(&m, &adv, &ko_in(1)).contains("through KO/TKO in round 1"));

        let decision = Outcome {
            winner: Corner::Fighter2,
            method: VictoryMethod::Decision,
            round: None,
        };
        let text = analysis(&m, &adv, &decision);
        assert!(text.starts_with("Grappler is predicted to win against Striker through Decision based"));
        assert!(text.contains("grappling efficiency and control"));
    }

    #[test]
    fn test_head_to_head_ratings() {
        let m = matchup();
        let adv = Advantages::from_matchup(&m);
        let h2h = head_to_head(&m, &adv, &ko_in(1));

        // 6.0 * 0.55 * 10 = 33, capped at 10
        assert_eq!(h2h.striking.rating.fighter1, 10.0);
        assert_eq!(h2h.striking.rating.fighter2, 10.0);
        assert_eq!(h2h.grappling.rating.fighter1, 2.0);
        assert_eq!(h2h.grappling.rating.fighter2, 6.0);
        assert_eq!(h2h.conditioning.advantage, "Even");
        assert_eq!(h2h.experience.advantage, "Striker");
        assert_eq!(h2h.experience.rating.fighter1, 8.0);
        assert_eq!(h2h.experience.rating.fighter2, 7.0);
    }

    #[test]
    fn test_fight_iq_ratings() {
        let m = matchup();
        let iq = fight_iq(&m, &ko_in(1));
        assert_eq!(iq.strategic.fighter1, 8.0);
        assert_eq!(iq.strategic.fighter2, 6.5);
        // tactical edge only on a decision
        assert_eq!(iq.tactical.fighter1, 7.0);
        assert_eq!(iq.adaptability.fighter1, 7.5);

        let decision = Outcome {
            winner: Corner::Fighter2,
            method: VictoryMethod::Decision,
            round: None,
        };
        let iq = fight_iq(&m, &decision);
        assert_eq!(iq.tactical.fighter2, 8.5);
        assert_eq!(iq.tactical.fighter1, 7.0);
    }

    #[test]
    fn test_strategy_thresholds() {
        let m = matchup();
        let adv = Advantages::from_matchup(&m);
        let plan = strategy_breakdown(&m, &adv, &ko_in(1));

        assert!(plan.fighter1_path[0].contains("high-volume striking"));
        assert_eq!(plan.fighter1_path[1], "Defend takedowns and keep the fight standing");
        assert_eq!(plan.fighter1_path[2], "Commit to power shots to end the fight early");
        assert_eq!(
            plan.fighter2_path[0],
            "Use wrestling to control where the fight takes place"
        );
        assert_eq!(
            plan.fighter2_path[1],
            "Look for submission opportunities when the fight hits the ground"
        );
        assert_eq!(
            plan.fighter2_path[2],
            "Precision counter striking to capitalize on openings"
        );
        assert!(plan.key_tactics[1].ends_with("striking"));
    }

    #[test]
    fn test_historical_analysis() {
        let history = historical_analysis(&matchup());
        assert_eq!(history.fighter1.total_wins, 16);
        assert_eq!(history.fighter1.primary_method, VictoryMethod::KoTko);
        assert_eq!(history.fighter2.primary_method, VictoryMethod::Submission);
        assert!(history.summary.starts_with("Grappler has finished 83%"));
    }
}
