use rand::Rng;
use tracing::info;

use crate::models::{
    ComparisonStat, Fighter, FighterStats, GameplanAnalysis, LikelyOutcome, MatchupOptions,
    MatchupReport,
};
use crate::scoring::matchup::{draw_method, Corner, Matchup};
use crate::scoring::narrative::{self, Advantages, Outcome};

/// Build the full matchup report for two roster fighters.
///
/// Win probabilities are each fighter's share of the combined scorer total.
pub fn matchup_report<R: Rng + ?Sized>(
    fighter1: &Fighter,
    fighter2: &Fighter,
    options: &MatchupOptions,
    rng: &mut R,
) -> MatchupReport {
    info!(
        "Building matchup report for {} vs {} ({})",
        fighter1.name, fighter2.name, options.weight_class
    );

    let matchup = Matchup::new(&FighterStats::from(fighter1), &FighterStats::from(fighter2));
    let winner = matchup.favorite();
    let (method, round) = draw_method(&matchup.fighter(winner).method_shares(), rng);
    let outcome = Outcome {
        winner,
        method,
        round,
    };
    let advantages = Advantages::from_matchup(&matchup);

    let fighter1_win_probability = matchup.fighter1_share();
    let plan = narrative::strategy_breakdown(&matchup, &advantages, &outcome);

    MatchupReport {
        fighter1_win_probability,
        fighter2_win_probability: 100 - fighter1_win_probability,
        analysis: default_analysis(&matchup, &outcome, options),
        likely_outcome: LikelyOutcome {
            winner: matchup.fighter(winner).name.clone(),
            method,
            round,
        },
        technical_breakdown: technical_breakdown(&matchup, &advantages),
        gameplan_analysis: GameplanAnalysis {
            fighter1_strategy: format!("{}: {}.", fighter1.name, plan.fighter1_path.join("; ")),
            fighter2_strategy: format!("{}: {}.", fighter2.name, plan.fighter2_path.join("; ")),
        },
        key_stats: narrative::key_factors(&matchup, &advantages, &outcome),
        prediction_confidence: matchup.confidence(),
        comparison_stats: comparison_stats(fighter1, fighter2, rng),
        prediction_id: None,
    }
}

fn default_analysis(matchup: &Matchup, outcome: &Outcome, options: &MatchupOptions) -> String {
    let favored = &matchup.fighter(outcome.winner).name;
    let underdog = &matchup.fighter(outcome.loser()).name;

    format!(
        "Our model gives {favored} a significant edge in this {weight} matchup. \
         Their superior record and overall statistics suggest an advantage over {underdog}. \
         In this {fight_type} bout, {favored}'s experience and technical skills will likely be the difference makers. \
         {underdog} will need to implement a well-structured gameplan and potentially look for an early finish to have the best chance of victory. \
         The {venue} environment could play a factor, as fighters with {favored}'s style tend to perform well in similar settings.",
        weight = options.weight_class,
        fight_type = options.fight_type,
        venue = options.venue_type,
    )
}

fn technical_breakdown(matchup: &Matchup, advantages: &Advantages) -> String {
    let striker = matchup.fighter(advantages.striking);
    let grappler = matchup.fighter(advantages.grappling);

    format!(
        "{} lands {:.2} strikes per minute at {:.0}% accuracy, the sharper output on the feet. \
         {} completes {:.0}% of takedown attempts, the more dangerous wrestling threat. \
         {} holds the better combined defensive profile across striking and grappling exchanges.",
        striker.name,
        striker.strike_rate,
        striker.strike_accuracy * 100.0,
        grappler.name,
        grappler.takedown_accuracy * 100.0,
        matchup.fighter(advantages.defense).name,
    )
}

/// Side-by-side comparison rows. Unknown stats are filled with a random bonus.
pub fn comparison_stats<R: Rng + ?Sized>(
    fighter1: &Fighter,
    fighter2: &Fighter,
    rng: &mut R,
) -> Vec<ComparisonStat> {
    let row = |label: &str, key: &str, percent1: u32, percent2: u32| ComparisonStat {
        label: label.to_string(),
        key: key.to_string(),
        value1: format!("{}%", percent1),
        value2: format!("{}%", percent2),
        percent1,
        percent2,
    };

    vec![
        row(
            "Striking Accuracy",
            "strikingAccuracy",
            capped(45, fighter1.striking_accuracy, 30, rng),
            capped(45, fighter2.striking_accuracy, 30, rng),
        ),
        row(
            "Takedown Defense",
            "takedownDefense",
            capped(60, fighter1.takedown_defense, 30, rng),
            capped(60, fighter2.takedown_defense, 30, rng),
        ),
        row(
            "Submission Defense",
            "submissionDefense",
            capped(70, None, 20, rng),
            capped(70, None, 20, rng),
        ),
        row(
            "KO Power",
            "knockoutPower",
            capped(50, ko_power(fighter1), 40, rng),
            capped(50, ko_power(fighter2), 40, rng),
        ),
    ]
}

/// KO share of wins scaled to a 0 - 40 bonus
fn ko_power(fighter: &Fighter) -> Option<f64> {
    let wins = fighter.wins_by_ko + fighter.wins_by_sub + fighter.wins_by_dec;
    (wins > 0).then(|| fighter.wins_by_ko as f64 / wins as f64 * 40.0)
}

fn capped<R: Rng + ?Sized>(base: u32, stat: Option<f64>, max_bonus: u32, rng: &mut R) -> u32 {
    let bonus = match stat {
        Some(value) if value > 0.0 => value.round() as u32,
        _ => rng.gen_range(0..max_bonus),
    };
    (base + bonus).min(95)
}

/// Templated game plan for one fighter against an opponent
pub fn fight_strategy(fighter: &Fighter, opponent: &Fighter, fight_type: &str) -> String {
    let stats = Matchup::new(&FighterStats::from(fighter), &FighterStats::from(opponent));
    let advantages = Advantages::from_matchup(&stats);
    let me = &fighter.name;
    let them = &opponent.name;

    let striking = if advantages.striking == Corner::Fighter1 {
        format!(
            "{me} should take the center early and lead with the jab. Out-landing {them} is the clearest path, \
             so push volume behind feints and mix in leg kicks to slow movement."
        )
    } else {
        format!(
            "{me} should focus on establishing range control early with the jab. Keep distance against {them}'s power shots \
             and look for counter opportunities. Utilize leg kicks to slow movement and disrupt rhythm."
        )
    };

    let grappling = if advantages.grappling == Corner::Fighter1 {
        format!(
            "Chain takedown attempts off the end of striking exchanges. Once on top, {me} should stay heavy, \
             control the wrists and make {them} carry weight."
        )
    } else {
        "When the fight enters the clinch, focus on maintaining good posture and prevent being pressed against the cage. \
         Utilize underhooks to control the position and create space for strikes or takedown attempts when advantageous."
            .to_string()
    };

    format!(
        "Fight Strategy for {me} against {them} in a {fight_type} fight:\n\n\
         STRIKING TACTICS:\n{striking}\n\n\
         GRAPPLING APPROACH:\n{grappling}\n\n\
         ROUND-BY-ROUND STRATEGY:\n\
         Round 1: Establish distance, read {them}'s timing and reactions\n\
         Round 2: Increase pressure and exploit any weaknesses identified in Round 1\n\
         Round 3: Push the pace if ahead, or look for finish opportunities if behind\n\n\
         DEFENSIVE PRIORITIES:\n\
         - Maintain good head movement to avoid power shots\n\
         - Keep hands high when exiting exchanges\n\
         - Be ready to defend takedown attempts in open space\n\
         - Practice cage awareness to avoid being trapped\n\n\
         This strategy leverages {me}'s technical abilities while mitigating {them}'s key strengths."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_fighter(id: i64, name: &str) -> Fighter {
        Fighter {
            id,
            name: name.to_string(),
            nickname: None,
            division: "LIGHTWEIGHT".to_string(),
            record: "20-5-0".to_string(),
            wins: 20,
            losses: 5,
            draws: 0,
            age: Some(30),
            height: None,
            reach: None,
            stance: None,
            team: None,
            image: None,
            style: None,
            ranking: None,
            strikes_landed_per_min: Some(4.5),
            striking_accuracy: Some(52.0),
            takedown_accuracy: Some(40.0),
            takedown_defense: Some(70.0),
            wins_by_ko: 10,
            wins_by_sub: 5,
            wins_by_dec: 5,
        }
    }

    fn options() -> MatchupOptions {
        MatchupOptions {
            fight_type: "Main Event (5 Rounds)".to_string(),
            weight_class: "Lightweight".to_string(),
            venue_type: "Arena".to_string(),
        }
    }

    #[test]
    fn test_probabilities_sum_to_100() {
        let mut f2 = sample_fighter(2, "Second");
        f2.strikes_landed_per_min = Some(2.0);
        let report = matchup_report(&sample_fighter(1, "First"), &f2, &options(), &mut StdRng::seed_from_u64(4));

        assert_eq!(report.fighter1_win_probability + report.fighter2_win_probability, 100);
        assert!(report.fighter1_win_probability > 50);
        assert_eq!(report.likely_outcome.winner, "First");
        assert!(report.analysis.contains("Lightweight matchup"));
        assert!(report.prediction_id.is_none());
        assert_eq!(report.comparison_stats.len(), 4);
    }

    #[test]
    fn test_comparison_stats_are_capped() {
        let f1 = sample_fighter(1, "First");
        let mut f2 = sample_fighter(2, "Second");
        f2.striking_accuracy = None;

        let rows = comparison_stats(&f1, &f2, &mut StdRng::seed_from_u64(8));
        for row in &rows {
            assert!(row.percent1 <= 95 && row.percent2 <= 95);
            assert_eq!(row.value1, format!("{}%", row.percent1));
        }
        // 45 + 52 capped
        assert_eq!(rows[0].percent1, 95);
        assert!((45..75).contains(&rows[0].percent2));
        // 50 + 10/20 * 40
        assert_eq!(rows[3].percent1, 70);
    }

    #[test]
    fn test_fight_strategy_names_both_fighters() {
        let text = fight_strategy(
            &sample_fighter(1, "First"),
            &sample_fighter(2, "Second"),
            "3 Round",
        );
        assert!(text.starts_with("Fight Strategy for First against Second in a 3 Round fight:"));
        assert!(text.contains("ROUND-BY-ROUND STRATEGY"));
        assert!(text.contains("mitigating Second's key strengths"));
    }
}
