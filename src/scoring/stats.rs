use crate::models::FighterStats;

/// Parse a percentage such as "54%", "54" or " 54.5 % " into a fraction in [0, 1].
///
/// Anything that does not parse to a finite number resolves to 0.
pub fn parse_percentage(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    match number.parse::<f64>() {
        Ok(value) if value.is_finite() => (value / 100.0).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Parse a non-negative rate such as "4.82"; unparsable or negative input is 0
pub fn parse_rate(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Parse a whole, non-negative count. Fractions are truncated.
pub fn parse_count(raw: &str) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value.trunc().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

/// Fighter numbers after normalization, ready for scoring
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedStats {
    pub id: i64,
    pub name: String,

    /// Strikes landed per minute
    pub strike_rate: f64,

    /// Fractions in [0, 1]
    pub strike_accuracy: f64,
    pub takedown_accuracy: f64,
    pub takedown_defense: f64,

    pub ko_wins: u32,
    pub sub_wins: u32,
    pub dec_wins: u32,
}

impl NormalizedStats {
    pub fn from_stats(stats: &FighterStats) -> Self {
        Self {
            id: stats.id,
            name: stats.name.clone(),
            strike_rate: stats
                .strikes_landed_per_min
                .as_ref()
                .map(|v| v.as_rate())
                .unwrap_or(0.0),
            strike_accuracy: fraction(&stats.striking_accuracy),
            takedown_accuracy: fraction(&stats.takedown_accuracy),
            takedown_defense: fraction(&stats.takedown_defense),
            ko_wins: count(&stats.knockout_wins),
            sub_wins: count(&stats.submission_wins),
            dec_wins: count(&stats.decision_wins),
        }
    }

    pub fn total_wins(&self) -> u32 {
        self.ko_wins + self.sub_wins + self.dec_wins
    }

    /// Share of wins by KO, submission and decision. All zero without wins.
    pub fn method_shares(&self) -> MethodShares {
        let total = self.total_wins();
        if total == 0 {
            return MethodShares::default();
        }

        let total = total as f64;
        MethodShares {
            ko: self.ko_wins as f64 / total,
            sub: self.sub_wins as f64 / total,
            dec: self.dec_wins as f64 / total,
        }
    }

    /// Landed strike output weighted by accuracy
    pub fn striking_output(&self) -> f64 {
        self.strike_rate * self.strike_accuracy
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MethodShares {
    pub ko: f64,
    pub sub: f64,
    pub dec: f64,
}

fn fraction(value: &Option<crate::models::StatValue>) -> f64 {
    value.as_ref().map(|v| v.as_fraction()).unwrap_or(0.0)
}

fn count(value: &Option<crate::models::StatValue>) -> u32 {
    value.as_ref().map(|v| v.as_count()).unwrap_or(0)
}

/// Multi-line profile of a fighter listing only the fields that are present
pub fn format_fighter_profile(stats: &FighterStats) -> String {
    let mut result = format!("NAME: {} (ID: {})\n", stats.name, stats.id);

    for (label, value) in stats.present_fields() {
        result.push_str(&format!("{}: {}\n", label, value));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatValue;

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("60%"), 0.6);
        assert_eq!(parse_percentage("0%"), 0.0);
        assert_eq!(parse_percentage("100%"), 1.0);
        assert_eq!(parse_percentage(" 45 % "), 0.45);
        assert_eq!(parse_percentage("45"), 0.45);
    }

    #[test]
    fn test_parse_percentage_range() {
        for pct in 0..=100 {
            let value = parse_percentage(&format!("{}%", pct));
            assert!((0.0..=1.0).contains(&value), "{}% -> {}", pct, value);
        }
    }

    #[test]
    fn test_parse_percentage_garbage_is_zero() {
        for raw in ["", "%", "abc", "--5%", "NaN", "inf%", "12abc"] {
            assert_eq!(parse_percentage(raw), 0.0, "input {:?}", raw);
        }
    }

    #[test]
    fn test_parse_rate_and_count() {
        assert_eq!(parse_rate("4.82"), 4.82);
        assert_eq!(parse_rate("-1"), 0.0);
        assert_eq!(parse_rate("fast"), 0.0);
        assert_eq!(parse_count("7"), 7);
        assert_eq!(parse_count("7.9"), 7);
        assert_eq!(parse_count("-3"), 0);
        assert_eq!(parse_count("seven"), 0);
    }

    #[test]
    fn test_method_shares_sum_to_one() {
        let stats = FighterStats {
            id: 1,
            name: "A".to_string(),
            knockout_wins: Some(StatValue::Number(7.0)),
            submission_wins: Some(StatValue::Number(2.0)),
            decision_wins: Some(StatValue::Number(4.0)),
            ..Default::default()
        };
        let shares = NormalizedStats::from_stats(&stats).method_shares();

        assert!((shares.ko + shares.sub + shares.dec - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_method_shares_without_wins() {
        let stats = FighterStats {
            id: 1,
            name: "A".to_string(),
            ..Default::default()
        };
        let normalized = NormalizedStats::from_stats(&stats);

        assert_eq!(normalized.total_wins(), 0);
        assert_eq!(normalized.method_shares(), MethodShares::default());
        assert_eq!(normalized.strike_rate, 0.0);
        assert_eq!(normalized.takedown_defense, 0.0);
    }

    #[test]
    fn test_format_fighter_profile_skips_missing_fields() {
        let stats = FighterStats {
            id: 101,
            name: "IAN MACHADO GARRY".to_string(),
            record: Some("13-0-0".to_string()),
            striking_accuracy: Some(StatValue::from("54%")),
            ..Default::default()
        };

        let profile = format_fighter_profile(&stats);
        assert_eq!(
            profile,
            "NAME: IAN MACHADO GARRY (ID: 101)\nRECORD: 13-0-0\nSTRIKING ACCURACY: 54%\n"
        );
    }
}
