/// Round to a fixed number of decimal places (half away from zero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Points share over matches played: (3W + D) / max(1, 3P).
pub fn form_ratio(wins: u32, draws: u32, played: u32) -> f64 {
    let points = wins * 3 + draws; // Football scoring
    points as f64 / (played * 3).max(1) as f64
}

/// Convert a count out of `total` into a percentage with one decimal.
pub fn percentage(count: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(count as f64 / total as f64 * 100.0, 1)
}

/// Validate team name format
pub fn validate_team_name(name: &str) -> bool {
    !name.trim().is_empty() && name.len() <= 100
}
