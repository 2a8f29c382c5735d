/// Placeholder strength score derived from a team's display name.
///
/// Nothing here is learned from results: the rating is a stable hash of the
/// name folded into [1400, 1599] so that two names always compare the same way.
pub struct RatingEstimator;

impl RatingEstimator {
    pub const BASE_RATING: i32 = 1500;
    const SPREAD: u64 = 200;

    pub fn rating(name: &str) -> i32 {
        let code_points: u64 = name.chars().map(|c| c as u64).sum();
        Self::BASE_RATING + (code_points % Self::SPREAD) as i32 - 100
    }

    /// Rating gap scaled the way Elo scales it (per 400 points).
    pub fn elo_diff(home_rating: i32, away_rating: i32) -> f64 {
        (home_rating - away_rating) as f64 / 400.0
    }
}
