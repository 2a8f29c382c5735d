use crate::models::{ExpectedGoals, FormStats};
use crate::services::RatingEstimator;
use crate::utils::{form_ratio, round_to};

// Fixed calibration knobs. Not fitted to results.
const HOME_BASE: f64 = 1.1;
const AWAY_BASE: f64 = 0.9;
const FORM_WEIGHT: f64 = 0.6;
const GOAL_DIFF_WEIGHT: f64 = 0.25;
const HOME_FLOOR: f64 = 0.1;
const AWAY_FLOOR: f64 = 0.05;

// Name-only variant
const NAME_HOME_BASE: f64 = 1.2;
const NAME_AWAY_BASE: f64 = 1.0;
const NAME_HOME_FLOOR: f64 = 0.2;
const NAME_AWAY_FLOOR: f64 = 0.1;

/// Turns ratings and recent form into expected goal rates for each side.
pub struct ExpectedGoalModel;

impl ExpectedGoalModel {
    pub fn from_form(
        home_rating: i32,
        home: &FormStats,
        away_rating: i32,
        away: &FormStats,
    ) -> ExpectedGoals {
        let elo_diff = RatingEstimator::elo_diff(home_rating, away_rating);
        let form_diff = form_ratio(home.wins, home.draws, home.played)
            - form_ratio(away.wins, away.draws, away.played);
        let home_attack = home.avg_goals_for - away.avg_goals_against;
        let away_attack = away.avg_goals_for - home.avg_goals_against;

        let home_goals = HOME_BASE + elo_diff + FORM_WEIGHT * form_diff + GOAL_DIFF_WEIGHT * home_attack;
        let away_goals = AWAY_BASE - elo_diff - FORM_WEIGHT * form_diff + GOAL_DIFF_WEIGHT * away_attack;

        ExpectedGoals {
            home: round_to(home_goals, 2).max(HOME_FLOOR),
            away: round_to(away_goals, 2).max(AWAY_FLOOR),
        }
    }

    /// Used when neither side has any history: ratings only.
    pub fn from_ratings(home_rating: i32, away_rating: i32) -> ExpectedGoals {
        let elo_diff = RatingEstimator::elo_diff(home_rating, away_rating);
        ExpectedGoals {
            home: (NAME_HOME_BASE + elo_diff * (400.0 / 800.0)).max(NAME_HOME_FLOOR),
            away: (NAME_AWAY_BASE - elo_diff * (400.0 / 900.0)).max(NAME_AWAY_FLOOR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(played: u32, wins: u32, draws: u32, avg_gf: f64, avg_ga: f64) -> FormStats {
        FormStats {
            played,
            wins,
            draws,
            losses: played - wins - draws,
            avg_goals_for: avg_gf,
            avg_goals_against: avg_ga,
            recent: Vec::new(),
        }
    }

    #[test]
    fn test_composite_formula() {
        let home = form(5, 3, 1, 1.8, 0.8);
        let away = form(5, 1, 2, 1.1, 1.4);
        let xg = ExpectedGoalModel::from_form(1510, &home, 1493, &away);
        // 1.1 + 0.0425 + 0.6 * (1/3) + 0.25 * 0.4
        assert_eq!(xg.home, 1.44);
        // 0.9 - 0.0425 - 0.6 * (1/3) + 0.25 * 0.3
        assert_eq!(xg.away, 0.73);
    }

    #[test]
    fn test_no_history_uses_ratings_and_base_rates() {
        let empty = FormStats::default();
        let xg = ExpectedGoalModel::from_form(1500, &empty, 1500, &empty);
        assert_eq!(xg.home, 1.1);
        assert_eq!(xg.away, 0.9);
    }

    #[test]
    fn test_floors() {
        let weak = form(3, 0, 0, 0.0, 3.0);
        let strong = form(3, 3, 0, 3.0, 0.0);

        let xg = ExpectedGoalModel::from_form(1400, &weak, 1599, &strong);
        assert_eq!(xg.home, 0.1);

        let xg = ExpectedGoalModel::from_form(1599, &strong, 1400, &weak);
        assert_eq!(xg.away, 0.05);
    }

    #[test]
    fn test_rates_always_positive() {
        let shapes = [
            form(0, 0, 0, 0.0, 0.0),
            form(8, 8, 0, 4.5, 0.0),
            form(8, 0, 0, 0.0, 5.25),
            form(8, 2, 3, 1.13, 1.5),
        ];
        for home in &shapes {
            for away in &shapes {
                for (hr, ar) in [(1400, 1599), (1599, 1400), (1500, 1500)] {
                    let xg = ExpectedGoalModel::from_form(hr, home, ar, away);
                    assert!(xg.home >= 0.1 && xg.away >= 0.05, "{:?}", xg);
                }
            }
        }
    }

    #[test]
    fn test_name_only_variant() {
        let xg = ExpectedGoalModel::from_ratings(1413, 1526);
        let elo_diff = -113.0 / 400.0;
        assert!((xg.home - (1.2 + elo_diff * 0.5)).abs() < 1e-12);
        assert!((xg.away - (1.0 - elo_diff * 400.0 / 900.0)).abs() < 1e-12);
        assert!(xg.home >= 0.2 && xg.away >= 0.1);
    }
}
