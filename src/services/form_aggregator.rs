use std::cmp::Ordering;

use crate::models::{FormStats, MatchRecord, RecentResult};
use crate::utils::round_to;

/// Reduces a team's recent finished matches into `FormStats`.
pub struct TeamFormAggregator;

impl TeamFormAggregator {
    /// Aggregate `matches` from the point of view of the team called `team_name`.
    ///
    /// Records without both full-time goal counts are skipped. The subject side is
    /// found by comparing `team_name` with the home team's name, so two clubs
    /// sharing a display name will be misattributed.
    pub fn aggregate(team_name: &str, matches: &[MatchRecord]) -> FormStats {
        let mut stats = FormStats::default();
        let mut goals_for = 0u32;
        let mut goals_against = 0u32;

        for m in matches {
            let Some((home_goals, away_goals)) = m.full_time.and_then(|s| s.both()) else {
                tracing::debug!("Skipping match {} for {}: no full-time score", m.id, team_name);
                continue;
            };

            let at_home = m.home_team.name == team_name;
            let (gf, ga, opponent) = if at_home {
                (home_goals, away_goals, &m.away_team.name)
            } else {
                (away_goals, home_goals, &m.home_team.name)
            };

            stats.played += 1;
            goals_for += gf;
            goals_against += ga;
            match gf.cmp(&ga) {
                Ordering::Greater => stats.wins += 1,
                Ordering::Equal => stats.draws += 1,
                Ordering::Less => stats.losses += 1,
            }

            stats.recent.push(RecentResult {
                opponent: opponent.clone(),
                goals_for: gf,
                goals_against: ga,
                date: m.utc_date,
            });
        }

        if stats.played > 0 {
            stats.avg_goals_for = round_to(goals_for as f64 / stats.played as f64, 2);
            stats.avg_goals_against = round_to(goals_against as f64 / stats.played as f64, 2);
        }

        stats
    }
}
