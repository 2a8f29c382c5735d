use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::config::Config;
use crate::models::{ExpectedGoals, MatchRecord, NamePrediction, PredictionResult};
use crate::services::{
    ExpectedGoalModel, MatchDataProvider, OutcomeSimulator, ProviderError, RatingEstimator, SimulationError,
    TeamFormAggregator,
};

#[derive(Debug, Error, PartialEq)]
pub enum PredictionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Builds match predictions from provider data. One instance serves many
/// requests; nothing is cached between them.
pub struct PredictionEngine {
    provider: Arc<dyn MatchDataProvider>,
    recent_match_limit: u32,
    match_simulator: OutcomeSimulator,
    name_simulator: OutcomeSimulator,
    seed: Option<u64>,
}

impl PredictionEngine {
    pub fn new(provider: Arc<dyn MatchDataProvider>, config: &Config) -> Self {
        Self {
            provider,
            recent_match_limit: config.recent_match_limit,
            match_simulator: OutcomeSimulator::new(config.match_simulations),
            name_simulator: OutcomeSimulator::new(config.name_simulations),
            seed: config.simulation_seed,
        }
    }

    pub fn provider(&self) -> &Arc<dyn MatchDataProvider> {
        &self.provider
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Predict a scheduled match from both teams' recent finished matches.
    pub async fn predict_by_match(&self, match_id: u64) -> Result<PredictionResult, PredictionError> {
        tracing::debug!("Fetching match {} from {}", match_id, self.provider.provider_name());
        let fixture = self.provider.fetch_match(match_id).await?;
        let home = &fixture.home_team;
        let away = &fixture.away_team;

        // The two histories are independent; the first failure aborts both.
        let (home_history, away_history) = tokio::try_join!(
            self.provider.fetch_team_recent_matches(home.id, self.recent_match_limit),
            self.provider.fetch_team_recent_matches(away.id, self.recent_match_limit),
        )?;

        let result = self.assemble(&fixture, &home_history, &away_history)?;

        tracing::info!(
            "Prediction for {} vs {} (match {}): Home {:.1}%, Draw {:.1}%, Away {:.1}% -> {}",
            result.home,
            result.away,
            match_id,
            result.probabilities.home_pct,
            result.probabilities.draw_pct,
            result.probabilities.away_pct,
            result.predicted_winner
        );

        Ok(result)
    }

    fn assemble(
        &self,
        fixture: &MatchRecord,
        home_history: &[MatchRecord],
        away_history: &[MatchRecord],
    ) -> Result<PredictionResult, PredictionError> {
        let home_name = &fixture.home_team.name;
        let away_name = &fixture.away_team.name;

        let home_stats = TeamFormAggregator::aggregate(home_name, home_history);
        let away_stats = TeamFormAggregator::aggregate(away_name, away_history);

        let home_rating = RatingEstimator::rating(home_name);
        let away_rating = RatingEstimator::rating(away_name);

        let expected_goals = ExpectedGoalModel::from_form(home_rating, &home_stats, away_rating, &away_stats);
        let tally = self.match_simulator.simulate(expected_goals, &mut self.rng())?;
        let probabilities = tally.probabilities();
        debug_assert!((probabilities.total() - 100.0).abs() <= 0.1 + 1e-9);

        Ok(PredictionResult {
            match_id: fixture.id,
            home: home_name.clone(),
            away: away_name.clone(),
            home_stats,
            away_stats,
            expected_goals,
            probabilities,
            predicted_winner: tally.winner().label(home_name, away_name),
        })
    }

    /// Rating-only prediction for two free-text team names. No provider calls.
    pub fn predict_by_names(&self, home: &str, away: &str) -> Result<NamePrediction, PredictionError> {
        let home_rating = RatingEstimator::rating(home);
        let away_rating = RatingEstimator::rating(away);
        let expected_goals: ExpectedGoals = ExpectedGoalModel::from_ratings(home_rating, away_rating);
        let tally = self.name_simulator.simulate(expected_goals, &mut self.rng())?;

        tracing::debug!(
            "Name prediction {} ({}) vs {} ({}): xG {:.2}-{:.2}",
            home,
            home_rating,
            away,
            away_rating,
            expected_goals.home,
            expected_goals.away
        );

        Ok(NamePrediction {
            home: home.to_string(),
            away: away.to_string(),
            home_rating,
            away_rating,
            expected_goals,
            probabilities: tally.probabilities(),
            predicted_winner: tally.winner().label(home, away),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{CompetitionSummary, FullTimeScore, MatchStatus, StandingsTable, TeamIdentity};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory provider for engine and router tests.
    #[derive(Default)]
    pub(crate) struct StubProvider {
        pub matches: HashMap<u64, MatchRecord>,
        pub histories: HashMap<u64, Vec<MatchRecord>>,
        pub failing_teams: HashMap<u64, ProviderError>,
        pub competitions: Option<Vec<CompetitionSummary>>,
        pub history_calls: Mutex<Vec<(u64, u32)>>,
    }

    #[async_trait]
    impl MatchDataProvider for StubProvider {
        async fn fetch_competitions(&self) -> Result<Vec<CompetitionSummary>, ProviderError> {
            self.competitions
                .clone()
                .ok_or_else(|| ProviderError::Unavailable("stub offline".to_string()))
        }

        async fn fetch_competition_matches(&self, competition_id: u64) -> Result<Vec<MatchRecord>, ProviderError> {
            let found: Vec<MatchRecord> = self
                .matches
                .values()
                .filter(|m| m.competition.as_ref().map(|c| c.id) == Some(competition_id))
                .cloned()
                .collect();
            if found.is_empty() {
                Err(ProviderError::Unavailable("stub offline".to_string()))
            } else {
                Ok(found)
            }
        }

        async fn fetch_competition_teams(&self, _competition_id: u64) -> Result<Vec<TeamIdentity>, ProviderError> {
            Err(ProviderError::Unavailable("stub offline".to_string()))
        }

        async fn fetch_standings(&self, _competition_id: u64) -> Result<Vec<StandingsTable>, ProviderError> {
            Err(ProviderError::Unavailable("stub offline".to_string()))
        }

        async fn fetch_match(&self, match_id: u64) -> Result<MatchRecord, ProviderError> {
            self.matches
                .get(&match_id)
                .cloned()
                .ok_or_else(|| ProviderError::NotFound(format!("match {}", match_id)))
        }

        async fn fetch_team_recent_matches(&self, team_id: u64, limit: u32) -> Result<Vec<MatchRecord>, ProviderError> {
            self.history_calls.lock().unwrap().push((team_id, limit));
            if let Some(err) = self.failing_teams.get(&team_id) {
                return Err(err.clone());
            }
            Ok(self.histories.get(&team_id).cloned().unwrap_or_default())
        }

        fn provider_name(&self) -> &str {
            "stub"
        }
    }

    pub(crate) fn team(id: u64, name: &str) -> TeamIdentity {
        TeamIdentity { id, name: name.to_string() }
    }

    pub(crate) fn played(id: u64, home: &TeamIdentity, away: &TeamIdentity, score: Option<(u32, u32)>) -> MatchRecord {
        MatchRecord {
            id,
            utc_date: None,
            home_team: home.clone(),
            away_team: away.clone(),
            full_time: score.map(|(h, a)| FullTimeScore { home: Some(h), away: Some(a) }),
            status: if score.is_some() { MatchStatus::Finished } else { MatchStatus::Scheduled },
            competition: None,
        }
    }

    /// Real Madrid (86) host Celta (558) in match 100; both have some history.
    pub(crate) fn clasico_stub() -> StubProvider {
        let madrid = team(86, "Real Madrid CF");
        let celta = team(558, "RC Celta de Vigo");
        let betis = team(90, "Real Betis");
        let girona = team(298, "Girona FC");

        let mut stub = StubProvider::default();
        stub.matches.insert(100, played(100, &madrid, &celta, None));
        stub.histories.insert(
            86,
            vec![
                played(1, &madrid, &betis, Some((3, 0))),
                played(2, &girona, &madrid, Some((1, 2))),
                played(3, &madrid, &girona, Some((1, 1))),
                played(4, &betis, &madrid, None),
            ],
        );
        stub.histories.insert(
            558,
            vec![
                played(5, &celta, &betis, Some((0, 2))),
                played(6, &girona, &celta, Some((1, 1))),
            ],
        );
        stub
    }

    fn engine(stub: StubProvider, seed: Option<u64>) -> (PredictionEngine, Arc<StubProvider>) {
        let stub = Arc::new(stub);
        let config = Config { simulation_seed: seed, ..Config::default() };
        (PredictionEngine::new(stub.clone(), &config), stub)
    }

    #[tokio::test]
    async fn test_predict_by_match_assembles_everything() {
        let (engine, stub) = engine(clasico_stub(), Some(11));
        let result = engine.predict_by_match(100).await.unwrap();

        assert_eq!(result.match_id, 100);
        assert_eq!(result.home, "Real Madrid CF");
        assert_eq!(result.away, "RC Celta de Vigo");

        // Unscored history entry is skipped.
        assert_eq!(result.home_stats.played, 3);
        assert_eq!((result.home_stats.wins, result.home_stats.draws), (2, 1));
        assert_eq!(result.home_stats.avg_goals_for, 2.0);
        assert_eq!(result.away_stats.played, 2);
        assert_eq!(result.away_stats.losses, 1);

        assert!(result.expected_goals.home >= 0.1 && result.expected_goals.away >= 0.05);
        assert!((result.probabilities.total() - 100.0).abs() <= 0.1 + 1e-9);
        assert!(!result.predicted_winner.is_empty());

        let mut calls = stub.history_calls.lock().unwrap().clone();
        calls.sort();
        assert_eq!(calls, [(86, 8), (558, 8)]);
    }

    #[tokio::test]
    async fn test_seeded_engine_is_repeatable() {
        let (engine, _) = engine(clasico_stub(), Some(5));
        let first = engine.predict_by_match(100).await.unwrap();
        let second = engine.predict_by_match(100).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_history_failure_aborts_prediction() {
        let mut stub = clasico_stub();
        stub.failing_teams
            .insert(558, ProviderError::Unavailable("timeout".to_string()));
        let (engine, _) = engine(stub, None);

        let err = engine.predict_by_match(100).await.unwrap_err();
        assert_eq!(err, PredictionError::Provider(ProviderError::Unavailable("timeout".to_string())));
    }

    #[tokio::test]
    async fn test_unknown_match_is_not_found() {
        let (engine, stub) = engine(clasico_stub(), None);
        let err = engine.predict_by_match(7).await.unwrap_err();
        assert!(matches!(err, PredictionError::Provider(ProviderError::NotFound(_))));
        assert!(stub.history_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_teams_without_history_still_predict() {
        let mut stub = clasico_stub();
        stub.histories.clear();
        let (engine, _) = engine(stub, Some(3));
        let result = engine.predict_by_match(100).await.unwrap();
        assert_eq!(result.home_stats.played, 0);
        assert_eq!(result.away_stats.avg_goals_for, 0.0);
        assert!((result.probabilities.total() - 100.0).abs() <= 0.1 + 1e-9);
    }

    #[test]
    fn test_predict_by_names() {
        let (engine, _) = engine(StubProvider::default(), Some(99));
        let p = engine.predict_by_names("Real Madrid", "Celta Vigo").unwrap();

        assert_eq!(p.home_rating, 1413);
        assert_eq!(p.away_rating, 1526);
        assert!(p.expected_goals.home >= 0.2);
        assert!(p.expected_goals.away >= 0.1);
        assert!((p.probabilities.total() - 100.0).abs() <= 0.1 + 1e-9);
        assert_eq!(p, engine.predict_by_names("Real Madrid", "Celta Vigo").unwrap());
    }
}
