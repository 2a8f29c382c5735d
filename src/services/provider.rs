//! Match data provider abstraction.
//!
//! The prediction engine only talks to a `MatchDataProvider`; the football-data.org
//! client is one implementation, test stubs are another. Everything crossing this
//! trait is already validated into the domain types in `crate::models`.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CompetitionSummary, MatchRecord, StandingsTable, TeamIdentity};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider answered but has no such resource.
    #[error("not found: {0}")]
    NotFound(String),
    /// Network failure, timeout, or a non-success status other than 404.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    /// The provider answered with something that does not decode into our types.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotFound(_) => "not_found",
            ProviderError::Unavailable(_) => "unavailable",
            ProviderError::Malformed(_) => "malformed",
        }
    }
}

#[async_trait]
pub trait MatchDataProvider: Send + Sync {
    async fn fetch_competitions(&self) -> Result<Vec<CompetitionSummary>, ProviderError>;

    /// Scheduled matches of a competition.
    async fn fetch_competition_matches(&self, competition_id: u64) -> Result<Vec<MatchRecord>, ProviderError>;

    async fn fetch_competition_teams(&self, competition_id: u64) -> Result<Vec<TeamIdentity>, ProviderError>;

    async fn fetch_standings(&self, competition_id: u64) -> Result<Vec<StandingsTable>, ProviderError>;

    async fn fetch_match(&self, match_id: u64) -> Result<MatchRecord, ProviderError>;

    /// Up to `limit` finished matches of a team, in provider order.
    async fn fetch_team_recent_matches(&self, team_id: u64, limit: u32) -> Result<Vec<MatchRecord>, ProviderError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}
