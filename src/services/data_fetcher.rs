use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::Config;
use crate::models::{
    CompetitionRef, CompetitionSummary, FullTimeScore, MatchRecord, MatchStatus, StandingRow,
    StandingsTable, TeamIdentity,
};
use crate::services::{MatchDataProvider, ProviderError};

// ── football-data.org structures ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CompetitionsResponse {
    #[serde(default)]
    competitions: Vec<RawCompetition>,
}

#[derive(Debug, Deserialize)]
struct RawCompetition {
    id: Option<u64>,
    name: Option<String>,
    area: Option<RawArea>,
}

#[derive(Debug, Deserialize)]
struct RawArea {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    teams: Vec<RawTeam>,
}

#[derive(Debug, Deserialize)]
struct MatchesResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

/// `/matches/{id}` has been served both bare and wrapped in `{"match": …}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MatchEnvelope {
    Wrapped {
        #[serde(rename = "match")]
        inner: RawMatch,
    },
    Bare(RawMatch),
}

impl MatchEnvelope {
    fn into_inner(self) -> RawMatch {
        match self {
            MatchEnvelope::Wrapped { inner } => inner,
            MatchEnvelope::Bare(m) => m,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatch {
    id: Option<u64>,
    utc_date: Option<String>,
    status: Option<MatchStatus>,
    home_team: Option<RawTeam>,
    away_team: Option<RawTeam>,
    score: Option<RawScore>,
    competition: Option<RawCompetition>,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    id: Option<u64>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScore {
    full_time: Option<FullTimeScore>,
}

#[derive(Debug, Deserialize)]
struct StandingsResponse {
    #[serde(default)]
    standings: Vec<RawStandingGroup>,
}

#[derive(Debug, Deserialize)]
struct RawStandingGroup {
    stage: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    group: Option<String>,
    #[serde(default)]
    table: Vec<RawStandingRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStandingRow {
    position: u32,
    team: RawTeam,
    #[serde(default)]
    played_games: u32,
    #[serde(default)]
    won: u32,
    #[serde(default)]
    draw: u32,
    #[serde(default)]
    lost: u32,
    #[serde(default)]
    points: i32,
    #[serde(default)]
    goals_for: u32,
    #[serde(default)]
    goals_against: u32,
    #[serde(default)]
    goal_difference: i32,
}

// ── Boundary validation ─────────────────────────────────────────────────────

impl RawTeam {
    fn validate(self, side: &str) -> Result<TeamIdentity, String> {
        match (self.id, self.name) {
            (Some(id), Some(name)) if !name.trim().is_empty() => Ok(TeamIdentity { id, name }),
            _ => Err(format!("{} team is missing its id or name", side)),
        }
    }
}

impl RawMatch {
    fn validate(self) -> Result<MatchRecord, String> {
        let id = self.id.ok_or_else(|| "match has no id".to_string())?;
        let home_team = self
            .home_team
            .ok_or_else(|| format!("match {} has no home team", id))?
            .validate("home")
            .map_err(|e| format!("match {}: {}", id, e))?;
        let away_team = self
            .away_team
            .ok_or_else(|| format!("match {} has no away team", id))?
            .validate("away")
            .map_err(|e| format!("match {}: {}", id, e))?;

        let utc_date = self.utc_date.as_deref().and_then(|raw| match DateTime::parse_from_rfc3339(raw) {
            Ok(d) => Some(d.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!("Bad date '{}' on match {}: {}", raw, id, e);
                None
            }
        });

        let competition = self.competition.and_then(|c| match (c.id, c.name) {
            (Some(id), Some(name)) => Some(CompetitionRef { id, name }),
            _ => None,
        });

        Ok(MatchRecord {
            id,
            utc_date,
            home_team,
            away_team,
            full_time: self.score.and_then(|s| s.full_time),
            status: self.status.unwrap_or(MatchStatus::Unknown),
            competition,
        })
    }
}

/// Keep the records that validate; a bad historical record must not sink the list.
fn validate_matches(raw: Vec<RawMatch>) -> Vec<MatchRecord> {
    raw.into_iter()
        .filter_map(|m| match m.validate() {
            Ok(record) => Some(record),
            Err(reason) => {
                tracing::warn!("Dropping provider match record: {}", reason);
                None
            }
        })
        .collect()
}

fn status_error(status: u16, url: &str, body: &str) -> ProviderError {
    let snippet: String = body.chars().take(200).collect();
    if status == 404 {
        ProviderError::NotFound(format!("{} ({})", url, snippet))
    } else {
        ProviderError::Unavailable(format!("{} returned {}: {}", url, status, snippet))
    }
}

// ── FootballDataClient ──────────────────────────────────────────────────────

pub struct FootballDataClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl FootballDataClient {
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        if config.football_data_key.is_none() {
            tracing::warn!("FOOTBALL_DATA_KEY not set; requests go out unauthenticated and listings may fall back to local JSON");
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.football_data_key.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header("X-Auth-Token", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &url, &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("{}: {}", url, e)))?;

        serde_json::from_slice(&bytes).map_err(|e| ProviderError::Malformed(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl MatchDataProvider for FootballDataClient {
    async fn fetch_competitions(&self) -> Result<Vec<CompetitionSummary>, ProviderError> {
        let data: CompetitionsResponse = self.get_json("/competitions", &[]).await?;
        Ok(data
            .competitions
            .into_iter()
            .filter_map(|c| {
                Some(CompetitionSummary {
                    id: c.id?,
                    name: c.name?,
                    area: c.area.and_then(|a| a.name),
                })
            })
            .collect())
    }

    async fn fetch_competition_matches(&self, competition_id: u64) -> Result<Vec<MatchRecord>, ProviderError> {
        let path = format!("/competitions/{}/matches", competition_id);
        let data: MatchesResponse = self
            .get_json(&path, &[("status", "SCHEDULED".to_string())])
            .await?;
        Ok(validate_matches(data.matches))
    }

    async fn fetch_competition_teams(&self, competition_id: u64) -> Result<Vec<TeamIdentity>, ProviderError> {
        let path = format!("/competitions/{}/teams", competition_id);
        let data: TeamsResponse = self.get_json(&path, &[]).await?;
        Ok(data
            .teams
            .into_iter()
            .filter_map(|t| t.validate("listed").ok())
            .collect())
    }

    async fn fetch_standings(&self, competition_id: u64) -> Result<Vec<StandingsTable>, ProviderError> {
        let path = format!("/competitions/{}/standings", competition_id);
        let data: StandingsResponse = self.get_json(&path, &[]).await?;
        Ok(data
            .standings
            .into_iter()
            .map(|g| StandingsTable {
                stage: g.stage,
                kind: g.kind.unwrap_or_else(|| "TOTAL".to_string()),
                group: g.group,
                rows: g
                    .table
                    .into_iter()
                    .filter_map(|r| {
                        let team = r.team.validate("standings").ok()?;
                        Some(StandingRow {
                            position: r.position,
                            team,
                            played_games: r.played_games,
                            won: r.won,
                            draw: r.draw,
                            lost: r.lost,
                            points: r.points,
                            goals_for: r.goals_for,
                            goals_against: r.goals_against,
                            goal_difference: r.goal_difference,
                        })
                    })
                    .collect(),
            })
            .collect())
    }

    async fn fetch_match(&self, match_id: u64) -> Result<MatchRecord, ProviderError> {
        let path = format!("/matches/{}", match_id);
        let envelope: MatchEnvelope = self.get_json(&path, &[]).await?;
        envelope.into_inner().validate().map_err(ProviderError::Malformed)
    }

    async fn fetch_team_recent_matches(&self, team_id: u64, limit: u32) -> Result<Vec<MatchRecord>, ProviderError> {
        let path = format!("/teams/{}/matches", team_id);
        let query = [("status", "FINISHED".to_string()), ("limit", limit.to_string())];
        let data: MatchesResponse = self.get_json(&path, &query).await?;
        Ok(validate_matches(data.matches))
    }

    fn provider_name(&self) -> &str {
        "football-data.org"
    }
}
