use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamIdentity {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    Timed,
    InPlay,
    Paused,
    Finished,
    Postponed,
    Suspended,
    #[serde(alias = "CANCELED")]
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Final goal counts. Either side may be missing on a half-filled provider record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullTimeScore {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

impl FullTimeScore {
    pub fn both(&self) -> Option<(u32, u32)> {
        Some((self.home?, self.away?))
    }
}

/// A match as seen by the engine, already validated at the provider boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: u64,
    pub utc_date: Option<DateTime<Utc>>,
    pub home_team: TeamIdentity,
    pub away_team: TeamIdentity,
    pub full_time: Option<FullTimeScore>,
    pub status: MatchStatus,
    pub competition: Option<CompetitionRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentResult {
    pub opponent: String,
    #[serde(rename = "gf")]
    pub goals_for: u32,
    #[serde(rename = "ga")]
    pub goals_against: u32,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormStats {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    #[serde(rename = "avg_gf")]
    pub avg_goals_for: f64,
    #[serde(rename = "avg_ga")]
    pub avg_goals_against: f64,
    pub recent: Vec<RecentResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
}

/// Outcome percentages, each rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home_pct: f64,
    pub draw_pct: f64,
    pub away_pct: f64,
}

impl OutcomeProbabilities {
    pub fn total(&self) -> f64 {
        self.home_pct + self.draw_pct + self.away_pct
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub match_id: u64,
    pub home: String,
    pub away: String,
    pub home_stats: FormStats,
    pub away_stats: FormStats,
    pub expected_goals: ExpectedGoals,
    pub probabilities: OutcomeProbabilities,
    pub predicted_winner: String,
}

/// Rating-only prediction for two names with no match history behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamePrediction {
    pub home: String,
    pub away: String,
    pub home_rating: i32,
    pub away_rating: i32,
    pub expected_goals: ExpectedGoals,
    pub probabilities: OutcomeProbabilities,
    pub predicted_winner: String,
}

// Listing shapes (also the shapes stored in the local fallback snapshot)

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub area: Option<String>,
}

/// Scheduled fixture as listed to clients. Every field is optional so a
/// hand-edited snapshot row still gets served as written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureSummary {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "utcDate", default)]
    pub utc_date: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub home_team_id: Option<u64>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub away_team_id: Option<u64>,
    #[serde(default)]
    pub status: Option<MatchStatus>,
}

impl From<&MatchRecord> for FixtureSummary {
    fn from(m: &MatchRecord) -> Self {
        let kickoff = m.utc_date.map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true));
        Self {
            id: Some(m.id),
            utc_date: kickoff.clone(),
            date: kickoff,
            home_team: Some(m.home_team.name.clone()),
            home_team_id: Some(m.home_team.id),
            away_team: Some(m.away_team.name.clone()),
            away_team_id: Some(m.away_team.id),
            status: Some(m.status),
        }
    }
}

/// Team as listed to clients. Snapshot entries may carry only a name, in
/// which case no id is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
}

impl From<TeamIdentity> for TeamSummary {
    fn from(t: TeamIdentity) -> Self {
        Self { id: Some(t.id), name: t.name }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub position: u32,
    pub team: TeamIdentity,
    pub played_games: u32,
    pub won: u32,
    pub draw: u32,
    pub lost: u32,
    pub points: i32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsTable {
    pub stage: Option<String>,
    pub kind: String, // "TOTAL", "HOME", "AWAY"
    pub group: Option<String>,
    pub rows: Vec<StandingRow>,
}

/// Body of every non-2xx API response.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}
