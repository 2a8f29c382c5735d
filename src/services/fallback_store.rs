use std::collections::HashMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::models::{CompetitionSummary, FixtureSummary, TeamSummary};

const LEAGUES_FILE: &str = "leagues.json";
const MATCHES_FILE: &str = "matches.json";
const TEAMS_FILE: &str = "teams.json";

/// Teams in the snapshot are either full objects or bare names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SnapshotTeam {
    Full {
        #[serde(default)]
        id: Option<u64>,
        name: String,
    },
    Name(String),
}

impl From<SnapshotTeam> for TeamSummary {
    fn from(t: SnapshotTeam) -> Self {
        match t {
            SnapshotTeam::Full { id, name } => TeamSummary { id, name },
            SnapshotTeam::Name(name) => TeamSummary { id: None, name },
        }
    }
}

/// Local JSON snapshot served when the live provider is unreachable.
///
/// Every loader returns `None` when there is nothing usable: a missing file, a
/// file that is not JSON of the expected outer shape, or a competition id with
/// no entry. Individual rows that do not decode are skipped, not fatal.
#[derive(Debug, Clone)]
pub struct FallbackStore {
    dir: PathBuf,
}

impl FallbackStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn load_leagues(&self) -> Option<Vec<CompetitionSummary>> {
        let rows: Vec<Value> = self.load(LEAGUES_FILE).await?;
        Some(decode_rows(LEAGUES_FILE, rows))
    }

    pub async fn load_matches(&self, competition_id: u64) -> Option<Vec<FixtureSummary>> {
        let rows = self.load_entry(MATCHES_FILE, competition_id).await?;
        Some(decode_rows(MATCHES_FILE, rows))
    }

    pub async fn load_teams(&self, competition_id: u64) -> Option<Vec<TeamSummary>> {
        let rows = self.load_entry(TEAMS_FILE, competition_id).await?;
        let teams: Vec<SnapshotTeam> = decode_rows(TEAMS_FILE, rows);
        Some(teams.into_iter().map(TeamSummary::from).collect())
    }

    async fn load_entry(&self, file: &str, competition_id: u64) -> Option<Vec<Value>> {
        let mut by_competition: HashMap<String, Vec<Value>> = self.load(file).await?;
        by_competition.remove(&competition_id.to_string())
    }

    async fn load<T: DeserializeOwned>(&self, file: &str) -> Option<T> {
        let path = self.dir.join(file);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("No fallback file {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!("Fallback file {} is not valid: {}", path.display(), e);
                None
            }
        }
    }
}

fn decode_rows<T: DeserializeOwned>(file: &str, rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(i, row)| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping row {} of fallback file {}: {}", i, file, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    async fn snapshot_dir(files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "quiniela-fallback-{}-{}",
            std::process::id(),
            DIR_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        for (name, body) in files {
            tokio::fs::write(dir.join(name), body).await.unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_loads_leagues() {
        let dir = snapshot_dir(&[(
            LEAGUES_FILE,
            r#"[{"id": 2014, "name": "Primera Division", "area": "Spain"}, {"id": 2021, "name": "Premier League"}]"#,
        )])
        .await;
        let leagues = FallbackStore::new(&dir).load_leagues().await.unwrap();
        assert_eq!(leagues.len(), 2);
        assert_eq!(leagues[0].area.as_deref(), Some("Spain"));
        assert_eq!(leagues[1].area, None);
    }

    #[tokio::test]
    async fn test_matches_keyed_by_competition() {
        let dir = snapshot_dir(&[(
            MATCHES_FILE,
            r#"{"2014": [{"id": 77, "date": "2024-05-04T14:00:00Z", "home_team": "Real Madrid CF",
                "home_team_id": 86, "away_team": "Cadiz CF", "away_team_id": 264, "status": "SCHEDULED"}]}"#,
        )])
        .await;
        let store = FallbackStore::new(&dir);
        let matches = store.load_matches(2014).await.unwrap();
        assert_eq!(matches[0].id, Some(77));
        assert_eq!(matches[0].date.as_deref(), Some("2024-05-04T14:00:00Z"));
        assert_eq!(matches[0].status, Some(crate::models::MatchStatus::Scheduled));
        assert!(store.load_matches(2021).await.is_none());
    }

    #[tokio::test]
    async fn test_teams_accept_objects_and_names() {
        let dir = snapshot_dir(&[(TEAMS_FILE, r#"{"2014": [{"id": 86, "name": "Real Madrid CF"}, "Cadiz CF"]}"#)]).await;
        let teams = FallbackStore::new(&dir).load_teams(2014).await.unwrap();
        assert_eq!(teams[0], TeamSummary { id: Some(86), name: "Real Madrid CF".to_string() });
        assert_eq!(teams[1], TeamSummary { id: None, name: "Cadiz CF".to_string() });
    }

    #[tokio::test]
    async fn test_rough_match_rows_are_served_and_junk_rows_skipped() {
        let dir = snapshot_dir(&[(
            MATCHES_FILE,
            r#"{"2014": [
                {"id": 77, "utcDate": "2024-05-04T14:00:00Z", "home_team": "Real Madrid CF",
                 "home_team_id": 86, "away_team": "Cadiz CF", "away_team_id": 264, "status": "SCHEDULED"},
                {"id": 78, "utcDate": "2024-05-05", "home_team": "Girona FC", "home_team_id": 298,
                 "away_team": null, "away_team_id": null, "status": null},
                42
            ]}"#,
        )])
        .await;
        let matches = FallbackStore::new(&dir).load_matches(2014).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].id, Some(78));
        assert_eq!(matches[1].utc_date.as_deref(), Some("2024-05-05"));
        assert_eq!(matches[1].away_team, None);
        assert_eq!(matches[1].status, None);
    }

    #[tokio::test]
    async fn test_bad_league_row_does_not_hide_the_rest() {
        let dir = snapshot_dir(&[(LEAGUES_FILE, r#"[{"name": "No id"}, {"id": 2014, "name": "Primera Division"}]"#)]).await;
        let leagues = FallbackStore::new(&dir).load_leagues().await.unwrap();
        assert_eq!(leagues.len(), 1);
        assert_eq!(leagues[0].id, 2014);
    }

    #[tokio::test]
    async fn test_missing_or_broken_files_give_none() {
        let dir = snapshot_dir(&[(LEAGUES_FILE, "{ not json")]).await;
        let store = FallbackStore::new(&dir);
        assert!(store.load_leagues().await.is_none());
        assert!(store.load_teams(2014).await.is_none());
    }
}
