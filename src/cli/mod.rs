use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::models::{FixtureSummary, FormStats, TeamSummary};
use crate::services::{FallbackStore, FootballDataClient, MatchDataProvider, PredictionEngine};

fn engine(config: &Config) -> Result<PredictionEngine> {
    Ok(PredictionEngine::new(Arc::new(FootballDataClient::new(config)?), config))
}

/// Provider kickoff times are RFC 3339; snapshot rows may hold anything.
fn kickoff(f: &FixtureSummary) -> String {
    match f.utc_date.as_deref().or(f.date.as_deref()) {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|d| d.with_timezone(&Utc).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => "TBD".to_string(),
    }
}

fn form_line(stats: &FormStats) -> String {
    format!(
        "{} PJ · W{}-D{}-L{} · GF {:.2} GA {:.2}",
        stats.played, stats.wins, stats.draws, stats.losses, stats.avg_goals_for, stats.avg_goals_against
    )
}

pub async fn predict_match(config: &Config, match_id: u64) -> Result<()> {
    println!("🔮 Predicting match {}...", match_id);

    let p = engine(config)?.predict_by_match(match_id).await?;

    println!("\n⚽ {} vs {}", p.home, p.away);
    println!("   Home form: {}", form_line(&p.home_stats));
    println!("   Away form: {}", form_line(&p.away_stats));
    println!("   xG: {:.2} - {:.2}", p.expected_goals.home, p.expected_goals.away);
    println!(
        "   Home {:.1}% | Draw {:.1}% | Away {:.1}%",
        p.probabilities.home_pct, p.probabilities.draw_pct, p.probabilities.away_pct
    );
    println!("🎯 Predicted: {}", p.predicted_winner);

    if !p.home_stats.recent.is_empty() {
        println!("\n📅 {} recent:", p.home);
        for r in &p.home_stats.recent {
            println!("   {} {}-{}", r.opponent, r.goals_for, r.goals_against);
        }
    }

    Ok(())
}

pub fn predict_names(config: &Config, home: &str, away: &str) -> Result<()> {
    if !crate::utils::validate_team_name(home) || !crate::utils::validate_team_name(away) {
        bail!("both team names must be non-empty");
    }

    let p = engine(config)?.predict_by_names(home, away)?;

    println!("⚽ {} ({}) vs {} ({})", p.home, p.home_rating, p.away, p.away_rating);
    println!("   xG: {:.2} - {:.2}", p.expected_goals.home, p.expected_goals.away);
    println!(
        "   Home {:.1}% | Draw {:.1}% | Away {:.1}%",
        p.probabilities.home_pct, p.probabilities.draw_pct, p.probabilities.away_pct
    );
    println!("🎯 Predicted: {}", p.predicted_winner);

    Ok(())
}

pub async fn show_leagues(config: &Config) -> Result<()> {
    let client = FootballDataClient::new(config)?;

    let leagues = match client.fetch_competitions().await {
        Ok(leagues) => leagues,
        Err(e) => {
            println!("⚠️  Provider unavailable ({}), reading local snapshot", e);
            match FallbackStore::new(&config.fallback_dir).load_leagues().await {
                Some(leagues) => leagues,
                None => bail!("no competitions available: {}", e),
            }
        }
    };

    println!("🏆 Available Leagues:\n");
    for league in leagues {
        match league.area {
            Some(area) => println!("   • [{}] {} ({})", league.id, league.name, area),
            None => println!("   • [{}] {}", league.id, league.name),
        }
    }

    Ok(())
}

pub async fn show_matches(config: &Config, competition_id: u64) -> Result<()> {
    let client = FootballDataClient::new(config)?;

    let fixtures: Vec<FixtureSummary> = match client.fetch_competition_matches(competition_id).await {
        Ok(matches) => matches.iter().map(FixtureSummary::from).collect(),
        Err(e) => {
            println!("⚠️  Provider unavailable ({}), reading local snapshot", e);
            match FallbackStore::new(&config.fallback_dir).load_matches(competition_id).await {
                Some(fixtures) => fixtures,
                None => bail!("no matches available for {}: {}", competition_id, e),
            }
        }
    };

    if fixtures.is_empty() {
        println!("📭 No scheduled matches for competition {}", competition_id);
        return Ok(());
    }

    println!("📅 Scheduled matches:\n");
    for f in fixtures {
        println!(
            "   [{}] {} {} vs {}",
            f.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string()),
            kickoff(&f),
            f.home_team.as_deref().unwrap_or("TBD"),
            f.away_team.as_deref().unwrap_or("TBD")
        );
    }
    println!("\n💡 Use 'quiniela predict --match-id <id>' for a prediction");

    Ok(())
}

pub async fn show_teams(config: &Config, competition_id: u64) -> Result<()> {
    let client = FootballDataClient::new(config)?;

    let teams: Vec<TeamSummary> = match client.fetch_competition_teams(competition_id).await {
        Ok(teams) => teams.into_iter().map(TeamSummary::from).collect(),
        Err(e) => {
            println!("⚠️  Provider unavailable ({}), reading local snapshot", e);
            match FallbackStore::new(&config.fallback_dir).load_teams(competition_id).await {
                Some(teams) => teams,
                None => bail!("no teams available for {}: {}", competition_id, e),
            }
        }
    };

    println!("👥 Teams ({}):\n", teams.len());
    for t in teams {
        println!("   • {}", t.name);
    }

    Ok(())
}

pub async fn show_standings(config: &Config, competition_id: u64) -> Result<()> {
    let tables = FootballDataClient::new(config)?.fetch_standings(competition_id).await?;

    for table in tables.iter().filter(|t| t.kind == "TOTAL") {
        println!("📊 {} {}", table.stage.as_deref().unwrap_or(""), table.group.as_deref().unwrap_or(""));
        println!("   {:>3}  {:<28} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4}", "#", "Team", "PJ", "W", "D", "L", "GD", "Pts");
        for row in &table.rows {
            println!(
                "   {:>3}  {:<28} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4}",
                row.position, row.team.name, row.played_games, row.won, row.draw, row.lost, row.goal_difference, row.points
            );
        }
        println!();
    }

    Ok(())
}
