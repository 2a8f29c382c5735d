use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::Exp;
use thiserror::Error;

use crate::models::{ExpectedGoals, OutcomeProbabilities};
use crate::utils::percentage;

/// Label used when the draw is predicted (including every tie).
pub const DRAW_LABEL: &str = "Empate";

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("expected goal rate must be positive and finite, got {0}")]
    InvalidRate(f64),
    #[error("simulation needs at least one trial")]
    NoTrials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Home,
    Draw,
    Away,
}

impl Winner {
    /// Home or away only on a strict majority over both other outcomes.
    pub fn pick<T: PartialOrd>(home: T, draw: T, away: T) -> Self {
        if home > draw && home > away {
            Winner::Home
        } else if away > home && away > draw {
            Winner::Away
        } else {
            Winner::Draw
        }
    }

    pub fn label(self, home_name: &str, away_name: &str) -> String {
        match self {
            Winner::Home => home_name.to_string(),
            Winner::Away => away_name.to_string(),
            Winner::Draw => DRAW_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationTally {
    pub home_wins: u32,
    pub draws: u32,
    pub away_wins: u32,
    pub trials: u32,
}

impl SimulationTally {
    pub fn probabilities(&self) -> OutcomeProbabilities {
        OutcomeProbabilities {
            home_pct: percentage(self.home_wins, self.trials),
            draw_pct: percentage(self.draws, self.trials),
            away_pct: percentage(self.away_wins, self.trials),
        }
    }

    /// Decided on raw counts, so two outcomes that only tie after rounding stay apart.
    pub fn winner(&self) -> Winner {
        Winner::pick(self.home_wins, self.draws, self.away_wins)
    }
}

/// Monte Carlo match simulator.
///
/// Goal counts are drawn from an exponential distribution with the expected rate
/// as its mean and floored to an integer. This approximates a Poisson process
/// rather than sampling one.
pub struct OutcomeSimulator {
    trials: u32,
}

impl OutcomeSimulator {
    pub fn new(trials: u32) -> Self {
        Self { trials }
    }

    pub fn simulate<R: Rng + ?Sized>(
        &self,
        expected: ExpectedGoals,
        rng: &mut R,
    ) -> Result<SimulationTally, SimulationError> {
        if self.trials == 0 {
            return Err(SimulationError::NoTrials);
        }
        let home_dist = goal_distribution(expected.home)?;
        let away_dist = goal_distribution(expected.away)?;

        let mut tally = SimulationTally { home_wins: 0, draws: 0, away_wins: 0, trials: self.trials };
        for _ in 0..self.trials {
            let home_goals = home_dist.sample(rng).floor() as u32;
            let away_goals = away_dist.sample(rng).floor() as u32;
            match home_goals.cmp(&away_goals) {
                std::cmp::Ordering::Greater => tally.home_wins += 1,
                std::cmp::Ordering::Equal => tally.draws += 1,
                std::cmp::Ordering::Less => tally.away_wins += 1,
            }
        }

        Ok(tally)
    }
}

fn goal_distribution(mean: f64) -> Result<Exp, SimulationError> {
    if !(mean.is_finite() && mean > 0.0) {
        return Err(SimulationError::InvalidRate(mean));
    }
    Exp::new(1.0 / mean).map_err(|_| SimulationError::InvalidRate(mean))
}
