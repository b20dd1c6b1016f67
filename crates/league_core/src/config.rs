//! League configuration.
//!
//! Defaults reproduce the four-team, eighteen-week product. A YAML file can
//! override any field; its path is read from `LEAGUE_CONFIG_PATH`.

use crate::data::TEAM_CATALOG;
use crate::error::{LeagueError, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const CONFIG_PATH_ENV: &str = "LEAGUE_CONFIG_PATH";

pub const DEFAULT_TEAM_COUNT: usize = 4;
pub const DEFAULT_CYCLES: usize = 3;
pub const DEFAULT_TRIALS: usize = 10_000;
pub const DEFAULT_MAX_MANUAL_GOALS: u8 = 9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    /// Expected (even) number of teams in the league
    pub team_count: usize,
    /// How many double round-robins make up a season
    pub cycles: usize,
    /// Monte Carlo trials per championship projection
    pub trials: usize,
    /// Upper bound accepted for a manually entered score
    pub max_manual_goals: u8,
    /// Season RNG seed; drawn from entropy when absent
    pub seed: Option<u64>,
    pub league_name: String,
    pub season_label: String,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            team_count: DEFAULT_TEAM_COUNT,
            cycles: DEFAULT_CYCLES,
            trials: DEFAULT_TRIALS,
            max_manual_goals: DEFAULT_MAX_MANUAL_GOALS,
            seed: None,
            league_name: "Premier League".to_string(),
            season_label: "2024/25".to_string(),
        }
    }
}

impl LeagueConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: LeagueConfig = serde_yaml::from_str(yaml)
            .map_err(|e| LeagueError::InvalidConfig(format!("failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LeagueError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load from the file named by `LEAGUE_CONFIG_PATH`, or defaults when unset.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        Self::from_path(Path::new(path))
    }

    pub fn validate(&self) -> Result<()> {
        if self.team_count < 2 || self.team_count % 2 != 0 {
            return Err(LeagueError::InvalidConfig(format!(
                "team_count must be an even number >= 2, got {}",
                self.team_count
            )));
        }
        if self.team_count > TEAM_CATALOG.len() {
            return Err(LeagueError::InvalidConfig(format!(
                "team_count {} exceeds the {} catalog teams",
                self.team_count,
                TEAM_CATALOG.len()
            )));
        }
        if self.cycles == 0 {
            return Err(LeagueError::InvalidConfig("cycles must be at least 1".to_string()));
        }
        if self.trials == 0 {
            return Err(LeagueError::InvalidConfig("trials must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }
}
