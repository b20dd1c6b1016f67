use super::TeamId;
use serde::{Deserialize, Serialize};

/// A scheduled match between two arena teams.
///
/// Goals are meaningless until `is_played` is set. A manual override sets both
/// `is_fixed` and `is_played`, so `is_fixed` implies `is_played`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub home: TeamId,
    pub away: TeamId,
    pub home_goals: u8,
    pub away_goals: u8,
    pub is_played: bool,
    pub is_fixed: bool,
    /// 1-based week number
    pub week: usize,
}

impl Match {
    pub fn new(home: TeamId, away: TeamId, week: usize) -> Self {
        Self { home, away, home_goals: 0, away_goals: 0, is_played: false, is_fixed: false, week }
    }

    /// Whether the standings replay should count this match.
    pub fn counts(&self) -> bool {
        self.is_played || self.is_fixed
    }

    pub fn record_simulated(&mut self, home_goals: u8, away_goals: u8) {
        self.home_goals = home_goals;
        self.away_goals = away_goals;
        self.is_played = true;
    }

    pub fn record_override(&mut self, home_goals: u8, away_goals: u8) {
        self.home_goals = home_goals;
        self.away_goals = away_goals;
        self.is_played = true;
        self.is_fixed = true;
    }
}

/// One week of the calendar.
pub type Week = Vec<Match>;

/// Manually entered score, validated before it reaches the season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreInput {
    pub home_goals: u8,
    pub away_goals: u8,
}

impl ScoreInput {
    /// Parse raw text fields. Rejects empty, non-numeric, negative and
    /// above-`max_goals` values.
    pub fn parse(home: &str, away: &str, max_goals: u8) -> crate::Result<Self> {
        Ok(Self {
            home_goals: parse_goals(home, max_goals)?,
            away_goals: parse_goals(away, max_goals)?,
        })
    }
}

fn parse_goals(raw: &str, max_goals: u8) -> crate::Result<u8> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(crate::LeagueError::InvalidScore("empty goal value".to_string()));
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return Err(crate::LeagueError::InvalidScore(format!("'{}' is not a number", trimmed)));
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| crate::LeagueError::InvalidScore(format!("'{}' is not a number", trimmed)))?;
    check_goals(value, max_goals)
}

fn check_goals(value: i64, max_goals: u8) -> crate::Result<u8> {
    if value < 0 {
        return Err(crate::LeagueError::InvalidScore(format!("{} is negative", value)));
    }
    if value > i64::from(max_goals) {
        return Err(crate::LeagueError::InvalidScore(format!(
            "{} exceeds the maximum of {} goals",
            value, max_goals
        )));
    }
    Ok(value as u8)
}
