use std::fmt;

use crate::save::StoreError;

#[derive(Debug)]
pub enum LeagueError {
    InvalidTeamCount { expected: usize, found: usize },
    InvalidScore(String),
    MatchNotFound { week: usize, index: usize },
    FixturesNotGenerated,
    InvalidConfig(String),
    Store(StoreError),
}

impl fmt::Display for LeagueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LeagueError::InvalidTeamCount { expected, found } => {
                write!(f, "Invalid team count: expected {}, found {}", expected, found)
            }
            LeagueError::InvalidScore(msg) => write!(f, "Invalid score: {}", msg),
            LeagueError::MatchNotFound { week, index } => {
                write!(f, "No match {} in week {}", index, week)
            }
            LeagueError::FixturesNotGenerated => write!(f, "Fixtures have not been generated yet"),
            LeagueError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            LeagueError::Store(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl std::error::Error for LeagueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeagueError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for LeagueError {
    fn from(err: StoreError) -> Self {
        LeagueError::Store(err)
    }
}

pub type Result<T> = std::result::Result<T, LeagueError>;
