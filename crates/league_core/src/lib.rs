//! # league_core - Round-Robin League Simulation
//!
//! Fixture calendar, stochastic match outcomes, full-replay standings and
//! Monte Carlo championship odds for a small football league.
//!
//! ## Features
//! - Same seed, same season
//! - Manual result overrides with consistent standings
//! - Championship odds with exact clinch detection
//! - Compressed, checksummed league store
//! - JSON API for presentation layers

pub mod api;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;
pub mod save;
pub mod season;
pub mod state;

pub use api::{handle_league_json, LeagueRequest, LeagueResponse};
pub use config::LeagueConfig;
pub use engine::{ChampionshipOdds, ChampionshipProjector, ProjectionMethod};
pub use error::{LeagueError, Result};
pub use models::{Match, ScoreInput, TeamId, TeamState};
pub use save::{FileStore, LeagueStore, MemoryStore, StoreError};
pub use season::{Season, WeekReport};
pub use state::{LeagueSession, SessionUpdate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON API schema version
pub const SCHEMA_VERSION: u8 = api::API_SCHEMA_VERSION;
