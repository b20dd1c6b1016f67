//! Built-in team catalog.
//!
//! Strengths are illustrative only.

use crate::models::TeamState;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamProfile {
    pub name: &'static str,
    pub short_name: &'static str,
    pub base_strength: u32,
}

impl TeamProfile {
    pub fn to_state(&self) -> TeamState {
        TeamState::new(self.name, self.short_name, self.base_strength)
    }
}

pub const TEAM_CATALOG: [TeamProfile; 10] = [
    TeamProfile { name: "Manchester City", short_name: "MCI", base_strength: 85 },
    TeamProfile { name: "Arsenal", short_name: "ARS", base_strength: 82 },
    TeamProfile { name: "Liverpool", short_name: "LIV", base_strength: 83 },
    TeamProfile { name: "Manchester United", short_name: "MUN", base_strength: 80 },
    TeamProfile { name: "Tottenham", short_name: "TOT", base_strength: 79 },
    TeamProfile { name: "Newcastle", short_name: "NEW", base_strength: 78 },
    TeamProfile { name: "Chelsea", short_name: "CHE", base_strength: 77 },
    TeamProfile { name: "Aston Villa", short_name: "AVL", base_strength: 76 },
    TeamProfile { name: "Brighton", short_name: "BHA", base_strength: 75 },
    TeamProfile { name: "West Ham", short_name: "WHU", base_strength: 74 },
];

/// Owned team definition, used when teams come from config or a store
/// rather than the built-in catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSpec {
    pub name: String,
    pub short_name: String,
    pub base_strength: u32,
}

impl From<&TeamProfile> for TeamSpec {
    fn from(profile: &TeamProfile) -> Self {
        Self {
            name: profile.name.to_string(),
            short_name: profile.short_name.to_string(),
            base_strength: profile.base_strength,
        }
    }
}

impl TeamSpec {
    pub fn to_state(&self) -> TeamState {
        TeamState::new(self.name.clone(), self.short_name.clone(), self.base_strength)
    }
}

pub fn find_profile(name: &str) -> Option<&'static TeamProfile> {
    TEAM_CATALOG.iter().find(|p| p.name == name)
}

/// Short name for a club: catalog entry if known, otherwise the first three
/// characters upper-cased.
pub fn short_name_for(name: &str) -> String {
    match find_profile(name) {
        Some(profile) => profile.short_name.to_string(),
        None => name.chars().take(3).collect::<String>().to_uppercase(),
    }
}

/// Shuffle the catalog with the given RNG and take the first `count` teams.
pub fn select_random_teams<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<TeamSpec> {
    let mut pool: Vec<&TeamProfile> = TEAM_CATALOG.iter().collect();
    pool.shuffle(rng);
    pool.into_iter().take(count).map(TeamSpec::from).collect()
}
