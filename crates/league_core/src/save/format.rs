use super::error::StoreError;
use super::STORE_VERSION;
use crate::data::short_name_for;
use crate::models::{parse_form, TeamState};
use crate::season::{RestoredMatch, Season};
use serde::{Deserialize, Serialize};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Persisted team row. Form is always exactly five characters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TeamRecord {
    pub name: String,
    pub short_name: String,
    pub base_strength: u32,
    pub current_strength: u32,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
    pub form: String,
    pub updated_at: u64,
}

impl TeamRecord {
    pub fn from_team(team: &TeamState) -> Self {
        Self {
            name: team.name.clone(),
            short_name: if team.short_name.is_empty() {
                short_name_for(&team.name)
            } else {
                team.short_name.clone()
            },
            base_strength: team.base_strength(),
            current_strength: team.current_strength(),
            played: team.played(),
            won: team.won(),
            drawn: team.drawn(),
            lost: team.lost(),
            goals_for: team.goals_for(),
            goals_against: team.goals_against(),
            goal_difference: team.goal_difference(),
            points: team.points(),
            form: team.form_string(),
            updated_at: current_timestamp(),
        }
    }

    /// Team with its base strength and form. Counters are rebuilt by the
    /// standings replay, not read back from the row.
    pub fn to_team(&self) -> TeamState {
        TeamState::new(self.name.clone(), self.short_name.clone(), self.base_strength)
            .with_form(parse_form(&self.form))
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.is_empty() {
            return Err(StoreError::InvalidRecord("team name is required".to_string()));
        }
        if self.base_strength == 0 {
            return Err(StoreError::InvalidRecord(format!(
                "team {} has zero base strength",
                self.name
            )));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeagueStatus {
    #[default]
    Active,
    Completed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LeagueRecord {
    pub id: i64,
    pub name: String,
    pub season: String,
    pub current_week: usize,
    pub status: LeagueStatus,
    /// Member teams in arena order
    pub team_names: Vec<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl LeagueRecord {
    pub fn refresh_from(&mut self, season: &Season) {
        self.current_week = season.week();
        self.status =
            if season.is_complete() { LeagueStatus::Completed } else { LeagueStatus::Active };
        self.team_names = season.teams().iter().map(|t| t.name.clone()).collect();
        self.updated_at = current_timestamp();
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub league_id: i64,
    pub week: usize,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u8,
    pub away_goals: u8,
    pub is_played: bool,
    pub is_fixed: bool,
}

impl MatchRecord {
    pub fn from_season(league_id: i64, season: &Season) -> Vec<Self> {
        season
            .fixtures()
            .iter()
            .flatten()
            .filter_map(|m| {
                let home = season.team(m.home)?;
                let away = season.team(m.away)?;
                Some(Self {
                    league_id,
                    week: m.week,
                    home_team: home.name.clone(),
                    away_team: away.name.clone(),
                    home_goals: m.home_goals,
                    away_goals: m.away_goals,
                    is_played: m.is_played,
                    is_fixed: m.is_fixed,
                })
            })
            .collect()
    }

    pub fn to_restored(&self) -> RestoredMatch {
        RestoredMatch {
            week: self.week,
            home: self.home_team.clone(),
            away: self.away_team.clone(),
            home_goals: self.home_goals,
            away_goals: self.away_goals,
            is_played: self.is_played,
            is_fixed: self.is_fixed,
        }
    }
}

/// Championship percentage of one team at one week. History only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProbabilityRecord {
    pub league_id: i64,
    pub team: String,
    pub week: usize,
    pub probability: f64,
    pub calculated_at: u64,
}

/// Everything a file store holds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub version: u32,
    pub teams: Vec<TeamRecord>,
    pub leagues: Vec<LeagueRecord>,
    pub matches: Vec<MatchRecord>,
    pub probabilities: Vec<ProbabilityRecord>,
    pub next_league_id: i64,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            teams: Vec::new(),
            leagues: Vec::new(),
            matches: Vec::new(),
            probabilities: Vec::new(),
            next_league_id: 1,
        }
    }
}

impl StoreSnapshot {
    /// Cross-record checks a decoded snapshot must pass before use.
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(max_id) = self.leagues.iter().map(|l| l.id).max() {
            if self.next_league_id <= max_id {
                return Err(StoreError::InvalidRecord(format!(
                    "next league id {} is not above stored league {}",
                    self.next_league_id, max_id
                )));
            }
        }

        let mut ids: Vec<i64> = self.leagues.iter().map(|l| l.id).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            return Err(StoreError::InvalidRecord("duplicate league id".to_string()));
        }

        for team in &self.teams {
            team.validate()?;
        }
        Ok(())
    }
}

/// MessagePack -> LZ4 -> SHA-256 trailer.
pub fn serialize_and_compress(snapshot: &StoreSnapshot) -> Result<Vec<u8>, StoreError> {
    snapshot.validate()?;
    let msgpack = to_vec_named(snapshot).map_err(StoreError::Serialization)?;
    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);
    Ok(result)
}

pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<StoreSnapshot, StoreError> {
    // size header + checksum
    if bytes.len() < 4 + 32 {
        return Err(StoreError::Corrupted);
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);

    let mut hasher = Sha256::new();
    hasher.update(payload);
    if hasher.finalize()[..] != *checksum_bytes {
        return Err(StoreError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| StoreError::Decompression)?;
    let snapshot: StoreSnapshot = from_slice(&msgpack).map_err(StoreError::Deserialization)?;

    if snapshot.version != STORE_VERSION {
        return Err(StoreError::VersionMismatch { found: snapshot.version, expected: STORE_VERSION });
    }
    snapshot.validate()?;

    Ok(snapshot)
}

/// Unix milliseconds.
pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}
