use super::error::StoreError;
use super::format::{
    current_timestamp, decompress_and_deserialize, serialize_and_compress, LeagueRecord,
    LeagueStatus, MatchRecord, ProbabilityRecord, StoreSnapshot, TeamRecord,
};

use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Persistence handle for leagues.
///
/// Implementors only expose their snapshot and decide what `commit` means;
/// every save operation mutates the snapshot and then commits it.
pub trait LeagueStore {
    fn snapshot(&self) -> &StoreSnapshot;

    fn snapshot_mut(&mut self) -> &mut StoreSnapshot;

    /// Make the current snapshot durable.
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Insert or replace team rows by name.
    fn save_teams(&mut self, teams: &[TeamRecord]) -> Result<(), StoreError> {
        for team in teams {
            team.validate()?;
        }
        let snapshot = self.snapshot_mut();
        for team in teams {
            match snapshot.teams.iter_mut().find(|t| t.name == team.name) {
                Some(existing) => *existing = team.clone(),
                None => snapshot.teams.push(team.clone()),
            }
        }
        self.commit()
    }

    fn load_team(&self, name: &str) -> Option<TeamRecord> {
        self.snapshot().teams.iter().find(|t| t.name == name).cloned()
    }

    /// Team rows in the order of `names`. Unknown names are skipped.
    fn load_teams(&self, names: &[String]) -> Vec<TeamRecord> {
        names
            .iter()
            .filter_map(|name| {
                let team = self.load_team(name);
                if team.is_none() {
                    log::warn!("No stored team named {}, skipping", name);
                }
                team
            })
            .collect()
    }

    fn create_league(
        &mut self,
        name: &str,
        season: &str,
        team_names: Vec<String>,
    ) -> Result<LeagueRecord, StoreError> {
        let snapshot = self.snapshot_mut();
        let now = current_timestamp();
        let league = LeagueRecord {
            id: snapshot.next_league_id,
            name: name.to_string(),
            season: season.to_string(),
            current_week: 0,
            status: LeagueStatus::Active,
            team_names,
            created_at: now,
            updated_at: now,
        };
        snapshot.next_league_id += 1;
        snapshot.leagues.push(league.clone());
        self.commit()?;

        log::info!("Created league {} ({} {})", league.id, league.name, league.season);
        Ok(league)
    }

    fn save_league(&mut self, league: &LeagueRecord) -> Result<(), StoreError> {
        let existing = self
            .snapshot_mut()
            .leagues
            .iter_mut()
            .find(|l| l.id == league.id)
            .ok_or(StoreError::UnknownLeague { id: league.id })?;
        *existing = league.clone();
        self.commit()
    }

    fn load_league(&self, id: i64) -> Result<LeagueRecord, StoreError> {
        self.snapshot()
            .leagues
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or(StoreError::UnknownLeague { id })
    }

    /// Most recently created league, if any.
    fn latest_league(&self) -> Option<LeagueRecord> {
        self.snapshot().leagues.iter().max_by_key(|l| l.id).cloned()
    }

    /// Replace every match row of a league. Rows naming teams outside the
    /// league are skipped.
    fn save_matches(&mut self, league_id: i64, matches: &[MatchRecord]) -> Result<(), StoreError> {
        let league = self.load_league(league_id)?;
        let kept: Vec<MatchRecord> = matches
            .iter()
            .filter(|m| {
                let known = league.team_names.contains(&m.home_team)
                    && league.team_names.contains(&m.away_team);
                if !known {
                    log::warn!(
                        "Skipping match {} vs {}: team not in league {}",
                        m.home_team,
                        m.away_team,
                        league_id
                    );
                }
                known
            })
            .map(|m| MatchRecord { league_id, ..m.clone() })
            .collect();

        let snapshot = self.snapshot_mut();
        snapshot.matches.retain(|m| m.league_id != league_id);
        snapshot.matches.extend(kept);
        self.commit()
    }

    fn load_matches(&self, league_id: i64) -> Vec<MatchRecord> {
        let mut matches: Vec<MatchRecord> =
            self.snapshot().matches.iter().filter(|m| m.league_id == league_id).cloned().collect();
        matches.sort_by_key(|m| m.week);
        matches
    }

    /// Replace the snapshot for one league and week. Unknown teams are skipped.
    fn save_probabilities(
        &mut self,
        league_id: i64,
        week: usize,
        rows: &[(String, f64)],
    ) -> Result<(), StoreError> {
        let league = self.load_league(league_id)?;
        let now = current_timestamp();
        let records: Vec<ProbabilityRecord> = rows
            .iter()
            .filter(|(team, _)| {
                let known = league.team_names.contains(team);
                if !known {
                    log::warn!("Skipping probability for unknown team {}", team);
                }
                known
            })
            .map(|(team, probability)| ProbabilityRecord {
                league_id,
                team: team.clone(),
                week,
                probability: *probability,
                calculated_at: now,
            })
            .collect();

        let snapshot = self.snapshot_mut();
        snapshot.probabilities.retain(|p| !(p.league_id == league_id && p.week == week));
        snapshot.probabilities.extend(records);
        self.commit()?;

        log::debug!("Stored probabilities for league {} week {}", league_id, week);
        Ok(())
    }

    /// Snapshots of a league ordered by week.
    fn probability_history(&self, league_id: i64) -> Vec<ProbabilityRecord> {
        let mut history: Vec<ProbabilityRecord> = self
            .snapshot()
            .probabilities
            .iter()
            .filter(|p| p.league_id == league_id)
            .cloned()
            .collect();
        history.sort_by_key(|p| p.week);
        history
    }
}

/// Store kept in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: StoreSnapshot,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeagueStore for MemoryStore {
    fn snapshot(&self) -> &StoreSnapshot {
        &self.snapshot
    }

    fn snapshot_mut(&mut self) -> &mut StoreSnapshot {
        &mut self.snapshot
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store backed by a single compressed snapshot file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    snapshot: StoreSnapshot,
}

impl FileStore {
    /// Open an existing store file, or start an empty one at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = if path.exists() {
            Self::load_from_path(&path)?
        } else {
            log::info!("No store at {:?}, starting empty", path);
            StoreSnapshot::default()
        };
        Ok(Self { path, snapshot })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_to_path(path: &Path, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = serialize_and_compress(snapshot)?;

        // write to temp file, then rename over the target
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    fn load_from_path(path: &Path) -> Result<StoreSnapshot, StoreError> {
        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let snapshot = decompress_and_deserialize(&data)?;

        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(snapshot)
    }
}

impl LeagueStore for FileStore {
    fn snapshot(&self) -> &StoreSnapshot {
        &self.snapshot
    }

    fn snapshot_mut(&mut self) -> &mut StoreSnapshot {
        &mut self.snapshot
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        Self::save_to_path(&self.path, &self.snapshot)
    }
}
