//! League session
//!
//! Binds one `Season` to one explicit `LeagueStore` handle. Every mutation is
//! followed by a fresh projection and a save. Save failures after setup are
//! logged and handed back to the caller; the in-memory season is never
//! rolled back.

use std::ops::ControlFlow;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::config::LeagueConfig;
use crate::data::select_random_teams;
use crate::engine::probability::{ChampionshipOdds, ChampionshipProjector, ProbabilityRow};
use crate::error::Result;
use crate::models::{ScoreInput, TeamState};
use crate::save::{LeagueRecord, LeagueStore, MatchRecord, ProbabilityRecord, StoreError, TeamRecord};
use crate::season::standings::StandingRow;
use crate::season::{MatchLine, Season, WeekReport};

/// What a mutating session call produced.
#[derive(Debug)]
pub struct SessionUpdate {
    /// Present when a week was simulated
    pub report: Option<WeekReport>,
    pub odds: ChampionshipOdds,
    /// Save failure, if any. The season keeps the new state regardless.
    pub persist_error: Option<StoreError>,
}

pub struct LeagueSession<S: LeagueStore> {
    season: Season,
    config: LeagueConfig,
    projector: ChampionshipProjector,
    store: S,
    league: LeagueRecord,
    odds: ChampionshipOdds,
}

impl<S: LeagueStore> LeagueSession<S> {
    /// New league from catalog teams picked with the configured seed.
    pub fn start(config: LeagueConfig, store: S) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let teams = select_random_teams(&mut rng, config.team_count)
            .iter()
            .map(|spec| spec.to_state())
            .collect();
        Self::create(config, teams, store)
    }

    /// New league from the given teams. Any store failure here is fatal.
    pub fn create(config: LeagueConfig, teams: Vec<TeamState>, mut store: S) -> Result<Self> {
        config.validate()?;
        let mut season = Season::new(teams, &config)?;
        season.ensure_fixtures();

        let records: Vec<TeamRecord> = season.teams().iter().map(TeamRecord::from_team).collect();
        store.save_teams(&records)?;

        let team_names = season.teams().iter().map(|t| t.name.clone()).collect();
        let league = store.create_league(&config.league_name, &config.season_label, team_names)?;

        let projector = ChampionshipProjector::new(config.trials);
        let odds = season.championship_odds(&projector);

        let mut session = Self { season, config, projector, store, league, odds };
        session.persist()?;

        info!(league_id = session.league.id, "league session created");
        Ok(session)
    }

    /// Reopen a stored league. `None` picks the most recent one.
    pub fn resume(config: LeagueConfig, store: S, league_id: Option<i64>) -> Result<Self> {
        config.validate()?;
        let league = match league_id {
            Some(id) => store.load_league(id)?,
            None => store.latest_league().ok_or(StoreError::UnknownLeague { id: 0 })?,
        };

        let teams: Vec<TeamState> =
            store.load_teams(&league.team_names).iter().map(TeamRecord::to_team).collect();
        let matches = store.load_matches(league.id).iter().map(MatchRecord::to_restored).collect::<Vec<_>>();

        let mut season = Season::restore(teams, league.current_week, matches, &config)?;
        season.ensure_fixtures();

        let projector = ChampionshipProjector::new(config.trials);
        let odds = season.championship_odds(&projector);

        info!(league_id = league.id, week = season.week(), "league session resumed");
        Ok(Self { season, config, projector, store, league, odds })
    }

    pub fn season(&self) -> &Season {
        &self.season
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn league(&self) -> &LeagueRecord {
        &self.league
    }

    pub fn odds(&self) -> &ChampionshipOdds {
        &self.odds
    }

    pub fn advance_week(&mut self) -> Option<SessionUpdate> {
        let report = self.season.advance_week()?;
        Some(self.after_mutation(Some(report)))
    }

    pub fn advance_to_end(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Some(update) = self.advance_week() {
            updates.push(update);
        }
        updates
    }

    /// Play week by week, handing each update to `on_week`. `Break` stops
    /// before the next week. Returns the number of weeks played.
    pub fn advance_to_end_with<F>(&mut self, mut on_week: F) -> usize
    where
        F: FnMut(&SessionUpdate) -> ControlFlow<()>,
    {
        let mut played = 0;
        while let Some(update) = self.advance_week() {
            played += 1;
            if on_week(&update).is_break() {
                break;
            }
        }
        played
    }

    pub fn override_result(&mut self, week: usize, index: usize, score: ScoreInput) -> Result<SessionUpdate> {
        self.season.override_result(week, index, score)?;
        Ok(self.after_mutation(None))
    }

    /// Validate raw text goals against the configured maximum, then override.
    pub fn override_result_text(
        &mut self,
        week: usize,
        index: usize,
        home_goals: &str,
        away_goals: &str,
    ) -> Result<SessionUpdate> {
        let score = ScoreInput::parse(home_goals, away_goals, self.config.max_manual_goals)?;
        self.override_result(week, index, score)
    }

    pub fn standings(&self) -> Vec<StandingRow> {
        self.season.standings()
    }

    pub fn probabilities(&self) -> Vec<ProbabilityRow> {
        self.odds.table(self.season.teams())
    }

    pub fn matches_for_week(&self, week: usize) -> Vec<MatchLine> {
        self.season.match_lines(week)
    }

    pub fn upcoming(&mut self) -> Option<(usize, Vec<MatchLine>)> {
        self.season.upcoming()
    }

    pub fn all_results(&self) -> Vec<(usize, Vec<MatchLine>)> {
        self.season.all_results()
    }

    pub fn champions(&self) -> Vec<String> {
        self.season
            .champions()
            .into_iter()
            .filter_map(|id| self.season.team(id).map(|t| t.name.clone()))
            .collect()
    }

    pub fn history(&self) -> Vec<ProbabilityRecord> {
        self.store.probability_history(self.league.id)
    }

    /// Weeks fully played so far.
    pub fn played_weeks(&self) -> usize {
        self.season.week().saturating_sub(1)
    }

    fn after_mutation(&mut self, report: Option<WeekReport>) -> SessionUpdate {
        self.odds = self.season.championship_odds(&self.projector);

        let persist_error = match self.persist() {
            Ok(()) => None,
            Err(err) => {
                warn!(league_id = self.league.id, error = %err, "failed to persist league state");
                Some(err)
            }
        };

        SessionUpdate { report, odds: self.odds.clone(), persist_error }
    }

    fn persist(&mut self) -> std::result::Result<(), StoreError> {
        let league_id = self.league.id;

        let teams: Vec<TeamRecord> = self.season.teams().iter().map(TeamRecord::from_team).collect();
        self.store.save_teams(&teams)?;
        self.store.save_matches(league_id, &MatchRecord::from_season(league_id, &self.season))?;

        self.league.refresh_from(&self.season);
        self.store.save_league(&self.league)?;

        let rows: Vec<(String, f64)> = self
            .probabilities()
            .into_iter()
            .map(|row| (row.name, row.percentage))
            .collect();
        self.store.save_probabilities(league_id, self.played_weeks(), &rows)?;
        Ok(())
    }
}
