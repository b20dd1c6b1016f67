//! Live season: team arena, calendar, week counter and the run's RNG.
//!
//! All mutation goes through `&mut Season`. Every mutation that touches a
//! result is followed by a full standings replay, so team counters always
//! match the calendar.

pub mod scheduler;
pub mod standings;

use crate::config::LeagueConfig;
use crate::engine::outcome::OutcomeSampler;
use crate::engine::probability::{ChampionshipOdds, ChampionshipProjector, SeasonView};
use crate::error::{LeagueError, Result};
use crate::models::{FormResult, Match, ScoreInput, TeamId, TeamState, Week};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scheduler::FixtureScheduler;
use serde::Serialize;
use standings::StandingRow;
use std::ops::ControlFlow;
use tracing::{debug, info};

/// Outcome of one simulated week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekReport {
    pub week: usize,
    pub results: Vec<MatchLine>,
}

/// Display form of a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchLine {
    pub week: usize,
    pub index: usize,
    pub home: String,
    pub away: String,
    pub home_goals: u8,
    pub away_goals: u8,
    pub is_played: bool,
    pub is_fixed: bool,
}

#[derive(Debug, Clone)]
pub struct Season {
    teams: Vec<TeamState>,
    fixtures: Vec<Week>,
    week: usize,
    scheduler: FixtureScheduler,
    rng: ChaCha8Rng,
}

impl Season {
    /// Start a season at week 0. The calendar is generated on first advance.
    pub fn new(teams: Vec<TeamState>, config: &LeagueConfig) -> Result<Self> {
        if teams.len() != config.team_count {
            return Err(LeagueError::InvalidTeamCount {
                expected: config.team_count,
                found: teams.len(),
            });
        }

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            teams,
            fixtures: Vec::new(),
            week: 0,
            scheduler: FixtureScheduler::new(config.team_count, config.cycles),
            rng,
        })
    }

    /// Rebuild a season from stored state and replay its standings.
    ///
    /// Match rows name their teams; rows naming unknown teams or weeks outside
    /// the calendar are skipped. Counters come from the replay; each team's
    /// form window and strength are kept exactly as they were stored.
    pub fn restore<I>(
        teams: Vec<TeamState>,
        week: usize,
        matches: I,
        config: &LeagueConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = RestoredMatch>,
    {
        let mut season = Self::new(teams, config)?;
        season.week = week;

        let total_weeks = season.total_weeks();
        let mut fixtures: Vec<Week> = vec![Vec::new(); total_weeks];
        let mut restored = 0usize;

        for row in matches {
            let (Some(home), Some(away)) = (season.team_id(&row.home), season.team_id(&row.away))
            else {
                tracing::warn!(home = %row.home, away = %row.away, "skipping match with unknown team");
                continue;
            };
            if row.week == 0 || row.week > total_weeks {
                tracing::warn!(week = row.week, "skipping match outside the calendar");
                continue;
            }

            let mut m = Match::new(home, away, row.week);
            m.home_goals = row.home_goals;
            m.away_goals = row.away_goals;
            m.is_played = row.is_played || row.is_fixed;
            m.is_fixed = row.is_fixed;
            fixtures[row.week - 1].push(m);
            restored += 1;
        }

        if restored > 0 {
            season.fixtures = fixtures;
        }

        let stored_forms: Vec<Vec<FormResult>> =
            season.teams.iter().map(|t| t.form().to_vec()).collect();
        season.replay();
        for (team, form) in season.teams.iter_mut().zip(stored_forms) {
            team.restore_form(form);
        }

        info!(week, restored, "season restored");
        Ok(season)
    }

    pub fn teams(&self) -> &[TeamState] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&TeamState> {
        self.teams.get(id.index())
    }

    pub fn team_id(&self, name: &str) -> Option<TeamId> {
        self.teams.iter().position(|t| t.name == name).map(TeamId)
    }

    pub fn fixtures(&self) -> &[Week] {
        &self.fixtures
    }

    /// 0 before kickoff, `total_weeks() + 1` once every week has been played.
    pub fn week(&self) -> usize {
        self.week
    }

    pub fn total_weeks(&self) -> usize {
        self.scheduler.total_weeks()
    }

    pub fn is_started(&self) -> bool {
        self.week > 0
    }

    pub fn is_complete(&self) -> bool {
        self.week > self.total_weeks()
    }

    /// Generate the calendar if it does not exist yet.
    pub fn ensure_fixtures(&mut self) {
        if self.fixtures.is_empty() {
            let ids: Vec<TeamId> = (0..self.teams.len()).map(TeamId).collect();
            self.fixtures = self.scheduler.generate(&ids);
            debug!(weeks = self.fixtures.len(), "fixtures generated");
        }
    }

    /// Matches of a 1-based week; empty before the calendar exists.
    pub fn matches_for_week(&self, week: usize) -> &[Match] {
        week.checked_sub(1).and_then(|i| self.fixtures.get(i)).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn match_lines(&self, week: usize) -> Vec<MatchLine> {
        self.matches_for_week(week)
            .iter()
            .enumerate()
            .map(|(index, m)| self.line(index, m))
            .collect()
    }

    /// Next week to be played, generating the calendar when needed.
    pub fn upcoming(&mut self) -> Option<(usize, Vec<MatchLine>)> {
        if self.is_complete() {
            return None;
        }
        self.ensure_fixtures();
        let week = self.week.max(1);
        Some((week, self.match_lines(week)))
    }

    /// Every played match, grouped by week.
    pub fn all_results(&self) -> Vec<(usize, Vec<MatchLine>)> {
        self.fixtures
            .iter()
            .enumerate()
            .map(|(i, week)| {
                let lines = week
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| m.counts())
                    .map(|(index, m)| self.line(index, m))
                    .collect::<Vec<_>>();
                (i + 1, lines)
            })
            .filter(|(_, lines)| !lines.is_empty())
            .collect()
    }

    fn line(&self, index: usize, m: &Match) -> MatchLine {
        MatchLine {
            week: m.week,
            index,
            home: self.teams[m.home.index()].name.clone(),
            away: self.teams[m.away.index()].name.clone(),
            home_goals: m.home_goals,
            away_goals: m.away_goals,
            is_played: m.is_played,
            is_fixed: m.is_fixed,
        }
    }

    /// Play the current week. Returns `None` once the season is complete.
    ///
    /// Scores for the whole week are sampled before anything is written, then
    /// written together and followed by a replay.
    pub fn advance_week(&mut self) -> Option<WeekReport> {
        if self.week == 0 {
            self.week = 1;
        }
        self.ensure_fixtures();

        if self.is_complete() {
            return None;
        }

        let index = self.week - 1;
        let sampled: Vec<Option<(u8, u8)>> = self.fixtures[index]
            .iter()
            .map(|m| {
                (!m.is_fixed).then(|| {
                    OutcomeSampler::sample(
                        self.teams[m.home.index()].current_strength(),
                        self.teams[m.away.index()].current_strength(),
                        &mut self.rng,
                    )
                })
            })
            .collect();

        for (m, score) in self.fixtures[index].iter_mut().zip(sampled) {
            if let Some((home_goals, away_goals)) = score {
                m.record_simulated(home_goals, away_goals);
            }
        }

        let played_week = self.week;
        self.week += 1;
        self.replay();

        let report = WeekReport { week: played_week, results: self.match_lines(played_week) };
        info!(week = played_week, "week simulated");
        Some(report)
    }

    /// Play every remaining week.
    pub fn advance_to_end(&mut self) -> Vec<WeekReport> {
        let mut reports = Vec::new();
        self.advance_to_end_with(|report| {
            reports.push(report.clone());
            ControlFlow::Continue(())
        });
        reports
    }

    /// Play remaining weeks one at a time, calling `on_week` after each.
    /// Returning `Break` stops before the next week starts; a week is never
    /// left half applied. Returns the number of weeks played.
    pub fn advance_to_end_with<F>(&mut self, mut on_week: F) -> usize
    where
        F: FnMut(&WeekReport) -> ControlFlow<()>,
    {
        let mut played = 0;
        while let Some(report) = self.advance_week() {
            played += 1;
            if on_week(&report).is_break() {
                break;
            }
        }
        played
    }

    /// Set a match score by hand and replay the standings.
    pub fn override_result(&mut self, week: usize, index: usize, score: ScoreInput) -> Result<()> {
        if self.fixtures.is_empty() {
            return Err(LeagueError::FixturesNotGenerated);
        }
        let m = week
            .checked_sub(1)
            .and_then(|w| self.fixtures.get_mut(w))
            .and_then(|matches| matches.get_mut(index))
            .ok_or(LeagueError::MatchNotFound { week, index })?;

        m.record_override(score.home_goals, score.away_goals);
        info!(week, index, home = score.home_goals, away = score.away_goals, "result overridden");

        self.replay();
        Ok(())
    }

    /// Full standings replay from the calendar.
    pub fn replay(&mut self) {
        standings::replay(&mut self.teams, self.fixtures.iter().flatten());
    }

    pub fn standings(&self) -> Vec<StandingRow> {
        standings::standings_table(&self.teams)
    }

    pub fn champions(&self) -> Vec<TeamId> {
        if self.is_complete() {
            standings::champions(&self.teams)
        } else {
            Vec::new()
        }
    }

    pub fn view(&self) -> SeasonView<'_> {
        SeasonView {
            teams: &self.teams,
            fixtures: &self.fixtures,
            week: self.week,
            total_weeks: self.total_weeks(),
        }
    }

    /// Championship odds. The Monte Carlo base seed is drawn from the season
    /// RNG so a seeded season gives reproducible projections.
    pub fn championship_odds(&mut self, projector: &ChampionshipProjector) -> ChampionshipOdds {
        let base_seed: u64 = self.rng.gen();
        projector.project(self.view(), base_seed)
    }
}

/// A stored match row, identified by team names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredMatch {
    pub week: usize,
    pub home: String,
    pub away: String,
    pub home_goals: u8,
    pub away_goals: u8,
    pub is_played: bool,
    pub is_fixed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TEAM_CATALOG;
    use crate::engine::probability::ProjectionMethod;

    fn config() -> LeagueConfig {
        LeagueConfig::default().with_seed(17).with_trials(500)
    }

    fn season() -> Season {
        let teams = TEAM_CATALOG[..4].iter().map(|p| p.to_state()).collect();
        Season::new(teams, &config()).unwrap()
    }

    fn assert_invariants(season: &Season) {
        for t in season.teams() {
            assert_eq!(t.played(), t.won() + t.drawn() + t.lost());
            assert_eq!(t.points(), 3 * t.won() + t.drawn());
            assert_eq!(t.goal_difference(), t.goals_for() as i32 - t.goals_against() as i32);
            let (min, max) = t.strength_bounds();
            assert!((min..=max).contains(&t.current_strength()));
        }
        for m in season.fixtures().iter().flatten() {
            assert!(!m.is_fixed || m.is_played);
        }
    }

    #[test]
    fn test_rejects_wrong_team_count() {
        let teams = TEAM_CATALOG[..3].iter().map(|p| p.to_state()).collect();
        let err = Season::new(teams, &config()).unwrap_err();
        assert!(matches!(err, LeagueError::InvalidTeamCount { expected: 4, found: 3 }));
    }

    #[test]
    fn test_fixtures_are_lazy() {
        let mut season = season();
        assert!(season.fixtures().is_empty());
        assert!(season.matches_for_week(1).is_empty());

        let report = season.advance_week().unwrap();
        assert_eq!(report.week, 1);
        assert_eq!(season.week(), 2);
        assert_eq!(season.fixtures().len(), 18);
        assert!(season.matches_for_week(1).iter().all(|m| m.is_played));
        assert!(season.matches_for_week(2).iter().all(|m| !m.is_played));
        assert_invariants(&season);
    }

    #[test]
    fn test_full_season_plays_eighteen_weeks() {
        let mut season = season();
        let reports = season.advance_to_end();

        assert_eq!(reports.len(), 18);
        assert!(season.is_complete());
        assert_eq!(season.week(), 19);
        assert!(season.advance_week().is_none());
        for t in season.teams() {
            assert_eq!(t.played(), 18);
        }
        assert!(!season.champions().is_empty());
        assert_invariants(&season);
    }

    #[test]
    fn test_same_seed_same_season() {
        let mut a = season();
        let mut b = season();
        a.advance_to_end();
        b.advance_to_end();
        assert_eq!(a.fixtures(), b.fixtures());
        assert_eq!(a.teams(), b.teams());
    }

    #[test]
    fn test_fixed_match_survives_simulation() {
        let mut season = season();
        season.ensure_fixtures();
        season.override_result(1, 0, ScoreInput { home_goals: 7, away_goals: 0 }).unwrap();

        season.advance_week().unwrap();

        let m = &season.matches_for_week(1)[0];
        assert_eq!((m.home_goals, m.away_goals), (7, 0));
        assert!(m.is_fixed);
        assert_eq!(season.team(m.home).unwrap().goals_for(), 7);
        assert_invariants(&season);
    }

    #[test]
    fn test_override_past_result_replays_standings() {
        let mut season = season();
        season.advance_week();
        season.advance_week();

        let m = season.matches_for_week(1)[1].clone();
        season.override_result(1, 1, ScoreInput { home_goals: 0, away_goals: 5 }).unwrap();

        let fixed = &season.matches_for_week(1)[1];
        assert!(fixed.is_fixed && fixed.is_played);
        let total_played: u32 = season.teams().iter().map(|t| t.played()).sum();
        assert_eq!(total_played, 8);
        assert!(season.team(m.away).unwrap().won() >= 1);
        assert_invariants(&season);
    }

    #[test]
    fn test_override_errors() {
        let mut season = season();
        let score = ScoreInput { home_goals: 1, away_goals: 1 };
        assert!(matches!(
            season.override_result(1, 0, score),
            Err(LeagueError::FixturesNotGenerated)
        ));

        season.ensure_fixtures();
        assert!(matches!(
            season.override_result(19, 0, score),
            Err(LeagueError::MatchNotFound { week: 19, index: 0 })
        ));
        assert!(matches!(
            season.override_result(0, 0, score),
            Err(LeagueError::MatchNotFound { .. })
        ));
        assert!(season.override_result(3, 2, score).is_err());
    }

    #[test]
    fn test_step_by_step_can_stop_between_weeks() {
        let mut season = season();
        let played = season.advance_to_end_with(|report| {
            if report.week == 5 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        assert_eq!(played, 5);
        assert_eq!(season.week(), 6);
        let played_matches = season.fixtures().iter().flatten().filter(|m| m.is_played).count();
        assert_eq!(played_matches, 10);
        assert_invariants(&season);
    }

    #[test]
    fn test_odds_follow_season_state() {
        let mut season = season();
        let projector = ChampionshipProjector::new(300);

        assert_eq!(season.championship_odds(&projector).method, ProjectionMethod::ColdStart);

        season.advance_week();
        let odds = season.championship_odds(&projector);
        assert!(matches!(odds.method, ProjectionMethod::MonteCarlo { .. }));
        assert!((odds.total() - 100.0).abs() < 1e-6);

        season.advance_to_end();
        let odds = season.championship_odds(&projector);
        assert_eq!(odds.method, ProjectionMethod::SeasonComplete);
        assert!((odds.total() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_upcoming_and_all_results() {
        let mut season = season();
        let (week, lines) = season.upcoming().unwrap();
        assert_eq!(week, 1);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| !l.is_played));

        season.advance_week();
        season.advance_week();
        let (week, _) = season.upcoming().unwrap();
        assert_eq!(week, 3);

        let results = season.all_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 1);

        season.advance_to_end();
        assert!(season.upcoming().is_none());
    }

    #[test]
    fn test_restore_rebuilds_standings() {
        let mut original = season();
        original.advance_week();
        original.advance_week();
        original.advance_week();

        let rows: Vec<RestoredMatch> = original
            .fixtures()
            .iter()
            .flatten()
            .map(|m| RestoredMatch {
                week: m.week,
                home: original.team(m.home).unwrap().name.clone(),
                away: original.team(m.away).unwrap().name.clone(),
                home_goals: m.home_goals,
                away_goals: m.away_goals,
                is_played: m.is_played,
                is_fixed: m.is_fixed,
            })
            .chain(std::iter::once(RestoredMatch {
                week: 4,
                home: "Real Madrid".to_string(),
                away: "Arsenal".to_string(),
                home_goals: 0,
                away_goals: 0,
                is_played: false,
                is_fixed: false,
            }))
            .collect();

        let teams = original
            .teams()
            .iter()
            .map(|t| {
                TeamState::new(t.name.clone(), t.short_name.clone(), t.base_strength())
                    .with_form(t.form().to_vec())
            })
            .collect();
        let restored = Season::restore(teams, original.week(), rows, &config()).unwrap();

        assert_eq!(restored.week(), 4);
        assert_eq!(restored.fixtures().iter().flatten().count(), 36);
        for (a, b) in original.teams().iter().zip(restored.teams()) {
            assert_eq!(a.points(), b.points());
            assert_eq!(a.goal_difference(), b.goal_difference());
            assert_eq!(a.played(), b.played());
            assert_eq!(a.form_string(), b.form_string());
            assert_eq!(a.current_strength(), b.current_strength());
        }
    }
}
