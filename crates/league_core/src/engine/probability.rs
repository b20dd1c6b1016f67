//! Championship probability projection.
//!
//! Branches are checked in order: finished season, clinched title, cold
//! start, then Monte Carlo over the remaining calendar. Each trial owns a
//! value copy of the team arena and its own `ChaCha8Rng` seeded with
//! `base_seed + trial`, so trials can run on the rayon pool without sharing
//! any mutable state.

use super::outcome::OutcomeSampler;
use crate::models::{TeamId, TeamState, Week};
use crate::season::standings::{champions, table_order};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Read-only view of a season at the moment of projection.
#[derive(Debug, Clone, Copy)]
pub struct SeasonView<'a> {
    pub teams: &'a [TeamState],
    pub fixtures: &'a [Week],
    /// Season week counter: 0 before kickoff, `total_weeks + 1` once finished
    pub week: usize,
    pub total_weeks: usize,
}

impl SeasonView<'_> {
    fn is_complete(&self) -> bool {
        self.week > self.total_weeks
    }

    fn nothing_played(&self) -> bool {
        self.teams.iter().all(|t| t.played() == 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionMethod {
    SeasonComplete,
    Clinched,
    ColdStart,
    MonteCarlo { trials: usize, valid_trials: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityRow {
    pub team: TeamId,
    pub name: String,
    pub percentage: f64,
}

/// Per-team championship percentages, indexed by arena id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionshipOdds {
    pub method: ProjectionMethod,
    percentages: Vec<f64>,
}

impl ChampionshipOdds {
    pub fn percentage(&self, team: TeamId) -> f64 {
        self.percentages.get(team.index()).copied().unwrap_or(0.0)
    }

    pub fn percentages(&self) -> &[f64] {
        &self.percentages
    }

    pub fn total(&self) -> f64 {
        self.percentages.iter().sum()
    }

    /// Rows sorted by percentage, highest first. Equal percentages keep arena order.
    pub fn table(&self, teams: &[TeamState]) -> Vec<ProbabilityRow> {
        let mut rows: Vec<ProbabilityRow> = self
            .percentages
            .iter()
            .enumerate()
            .map(|(index, &percentage)| ProbabilityRow {
                team: TeamId(index),
                name: teams.get(index).map(|t| t.name.clone()).unwrap_or_default(),
                percentage,
            })
            .collect();
        rows.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        rows
    }
}

pub struct ChampionshipProjector {
    trials: usize,
    parallel: bool,
}

impl Default for ChampionshipProjector {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TRIALS)
    }
}

impl ChampionshipProjector {
    pub fn new(trials: usize) -> Self {
        Self { trials, parallel: true }
    }

    /// Run trials on the calling thread instead of the rayon pool.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn project(&self, view: SeasonView<'_>, base_seed: u64) -> ChampionshipOdds {
        let n = view.teams.len();
        if n == 0 {
            return ChampionshipOdds { method: ProjectionMethod::SeasonComplete, percentages: Vec::new() };
        }

        if view.is_complete() {
            return ChampionshipOdds {
                method: ProjectionMethod::SeasonComplete,
                percentages: split_evenly(n, &champions(view.teams)),
            };
        }

        if let Some(leader) = clinched_leader(view.teams, view.total_weeks) {
            debug!(leader = %view.teams[leader.index()].name, "title mathematically decided");
            return ChampionshipOdds {
                method: ProjectionMethod::Clinched,
                percentages: split_evenly(n, &[leader]),
            };
        }

        if view.week == 0 && view.nothing_played() {
            return ChampionshipOdds { method: ProjectionMethod::ColdStart, percentages: cold_start(view.teams) };
        }

        self.monte_carlo(view, base_seed)
    }

    fn monte_carlo(&self, view: SeasonView<'_>, base_seed: u64) -> ChampionshipOdds {
        let n = view.teams.len();
        let first_week = view.week.max(1) - 1;
        let remaining = view.fixtures.get(first_week..).unwrap_or(&[]);

        let trial = |index: usize| run_trial(view.teams, remaining, base_seed.wrapping_add(index as u64));
        let add = |(mut credit, valid): (Vec<f64>, usize), champs: Vec<TeamId>| {
            if champs.is_empty() {
                return (credit, valid);
            }
            let share = 1.0 / champs.len() as f64;
            for id in champs {
                credit[id.index()] += share;
            }
            (credit, valid + 1)
        };

        let (credit, valid_trials) = if self.parallel {
            (0..self.trials)
                .into_par_iter()
                .map(trial)
                .fold(|| (vec![0.0; n], 0usize), add)
                .reduce(
                    || (vec![0.0; n], 0usize),
                    |(mut a, va), (b, vb)| {
                        for (x, y) in a.iter_mut().zip(b) {
                            *x += y;
                        }
                        (a, va + vb)
                    },
                )
        } else {
            (0..self.trials).map(trial).fold((vec![0.0; n], 0usize), add)
        };

        let percentages = if valid_trials == 0 {
            vec![0.0; n]
        } else {
            credit.into_iter().map(|c| c / valid_trials as f64 * 100.0).collect()
        };

        debug!(trials = self.trials, valid_trials, from_week = first_week + 1, "monte carlo projection done");

        ChampionshipOdds {
            method: ProjectionMethod::MonteCarlo { trials: self.trials, valid_trials },
            percentages,
        }
    }
}

/// Play out every unplayed match of `remaining` on a private arena copy.
fn run_trial(teams: &[TeamState], remaining: &[Week], seed: u64) -> Vec<TeamId> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut arena = teams.to_vec();

    for m in remaining.iter().flatten().filter(|m| !m.counts()) {
        let (home, away) = (m.home.index(), m.away.index());
        if home >= arena.len() || away >= arena.len() {
            continue;
        }
        let (hg, ag) = OutcomeSampler::sample(
            arena[home].current_strength(),
            arena[away].current_strength(),
            &mut rng,
        );
        arena[home].apply_match_result(hg, ag);
        arena[away].apply_match_result(ag, hg);
    }

    champions(&arena)
}

/// Leader whose points already exceed every rival's reachable maximum.
pub fn clinched_leader(teams: &[TeamState], total_weeks: usize) -> Option<TeamId> {
    let leader = *table_order(teams).first()?;
    let leader_points = teams[leader.index()].points();

    let unreachable = teams.iter().enumerate().filter(|(index, _)| *index != leader.index()).all(
        |(_, t)| {
            let remaining = (total_weeks as u32).saturating_sub(t.played());
            leader_points > t.points() + 3 * remaining
        },
    );

    unreachable.then_some(leader)
}

fn cold_start(teams: &[TeamState]) -> Vec<f64> {
    let total: u32 = teams.iter().map(|t| t.base_strength()).sum();
    if total == 0 {
        return vec![100.0 / teams.len() as f64; teams.len()];
    }
    teams.iter().map(|t| f64::from(t.base_strength()) / f64::from(total) * 100.0).collect()
}

fn split_evenly(n: usize, winners: &[TeamId]) -> Vec<f64> {
    let mut percentages = vec![0.0; n];
    if winners.is_empty() {
        return percentages;
    }
    let share = 100.0 / winners.len() as f64;
    for id in winners {
        percentages[id.index()] = share;
    }
    percentages
}
