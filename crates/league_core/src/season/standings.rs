//! Standings replay and table ordering.

use crate::models::{Match, TeamId, TeamState};
use serde::Serialize;
use std::cmp::Ordering;

/// Rebuild every team's cumulative stats from the match list.
///
/// Counters are zeroed first, then every counted match is applied to both
/// sides in calendar order. Running it twice on the same input gives the same
/// counters.
pub fn replay<'a, I>(teams: &mut [TeamState], matches: I)
where
    I: IntoIterator<Item = &'a Match>,
{
    for team in teams.iter_mut() {
        team.reset_stats();
    }

    for m in matches.into_iter().filter(|m| m.counts()) {
        teams[m.home.index()].apply_match_result(m.home_goals, m.away_goals);
        teams[m.away.index()].apply_match_result(m.away_goals, m.home_goals);
    }
}

/// Points, then goal difference, then goals scored; all descending.
pub fn compare_teams(a: &TeamState, b: &TeamState) -> Ordering {
    b.points()
        .cmp(&a.points())
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals_for().cmp(&a.goals_for()))
}

/// Arena ids in table order. Stable, so full ties keep arena order.
pub fn table_order(teams: &[TeamState]) -> Vec<TeamId> {
    let mut order: Vec<TeamId> = (0..teams.len()).map(TeamId).collect();
    order.sort_by(|a, b| compare_teams(&teams[a.index()], &teams[b.index()]));
    order
}

/// One displayable row of the league table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    pub position: usize,
    pub team: TeamId,
    pub name: String,
    pub short_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
    pub strength: u32,
    pub form: String,
}

pub fn standings_table(teams: &[TeamState]) -> Vec<StandingRow> {
    table_order(teams)
        .into_iter()
        .enumerate()
        .map(|(index, id)| {
            let t = &teams[id.index()];
            StandingRow {
                position: index + 1,
                team: id,
                name: t.name.clone(),
                short_name: t.short_name.clone(),
                played: t.played(),
                won: t.won(),
                drawn: t.drawn(),
                lost: t.lost(),
                goals_for: t.goals_for(),
                goals_against: t.goals_against(),
                goal_difference: t.goal_difference(),
                points: t.points(),
                strength: t.current_strength(),
                form: t.form_string(),
            }
        })
        .collect()
}

/// Teams with the most points and, among those, the best goal difference.
pub fn champions(teams: &[TeamState]) -> Vec<TeamId> {
    let Some(max_points) = teams.iter().map(|t| t.points()).max() else {
        return Vec::new();
    };
    let best_gd = teams
        .iter()
        .filter(|t| t.points() == max_points)
        .map(|t| t.goal_difference())
        .max()
        .unwrap_or(i32::MIN);

    teams
        .iter()
        .enumerate()
        .filter(|(_, t)| t.points() == max_points && t.goal_difference() == best_gd)
        .map(|(index, _)| TeamId(index))
        .collect()
}
