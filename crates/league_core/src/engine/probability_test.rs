use super::outcome::OutcomeSampler;
use super::probability::*;
use crate::models::{TeamId, TeamState, Week};
use crate::season::scheduler::FixtureScheduler;
use crate::season::standings::replay;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const TOTAL_WEEKS: usize = 18;

fn teams(strengths: [u32; 4]) -> Vec<TeamState> {
    ["Arsenal", "Chelsea", "Liverpool", "Tottenham"]
        .iter()
        .zip(strengths)
        .map(|(name, s)| TeamState::new(*name, &name[..3], s))
        .collect()
}

fn calendar() -> Vec<Week> {
    FixtureScheduler::default().generate(&(0..4).map(TeamId).collect::<Vec<_>>())
}

/// Simulate weeks `1..=weeks` in place and return the next week counter.
fn play_weeks(teams: &mut [TeamState], fixtures: &mut [Week], weeks: usize, seed: u64) -> usize {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for index in 0..weeks {
        for m in fixtures[index].iter_mut() {
            let (hg, ag) = OutcomeSampler::sample(
                teams[m.home.index()].current_strength(),
                teams[m.away.index()].current_strength(),
                &mut rng,
            );
            m.record_simulated(hg, ag);
        }
        replay(teams, fixtures.iter().flatten());
    }
    weeks + 1
}

fn view<'a>(teams: &'a [TeamState], fixtures: &'a [Week], week: usize) -> SeasonView<'a> {
    SeasonView { teams, fixtures, week, total_weeks: TOTAL_WEEKS }
}

#[test]
fn test_cold_start_equal_strengths_is_exactly_quarter() {
    let teams = teams([80, 80, 80, 80]);
    let fixtures = calendar();

    let odds = ChampionshipProjector::new(100).project(view(&teams, &fixtures, 0), 1);

    assert_eq!(odds.method, ProjectionMethod::ColdStart);
    for index in 0..4 {
        assert_eq!(odds.percentage(TeamId(index)), 25.0);
    }
}

#[test]
fn test_cold_start_follows_base_strength() {
    let teams = teams([85, 82, 83, 80]);
    let odds = ChampionshipProjector::new(100).project(view(&teams, &[], 0), 1);

    let expected = 85.0 / 330.0 * 100.0;
    assert!((odds.percentage(TeamId(0)) - expected).abs() < 1e-9);
    assert!((odds.total() - 100.0).abs() < 1e-9);
}

#[test]
fn test_clinched_leader_ignores_trial_count() {
    let mut teams = teams([70, 80, 80, 80]);
    for _ in 0..17 {
        teams[0].apply_match_result(2, 0);
        teams[1].apply_match_result(0, 2);
        teams[2].apply_match_result(0, 1);
        teams[3].apply_match_result(1, 3);
    }
    let fixtures = calendar();

    for trials in [1, 10, 5_000] {
        let odds = ChampionshipProjector::new(trials).project(view(&teams, &fixtures, 18), 9);
        assert_eq!(odds.method, ProjectionMethod::Clinched);
        assert_eq!(odds.percentages(), &[100.0, 0.0, 0.0, 0.0]);
    }
}

#[test]
fn test_leader_not_clinched_while_reachable() {
    let mut teams = teams([80, 80, 80, 80]);
    // Leader on 3, rival on 0 with one game left can still reach 3.
    teams[0].apply_match_result(1, 0);
    teams[1].apply_match_result(0, 1);
    teams[2].apply_match_result(1, 1);
    teams[3].apply_match_result(1, 1);

    assert_eq!(clinched_leader(&teams, 2), None);
    assert_eq!(clinched_leader(&teams, 1), Some(TeamId(0)));
}

#[test]
fn test_complete_season_splits_full_ties() {
    let mut teams = teams([80, 80, 80, 80]);
    teams[0].apply_match_result(2, 0);
    teams[1].apply_match_result(0, 2);
    teams[2].apply_match_result(3, 1);
    teams[3].apply_match_result(1, 3);

    let odds = ChampionshipProjector::new(10).project(view(&teams, &[], TOTAL_WEEKS + 1), 0);

    assert_eq!(odds.method, ProjectionMethod::SeasonComplete);
    assert_eq!(odds.percentages(), &[50.0, 0.0, 50.0, 0.0]);
}

#[test]
fn test_complete_season_goal_difference_decides() {
    let mut teams = teams([80, 80, 80, 80]);
    teams[0].apply_match_result(2, 0);
    teams[2].apply_match_result(4, 0);

    let odds = ChampionshipProjector::new(10).project(view(&teams, &[], TOTAL_WEEKS + 1), 0);
    assert_eq!(odds.percentage(TeamId(2)), 100.0);
    assert_eq!(odds.percentage(TeamId(0)), 0.0);
}

#[test]
fn test_monte_carlo_sums_to_hundred() {
    let mut teams = teams([85, 82, 83, 80]);
    let mut fixtures = calendar();
    let week = play_weeks(&mut teams, &mut fixtures, 6, 77);

    let odds = ChampionshipProjector::new(2_000).project(view(&teams, &fixtures, week), 123);

    match odds.method {
        ProjectionMethod::MonteCarlo { trials, valid_trials } => {
            assert_eq!(trials, 2_000);
            assert_eq!(valid_trials, 2_000);
        }
        ProjectionMethod::Clinched => return,
        other => panic!("unexpected method {:?}", other),
    }
    assert!((odds.total() - 100.0).abs() < 1e-6, "total {}", odds.total());
    assert!(odds.percentages().iter().all(|p| (0.0..=100.0).contains(p)));
}

#[test]
fn test_monte_carlo_is_reproducible_and_thread_independent() {
    let mut teams = teams([85, 82, 83, 80]);
    let mut fixtures = calendar();
    let week = play_weeks(&mut teams, &mut fixtures, 3, 5);

    let parallel = ChampionshipProjector::new(1_000).project(view(&teams, &fixtures, week), 42);
    let again = ChampionshipProjector::new(1_000).project(view(&teams, &fixtures, week), 42);
    let sequential =
        ChampionshipProjector::new(1_000).sequential().project(view(&teams, &fixtures, week), 42);

    for index in 0..4 {
        let id = TeamId(index);
        assert!((parallel.percentage(id) - again.percentage(id)).abs() < 1e-9);
        assert!((parallel.percentage(id) - sequential.percentage(id)).abs() < 1e-9);
    }
}

#[test]
fn test_trials_do_not_touch_live_teams() {
    let mut teams = teams([85, 82, 83, 80]);
    let mut fixtures = calendar();
    let week = play_weeks(&mut teams, &mut fixtures, 4, 8);
    let before = teams.clone();
    let fixtures_before = fixtures.clone();

    ChampionshipProjector::new(500).project(view(&teams, &fixtures, week), 3);

    assert_eq!(teams, before);
    assert_eq!(fixtures, fixtures_before);
}

#[test]
fn test_stronger_side_is_favoured_after_kickoff() {
    let mut teams = teams([110, 60, 60, 60]);
    let mut fixtures = calendar();
    // Week 1 results fixed to a draw everywhere so only strength separates them.
    for m in fixtures[0].iter_mut() {
        m.record_override(1, 1);
    }
    replay(&mut teams, fixtures.iter().flatten());

    let odds = ChampionshipProjector::new(3_000).project(view(&teams, &fixtures, 2), 99);
    let table = odds.table(&teams);

    assert_eq!(table[0].team, TeamId(0));
    assert!(table[0].percentage > 40.0);
}

#[test]
fn test_fully_decided_calendar_gives_certainty() {
    let mut teams = teams([80, 80, 80, 80]);
    let mut fixtures = calendar();
    let week = play_weeks(&mut teams, &mut fixtures, 1, 1);

    // Every remaining match already decided: each trial reproduces the same table.
    for m in fixtures.iter_mut().flatten().filter(|m| !m.counts()) {
        if m.home == TeamId(3) {
            m.record_override(5, 0);
        } else if m.away == TeamId(3) {
            m.record_override(0, 5);
        } else {
            m.record_override(0, 0);
        }
    }
    replay(&mut teams, fixtures.iter().flatten());

    let odds = ChampionshipProjector::new(50).project(view(&teams, &fixtures, week), 4);
    assert_eq!(odds.percentage(TeamId(3)), 100.0);
}
