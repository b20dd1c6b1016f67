//! Fixture calendar generation (circle method).

use crate::models::{Match, TeamId, Week};

/// Builds a repeated double round-robin calendar for an even number of teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureScheduler {
    team_count: usize,
    cycles: usize,
}

impl Default for FixtureScheduler {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TEAM_COUNT, crate::config::DEFAULT_CYCLES)
    }
}

impl FixtureScheduler {
    pub fn new(team_count: usize, cycles: usize) -> Self {
        Self { team_count, cycles }
    }

    pub fn total_weeks(&self) -> usize {
        self.team_count.saturating_sub(1) * 2 * self.cycles
    }

    /// Generate the full calendar.
    ///
    /// # Panics
    /// If `teams` does not hold exactly the configured even number of teams.
    pub fn generate(&self, teams: &[TeamId]) -> Vec<Week> {
        let n = self.team_count;
        assert!(
            n >= 2 && n % 2 == 0 && teams.len() == n,
            "fixture scheduler expects exactly {} teams (even), got {}",
            n,
            teams.len()
        );

        let mut weeks: Vec<Week> = Vec::with_capacity(self.total_weeks());

        for _ in 0..self.cycles {
            for swap_sides in [false, true] {
                // Slot 0 stays put, the rest rotate left after every round.
                let mut slots: Vec<usize> = (0..n).collect();
                for _ in 0..n - 1 {
                    let week_number = weeks.len() + 1;
                    let week = (0..n / 2)
                        .map(|i| {
                            let (mut home, mut away) = (slots[i], slots[n - 1 - i]);
                            if swap_sides {
                                std::mem::swap(&mut home, &mut away);
                            }
                            Match::new(teams[home], teams[away], week_number)
                        })
                        .collect();
                    weeks.push(week);
                    slots[1..].rotate_left(1);
                }
            }
        }

        weeks
    }
}
