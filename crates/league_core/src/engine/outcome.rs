//! Match score sampling from relative team strength.

use rand::Rng;

/// Width of the draw band that sits right above the home-win band.
pub const DRAW_BAND: f64 = 0.2;

/// Which band a sampled match fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

/// Samples a scoreline from two team strengths.
///
/// The three bands are `[0, p_home)`, `[p_home, p_home + 0.2)` and the rest.
/// They are not renormalised: for `p_home >= 0.8` the away band is empty.
pub struct OutcomeSampler;

impl OutcomeSampler {
    /// Home-win band width for two strengths.
    pub fn home_win_probability(strength_home: u32, strength_away: u32) -> f64 {
        let total = f64::from(strength_home) + f64::from(strength_away);
        if total <= 0.0 {
            return 0.5;
        }
        f64::from(strength_home) / total
    }

    pub fn draw_outcome<R: Rng + ?Sized>(
        strength_home: u32,
        strength_away: u32,
        rng: &mut R,
    ) -> Outcome {
        let p_home = Self::home_win_probability(strength_home, strength_away);
        let roll: f64 = rng.gen();

        if roll < p_home {
            Outcome::HomeWin
        } else if roll < p_home + DRAW_BAND {
            Outcome::Draw
        } else {
            Outcome::AwayWin
        }
    }

    /// Sample `(home_goals, away_goals)`.
    pub fn sample<R: Rng + ?Sized>(strength_home: u32, strength_away: u32, rng: &mut R) -> (u8, u8) {
        match Self::draw_outcome(strength_home, strength_away, rng) {
            Outcome::HomeWin => {
                let home = 1 + rng.gen_range(0..=2u8);
                let away = rng.gen_range(0..home);
                (home, away)
            }
            Outcome::Draw => {
                let goals = rng.gen_range(0..=1u8);
                (goals, goals)
            }
            Outcome::AwayWin => {
                let away = 1 + rng.gen_range(0..=2u8);
                let home = rng.gen_range(0..away);
                (home, away)
            }
        }
    }
}
