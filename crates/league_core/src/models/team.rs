use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of recent results kept in the form window.
pub const FORM_WINDOW: usize = 5;

/// Padding character used when the form window is rendered as a fixed-width string.
pub const FORM_PAD: char = '-';

const FORM_STEP: f64 = 0.05;
const STRENGTH_FLOOR: f64 = 0.85;
const STRENGTH_CEIL: f64 = 1.15;

/// Stable index of a team inside a season's team arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub usize);

impl TeamId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl FormResult {
    pub fn from_score(goals_for: u8, goals_against: u8) -> Self {
        match goals_for.cmp(&goals_against) {
            std::cmp::Ordering::Greater => FormResult::Win,
            std::cmp::Ordering::Equal => FormResult::Draw,
            std::cmp::Ordering::Less => FormResult::Loss,
        }
    }

    pub fn code(self) -> char {
        match self {
            FormResult::Win => 'W',
            FormResult::Draw => 'D',
            FormResult::Loss => 'L',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'W' => Some(FormResult::Win),
            'D' => Some(FormResult::Draw),
            'L' => Some(FormResult::Loss),
            _ => None,
        }
    }

    fn multiplier_step(self) -> f64 {
        match self {
            FormResult::Win => FORM_STEP,
            FormResult::Draw => 0.0,
            FormResult::Loss => -FORM_STEP,
        }
    }
}

impl fmt::Display for FormResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Mutable per-team record: cumulative stats, recent form and derived strength.
///
/// Counters are only ever changed through [`TeamState::apply_match_result`] and
/// [`TeamState::reset_stats`], which keeps `played`, `points` and
/// `goal_difference` consistent with the W/D/L and goal counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamState {
    pub name: String,
    pub short_name: String,
    base_strength: u32,
    current_strength: u32,
    played: u32,
    won: u32,
    drawn: u32,
    lost: u32,
    goals_for: u32,
    goals_against: u32,
    goal_difference: i32,
    points: u32,
    /// Most recent result first.
    form: Vec<FormResult>,
}

impl TeamState {
    pub fn new(name: impl Into<String>, short_name: impl Into<String>, base_strength: u32) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            base_strength,
            current_strength: base_strength,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
            form: Vec::with_capacity(FORM_WINDOW),
        }
    }

    /// Rebuild a team from persisted values. The form window is taken as-is
    /// (truncated to [`FORM_WINDOW`]) and strength is recomputed from it.
    pub fn with_form(mut self, form: Vec<FormResult>) -> Self {
        self.restore_form(form);
        self
    }

    /// Replace the form window in place and recompute strength from it.
    pub fn restore_form(&mut self, form: Vec<FormResult>) {
        self.form = form;
        self.form.truncate(FORM_WINDOW);
        self.recompute_strength();
    }

    pub fn base_strength(&self) -> u32 {
        self.base_strength
    }

    pub fn current_strength(&self) -> u32 {
        self.current_strength
    }

    pub fn played(&self) -> u32 {
        self.played
    }

    pub fn won(&self) -> u32 {
        self.won
    }

    pub fn drawn(&self) -> u32 {
        self.drawn
    }

    pub fn lost(&self) -> u32 {
        self.lost
    }

    pub fn goals_for(&self) -> u32 {
        self.goals_for
    }

    pub fn goals_against(&self) -> u32 {
        self.goals_against
    }

    pub fn goal_difference(&self) -> i32 {
        self.goal_difference
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn form(&self) -> &[FormResult] {
        &self.form
    }

    /// Record one finished match from this team's point of view.
    pub fn apply_match_result(&mut self, goals_for: u8, goals_against: u8) {
        self.goals_for += u32::from(goals_for);
        self.goals_against += u32::from(goals_against);
        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;

        let result = FormResult::from_score(goals_for, goals_against);
        match result {
            FormResult::Win => {
                self.won += 1;
                self.points += 3;
            }
            FormResult::Draw => {
                self.drawn += 1;
                self.points += 1;
            }
            FormResult::Loss => self.lost += 1,
        }

        self.form.insert(0, result);
        self.form.truncate(FORM_WINDOW);

        self.played = self.won + self.drawn + self.lost;
        self.recompute_strength();
    }

    /// Zero every cumulative counter. Form and strengths are left alone.
    pub fn reset_stats(&mut self) {
        self.played = 0;
        self.won = 0;
        self.drawn = 0;
        self.lost = 0;
        self.goals_for = 0;
        self.goals_against = 0;
        self.goal_difference = 0;
        self.points = 0;
    }

    /// Truncated `[0.85, 1.15] * base_strength` bounds.
    pub fn strength_bounds(&self) -> (u32, u32) {
        let base = f64::from(self.base_strength);
        ((base * STRENGTH_FLOOR) as u32, (base * STRENGTH_CEIL) as u32)
    }

    fn recompute_strength(&mut self) {
        self.current_strength = self.base_strength;

        // Index 0 is the latest result and weighs 5/15, the oldest weighs 1/15.
        let multiplier = self.form.iter().enumerate().fold(1.0, |acc, (index, result)| {
            let weight = (FORM_WINDOW - index) as f64 / 15.0;
            acc + result.multiplier_step() * weight
        });

        let (min, max) = self.strength_bounds();
        let raw = (f64::from(self.base_strength) * multiplier) as u32;
        self.current_strength = raw.clamp(min, max);
    }

    /// Form window as exactly [`FORM_WINDOW`] characters, padded with [`FORM_PAD`].
    pub fn form_string(&self) -> String {
        let mut out: String = self.form.iter().map(|r| r.code()).collect();
        while out.chars().count() < FORM_WINDOW {
            out.push(FORM_PAD);
        }
        out
    }
}

/// Parse a persisted form string. Padding and unknown characters are skipped.
pub fn parse_form(form: &str) -> Vec<FormResult> {
    form.chars().filter_map(FormResult::from_code).take(FORM_WINDOW).collect()
}
