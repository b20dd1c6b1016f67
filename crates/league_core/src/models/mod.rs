pub mod fixture;
pub mod team;

pub use fixture::{Match, ScoreInput, Week};
pub use team::{parse_form, FormResult, TeamId, TeamState, FORM_PAD, FORM_WINDOW};
