pub mod outcome;
pub mod probability;

#[cfg(test)]
mod probability_test;

pub use outcome::{Outcome, OutcomeSampler, DRAW_BAND};
pub use probability::{
    clinched_leader, ChampionshipOdds, ChampionshipProjector, ProbabilityRow, ProjectionMethod,
    SeasonView,
};
