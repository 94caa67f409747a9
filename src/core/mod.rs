mod doubling;
mod engine;
mod solver;
mod types;

pub use doubling::time_to_double;
pub use engine::project;
pub use solver::{
    MAX_SOLVED_RATE_PERCENT, MIN_SOLVED_RATE_PERCENT, solve_initial_from_target,
    solve_rate_from_final_target,
};
pub use types::{
    CompoundingFrequency, DoublingOutcome, ProjectionInput, ProjectionResult, SolveRateError,
    YearlyRecord,
};
