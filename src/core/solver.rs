use super::types::{CompoundingFrequency, SolveRateError};

pub const MIN_SOLVED_RATE_PERCENT: f64 = 0.01;
pub const MAX_SOLVED_RATE_PERCENT: f64 = 100.0;

// The target overrides the starting point directly; there is no growth-model
// back-solving here, and the caller re-projects with the returned principal.
pub fn solve_initial_from_target(target_balance: f64) -> f64 {
    target_balance.round()
}

// Closed-form inversion of A = P(1 + r/n)^(nt). Periodic deposits are
// ignored, so the answer is exact only when the deposit is zero and an
// approximation otherwise.
pub fn solve_rate_from_final_target(
    target_balance: f64,
    principal: f64,
    frequency: CompoundingFrequency,
    duration_years: f64,
) -> Result<f64, SolveRateError> {
    if principal == 0.0 {
        return Err(SolveRateError::ZeroPrincipal);
    }

    let ratio = target_balance / principal;
    if ratio <= 0.0 {
        return Err(SolveRateError::NonPositiveTarget);
    }

    let periods_per_year = frequency.periods_per_year() as f64;
    let exponent = periods_per_year * duration_years;
    if exponent <= 0.0 {
        return Err(SolveRateError::ZeroDuration);
    }

    let rate_per_period = ratio.powf(1.0 / exponent) - 1.0;
    let annual_rate_percent = rate_per_period * periods_per_year * 100.0;
    Ok(annual_rate_percent.clamp(MIN_SOLVED_RATE_PERCENT, MAX_SOLVED_RATE_PERCENT))
}
