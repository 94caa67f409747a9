use serde::Serialize;
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CompoundingFrequency {
    Annually,
    Quarterly,
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Daily => 365,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub frequency: CompoundingFrequency,
    pub duration_years: f64,
    pub periodic_deposit: f64,
    pub annual_deposit_increase_percent: f64,
}

impl ProjectionInput {
    pub fn rate_per_period(&self) -> f64 {
        (self.annual_rate_percent / 100.0) / self.frequency.periods_per_year() as f64
    }

    pub fn total_periods(&self) -> u64 {
        (self.frequency.periods_per_year() as f64 * self.duration_years).floor() as u64
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRecord {
    pub year: u32,
    pub interest_this_year: f64,
    pub cumulative_interest: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum DoublingOutcome {
    Reached { years: u32, months: u32 },
    Undefined,
    CapReached,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub final_balance: f64,
    pub total_interest: f64,
    pub total_deposits: f64,
    pub yearly_breakdown: Vec<YearlyRecord>,
    pub time_to_double: DoublingOutcome,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum SolveRateError {
    #[error("principal must be non-zero to solve for a rate")]
    ZeroPrincipal,
    #[error("target balance must be positive to solve for a rate")]
    NonPositiveTarget,
    #[error("duration must cover at least one period to solve for a rate")]
    ZeroDuration,
}
