use super::doubling::time_to_double;
use super::types::{ProjectionInput, ProjectionResult, YearlyRecord};

pub fn project(input: &ProjectionInput) -> ProjectionResult {
    let periods_per_year = input.frequency.periods_per_year() as u64;
    let rate_per_period = input.rate_per_period();
    let total_periods = input.total_periods();
    let escalation = input.annual_deposit_increase_percent / 100.0;

    let mut balance = input.principal;
    let mut cumulative_interest = 0.0;
    let mut total_deposits = 0.0;
    let mut current_deposit = input.periodic_deposit;
    let mut interest_this_year = 0.0;
    let mut year = 0_u32;
    let mut breakdown = Vec::with_capacity((total_periods / periods_per_year + 1) as usize);

    for p in 1..=total_periods {
        // Interest accrues on the balance before this period's deposit.
        let interest = balance * rate_per_period;
        balance += interest;
        cumulative_interest += interest;
        interest_this_year += interest;

        if current_deposit > 0.0 {
            balance += current_deposit;
            total_deposits += current_deposit;
        }

        let anniversary = p % periods_per_year == 0;
        if anniversary && input.periodic_deposit > 0.0 && input.annual_deposit_increase_percent > 0.0
        {
            // Escalation takes effect from the period after the anniversary.
            current_deposit *= 1.0 + escalation;
        }

        if anniversary || p == total_periods {
            year += 1;
            breakdown.push(YearlyRecord {
                year,
                interest_this_year,
                cumulative_interest,
                balance,
            });
            interest_this_year = 0.0;
        }
    }

    ProjectionResult {
        final_balance: balance,
        total_interest: cumulative_interest,
        total_deposits,
        yearly_breakdown: breakdown,
        time_to_double: time_to_double(input),
    }
}
