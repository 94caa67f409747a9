use std::f64::consts::LN_2;

use super::types::{DoublingOutcome, ProjectionInput};

// The simulated search gives up after a century of periods.
const CAP_YEARS: u64 = 100;

pub fn time_to_double(input: &ProjectionInput) -> DoublingOutcome {
    if input.periodic_deposit > 0.0 {
        simulated(input)
    } else {
        closed_form(input)
    }
}

fn closed_form(input: &ProjectionInput) -> DoublingOutcome {
    if input.annual_rate_percent <= 0.0 {
        return DoublingOutcome::Undefined;
    }

    let periods_per_year = input.frequency.periods_per_year() as f64;
    let growth = (1.0 + input.rate_per_period()).ln();
    if !growth.is_finite() || growth <= 0.0 {
        return DoublingOutcome::Undefined;
    }

    let t = LN_2 / (periods_per_year * growth);
    if !t.is_finite() {
        return DoublingOutcome::Undefined;
    }

    let years = t.floor();
    let months = ((t - years) * 12.0).floor();
    DoublingOutcome::Reached {
        years: years as u32,
        months: months as u32,
    }
}

fn simulated(input: &ProjectionInput) -> DoublingOutcome {
    let periods_per_year = input.frequency.periods_per_year() as u64;
    let rate_per_period = input.rate_per_period();
    let escalation = input.annual_deposit_increase_percent / 100.0;
    let target = 2.0 * input.principal;
    let cap = CAP_YEARS * periods_per_year;

    let mut balance = input.principal;
    let mut current_deposit = input.periodic_deposit;
    let mut periods = 0_u64;

    while balance < target {
        if periods == cap {
            return DoublingOutcome::CapReached;
        }
        periods += 1;

        balance += balance * rate_per_period;
        balance += current_deposit;
        if periods % periods_per_year == 0 && input.annual_deposit_increase_percent > 0.0 {
            current_deposit *= 1.0 + escalation;
        }
    }

    let years = (periods / periods_per_year) as u32;
    let months =
        (((periods % periods_per_year) as f64 / periods_per_year as f64) * 12.0).floor() as u32;
    DoublingOutcome::Reached { years, months }
}
