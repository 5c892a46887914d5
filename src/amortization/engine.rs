//! Year-by-year amortization of a single debt

use super::schedule::{AmortizationSchedule, AmortizationYearRecord};
use super::state::LoanState;
use crate::assumptions::{LoanAssumptions, LoanOverrides, YearOverride};
use crate::numeric::{finite_or, percent_to_rate, round_currency};
use chrono::Datelike;
use log::{debug, trace};

/// Hard cap on projected years
pub const MAX_PROJECTION_YEARS: u32 = 50;

/// Balance at or below which a loan counts as paid off
pub const PAYOFF_EPSILON: f64 = 0.01;

/// Configuration for an amortization run
#[derive(Debug, Clone)]
pub struct AmortizationConfig {
    /// Calendar year of offset 0 when the loan has no explicit start year
    pub current_year: i32,

    /// Maximum number of emitted years
    pub max_years: u32,

    /// Payoff threshold
    pub payoff_epsilon: f64,
}

impl AmortizationConfig {
    pub fn new(current_year: i32) -> Self {
        Self {
            current_year,
            max_years: MAX_PROJECTION_YEARS,
            payoff_epsilon: PAYOFF_EPSILON,
        }
    }
}

impl Default for AmortizationConfig {
    /// Starts the projection in the current calendar year
    fn default() -> Self {
        Self::new(chrono::Local::now().year())
    }
}

/// Level monthly payment that fully amortizes `principal` over `months`
///
/// `payment = P·r·(1+r)^n / ((1+r)^n − 1)`, or `P / n` when the rate is zero.
/// Terms too long for `(1+r)^n` to stay finite pay the interest-only limit `P·r`.
pub fn monthly_payment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return 0.0;
    }
    if monthly_rate == 0.0 {
        return principal / months as f64;
    }
    let growth = (1.0 + monthly_rate).powf(months as f64);
    if !growth.is_finite() {
        return principal * monthly_rate;
    }
    finite_or(principal * monthly_rate * growth / (growth - 1.0), principal * monthly_rate)
}

/// Debt amortization engine
pub struct AmortizationEngine {
    config: AmortizationConfig,
}

impl AmortizationEngine {
    pub fn new(config: AmortizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AmortizationConfig {
        &self.config
    }

    /// Project a loan until payoff or the year cap
    pub fn project(&self, loan: &LoanAssumptions, overrides: &LoanOverrides) -> AmortizationSchedule {
        let loan = loan.sanitized();
        let start_year = loan.start_year.unwrap_or(self.config.current_year);
        let mut schedule = AmortizationSchedule::new(start_year, loan.start_age);

        if loan.is_degenerate() {
            debug!("degenerate loan (principal {}, age {}), emitting empty year", loan.principal, loan.start_age);
            schedule.add_record(AmortizationYearRecord::empty(start_year, loan.start_age));
            return schedule;
        }

        let mut state = LoanState::from_loan(&loan);

        for offset in 0..self.config.max_years {
            let record = self.project_year(&loan, overrides.get(&offset), offset, start_year, &mut state);
            trace!("{:?}", record);
            schedule.add_record(record);

            if state.is_paid_off(self.config.payoff_epsilon) {
                debug!("loan paid off in year {} (offset {})", start_year + offset as i32, offset);
                break;
            }
        }

        schedule
    }

    /// Project a loan with no extra, manual or refinance activity
    pub fn project_baseline(&self, loan: &LoanAssumptions) -> AmortizationSchedule {
        let plain = LoanAssumptions {
            extra_monthly_payment: 0.0,
            ..loan.clone()
        };
        self.project(&plain, &LoanOverrides::new())
    }

    /// Advance one year and build its record
    fn project_year(
        &self,
        loan: &LoanAssumptions,
        year_override: Option<&YearOverride>,
        offset: u32,
        start_year: i32,
        state: &mut LoanState,
    ) -> AmortizationYearRecord {
        let mut record = AmortizationYearRecord::empty(start_year + offset as i32, loan.start_age.saturating_add(offset));

        if let Some(refinance) = year_override.and_then(|o| o.refinance.as_ref()) {
            if let Some(balance) = refinance.new_balance {
                state.balance = balance;
                record.refinance_amount = round_currency(balance);
            }
            if let Some(rate_percent) = refinance.new_annual_rate_percent {
                state.annual_rate = percent_to_rate(rate_percent);
            }

            let remaining_months = (loan.amortization_years as i64 - offset as i64) * 12;
            state.monthly_payment = if remaining_months <= 0 {
                0.0
            } else {
                monthly_payment(state.balance, state.annual_rate / 12.0, u32::try_from(remaining_months).unwrap_or(u32::MAX))
            };
            debug!(
                "refinance at offset {}: balance {:.2}, rate {:.4}, monthly payment {:.2}",
                offset, state.balance, state.annual_rate, state.monthly_payment
            );
        }

        let opening = state.balance;
        let manual = year_override.map(|o| o.manual_payment).unwrap_or(0.0);

        let mut interest = opening * state.annual_rate;
        let total_payment = state.monthly_payment * 12.0 + loan.extra_monthly_payment * 12.0 + manual;
        let mut principal = total_payment - interest;

        if principal > opening {
            // Final payment: only what is owed is applied
            principal = opening;
            interest = opening * state.annual_rate;
            state.balance = 0.0;
        } else {
            state.balance = opening - principal;
        }

        record.opening_balance = round_currency(opening);
        record.interest_rate_percent = state.annual_rate * 100.0;
        record.monthly_payment = round_currency(state.monthly_payment);
        record.manual_payment = round_currency(manual);
        record.interest_portion = round_currency(interest);
        record.principal_portion = round_currency(principal);
        record.total_annual_payment = record.interest_portion + record.principal_portion;
        record.closing_balance = round_currency(state.balance.max(0.0));
        record
    }
}
