//! Amortization output structures

use serde::{Deserialize, Serialize};

/// One projected year of a debt, currency rounded to whole units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYearRecord {
    pub year: i32,
    pub age: u32,

    /// Balance interest accrues on this year (after any refinance)
    pub opening_balance: f64,
    pub interest_rate_percent: f64,

    /// Scheduled monthly payment in force this year
    pub monthly_payment: f64,

    /// Regular, extra and manual payments actually applied
    pub total_annual_payment: f64,
    pub manual_payment: f64,

    /// New balance set by a refinance this year, 0 otherwise
    pub refinance_amount: f64,

    pub interest_portion: f64,
    pub principal_portion: f64,
    pub closing_balance: f64,
}

impl AmortizationYearRecord {
    /// A zero-valued year
    pub fn empty(year: i32, age: u32) -> Self {
        Self {
            year,
            age,
            opening_balance: 0.0,
            interest_rate_percent: 0.0,
            monthly_payment: 0.0,
            total_annual_payment: 0.0,
            manual_payment: 0.0,
            refinance_amount: 0.0,
            interest_portion: 0.0,
            principal_portion: 0.0,
            closing_balance: 0.0,
        }
    }
}

/// Complete schedule for one debt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub start_year: i32,
    pub start_age: u32,
    pub records: Vec<AmortizationYearRecord>,
}

impl AmortizationSchedule {
    pub fn new(start_year: i32, start_age: u32) -> Self {
        Self {
            start_year,
            start_age,
            records: Vec::new(),
        }
    }

    pub fn add_record(&mut self, record: AmortizationYearRecord) {
        self.records.push(record);
    }

    /// Record for a calendar year, if projected
    pub fn for_year(&self, year: i32) -> Option<&AmortizationYearRecord> {
        self.records.iter().find(|r| r.year == year)
    }

    /// Totals and payoff timing
    pub fn summary(&self) -> AmortizationSummary {
        let total_interest: f64 = self.records.iter().map(|r| r.interest_portion).sum();
        let total_paid: f64 = self.records.iter().map(|r| r.total_annual_payment).sum();
        let total_manual_payments: f64 = self.records.iter().map(|r| r.manual_payment).sum();

        let paid_off = self
            .records
            .last()
            .filter(|r| r.closing_balance <= super::PAYOFF_EPSILON && r.opening_balance > 0.0);

        AmortizationSummary {
            years_to_payoff: paid_off.map(|_| self.records.len() as u32),
            payoff_year: paid_off.map(|r| r.year),
            payoff_age: paid_off.map(|r| r.age),
            total_interest,
            total_paid,
            total_manual_payments,
            final_balance: self.records.last().map(|r| r.closing_balance).unwrap_or(0.0),
        }
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSummary {
    /// Number of projected years until payoff; `None` if not paid off within the cap
    pub years_to_payoff: Option<u32>,
    pub payoff_year: Option<i32>,
    pub payoff_age: Option<u32>,
    pub total_interest: f64,
    pub total_paid: f64,
    pub total_manual_payments: f64,
    pub final_balance: f64,
}

impl AmortizationSummary {
    /// Interest avoided relative to another schedule (usually the plain baseline)
    pub fn interest_saved_against(&self, baseline: &AmortizationSummary) -> f64 {
        baseline.total_interest - self.total_interest
    }
}
