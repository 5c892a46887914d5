//! Debt calculator inputs

use crate::numeric::{finite_or, lenient_f64, lenient_opt_f64, lenient_opt_i32, lenient_u32, percent_to_rate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse per-year loan interventions keyed by zero-based year offset
pub type LoanOverrides = BTreeMap<u32, YearOverride>;

/// Terms of a single amortizing debt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanAssumptions {
    /// Outstanding principal at the start of the projection
    #[serde(default, deserialize_with = "lenient_f64")]
    pub principal: f64,

    /// Nominal annual interest rate in percent (4.0 = 4%)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub annual_interest_rate_percent: f64,

    /// Remaining amortization term in years
    #[serde(default, deserialize_with = "lenient_u32")]
    pub amortization_years: u32,

    /// Voluntary extra amount paid every month
    #[serde(default, deserialize_with = "lenient_f64")]
    pub extra_monthly_payment: f64,

    /// Borrower age in the first projected year
    #[serde(default, deserialize_with = "lenient_u32")]
    pub start_age: u32,

    /// First projected calendar year; the run's current year when absent
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub start_year: Option<i32>,
}

impl LoanAssumptions {
    pub fn new(principal: f64, annual_interest_rate_percent: f64, amortization_years: u32, start_age: u32) -> Self {
        Self {
            principal,
            annual_interest_rate_percent,
            amortization_years,
            extra_monthly_payment: 0.0,
            start_age,
            start_year: None,
        }
    }

    /// Copy with every non-finite amount replaced by 0
    pub fn sanitized(&self) -> Self {
        Self {
            principal: finite_or(self.principal, 0.0),
            annual_interest_rate_percent: finite_or(self.annual_interest_rate_percent, 0.0),
            extra_monthly_payment: finite_or(self.extra_monthly_payment, 0.0),
            ..self.clone()
        }
    }

    /// Annual rate as a decimal
    pub fn annual_rate(&self) -> f64 {
        percent_to_rate(self.annual_interest_rate_percent)
    }

    /// Total number of monthly payments in the original term
    pub fn total_months(&self) -> u32 {
        self.amortization_years.saturating_mul(12)
    }

    /// Inputs that cannot produce a schedule
    pub fn is_degenerate(&self) -> bool {
        !(self.principal > 0.0) || self.start_age == 0
    }
}

/// Manual intervention for one projection year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearOverride {
    /// Lump sum paid in this year only
    #[serde(default, deserialize_with = "lenient_f64")]
    pub manual_payment: f64,

    /// Refinance taking effect at the start of this year
    #[serde(default)]
    pub refinance: Option<Refinance>,
}

impl YearOverride {
    pub fn manual_payment(amount: f64) -> Self {
        Self {
            manual_payment: amount,
            refinance: None,
        }
    }

    pub fn refinance(new_balance: Option<f64>, new_annual_rate_percent: Option<f64>) -> Self {
        Self {
            manual_payment: 0.0,
            refinance: Some(Refinance {
                new_balance,
                new_annual_rate_percent,
            }),
        }
    }
}

/// Replacement balance and/or rate for the remainder of the schedule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Refinance {
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub new_balance: Option<f64>,

    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub new_annual_rate_percent: Option<f64>,
}

impl Refinance {
    /// A refinance with neither field set changes nothing
    pub fn is_empty(&self) -> bool {
        self.new_balance.is_none() && self.new_annual_rate_percent.is_none()
    }
}
