//! Running loan state carried between projection years

use crate::assumptions::LoanAssumptions;

/// Unrounded loan state; only emitted records are rounded
#[derive(Debug, Clone)]
pub struct LoanState {
    /// Balance carried into the next year
    pub balance: f64,

    /// Annual interest rate currently in force (decimal)
    pub annual_rate: f64,

    /// Scheduled monthly payment currently in force
    pub monthly_payment: f64,
}

impl LoanState {
    /// Initial state: full principal, original rate, payment over the full term
    pub fn from_loan(loan: &LoanAssumptions) -> Self {
        let annual_rate = loan.annual_rate();
        Self {
            balance: loan.principal,
            annual_rate,
            monthly_payment: super::monthly_payment(loan.principal, annual_rate / 12.0, loan.total_months()),
        }
    }

    /// Whether the loan is paid off within `epsilon`
    pub fn is_paid_off(&self, epsilon: f64) -> bool {
        self.balance <= epsilon
    }
}
