//! Debt repayment schedules with extra payments, lump sums and refinancing

mod state;
mod engine;
mod schedule;

pub use state::LoanState;
pub use engine::{monthly_payment, AmortizationConfig, AmortizationEngine, MAX_PROJECTION_YEARS, PAYOFF_EPSILON};
pub use schedule::{AmortizationSchedule, AmortizationSummary, AmortizationYearRecord};
