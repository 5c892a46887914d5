//! Household Projections - multi-year projection engines for household financial planning
//!
//! This library provides:
//! - Debt amortization with extra payments, manual lump sums and refinancing
//! - Real estate projections with rent indexing, sale and capital gains tax
//! - Life insurance needs analysis for a client and spouse
//! - Main-view aggregation of linked calculators into income, asset,
//!   liability, net worth and estate tables

pub mod numeric;
pub mod error;
pub mod assumptions;
pub mod amortization;
pub mod real_estate;
pub mod insurance;
pub mod aggregation;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use assumptions::{ClientRoster, HouseholdParams, InsuranceAssumptions, LoanAssumptions, PropertyAssumptions};
pub use amortization::{AmortizationEngine, AmortizationSchedule};
pub use real_estate::{RealEstateEngine, RealEstateProjection};
pub use insurance::{InsuranceNeedResult, InsuranceNeedsEngine};
pub use aggregation::{AggregationEngine, LinkedCalculator, MainViewTables};
pub use scenario::{ScenarioFile, ScenarioReport, ScenarioRunner};
