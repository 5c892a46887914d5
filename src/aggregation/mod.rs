//! Main-view aggregation across linked calculators
//!
//! # Architecture
//!
//! 1. **Extractors** turn each linked calculator's saved state into a list of
//!    calendar-year [`YearContribution`]s (`None` when the state is insufficient).
//! 2. **Merging** sums contributions that share a calendar year, field by field.
//! 3. **Tables** derive income, asset, liability, net worth and estate rows for
//!    each projected year.

mod categories;
mod extract;
mod engine;
mod tables;

pub use categories::{
    AccountFlows, AccountKind, BalanceRange, CalculatorExtract, CalculatorKind, CapitalAssets, DebtKind, Debts,
    FixedIncome, FixedIncomeKind, PropertyKind, RealEstateHoldings, YearContribution,
};
pub use extract::{
    debt_extract_from_schedule, extract_capital_assets, extract_debt, extract_fixed_income, extract_real_estate,
    project_debt, project_real_estate, real_estate_extract_from_projection, resolve_loan, resolve_property, AccountPlan, CapitalAssetsCalculatorState,
    DebtCalculatorState, FixedIncomeCalculatorState, IncomeStream, LinkedCalculator, RealEstateCalculatorState,
    DEFAULT_END_AGE,
};
pub use engine::{merge_by_year, probate_estimate, AggregationEngine, PROBATE_EXEMPTION, PROBATE_RATE};
pub use tables::{
    AssetYearRecord, EstateYearRecord, IncomeYearRecord, LiabilityYearRecord, MainViewTables, NetWorthYearRecord,
};
