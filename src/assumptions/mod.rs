//! Calculator inputs: loans, properties, insurance and household parameters
//!
//! Every numeric field deserializes through the lenient helpers in
//! [`crate::numeric`], so a scenario built from raw form state is always usable.

mod loan;
mod property;
mod insurance;
mod household;
pub mod loader;

pub use loan::{LoanAssumptions, LoanOverrides, Refinance, YearOverride};
pub use property::{PropertyAssumptions, PropertyOverrides};
pub use insurance::{InsuranceAssumptions, PersonCoverage};
pub use household::{ClientProfile, ClientRoster, HouseholdParams, Owner};
