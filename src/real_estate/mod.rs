//! Property value, rental income and disposition projections

mod engine;
mod records;

pub use engine::{RealEstateConfig, RealEstateEngine};
pub use records::{RealEstateProjection, RealEstateSummary, RealEstateYearRecord};
