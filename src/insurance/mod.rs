//! Life insurance capital-needs analysis

mod annuity;
mod needs;

pub use annuity::{present_value_annuity, real_discount_rate};
pub use needs::{
    InsuranceConfig, InsuranceNeedResult, InsuranceNeedsEngine, InsuranceYearRecord, NeedBreakdown,
    DEFAULT_PROJECTION_PADDING_YEARS, MAX_INSURANCE_PROJECTION_YEARS,
};
