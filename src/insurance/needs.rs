//! Point-in-time insurance need and declining-need projection

use super::annuity::{present_value_annuity, real_discount_rate};
use crate::assumptions::{InsuranceAssumptions, PersonCoverage};
use crate::numeric::round_currency;
use chrono::Datelike;
use log::debug;
use serde::{Deserialize, Serialize};

/// Years projected beyond the income-replacement period
pub const DEFAULT_PROJECTION_PADDING_YEARS: u32 = 5;

/// Hard cap on projected years
pub const MAX_INSURANCE_PROJECTION_YEARS: u32 = 120;

/// Configuration for an insurance needs run
#[derive(Debug, Clone)]
pub struct InsuranceConfig {
    /// Calendar year of offset 0
    pub current_year: i32,

    /// Extra projected years after income replacement ends
    pub projection_padding_years: u32,

    /// Upper bound on the projection length
    pub max_projection_years: u32,
}

impl InsuranceConfig {
    pub fn new(current_year: i32) -> Self {
        Self {
            current_year,
            projection_padding_years: DEFAULT_PROJECTION_PADDING_YEARS,
            max_projection_years: MAX_INSURANCE_PROJECTION_YEARS,
        }
    }
}

impl Default for InsuranceConfig {
    /// Starts the projection in the current calendar year
    fn default() -> Self {
        Self::new(chrono::Local::now().year())
    }
}

/// How the headline need for one scenario is made up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeedBreakdown {
    pub income_replacement_pv: f64,
    pub outstanding_debt: f64,
    pub final_expenses: f64,
    pub education_fund: f64,
    pub total_needs: f64,
    pub available_assets: f64,
    pub existing_life_insurance: f64,
    pub total_resources: f64,
    /// Needs less resources, floored at 0
    pub insurance_need: f64,
}

/// One projected year of the declining need
///
/// Gaps compare the inflated need against existing life insurance only;
/// liquid and illiquid assets are not deducted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceYearRecord {
    pub year_offset: u32,
    pub year: i32,
    pub client_age: Option<u32>,
    pub spouse_age: Option<u32>,
    pub inflation_factor: f64,
    pub years_of_income_remaining: u32,
    pub client_income_need: f64,
    pub spouse_income_need: f64,
    pub outstanding_debt: f64,
    pub final_expenses: f64,
    pub education_fund: f64,
    pub client_total_need: f64,
    pub spouse_total_need: f64,
    pub client_gap: f64,
    pub spouse_gap: f64,
}

/// Result of an insurance needs analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceNeedResult {
    /// Coverage needed if the client dies
    pub insurance_need_on_client: f64,
    /// Coverage needed if the spouse dies (0 without a spouse)
    pub insurance_need_on_spouse: f64,
    pub client_breakdown: NeedBreakdown,
    pub spouse_breakdown: Option<NeedBreakdown>,
    pub yearly_projection: Vec<InsuranceYearRecord>,
}

/// Capital-needs engine
pub struct InsuranceNeedsEngine {
    config: InsuranceConfig,
}

impl InsuranceNeedsEngine {
    pub fn new(config: InsuranceConfig) -> Self {
        Self { config }
    }

    /// Headline needs for both scenarios plus the yearly projection
    pub fn compute_need(&self, assumptions: &InsuranceAssumptions) -> InsuranceNeedResult {
        let assumptions = assumptions.sanitized();
        let real_rate = real_discount_rate(assumptions.nominal_return(), assumptions.inflation_rate());

        let client_breakdown = Self::breakdown(&assumptions, &assumptions.client, real_rate);
        let spouse_breakdown = assumptions
            .spouse
            .as_ref()
            .map(|spouse| Self::breakdown(&assumptions, spouse, real_rate));

        debug!(
            "insurance need: client {:.2}, spouse {:?}",
            client_breakdown.insurance_need,
            spouse_breakdown.as_ref().map(|b| b.insurance_need)
        );

        InsuranceNeedResult {
            insurance_need_on_client: client_breakdown.insurance_need,
            insurance_need_on_spouse: spouse_breakdown.as_ref().map(|b| b.insurance_need).unwrap_or(0.0),
            yearly_projection: self.project(&assumptions, real_rate),
            client_breakdown,
            spouse_breakdown,
        }
    }

    /// Need if `insured` dies today
    fn breakdown(assumptions: &InsuranceAssumptions, insured: &PersonCoverage, real_rate: f64) -> NeedBreakdown {
        let income_replacement_pv = present_value_annuity(
            real_rate,
            assumptions.years_of_income_needed,
            insured.income_to_replace(),
        );
        let total_needs = income_replacement_pv
            + assumptions.outstanding_debt
            + assumptions.final_expenses
            + assumptions.education_fund;
        let available_assets = assumptions.available_assets();
        let total_resources = available_assets + insured.existing_life_insurance;

        NeedBreakdown {
            income_replacement_pv: round_currency(income_replacement_pv),
            outstanding_debt: round_currency(assumptions.outstanding_debt),
            final_expenses: round_currency(assumptions.final_expenses),
            education_fund: round_currency(assumptions.education_fund),
            total_needs: round_currency(total_needs),
            available_assets: round_currency(available_assets),
            existing_life_insurance: round_currency(insured.existing_life_insurance),
            total_resources: round_currency(total_resources),
            insurance_need: round_currency((total_needs - total_resources).max(0.0)),
        }
    }

    /// Inflated need per future year, measured against existing insurance only
    fn project(&self, assumptions: &InsuranceAssumptions, real_rate: f64) -> Vec<InsuranceYearRecord> {
        let horizon = assumptions
            .years_of_income_needed
            .saturating_add(self.config.projection_padding_years)
            .min(self.config.max_projection_years);
        let inflation = assumptions.inflation_rate();
        let spouse = assumptions.spouse.as_ref();

        (0..horizon)
            .map(|offset| {
                let factor = (1.0 + inflation).powi(offset as i32);
                let remaining = assumptions.years_of_income_needed.saturating_sub(offset);

                let client_income_need =
                    present_value_annuity(real_rate, remaining, assumptions.client.income_to_replace() * factor);
                let spouse_income_need = spouse
                    .map(|s| present_value_annuity(real_rate, remaining, s.income_to_replace() * factor))
                    .unwrap_or(0.0);

                let debt = assumptions.outstanding_debt * factor;
                let final_expenses = assumptions.final_expenses * factor;
                let education = assumptions.education_fund * factor;
                let shared = debt + final_expenses + education;

                let client_total = client_income_need + shared;
                let spouse_total = if spouse.is_some() { spouse_income_need + shared } else { 0.0 };
                let spouse_gap = spouse
                    .map(|s| (spouse_total - s.existing_life_insurance).max(0.0))
                    .unwrap_or(0.0);

                InsuranceYearRecord {
                    year_offset: offset,
                    year: self.config.current_year + offset as i32,
                    client_age: assumptions.client.age.map(|a| a.saturating_add(offset)),
                    spouse_age: spouse.and_then(|s| s.age).map(|a| a.saturating_add(offset)),
                    inflation_factor: factor,
                    years_of_income_remaining: remaining,
                    client_income_need: round_currency(client_income_need),
                    spouse_income_need: round_currency(spouse_income_need),
                    outstanding_debt: round_currency(debt),
                    final_expenses: round_currency(final_expenses),
                    education_fund: round_currency(education),
                    client_total_need: round_currency(client_total),
                    spouse_total_need: round_currency(spouse_total),
                    client_gap: round_currency((client_total - assumptions.client.existing_life_insurance).max(0.0)),
                    spouse_gap: round_currency(spouse_gap),
                }
            })
            .collect()
    }
}
