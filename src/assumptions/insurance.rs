//! Insurance needs calculator inputs

use crate::numeric::{finite_or, lenient_f64, lenient_opt_u32, lenient_u32, percent_to_rate};
use serde::{Deserialize, Serialize};

/// Income and coverage of one insured person
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonCoverage {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub annual_income: f64,

    /// Share of the income the survivors need replaced, in percent
    #[serde(default, deserialize_with = "lenient_f64")]
    pub income_replacement_percent: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub existing_life_insurance: f64,

    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub age: Option<u32>,
}

impl PersonCoverage {
    pub fn sanitized(&self) -> Self {
        Self {
            annual_income: finite_or(self.annual_income, 0.0),
            income_replacement_percent: finite_or(self.income_replacement_percent, 0.0),
            existing_life_insurance: finite_or(self.existing_life_insurance, 0.0),
            age: self.age,
        }
    }

    /// Annual income the survivors need replaced
    pub fn income_to_replace(&self) -> f64 {
        self.annual_income * percent_to_rate(self.income_replacement_percent)
    }
}

/// Household capital-needs assumptions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsuranceAssumptions {
    #[serde(default)]
    pub client: PersonCoverage,

    #[serde(default)]
    pub spouse: Option<PersonCoverage>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub outstanding_debt: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub final_expenses: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub education_fund: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub liquid_assets: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub illiquid_assets: f64,

    /// Whether illiquid assets count against the headline need
    #[serde(default)]
    pub include_illiquid_assets: bool,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub years_of_income_needed: u32,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub nominal_return_percent: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub inflation_rate_percent: f64,
}

impl InsuranceAssumptions {
    /// Copy with every non-finite amount replaced by 0
    pub fn sanitized(&self) -> Self {
        Self {
            client: self.client.sanitized(),
            spouse: self.spouse.as_ref().map(PersonCoverage::sanitized),
            outstanding_debt: finite_or(self.outstanding_debt, 0.0),
            final_expenses: finite_or(self.final_expenses, 0.0),
            education_fund: finite_or(self.education_fund, 0.0),
            liquid_assets: finite_or(self.liquid_assets, 0.0),
            illiquid_assets: finite_or(self.illiquid_assets, 0.0),
            include_illiquid_assets: self.include_illiquid_assets,
            years_of_income_needed: self.years_of_income_needed,
            nominal_return_percent: finite_or(self.nominal_return_percent, 0.0),
            inflation_rate_percent: finite_or(self.inflation_rate_percent, 0.0),
        }
    }

    pub fn nominal_return(&self) -> f64 {
        percent_to_rate(self.nominal_return_percent)
    }

    pub fn inflation_rate(&self) -> f64 {
        percent_to_rate(self.inflation_rate_percent)
    }

    /// Assets available to survivors before insurance
    pub fn available_assets(&self) -> f64 {
        if self.include_illiquid_assets {
            self.liquid_assets + self.illiquid_assets
        } else {
            self.liquid_assets
        }
    }
}
