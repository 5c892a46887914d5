//! Real estate calculator inputs

use crate::numeric::{finite_or, lenient_f64, lenient_offset_map, lenient_u32, percent_to_rate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Growth, income and tax assumptions for one property
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyAssumptions {
    /// Market value at the start of the projection
    #[serde(default, deserialize_with = "lenient_f64")]
    pub start_value: f64,

    /// Adjusted cost base used for capital gains on sale
    #[serde(default, deserialize_with = "lenient_f64")]
    pub adjusted_cost_base: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub annual_growth_rate_percent: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub gross_annual_rent: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub rent_index_rate_percent: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub annual_expenses: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub expense_index_rate_percent: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub marginal_tax_rate_percent: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub capital_gains_inclusion_rate_percent: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub outstanding_mortgage: f64,

    /// Principal residence gains are exempt from tax
    #[serde(default)]
    pub is_principal_residence: bool,

    /// Projection horizon; offsets 0..=time_period_years are emitted
    #[serde(default, deserialize_with = "lenient_u32")]
    pub time_period_years: u32,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub start_age: u32,
}

impl PropertyAssumptions {
    /// Copy with every non-finite amount replaced by 0
    pub fn sanitized(&self) -> Self {
        Self {
            start_value: finite_or(self.start_value, 0.0),
            adjusted_cost_base: finite_or(self.adjusted_cost_base, 0.0),
            annual_growth_rate_percent: finite_or(self.annual_growth_rate_percent, 0.0),
            gross_annual_rent: finite_or(self.gross_annual_rent, 0.0),
            rent_index_rate_percent: finite_or(self.rent_index_rate_percent, 0.0),
            annual_expenses: finite_or(self.annual_expenses, 0.0),
            expense_index_rate_percent: finite_or(self.expense_index_rate_percent, 0.0),
            marginal_tax_rate_percent: finite_or(self.marginal_tax_rate_percent, 0.0),
            capital_gains_inclusion_rate_percent: finite_or(self.capital_gains_inclusion_rate_percent, 0.0),
            outstanding_mortgage: finite_or(self.outstanding_mortgage, 0.0),
            ..self.clone()
        }
    }

    pub fn growth_rate(&self) -> f64 {
        percent_to_rate(self.annual_growth_rate_percent)
    }

    pub fn rent_index_rate(&self) -> f64 {
        percent_to_rate(self.rent_index_rate_percent)
    }

    pub fn expense_index_rate(&self) -> f64 {
        percent_to_rate(self.expense_index_rate_percent)
    }

    pub fn marginal_tax_rate(&self) -> f64 {
        percent_to_rate(self.marginal_tax_rate_percent)
    }

    pub fn inclusion_rate(&self) -> f64 {
        percent_to_rate(self.capital_gains_inclusion_rate_percent)
    }
}

/// Sparse per-year manual values keyed by year offset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyOverrides {
    /// Sale proceeds; a positive amount disposes of the property that year
    #[serde(default, deserialize_with = "lenient_offset_map")]
    pub sale_proceeds: BTreeMap<u32, f64>,

    /// Manually entered purchase basis, carried forward until replaced
    #[serde(default, deserialize_with = "lenient_offset_map")]
    pub purchase_basis: BTreeMap<u32, f64>,

    /// Manually entered mortgage balance, carried forward until replaced
    #[serde(default, deserialize_with = "lenient_offset_map")]
    pub mortgage_balance: BTreeMap<u32, f64>,
}

impl PropertyOverrides {
    /// Overrides with a single sale
    pub fn sale_at(offset: u32, proceeds: f64) -> Self {
        let mut overrides = Self::default();
        overrides.sale_proceeds.insert(offset, proceeds);
        overrides
    }

    /// Sale proceeds for `offset` when they trigger a disposition
    pub fn sale(&self, offset: u32) -> Option<f64> {
        self.sale_proceeds.get(&offset).copied().filter(|p| *p > 0.0)
    }
}
