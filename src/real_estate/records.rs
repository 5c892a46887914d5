//! Real estate output structures

use serde::{Deserialize, Serialize};

/// One projected year of a property, currency rounded to whole units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealEstateYearRecord {
    pub year: i32,
    pub age: u32,
    pub starting_value: f64,

    // Rental income
    pub gross_rent: f64,
    pub rental_expenses: f64,
    pub net_rent: f64,
    pub tax_on_rent: f64,

    // Disposition
    pub is_disposition_year: bool,
    pub sale_proceeds: f64,
    pub purchase_basis: f64,
    pub capital_gain: f64,
    pub taxable_gain: f64,
    pub tax_on_gain: f64,
    pub equity_realized: f64,

    pub end_value: f64,
    pub mortgage_outstanding: f64,
}

impl RealEstateYearRecord {
    /// A zero-valued year
    pub fn empty(year: i32, age: u32) -> Self {
        Self {
            year,
            age,
            starting_value: 0.0,
            gross_rent: 0.0,
            rental_expenses: 0.0,
            net_rent: 0.0,
            tax_on_rent: 0.0,
            is_disposition_year: false,
            sale_proceeds: 0.0,
            purchase_basis: 0.0,
            capital_gain: 0.0,
            taxable_gain: 0.0,
            tax_on_gain: 0.0,
            equity_realized: 0.0,
            end_value: 0.0,
            mortgage_outstanding: 0.0,
        }
    }
}

/// Complete projection for one property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealEstateProjection {
    pub start_value: f64,
    pub records: Vec<RealEstateYearRecord>,
}

impl RealEstateProjection {
    pub fn new(start_value: f64) -> Self {
        Self {
            start_value,
            records: Vec::new(),
        }
    }

    pub fn add_record(&mut self, record: RealEstateYearRecord) {
        self.records.push(record);
    }

    /// First year in which the property was sold
    pub fn disposition(&self) -> Option<&RealEstateYearRecord> {
        self.records.iter().find(|r| r.is_disposition_year)
    }

    /// Metrics measured to the sale year, or to the final projected year without a sale
    pub fn summary(&self) -> RealEstateSummary {
        let horizon = self
            .records
            .iter()
            .position(|r| r.is_disposition_year)
            .or_else(|| self.records.len().checked_sub(1));

        let Some(horizon) = horizon else {
            return RealEstateSummary::default();
        };

        let measured = &self.records[..=horizon];
        let last = &self.records[horizon];
        let final_value = if last.is_disposition_year {
            last.sale_proceeds
        } else {
            last.end_value
        };
        let effective_years = (horizon + 1) as u32;

        let cumulative_net_rent: f64 = measured.iter().map(|r| r.net_rent).sum();
        let cumulative_rent_tax: f64 = measured.iter().map(|r| r.tax_on_rent).sum();

        let annualized_return = if self.start_value > 0.0 && final_value > 0.0 {
            (final_value / self.start_value).powf(1.0 / effective_years as f64) - 1.0
        } else {
            0.0
        };

        RealEstateSummary {
            disposition_year: last.is_disposition_year.then_some(last.year),
            effective_years,
            final_value,
            total_appreciation: final_value - self.start_value,
            cumulative_net_rent,
            cumulative_rent_tax,
            tax_on_gain: last.tax_on_gain,
            equity_realized: last.equity_realized,
            after_tax_cash_flow: cumulative_net_rent - cumulative_rent_tax - last.tax_on_gain + last.equity_realized,
            annualized_return,
        }
    }
}

/// Summary metrics for a property projection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RealEstateSummary {
    pub disposition_year: Option<i32>,
    pub effective_years: u32,
    pub final_value: f64,
    pub total_appreciation: f64,
    pub cumulative_net_rent: f64,
    pub cumulative_rent_tax: f64,
    pub tax_on_gain: f64,
    pub equity_realized: f64,
    pub after_tax_cash_flow: f64,
    /// Compound annual growth of value over the effective years (decimal)
    pub annualized_return: f64,
}
