//! Year-by-year projection of a single property

use super::records::{RealEstateProjection, RealEstateYearRecord};
use crate::assumptions::{PropertyAssumptions, PropertyOverrides};
use crate::numeric::round_currency;
use chrono::Datelike;
use log::{debug, trace};

/// Configuration for a real estate run
#[derive(Debug, Clone)]
pub struct RealEstateConfig {
    /// Calendar year of offset 0
    pub current_year: i32,
}

impl RealEstateConfig {
    pub fn new(current_year: i32) -> Self {
        Self { current_year }
    }
}

impl Default for RealEstateConfig {
    /// Starts the projection in the current calendar year
    fn default() -> Self {
        Self::new(chrono::Local::now().year())
    }
}

/// Values carried from one year to the next
#[derive(Debug, Clone)]
struct PropertyState {
    value: f64,
    purchase_basis: f64,
    mortgage: f64,
    disposed: bool,
}

/// Real estate projection engine
pub struct RealEstateEngine {
    config: RealEstateConfig,
}

impl RealEstateEngine {
    pub fn new(config: RealEstateConfig) -> Self {
        Self { config }
    }

    /// Project offsets `0..=time_period_years`
    ///
    /// Rows after a disposition are emitted as explicit zero rows.
    pub fn project(&self, property: &PropertyAssumptions, overrides: &PropertyOverrides) -> RealEstateProjection {
        let property = property.sanitized();
        let mut projection = RealEstateProjection::new(property.start_value);
        let mut state = PropertyState {
            value: property.start_value,
            purchase_basis: property.adjusted_cost_base,
            mortgage: property.outstanding_mortgage,
            disposed: false,
        };

        for offset in 0..=property.time_period_years {
            let record = self.project_year(&property, overrides, offset, &mut state);
            trace!("{:?}", record);
            projection.add_record(record);
        }

        projection
    }

    fn project_year(
        &self,
        property: &PropertyAssumptions,
        overrides: &PropertyOverrides,
        offset: u32,
        state: &mut PropertyState,
    ) -> RealEstateYearRecord {
        let year = self.config.current_year + offset as i32;
        let mut record = RealEstateYearRecord::empty(year, property.start_age.saturating_add(offset));

        if state.disposed {
            return record;
        }

        // A manual value applies to its year and becomes the carried value
        if let Some(basis) = overrides.purchase_basis.get(&offset) {
            state.purchase_basis = *basis;
        }
        if let Some(balance) = overrides.mortgage_balance.get(&offset) {
            state.mortgage = *balance;
        }

        let gross_rent = property.gross_annual_rent * (1.0 + property.rent_index_rate()).powi(offset as i32);
        let expenses = property.annual_expenses * (1.0 + property.expense_index_rate()).powi(offset as i32);
        let net_rent = gross_rent - expenses;
        let tax_on_rent = net_rent.max(0.0) * property.marginal_tax_rate();

        let starting_value = state.value;
        let mut end_value = starting_value * (1.0 + property.growth_rate());

        record.purchase_basis = round_currency(state.purchase_basis);
        record.mortgage_outstanding = round_currency(state.mortgage);

        if let Some(proceeds) = overrides.sale(offset) {
            let capital_gain = proceeds - state.purchase_basis;
            let taxable_gain = if property.is_principal_residence {
                0.0
            } else {
                capital_gain * property.inclusion_rate()
            };
            let tax_on_gain = (taxable_gain * property.marginal_tax_rate()).max(0.0);
            let equity_realized = proceeds - state.mortgage;

            debug!(
                "property sold in {} for {:.2}: gain {:.2}, tax {:.2}, equity {:.2}",
                year, proceeds, capital_gain, tax_on_gain, equity_realized
            );

            record.is_disposition_year = true;
            record.sale_proceeds = round_currency(proceeds);
            record.capital_gain = round_currency(capital_gain);
            record.taxable_gain = round_currency(taxable_gain);
            record.tax_on_gain = round_currency(tax_on_gain);
            record.equity_realized = round_currency(equity_realized);

            end_value = 0.0;
            state.disposed = true;
            state.purchase_basis = 0.0;
            state.mortgage = 0.0;
        }

        record.starting_value = round_currency(starting_value);
        record.gross_rent = round_currency(gross_rent);
        record.rental_expenses = round_currency(expenses);
        record.net_rent = round_currency(net_rent);
        record.tax_on_rent = round_currency(tax_on_rent);
        record.end_value = round_currency(end_value);

        state.value = end_value;
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn engine() -> RealEstateEngine {
        RealEstateEngine::new(RealEstateConfig::new(2025))
    }

    fn rental() -> PropertyAssumptions {
        PropertyAssumptions {
            start_value: 500_000.0,
            adjusted_cost_base: 350_000.0,
            annual_growth_rate_percent: 3.0,
            gross_annual_rent: 30_000.0,
            rent_index_rate_percent: 2.0,
            annual_expenses: 8_000.0,
            expense_index_rate_percent: 2.5,
            marginal_tax_rate_percent: 40.0,
            capital_gains_inclusion_rate_percent: 50.0,
            outstanding_mortgage: 200_000.0,
            is_principal_residence: false,
            time_period_years: 20,
            start_age: 45,
        }
    }

    #[test]
    fn test_growth_and_rent_indexing() {
        let projection = engine().project(&rental(), &PropertyOverrides::default());
        assert_eq!(projection.records.len(), 21);

        let first = &projection.records[0];
        assert_eq!(first.year, 2025);
        assert_eq!(first.age, 45);
        assert_eq!(first.starting_value, 500_000.0);
        assert_eq!(first.end_value, 515_000.0);
        assert_eq!(first.gross_rent, 30_000.0);
        assert_eq!(first.net_rent, 22_000.0);
        assert_eq!(first.tax_on_rent, 8_800.0);

        let second = &projection.records[1];
        assert_eq!(second.starting_value, 515_000.0);
        assert_eq!(second.gross_rent, 30_600.0);
        assert_eq!(second.rental_expenses, 8_200.0);
    }

    #[test]
    fn test_negative_net_rent_is_not_taxed() {
        let mut property = rental();
        property.annual_expenses = 40_000.0;
        let projection = engine().project(&property, &PropertyOverrides::default());
        assert_eq!(projection.records[0].net_rent, -10_000.0);
        assert_eq!(projection.records[0].tax_on_rent, 0.0);
    }

    #[test]
    fn test_disposition_zeroes_later_years() {
        let overrides = PropertyOverrides::sale_at(5, 650_000.0);
        let projection = engine().project(&rental(), &overrides);

        assert_eq!(projection.records.len(), 21);
        let sale = &projection.records[5];
        assert!(sale.is_disposition_year);
        assert_eq!(sale.end_value, 0.0);
        assert_eq!(sale.capital_gain, 300_000.0);
        assert_eq!(sale.taxable_gain, 150_000.0);
        assert_eq!(sale.tax_on_gain, 60_000.0);
        assert_eq!(sale.equity_realized, 450_000.0);
        assert!(sale.gross_rent > 0.0);

        for record in &projection.records[6..] {
            assert_eq!(record.end_value, 0.0);
            assert_eq!(record.gross_rent, 0.0);
            assert_eq!(record.net_rent, 0.0);
            assert_eq!(record.mortgage_outstanding, 0.0);
            assert!(!record.is_disposition_year);
        }
    }

    #[test]
    fn test_principal_residence_exemption() {
        let overrides = PropertyOverrides::sale_at(3, 700_000.0);

        let mut home = rental();
        home.is_principal_residence = true;
        let exempt = engine().project(&home, &overrides);
        assert!(exempt.records[3].capital_gain > 0.0);
        assert_eq!(exempt.records[3].tax_on_gain, 0.0);

        let taxable = engine().project(&rental(), &overrides);
        assert!(taxable.records[3].tax_on_gain > 0.0);
    }

    #[test]
    fn test_zero_proceeds_do_not_dispose() {
        let overrides = PropertyOverrides::sale_at(2, 0.0);
        let projection = engine().project(&rental(), &overrides);
        assert!(projection.disposition().is_none());
        assert!(projection.records[3].end_value > 0.0);
    }

    #[test]
    fn test_manual_values_carry_forward() {
        let mut overrides = PropertyOverrides::default();
        overrides.purchase_basis.insert(2, 400_000.0);
        overrides.mortgage_balance.insert(2, 150_000.0);
        overrides.mortgage_balance.insert(6, 90_000.0);
        overrides.sale_proceeds.insert(8, 600_000.0);

        let projection = engine().project(&rental(), &overrides);
        let records = &projection.records;

        assert_eq!(records[1].purchase_basis, 350_000.0);
        assert_eq!(records[1].mortgage_outstanding, 200_000.0);
        assert_eq!(records[2].mortgage_outstanding, 150_000.0);
        assert_eq!(records[5].purchase_basis, 400_000.0);
        assert_eq!(records[5].mortgage_outstanding, 150_000.0);
        assert_eq!(records[7].mortgage_outstanding, 90_000.0);
        assert_eq!(records[8].capital_gain, 200_000.0);
        assert_eq!(records[8].equity_realized, 510_000.0);
    }

    #[test]
    fn test_capital_loss_has_no_tax() {
        let overrides = PropertyOverrides::sale_at(1, 300_000.0);
        let projection = engine().project(&rental(), &overrides);
        let sale = &projection.records[1];
        assert_eq!(sale.capital_gain, -50_000.0);
        assert_eq!(sale.taxable_gain, -25_000.0);
        assert_eq!(sale.tax_on_gain, 0.0);
    }

    #[test]
    fn test_summary_measures_to_sale() {
        let overrides = PropertyOverrides::sale_at(9, 800_000.0);
        let projection = engine().project(&rental(), &overrides);
        let summary = projection.summary();

        assert_eq!(summary.disposition_year, Some(2034));
        assert_eq!(summary.effective_years, 10);
        assert_eq!(summary.final_value, 800_000.0);
        assert_eq!(summary.total_appreciation, 300_000.0);
        assert_relative_eq!(summary.annualized_return, 1.6f64.powf(0.1) - 1.0, epsilon = 1e-12);

        let rent: f64 = projection.records[..10].iter().map(|r| r.net_rent).sum();
        assert_eq!(summary.cumulative_net_rent, rent);
    }

    #[test]
    fn test_summary_without_sale_uses_final_year() {
        let mut property = rental();
        property.gross_annual_rent = 0.0;
        property.annual_expenses = 0.0;
        property.time_period_years = 9;
        let projection = engine().project(&property, &PropertyOverrides::default());
        let summary = projection.summary();

        assert_eq!(summary.disposition_year, None);
        assert_eq!(summary.effective_years, 10);
        assert_relative_eq!(summary.annualized_return, 0.03, epsilon = 1e-6);
    }

    #[test]
    fn test_garbage_age_saturates() {
        let mut property = rental();
        property.start_age = u32::MAX - 2;
        let projection = engine().project(&property, &PropertyOverrides::default());
        assert_eq!(projection.records[2].age, u32::MAX);
        assert_eq!(projection.records[20].age, u32::MAX);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_disposition_is_permanent(
            sale_offset in 0u32..=20,
            proceeds in 1u32..2_000_000,
            later_sale in 0u32..=20,
        ) {
            let mut overrides = PropertyOverrides::sale_at(sale_offset, proceeds as f64);
            // A second sale entry after the first must not resurrect the property
            overrides.sale_proceeds.entry(later_sale).or_insert(900_000.0);

            let projection = engine().project(&rental(), &overrides);
            let first_sale = overrides.sale_proceeds.keys().copied().min().unwrap_or(sale_offset) as usize;

            prop_assert_eq!(projection.records.len(), 21);
            prop_assert!(projection.records[first_sale].is_disposition_year);
            prop_assert_eq!(projection.records.iter().filter(|r| r.is_disposition_year).count(), 1);
            for record in &projection.records[first_sale + 1..] {
                prop_assert_eq!(record.end_value, 0.0);
                prop_assert_eq!(record.net_rent, 0.0);
                prop_assert_eq!(record.mortgage_outstanding, 0.0);
            }
        }
    }
}
