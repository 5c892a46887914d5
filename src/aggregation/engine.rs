//! Main-view aggregation: merge linked calculator extracts into household tables

use super::categories::{CalculatorExtract, YearContribution};
use super::tables::{
    AssetYearRecord, EstateYearRecord, IncomeYearRecord, LiabilityYearRecord, MainViewTables, NetWorthYearRecord,
};
use crate::assumptions::HouseholdParams;
use crate::numeric::{finite_or, round_currency};
use log::debug;
use std::collections::BTreeMap;

/// Marginal probate rate applied above the exemption
pub const PROBATE_RATE: f64 = 0.015;

/// Estate value exempt from probate
pub const PROBATE_EXEMPTION: f64 = 50_000.0;

/// Sum every extract's contributions by calendar year
pub fn merge_by_year(extracts: &[CalculatorExtract]) -> BTreeMap<i32, YearContribution> {
    let mut merged: BTreeMap<i32, YearContribution> = BTreeMap::new();
    for extract in extracts {
        for contribution in &extract.projection_data {
            *merged
                .entry(contribution.year)
                .or_insert_with(|| YearContribution::new(contribution.year)) += *contribution;
        }
    }
    merged
}

/// Probate on the part of the estate above the exemption
pub fn probate_estimate(estate_value: f64) -> f64 {
    (estate_value - PROBATE_EXEMPTION).max(0.0) * PROBATE_RATE
}

fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregation engine for the main view
pub struct AggregationEngine {
    current_year: i32,
}

impl AggregationEngine {
    pub fn new(current_year: i32) -> Self {
        Self { current_year }
    }

    /// Build the income, asset, liability, net worth and estate tables
    ///
    /// A pure function of its inputs: identical extracts and parameters always
    /// produce identical tables.
    pub fn aggregate(&self, extracts: &[CalculatorExtract], params: &HouseholdParams) -> MainViewTables {
        let merged = merge_by_year(extracts);
        debug!(
            "aggregating {} extracts covering {} calendar years over {} projected years",
            extracts.len(),
            merged.len(),
            params.projection_years
        );

        let inflation = params.inflation_rate();
        let mut tables = MainViewTables::default();

        for offset in 0..params.projection_years {
            let year = self.current_year + offset as i32;
            let primary_age = params.primary_age.saturating_add(offset);
            let spouse_age = params.spouse_age.map(|a| a.saturating_add(offset));
            let inflation_factor = (1.0 + inflation).powi(offset as i32);
            let c = merged.get(&year).copied().unwrap_or_else(|| YearContribution::new(year));

            // Income
            let fixed = &c.fixed_income;
            let capital = &c.capital_assets;
            let cpp = round_currency(fixed.cpp);
            let oas = round_currency(fixed.oas);
            let bridge = round_currency(fixed.bridge);
            let employer_pension = round_currency(fixed.employer_pension);
            let other_income = round_currency(fixed.other_income_1 + fixed.other_income_2 + c.real_estate.rental_income);
            let registered_withdrawals = round_currency(capital.registered.money_out);
            let non_registered_withdrawals = round_currency(capital.non_registered.money_out);
            let tfsa_withdrawals = round_currency(capital.tfsa.money_out);

            let total_income = cpp
                + oas
                + bridge
                + employer_pension
                + other_income
                + registered_withdrawals
                + non_registered_withdrawals
                + tfsa_withdrawals;
            let target_income = round_currency(params.target_income * inflation_factor);
            let percent_of_target_achieved = if target_income > 0.0 {
                round_percent(total_income / target_income * 100.0)
            } else {
                0.0
            };
            let tax_estimate = round_currency(total_income * params.average_tax_rate());

            tables.income.push(IncomeYearRecord {
                year,
                primary_age,
                spouse_age,
                cpp,
                oas,
                bridge,
                employer_pension,
                other_income,
                registered_withdrawals,
                non_registered_withdrawals,
                tfsa_withdrawals,
                total_income,
                target_income,
                percent_of_target_achieved,
                shortfall_surplus: total_income - target_income,
                tax_estimate,
                after_tax_income: total_income - tax_estimate,
            });

            // Assets
            let registered_balance = round_currency(capital.registered.end_balance);
            let non_registered_balance = round_currency(capital.non_registered.end_balance);
            let tfsa_balance = round_currency(capital.tfsa.end_balance);
            let principal_residence = round_currency(c.real_estate.principal_residence);
            let investment_property = round_currency(c.real_estate.investment);
            let other_real_estate = round_currency(c.real_estate.other);
            let total_assets = registered_balance
                + non_registered_balance
                + tfsa_balance
                + principal_residence
                + investment_property
                + other_real_estate;

            tables.assets.push(AssetYearRecord {
                year,
                primary_age,
                spouse_age,
                registered_money_in: round_currency(capital.registered.money_in),
                registered_balance,
                non_registered_money_in: round_currency(capital.non_registered.money_in),
                non_registered_balance,
                tfsa_money_in: round_currency(capital.tfsa.money_in),
                tfsa_balance,
                principal_residence,
                investment_property,
                other_real_estate,
                total_assets,
            });

            // Liabilities
            let debts = &c.debts;
            let principal_mortgage_end = round_currency(debts.principal_mortgage.end_balance);
            let other_mortgage_end = round_currency(debts.other_mortgage.end_balance);
            let long_term_end = round_currency(debts.long_term.end_balance);
            let short_term_end = round_currency(debts.short_term.end_balance);
            let total_liabilities = principal_mortgage_end + other_mortgage_end + long_term_end + short_term_end;

            tables.liabilities.push(LiabilityYearRecord {
                year,
                primary_age,
                spouse_age,
                principal_mortgage_begin: round_currency(debts.principal_mortgage.begin_balance),
                principal_mortgage_end,
                other_mortgage_begin: round_currency(debts.other_mortgage.begin_balance),
                other_mortgage_end,
                long_term_begin: round_currency(debts.long_term.begin_balance),
                long_term_end,
                short_term_begin: round_currency(debts.short_term.begin_balance),
                short_term_end,
                total_liabilities,
            });

            // Net worth
            let net_worth = total_assets - total_liabilities;
            tables.net_worth.push(NetWorthYearRecord {
                year,
                primary_age,
                spouse_age,
                total_assets,
                total_liabilities,
                net_worth,
                discounted_net_worth: round_currency(finite_or(net_worth / inflation_factor, 0.0)),
            });

            // Estate
            let probate = round_currency(probate_estimate(net_worth));
            let final_tax = round_currency(registered_balance * params.final_tax_rate());
            tables.estate.push(EstateYearRecord {
                year,
                primary_age,
                spouse_age,
                net_worth,
                probate_estimate: probate,
                registered_balance,
                final_tax,
                final_estate_value: net_worth - probate - final_tax,
            });
        }

        tables
    }
}
