//! Main-view output tables, currency rounded to whole units

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeYearRecord {
    pub year: i32,
    pub primary_age: u32,
    pub spouse_age: Option<u32>,
    pub cpp: f64,
    pub oas: f64,
    pub bridge: f64,
    pub employer_pension: f64,
    /// Both generic income slots plus net rental income
    pub other_income: f64,
    pub registered_withdrawals: f64,
    pub non_registered_withdrawals: f64,
    pub tfsa_withdrawals: f64,
    pub total_income: f64,
    /// Target income inflated to this year
    pub target_income: f64,
    pub percent_of_target_achieved: f64,
    /// Positive for a surplus, negative for a shortfall
    pub shortfall_surplus: f64,
    pub tax_estimate: f64,
    pub after_tax_income: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetYearRecord {
    pub year: i32,
    pub primary_age: u32,
    pub spouse_age: Option<u32>,
    pub registered_money_in: f64,
    pub registered_balance: f64,
    pub non_registered_money_in: f64,
    pub non_registered_balance: f64,
    pub tfsa_money_in: f64,
    pub tfsa_balance: f64,
    pub principal_residence: f64,
    pub investment_property: f64,
    pub other_real_estate: f64,
    pub total_assets: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiabilityYearRecord {
    pub year: i32,
    pub primary_age: u32,
    pub spouse_age: Option<u32>,
    pub principal_mortgage_begin: f64,
    pub principal_mortgage_end: f64,
    pub other_mortgage_begin: f64,
    pub other_mortgage_end: f64,
    pub long_term_begin: f64,
    pub long_term_end: f64,
    pub short_term_begin: f64,
    pub short_term_end: f64,
    /// Sum of end-of-year balances
    pub total_liabilities: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetWorthYearRecord {
    pub year: i32,
    pub primary_age: u32,
    pub spouse_age: Option<u32>,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub net_worth: f64,
    /// Net worth in today's money
    pub discounted_net_worth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstateYearRecord {
    pub year: i32,
    pub primary_age: u32,
    pub spouse_age: Option<u32>,
    pub net_worth: f64,
    pub probate_estimate: f64,
    pub registered_balance: f64,
    /// Tax on registered balances deemed disposed at death
    pub final_tax: f64,
    pub final_estate_value: f64,
}

/// All main-view tables for one aggregation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainViewTables {
    pub income: Vec<IncomeYearRecord>,
    pub assets: Vec<AssetYearRecord>,
    pub liabilities: Vec<LiabilityYearRecord>,
    pub net_worth: Vec<NetWorthYearRecord>,
    pub estate: Vec<EstateYearRecord>,
}

impl MainViewTables {
    pub fn len(&self) -> usize {
        self.income.len()
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty()
    }
}
