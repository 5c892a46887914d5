//! Per-year contribution categories shared by every extractor
//!
//! Each category is additive: contributions from different calculators for the
//! same calendar year are combined with `+=`.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Government and pension income sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedIncomeKind {
    Cpp,
    Oas,
    Bridge,
    EmployerPension,
    Other1,
    Other2,
}

/// Capital account tax treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Registered,
    NonRegistered,
    Tfsa,
}

/// Property classification in the main view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    PrincipalResidence,
    #[default]
    Investment,
    Other,
}

/// Debt classification in the main view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    PrincipalMortgage,
    OtherMortgage,
    #[default]
    LongTerm,
    ShortTerm,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedIncome {
    pub cpp: f64,
    pub oas: f64,
    pub bridge: f64,
    pub employer_pension: f64,
    pub other_income_1: f64,
    pub other_income_2: f64,
}

impl FixedIncome {
    pub fn slot_mut(&mut self, kind: FixedIncomeKind) -> &mut f64 {
        match kind {
            FixedIncomeKind::Cpp => &mut self.cpp,
            FixedIncomeKind::Oas => &mut self.oas,
            FixedIncomeKind::Bridge => &mut self.bridge,
            FixedIncomeKind::EmployerPension => &mut self.employer_pension,
            FixedIncomeKind::Other1 => &mut self.other_income_1,
            FixedIncomeKind::Other2 => &mut self.other_income_2,
        }
    }
}

impl AddAssign for FixedIncome {
    fn add_assign(&mut self, other: Self) {
        self.cpp += other.cpp;
        self.oas += other.oas;
        self.bridge += other.bridge;
        self.employer_pension += other.employer_pension;
        self.other_income_1 += other.other_income_1;
        self.other_income_2 += other.other_income_2;
    }
}

/// Flows and closing balance of one account type
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountFlows {
    pub money_in: f64,
    pub money_out: f64,
    pub end_balance: f64,
}

impl AddAssign for AccountFlows {
    fn add_assign(&mut self, other: Self) {
        self.money_in += other.money_in;
        self.money_out += other.money_out;
        self.end_balance += other.end_balance;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CapitalAssets {
    pub registered: AccountFlows,
    pub non_registered: AccountFlows,
    pub tfsa: AccountFlows,
}

impl CapitalAssets {
    pub fn account_mut(&mut self, kind: AccountKind) -> &mut AccountFlows {
        match kind {
            AccountKind::Registered => &mut self.registered,
            AccountKind::NonRegistered => &mut self.non_registered,
            AccountKind::Tfsa => &mut self.tfsa,
        }
    }
}

impl AddAssign for CapitalAssets {
    fn add_assign(&mut self, other: Self) {
        self.registered += other.registered;
        self.non_registered += other.non_registered;
        self.tfsa += other.tfsa;
    }
}

/// Property values by type plus net rental income
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RealEstateHoldings {
    pub principal_residence: f64,
    pub investment: f64,
    pub other: f64,
    pub rental_income: f64,
}

impl RealEstateHoldings {
    pub fn value_mut(&mut self, kind: PropertyKind) -> &mut f64 {
        match kind {
            PropertyKind::PrincipalResidence => &mut self.principal_residence,
            PropertyKind::Investment => &mut self.investment,
            PropertyKind::Other => &mut self.other,
        }
    }
}

impl AddAssign for RealEstateHoldings {
    fn add_assign(&mut self, other: Self) {
        self.principal_residence += other.principal_residence;
        self.investment += other.investment;
        self.other += other.other;
        self.rental_income += other.rental_income;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceRange {
    pub begin_balance: f64,
    pub end_balance: f64,
}

impl AddAssign for BalanceRange {
    fn add_assign(&mut self, other: Self) {
        self.begin_balance += other.begin_balance;
        self.end_balance += other.end_balance;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Debts {
    pub principal_mortgage: BalanceRange,
    pub other_mortgage: BalanceRange,
    pub long_term: BalanceRange,
    pub short_term: BalanceRange,
}

impl Debts {
    pub fn range_mut(&mut self, kind: DebtKind) -> &mut BalanceRange {
        match kind {
            DebtKind::PrincipalMortgage => &mut self.principal_mortgage,
            DebtKind::OtherMortgage => &mut self.other_mortgage,
            DebtKind::LongTerm => &mut self.long_term,
            DebtKind::ShortTerm => &mut self.short_term,
        }
    }
}

impl AddAssign for Debts {
    fn add_assign(&mut self, other: Self) {
        self.principal_mortgage += other.principal_mortgage;
        self.other_mortgage += other.other_mortgage;
        self.long_term += other.long_term;
        self.short_term += other.short_term;
    }
}

/// Everything one calculator contributes to one calendar year
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearContribution {
    pub year: i32,
    pub fixed_income: FixedIncome,
    pub capital_assets: CapitalAssets,
    pub real_estate: RealEstateHoldings,
    pub debts: Debts,
}

impl YearContribution {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Default::default()
        }
    }
}

/// Adds every category; the year of `self` is kept
impl AddAssign for YearContribution {
    fn add_assign(&mut self, other: Self) {
        self.fixed_income += other.fixed_income;
        self.capital_assets += other.capital_assets;
        self.real_estate += other.real_estate;
        self.debts += other.debts;
    }
}

/// Source calculator type of an extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    Debt,
    RealEstate,
    FixedIncome,
    CapitalAssets,
}

/// A calculator's output normalized to calendar-year contributions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorExtract {
    pub kind: CalculatorKind,
    pub label: String,
    pub projection_data: Vec<YearContribution>,
}
