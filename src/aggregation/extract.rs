//! Extractors: normalize each calculator's saved state into calendar-year contributions
//!
//! An extractor returns `None` when the state does not hold enough data to
//! contribute anything (no principal, no property value, no owner age, ...).

use super::categories::{
    AccountKind, CalculatorExtract, CalculatorKind, DebtKind, FixedIncomeKind, PropertyKind, YearContribution,
};
use crate::amortization::{AmortizationConfig, AmortizationEngine, AmortizationSchedule};
use crate::assumptions::{ClientRoster, LoanAssumptions, LoanOverrides, Owner, PropertyAssumptions, PropertyOverrides};
use crate::numeric::{lenient_f64, lenient_opt_u32, offset_keyed, percent_to_rate};
use crate::real_estate::{RealEstateConfig, RealEstateEngine, RealEstateProjection};
use log::debug;
use serde::{Deserialize, Serialize};

/// Age at which open-ended income streams and account projections stop
pub const DEFAULT_END_AGE: u32 = 100;

/// Saved state of a debt calculator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebtCalculatorState {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub debt_kind: DebtKind,
    #[serde(default)]
    pub owner: Owner,
    #[serde(default)]
    pub loan: LoanAssumptions,
    #[serde(default, deserialize_with = "offset_keyed")]
    pub overrides: LoanOverrides,
}

/// Saved state of a real estate calculator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealEstateCalculatorState {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub property_kind: PropertyKind,
    #[serde(default)]
    pub owner: Owner,
    #[serde(default)]
    pub property: PropertyAssumptions,
    #[serde(default)]
    pub overrides: PropertyOverrides,
}

/// One pension or benefit stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStream {
    pub kind: FixedIncomeKind,
    #[serde(default)]
    pub owner: Owner,
    /// Annual amount in today's money
    #[serde(default, deserialize_with = "lenient_f64")]
    pub annual_amount: f64,
    /// First age receiving the stream; immediately when absent
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub start_age: Option<u32>,
    /// First age no longer receiving the stream
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub end_age: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub indexation_percent: f64,
}

/// Saved state of a fixed income calculator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixedIncomeCalculatorState {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub streams: Vec<IncomeStream>,
}

/// Savings plan for one account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountPlan {
    pub kind: AccountKind,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub opening_balance: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub annual_contribution: f64,
    /// Contributions stop at this age; at withdrawal start when absent
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub contribution_end_age: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub annual_withdrawal: f64,
    /// Withdrawals begin at this age; never when absent
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub withdrawal_start_age: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub return_percent: f64,
}

/// Saved state of a capital assets calculator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapitalAssetsCalculatorState {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub owner: Owner,
    #[serde(default)]
    pub accounts: Vec<AccountPlan>,
}

/// A calculator linked to the main view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LinkedCalculator {
    Debt(DebtCalculatorState),
    RealEstate(RealEstateCalculatorState),
    FixedIncome(FixedIncomeCalculatorState),
    CapitalAssets(CapitalAssetsCalculatorState),
}

impl LinkedCalculator {
    pub fn kind(&self) -> CalculatorKind {
        match self {
            LinkedCalculator::Debt(_) => CalculatorKind::Debt,
            LinkedCalculator::RealEstate(_) => CalculatorKind::RealEstate,
            LinkedCalculator::FixedIncome(_) => CalculatorKind::FixedIncome,
            LinkedCalculator::CapitalAssets(_) => CalculatorKind::CapitalAssets,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            LinkedCalculator::Debt(s) => &s.label,
            LinkedCalculator::RealEstate(s) => &s.label,
            LinkedCalculator::FixedIncome(s) => &s.label,
            LinkedCalculator::CapitalAssets(s) => &s.label,
        }
    }

    /// Run the matching extractor
    pub fn extract(&self, roster: &ClientRoster, current_year: i32) -> Option<CalculatorExtract> {
        let extract = match self {
            LinkedCalculator::Debt(s) => extract_debt(s, roster, current_year),
            LinkedCalculator::RealEstate(s) => extract_real_estate(s, roster, current_year),
            LinkedCalculator::FixedIncome(s) => extract_fixed_income(s, roster, current_year),
            LinkedCalculator::CapitalAssets(s) => extract_capital_assets(s, roster, current_year),
        };
        if extract.is_none() {
            debug!("{:?} calculator {:?} has insufficient data, skipped", self.kind(), self.label());
        }
        extract
    }
}

/// Loan with a missing start age resolved from the roster
pub fn resolve_loan(state: &DebtCalculatorState, roster: &ClientRoster, current_year: i32) -> LoanAssumptions {
    let mut loan = state.loan.clone();
    if loan.start_age == 0 {
        let year = loan.start_year.unwrap_or(current_year);
        loan.start_age = roster.age_of(state.owner, year).unwrap_or(0);
    }
    loan
}

/// Property with a missing start age resolved from the roster
pub fn resolve_property(state: &RealEstateCalculatorState, roster: &ClientRoster, current_year: i32) -> PropertyAssumptions {
    let mut property = state.property.clone();
    if property.start_age == 0 {
        property.start_age = roster.age_of(state.owner, current_year).unwrap_or(0);
    }
    property
}

/// Run the debt calculator, keeping its full schedule
///
/// The extract is `None` when the resolved loan is degenerate.
pub fn project_debt(
    state: &DebtCalculatorState,
    roster: &ClientRoster,
    current_year: i32,
) -> (AmortizationSchedule, Option<CalculatorExtract>) {
    let loan = resolve_loan(state, roster, current_year);
    let schedule = AmortizationEngine::new(AmortizationConfig::new(current_year)).project(&loan, &state.overrides);
    let extract = if loan.is_degenerate() {
        None
    } else {
        debt_extract_from_schedule(state, &schedule)
    };
    (schedule, extract)
}

/// Run the debt calculator and extract it
pub fn extract_debt(state: &DebtCalculatorState, roster: &ClientRoster, current_year: i32) -> Option<CalculatorExtract> {
    project_debt(state, roster, current_year).1
}

/// Normalize an already projected debt schedule
pub fn debt_extract_from_schedule(state: &DebtCalculatorState, schedule: &AmortizationSchedule) -> Option<CalculatorExtract> {
    if schedule.records.iter().all(|r| r.opening_balance == 0.0 && r.closing_balance == 0.0) {
        return None;
    }

    let projection_data = schedule
        .records
        .iter()
        .map(|record| {
            let mut contribution = YearContribution::new(record.year);
            let range = contribution.debts.range_mut(state.debt_kind);
            range.begin_balance = record.opening_balance;
            range.end_balance = record.closing_balance;
            contribution
        })
        .collect();

    Some(CalculatorExtract {
        kind: CalculatorKind::Debt,
        label: state.label.clone(),
        projection_data,
    })
}

/// Run the real estate calculator, keeping its full projection
///
/// The extract is `None` when the property has no starting value.
pub fn project_real_estate(
    state: &RealEstateCalculatorState,
    roster: &ClientRoster,
    current_year: i32,
) -> (RealEstateProjection, Option<CalculatorExtract>) {
    let property = resolve_property(state, roster, current_year);
    let projection = RealEstateEngine::new(RealEstateConfig::new(current_year)).project(&property, &state.overrides);
    let extract = if property.start_value > 0.0 {
        real_estate_extract_from_projection(state, &projection)
    } else {
        None
    };
    (projection, extract)
}

/// Run the real estate calculator and extract it
pub fn extract_real_estate(
    state: &RealEstateCalculatorState,
    roster: &ClientRoster,
    current_year: i32,
) -> Option<CalculatorExtract> {
    project_real_estate(state, roster, current_year).1
}

/// Normalize an already projected property
pub fn real_estate_extract_from_projection(
    state: &RealEstateCalculatorState,
    projection: &RealEstateProjection,
) -> Option<CalculatorExtract> {
    if projection.records.is_empty() {
        return None;
    }

    let projection_data = projection
        .records
        .iter()
        .map(|record| {
            let mut contribution = YearContribution::new(record.year);
            *contribution.real_estate.value_mut(state.property_kind) = record.end_value;
            contribution.real_estate.rental_income = record.net_rent;
            contribution
        })
        .collect();

    Some(CalculatorExtract {
        kind: CalculatorKind::RealEstate,
        label: state.label.clone(),
        projection_data,
    })
}

/// Project indexed income streams until each owner reaches the stream's end age
pub fn extract_fixed_income(
    state: &FixedIncomeCalculatorState,
    roster: &ClientRoster,
    current_year: i32,
) -> Option<CalculatorExtract> {
    let mut years: Vec<YearContribution> = Vec::new();

    for stream in state.streams.iter().filter(|s| s.annual_amount > 0.0) {
        let Some(current_age) = roster.age_of(stream.owner, current_year) else {
            debug!("income stream {:?} has no owner age, skipped", stream.kind);
            continue;
        };
        let start_age = stream.start_age.unwrap_or(current_age);
        let end_age = stream.end_age.unwrap_or(DEFAULT_END_AGE);
        let index = percent_to_rate(stream.indexation_percent);

        for (offset, age) in (current_age..end_age).enumerate() {
            if age < start_age {
                continue;
            }
            let amount = stream.annual_amount * (1.0 + index).powi(offset as i32);
            *year_slot(&mut years, current_year, offset).fixed_income.slot_mut(stream.kind) += amount;
        }
    }

    if years.is_empty() {
        return None;
    }
    Some(CalculatorExtract {
        kind: CalculatorKind::FixedIncome,
        label: state.label.clone(),
        projection_data: years,
    })
}

/// Project account balances with contributions, withdrawals and growth
///
/// Each year: `end = (begin + in − out) × (1 + return)`, with withdrawals capped
/// at what the account holds.
pub fn extract_capital_assets(
    state: &CapitalAssetsCalculatorState,
    roster: &ClientRoster,
    current_year: i32,
) -> Option<CalculatorExtract> {
    let current_age = roster.age_of(state.owner, current_year)?;
    let mut years: Vec<YearContribution> = Vec::new();

    for plan in &state.accounts {
        if plan.opening_balance <= 0.0 && plan.annual_contribution <= 0.0 {
            continue;
        }
        let growth = percent_to_rate(plan.return_percent);
        let contribution_end = plan.contribution_end_age.or(plan.withdrawal_start_age);
        let mut balance = plan.opening_balance;

        for (offset, age) in (current_age..DEFAULT_END_AGE).enumerate() {
            let money_in = match contribution_end {
                Some(end) if age >= end => 0.0,
                _ => plan.annual_contribution,
            };
            let money_out = match plan.withdrawal_start_age {
                Some(start) if age >= start => plan.annual_withdrawal.min(balance + money_in).max(0.0),
                _ => 0.0,
            };
            balance = (balance + money_in - money_out) * (1.0 + growth);

            let flows = year_slot(&mut years, current_year, offset).capital_assets.account_mut(plan.kind);
            flows.money_in += money_in;
            flows.money_out += money_out;
            flows.end_balance += balance;
        }
    }

    if years.is_empty() {
        return None;
    }
    Some(CalculatorExtract {
        kind: CalculatorKind::CapitalAssets,
        label: state.label.clone(),
        projection_data: years,
    })
}

/// Contribution for `offset`, growing the vector as needed
fn year_slot(years: &mut Vec<YearContribution>, current_year: i32, offset: usize) -> &mut YearContribution {
    while years.len() <= offset {
        let year = current_year + years.len() as i32;
        years.push(YearContribution::new(year));
    }
    &mut years[offset]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{ClientProfile, YearOverride};
    use approx::assert_relative_eq;

    fn roster() -> ClientRoster {
        ClientRoster {
            primary: ClientProfile::new("Alex", 1965),
            spouse: Some(ClientProfile::new("Sam", 1968)),
        }
    }

    #[test]
    fn test_debt_extract_uses_calendar_years_and_kind() {
        let state = DebtCalculatorState {
            label: "Home".into(),
            debt_kind: DebtKind::PrincipalMortgage,
            owner: Owner::Primary,
            loan: LoanAssumptions::new(200_000.0, 5.0, 20, 0),
            overrides: LoanOverrides::new(),
        };
        let extract = extract_debt(&state, &roster(), 2025).unwrap();

        assert_eq!(extract.kind, CalculatorKind::Debt);
        let first = &extract.projection_data[0];
        assert_eq!(first.year, 2025);
        assert_eq!(first.debts.principal_mortgage.begin_balance, 200_000.0);
        assert!(first.debts.principal_mortgage.end_balance < 200_000.0);
        assert_eq!(first.debts.long_term, Default::default());
    }

    #[test]
    fn test_debt_without_owner_age_is_skipped() {
        let state = DebtCalculatorState {
            owner: Owner::Spouse,
            loan: LoanAssumptions::new(50_000.0, 5.0, 5, 0),
            ..Default::default()
        };
        let single = ClientRoster {
            primary: ClientProfile::new("Alex", 1965),
            spouse: None,
        };
        assert!(extract_debt(&state, &single, 2025).is_none());
        assert!(extract_debt(&state, &roster(), 2025).is_some());
    }

    #[test]
    fn test_debt_extract_follows_refinance_start_year() {
        let mut loan = LoanAssumptions::new(50_000.0, 5.0, 5, 0);
        loan.start_year = Some(2027);
        let mut overrides = LoanOverrides::new();
        overrides.insert(1, YearOverride::manual_payment(10_000.0));
        let state = DebtCalculatorState {
            loan,
            overrides,
            ..Default::default()
        };
        let extract = extract_debt(&state, &roster(), 2025).unwrap();
        assert_eq!(extract.projection_data[0].year, 2027);
        assert_eq!(extract.projection_data[0].debts.long_term.begin_balance, 50_000.0);
    }

    #[test]
    fn test_real_estate_extract() {
        let state = RealEstateCalculatorState {
            label: "Cottage".into(),
            property_kind: PropertyKind::Other,
            owner: Owner::Joint,
            property: PropertyAssumptions {
                start_value: 400_000.0,
                annual_growth_rate_percent: 2.0,
                gross_annual_rent: 10_000.0,
                annual_expenses: 4_000.0,
                time_period_years: 10,
                ..Default::default()
            },
            overrides: PropertyOverrides::sale_at(4, 450_000.0),
        };
        let extract = extract_real_estate(&state, &roster(), 2025).unwrap();

        assert_eq!(extract.projection_data.len(), 11);
        assert_eq!(extract.projection_data[0].real_estate.other, 408_000.0);
        assert_eq!(extract.projection_data[0].real_estate.rental_income, 6_000.0);
        assert_eq!(extract.projection_data[4].real_estate.other, 0.0);
        assert_eq!(extract.projection_data[5].real_estate.rental_income, 0.0);
    }

    #[test]
    fn test_empty_property_is_skipped() {
        let state = RealEstateCalculatorState::default();
        assert!(extract_real_estate(&state, &roster(), 2025).is_none());
    }

    #[test]
    fn test_fixed_income_streams_start_and_index() {
        let state = FixedIncomeCalculatorState {
            label: "Pensions".into(),
            streams: vec![
                IncomeStream {
                    kind: FixedIncomeKind::Cpp,
                    owner: Owner::Primary,
                    annual_amount: 12_000.0,
                    start_age: Some(65),
                    end_age: None,
                    indexation_percent: 2.0,
                },
                IncomeStream {
                    kind: FixedIncomeKind::Bridge,
                    owner: Owner::Spouse,
                    annual_amount: 8_000.0,
                    start_age: None,
                    end_age: Some(60),
                    indexation_percent: 0.0,
                },
            ],
        };
        // Primary is 60 in 2025, spouse is 57
        let extract = extract_fixed_income(&state, &roster(), 2025).unwrap();
        let data = &extract.projection_data;

        assert_eq!(data.len(), 40);
        assert_eq!(data[0].fixed_income.cpp, 0.0);
        assert_eq!(data[0].fixed_income.bridge, 8_000.0);
        assert_eq!(data[2].fixed_income.bridge, 8_000.0);
        assert_eq!(data[3].fixed_income.bridge, 0.0);
        assert_relative_eq!(data[5].fixed_income.cpp, 12_000.0 * 1.02f64.powi(5));
        assert_eq!(data[5].year, 2030);
    }

    #[test]
    fn test_capital_assets_accumulate_then_draw_down() {
        let state = CapitalAssetsCalculatorState {
            label: "Savings".into(),
            owner: Owner::Primary,
            accounts: vec![AccountPlan {
                kind: AccountKind::Registered,
                opening_balance: 100_000.0,
                annual_contribution: 10_000.0,
                contribution_end_age: None,
                annual_withdrawal: 30_000.0,
                withdrawal_start_age: Some(65),
                return_percent: 0.0,
            }],
        };
        let extract = extract_capital_assets(&state, &roster(), 2025).unwrap();
        let data = &extract.projection_data;

        // Ages 60..64 contribute
        assert_eq!(data[0].capital_assets.registered.money_in, 10_000.0);
        assert_eq!(data[4].capital_assets.registered.end_balance, 150_000.0);
        // Age 65 withdraws
        assert_eq!(data[5].capital_assets.registered.money_in, 0.0);
        assert_eq!(data[5].capital_assets.registered.money_out, 30_000.0);
        assert_eq!(data[9].capital_assets.registered.end_balance, 0.0);
        assert_eq!(data[9].capital_assets.registered.money_out, 30_000.0);
        assert_eq!(data[10].capital_assets.registered.money_out, 0.0);
    }

    #[test]
    fn test_capital_assets_need_owner_age() {
        let state = CapitalAssetsCalculatorState {
            owner: Owner::Spouse,
            accounts: vec![AccountPlan {
                kind: AccountKind::Tfsa,
                opening_balance: 1_000.0,
                annual_contribution: 0.0,
                contribution_end_age: None,
                annual_withdrawal: 0.0,
                withdrawal_start_age: None,
                return_percent: 5.0,
            }],
            ..Default::default()
        };
        let single = ClientRoster {
            primary: ClientProfile::new("Alex", 1965),
            spouse: None,
        };
        assert!(extract_capital_assets(&state, &single, 2025).is_none());
    }

    #[test]
    fn test_linked_calculator_deserializes_by_type_tag() {
        let json = r#"{"type": "debt", "label": "Car", "debt_kind": "short_term",
                       "loan": {"principal": "25000", "annual_interest_rate_percent": 6.9,
                                "amortization_years": 5, "start_age": 40},
                       "overrides": {"2": {"manual_payment": 3000}}}"#;
        let calculator: LinkedCalculator = serde_json::from_str(json).unwrap();
        assert_eq!(calculator.kind(), CalculatorKind::Debt);
        assert_eq!(calculator.label(), "Car");

        let extract = calculator.extract(&roster(), 2025).unwrap();
        assert_eq!(extract.projection_data[0].debts.short_term.begin_balance, 25_000.0);
    }

    #[test]
    fn test_projection_and_extract_share_skip_rules() {
        let debt = DebtCalculatorState {
            label: "Unused card".into(),
            loan: LoanAssumptions::new(0.0, 19.9, 3, 0),
            ..Default::default()
        };
        let (schedule, extract) = project_debt(&debt, &roster(), 2025);
        assert_eq!(schedule.records.len(), 1);
        assert!(extract.is_none());
        assert!(extract_debt(&debt, &roster(), 2025).is_none());

        let empty_lot = RealEstateCalculatorState {
            label: "Empty lot".into(),
            property: PropertyAssumptions {
                time_period_years: 5,
                ..Default::default()
            },
            ..Default::default()
        };
        let (projection, extract) = project_real_estate(&empty_lot, &roster(), 2025);
        assert_eq!(projection.records.len(), 6);
        assert!(extract.is_none());
        assert!(extract_real_estate(&empty_lot, &roster(), 2025).is_none());
    }
}
