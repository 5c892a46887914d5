//! Scenario runner for whole-household projections
//!
//! Loads a household scenario once, runs every linked calculator, aggregates
//! the extracts into the main view and evaluates insurance needs.

use crate::aggregation::{
    extract_capital_assets, extract_fixed_income, project_debt, project_real_estate, AggregationEngine,
    CalculatorExtract, CalculatorKind, LinkedCalculator, MainViewTables,
};
use crate::amortization::{AmortizationSchedule, AmortizationSummary};
use crate::assumptions::{ClientRoster, HouseholdParams, InsuranceAssumptions};
use crate::error::Result;
use crate::insurance::{InsuranceConfig, InsuranceNeedResult, InsuranceNeedsEngine};
use crate::real_estate::{RealEstateProjection, RealEstateSummary};
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A household scenario as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioFile {
    /// Calendar year of projection offset 0
    #[serde(default)]
    pub current_year: Option<i32>,

    #[serde(default)]
    pub roster: ClientRoster,

    #[serde(default)]
    pub household: HouseholdParams,

    #[serde(default)]
    pub calculators: Vec<LinkedCalculator>,

    #[serde(default)]
    pub insurance: Option<InsuranceAssumptions>,
}

impl ScenarioFile {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Everything one linked calculator produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorRun {
    pub kind: CalculatorKind,
    pub label: String,
    /// Full schedule, debt calculators only
    pub schedule: Option<AmortizationSchedule>,
    pub schedule_summary: Option<AmortizationSummary>,
    /// Full projection, real estate calculators only
    pub property: Option<RealEstateProjection>,
    pub property_summary: Option<RealEstateSummary>,
    /// `None` when the calculator held too little data to contribute
    pub extract: Option<CalculatorExtract>,
}

impl CalculatorRun {
    fn new(kind: CalculatorKind, label: &str) -> Self {
        Self {
            kind,
            label: label.to_string(),
            schedule: None,
            schedule_summary: None,
            property: None,
            property_summary: None,
            extract: None,
        }
    }
}

/// Result of running a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub current_year: i32,
    pub household: HouseholdParams,
    pub calculators: Vec<CalculatorRun>,
    pub tables: MainViewTables,
    pub insurance: Option<InsuranceNeedResult>,
}

impl ScenarioReport {
    /// Extracts that reached the aggregation, in calculator order
    pub fn extracts(&self) -> Vec<&CalculatorExtract> {
        self.calculators.iter().filter_map(|run| run.extract.as_ref()).collect()
    }
}

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_json_path("data/scenarios/sample_household.json", 2025)?;
/// let report = runner.run();
/// println!("{} years projected", report.tables.len());
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    scenario: ScenarioFile,
    current_year: i32,
}

impl ScenarioRunner {
    /// Create a runner; the scenario's own `current_year` wins over `fallback_year`
    pub fn new(scenario: ScenarioFile, fallback_year: i32) -> Self {
        let current_year = scenario.current_year.unwrap_or(fallback_year);
        Self { scenario, current_year }
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P, fallback_year: i32) -> Result<Self> {
        Ok(Self::new(ScenarioFile::from_json_path(path)?, fallback_year))
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn scenario(&self) -> &ScenarioFile {
        &self.scenario
    }

    /// Household parameters with missing ages filled from the roster
    pub fn household(&self) -> HouseholdParams {
        self.scenario
            .household
            .clone()
            .with_roster_ages(&self.scenario.roster, self.current_year)
    }

    /// Run a single linked calculator
    pub fn run_calculator(&self, calculator: &LinkedCalculator) -> CalculatorRun {
        let roster = &self.scenario.roster;
        let year = self.current_year;
        let mut run = CalculatorRun::new(calculator.kind(), calculator.label());

        match calculator {
            LinkedCalculator::Debt(state) => {
                let (schedule, extract) = project_debt(state, roster, year);
                run.extract = extract;
                run.schedule_summary = Some(schedule.summary());
                run.schedule = Some(schedule);
            }
            LinkedCalculator::RealEstate(state) => {
                let (projection, extract) = project_real_estate(state, roster, year);
                run.extract = extract;
                run.property_summary = Some(projection.summary());
                run.property = Some(projection);
            }
            LinkedCalculator::FixedIncome(state) => {
                run.extract = extract_fixed_income(state, roster, year);
            }
            LinkedCalculator::CapitalAssets(state) => {
                run.extract = extract_capital_assets(state, roster, year);
            }
        }
        run
    }

    /// Run every calculator, aggregate and evaluate insurance
    ///
    /// Calculators are independent and run in parallel; results keep input order.
    pub fn run(&self) -> ScenarioReport {
        let household = self.household();
        info!(
            "running scenario for {} with {} linked calculators over {} years",
            self.current_year,
            self.scenario.calculators.len(),
            household.projection_years
        );

        let calculators: Vec<CalculatorRun> = self
            .scenario
            .calculators
            .par_iter()
            .map(|calculator| self.run_calculator(calculator))
            .collect();

        let extracts: Vec<CalculatorExtract> = calculators.iter().filter_map(|run| run.extract.clone()).collect();
        info!("{} of {} calculators contributed to the main view", extracts.len(), calculators.len());

        let tables = AggregationEngine::new(self.current_year).aggregate(&extracts, &household);

        let insurance = self
            .scenario
            .insurance
            .as_ref()
            .map(|assumptions| InsuranceNeedsEngine::new(InsuranceConfig::new(self.current_year)).compute_need(assumptions));
        if let Some(result) = &insurance {
            info!(
                "insurance need: client {:.0}, spouse {:.0}",
                result.insurance_need_on_client, result.insurance_need_on_spouse
            );
        }

        ScenarioReport {
            current_year: self.current_year,
            household,
            calculators,
            tables,
            insurance,
        }
    }
}
