//! Household Projections CLI
//!
//! Runs a household scenario file, or amortizes a single loan from the command line

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use household_projections::amortization::{AmortizationConfig, AmortizationEngine};
use household_projections::assumptions::loader::load_loan_overrides;
use household_projections::assumptions::{LoanAssumptions, LoanOverrides};
use household_projections::report::{write_csv, write_report};
use household_projections::{ScenarioReport, ScenarioRunner};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "household-projections", version, about = "Multi-year household financial projections")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run every linked calculator in a scenario and build the main view
    Run {
        /// Scenario JSON file
        #[arg(long)]
        scenario: PathBuf,

        /// Directory for CSV output
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// Projection start year when the scenario does not set one
        #[arg(long)]
        current_year: Option<i32>,

        /// Number of years printed to the console
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },

    /// Amortize a single loan
    Amortize {
        #[arg(long)]
        principal: f64,

        /// Annual interest rate in percent
        #[arg(long)]
        rate: f64,

        /// Amortization period in years
        #[arg(long)]
        years: u32,

        /// Borrower age in the first year
        #[arg(long)]
        age: u32,

        #[arg(long, default_value_t = 0.0)]
        extra_monthly: f64,

        /// CSV of per-year overrides (year_offset,manual_payment,refinance_balance,refinance_rate_percent)
        #[arg(long)]
        overrides: Option<PathBuf>,

        #[arg(long)]
        current_year: Option<i32>,

        /// Write the schedule to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn wall_clock_year() -> i32 {
    chrono::Local::now().year()
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            scenario,
            output_dir,
            current_year,
            rows,
        } => run_scenario(scenario, output_dir, current_year, rows),
        Command::Amortize {
            principal,
            rate,
            years,
            age,
            extra_monthly,
            overrides,
            current_year,
            output,
        } => {
            let mut loan = LoanAssumptions::new(principal, rate, years, age);
            loan.extra_monthly_payment = extra_monthly;
            let overrides = match overrides {
                Some(path) => load_loan_overrides(&path)
                    .with_context(|| format!("Failed to load overrides from {}", path.display()))?,
                None => LoanOverrides::new(),
            };
            amortize(loan, overrides, current_year.unwrap_or_else(wall_clock_year), output)
        }
    }
}

fn run_scenario(scenario: PathBuf, output_dir: PathBuf, current_year: Option<i32>, rows: usize) -> Result<()> {
    let runner = ScenarioRunner::from_json_path(&scenario, current_year.unwrap_or_else(wall_clock_year))
        .with_context(|| format!("Failed to load scenario {}", scenario.display()))?;

    println!("Household Projections v{}", env!("CARGO_PKG_VERSION"));
    println!("===========================\n");
    println!("Scenario: {}", scenario.display());
    println!("  Start year: {}", runner.current_year());
    println!("  Linked calculators: {}", runner.scenario().calculators.len());
    println!();

    let report = runner.run();
    print_report(&report, rows);

    let written = write_report(&output_dir, &report)
        .with_context(|| format!("Failed to write CSV output to {}", output_dir.display()))?;
    println!("\n{} CSV files written to: {}", written.len(), output_dir.display());
    Ok(())
}

fn print_report(report: &ScenarioReport, rows: usize) {
    for run in &report.calculators {
        let status = if run.extract.is_some() { "linked" } else { "skipped (insufficient data)" };
        println!("  {:<28} {:?} {}", run.label, run.kind, status);
        if let Some(summary) = &run.schedule_summary {
            match summary.payoff_year {
                Some(year) => println!("      paid off in {} ({} years), interest ${:.0}", year, summary.years_to_payoff.unwrap_or(0), summary.total_interest),
                None => println!("      not paid off, final balance ${:.0}", summary.final_balance),
            }
        }
        if let Some(summary) = &run.property_summary {
            println!(
                "      final value ${:.0}, net rent ${:.0}, after-tax cash flow ${:.0}",
                summary.final_value, summary.cumulative_net_rent, summary.after_tax_cash_flow
            );
        }
    }

    println!("\nIncome ({} years):", report.tables.income.len());
    println!("{:>5} {:>4} {:>4} {:>12} {:>12} {:>12} {:>8} {:>12}",
        "Year", "Age", "Sp", "Total", "Target", "Surplus", "% Tgt", "After Tax");
    println!("{}", "-".repeat(80));
    for row in report.tables.income.iter().take(rows) {
        println!("{:>5} {:>4} {:>4} {:>12.0} {:>12.0} {:>12.0} {:>8.1} {:>12.0}",
            row.year,
            row.primary_age,
            row.spouse_age.map(|a| a.to_string()).unwrap_or_default(),
            row.total_income,
            row.target_income,
            row.shortfall_surplus,
            row.percent_of_target_achieved,
            row.after_tax_income,
        );
    }

    println!("\nNet worth and estate:");
    println!("{:>5} {:>14} {:>14} {:>14} {:>12} {:>12} {:>14}",
        "Year", "Assets", "Liabilities", "Net Worth", "Probate", "Final Tax", "Estate");
    println!("{}", "-".repeat(92));
    for (nw, estate) in report.tables.net_worth.iter().zip(&report.tables.estate).take(rows) {
        println!("{:>5} {:>14.0} {:>14.0} {:>14.0} {:>12.0} {:>12.0} {:>14.0}",
            nw.year,
            nw.total_assets,
            nw.total_liabilities,
            nw.net_worth,
            estate.probate_estimate,
            estate.final_tax,
            estate.final_estate_value,
        );
    }

    if report.tables.len() > rows {
        println!("... ({} more years)", report.tables.len() - rows);
    }

    if let Some(insurance) = &report.insurance {
        println!("\nInsurance needs:");
        println!("  On client: ${:.0}", insurance.insurance_need_on_client);
        println!("  On spouse: ${:.0}", insurance.insurance_need_on_spouse);
    }
}

fn amortize(loan: LoanAssumptions, overrides: LoanOverrides, current_year: i32, output: Option<PathBuf>) -> Result<()> {
    let engine = AmortizationEngine::new(AmortizationConfig::new(current_year));
    let schedule = engine.project(&loan, &overrides);
    let baseline = engine.project_baseline(&loan);

    println!("Amortization ({} years):", schedule.records.len());
    println!("{:>5} {:>4} {:>14} {:>10} {:>12} {:>12} {:>12} {:>14}",
        "Year", "Age", "Opening", "Monthly", "Payment", "Interest", "Principal", "Closing");
    println!("{}", "-".repeat(92));
    for row in &schedule.records {
        println!("{:>5} {:>4} {:>14.0} {:>10.0} {:>12.0} {:>12.0} {:>12.0} {:>14.0}",
            row.year,
            row.age,
            row.opening_balance,
            row.monthly_payment,
            row.total_annual_payment,
            row.interest_portion,
            row.principal_portion,
            row.closing_balance,
        );
    }

    let summary = schedule.summary();
    println!("\nSummary:");
    match summary.years_to_payoff {
        Some(years) => println!("  Paid off after {} years", years),
        None => println!("  Not paid off, final balance ${:.0}", summary.final_balance),
    }
    println!("  Total interest: ${:.0}", summary.total_interest);
    println!("  Total paid: ${:.0}", summary.total_paid);
    println!("  Interest saved vs. no extra payments: ${:.0}", summary.interest_saved_against(&baseline.summary()));

    if let Some(path) = output {
        write_csv(&path, &schedule.records)
            .with_context(|| format!("Failed to write schedule to {}", path.display()))?;
        println!("\nFull schedule written to: {}", path.display());
    }
    Ok(())
}
