//! CSV export of projection tables

use crate::error::Result;
use crate::scenario::ScenarioReport;
use log::debug;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Write serializable rows to a CSV file with a header row
pub fn write_csv<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!("wrote {} rows to {}", rows.len(), path.as_ref().display());
    Ok(())
}

/// File-system friendly version of a calculator label
fn file_stem(label: &str, index: usize) -> String {
    let slug: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        format!("calculator_{}", index + 1)
    } else {
        format!("{:02}_{}", index + 1, slug)
    }
}

/// Write one table into `dir` and remember its path
fn emit<T: Serialize>(dir: &Path, name: &str, rows: &[T], written: &mut Vec<PathBuf>) -> Result<()> {
    let path = dir.join(name);
    write_csv(&path, rows)?;
    written.push(path);
    Ok(())
}

/// Write every main-view table plus each calculator's own schedule into `dir`
///
/// Returns the paths written, in order.
pub fn write_report<P: AsRef<Path>>(dir: P, report: &ScenarioReport) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let tables = &report.tables;
    emit(dir, "income.csv", &tables.income, &mut written)?;
    emit(dir, "assets.csv", &tables.assets, &mut written)?;
    emit(dir, "liabilities.csv", &tables.liabilities, &mut written)?;
    emit(dir, "net_worth.csv", &tables.net_worth, &mut written)?;
    emit(dir, "estate.csv", &tables.estate, &mut written)?;

    for (index, run) in report.calculators.iter().enumerate() {
        let stem = file_stem(&run.label, index);
        if let Some(schedule) = &run.schedule {
            emit(dir, &format!("{}_amortization.csv", stem), &schedule.records, &mut written)?;
        }
        if let Some(projection) = &run.property {
            emit(dir, &format!("{}_real_estate.csv", stem), &projection.records, &mut written)?;
        }
    }

    if let Some(insurance) = &report.insurance {
        emit(dir, "insurance_needs.csv", &insurance.yearly_projection, &mut written)?;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::{AmortizationConfig, AmortizationEngine};
    use crate::assumptions::{LoanAssumptions, LoanOverrides};
    use crate::scenario::{ScenarioFile, ScenarioRunner};
    use tempfile::tempdir;

    #[test]
    fn test_write_csv_has_header_and_rows() {
        let loan = LoanAssumptions::new(20_000.0, 5.0, 2, 35);
        let schedule = AmortizationEngine::new(AmortizationConfig::new(2025)).project(&loan, &LoanOverrides::new());

        let dir = tempdir().unwrap();
        let path = dir.path().join("loan.csv");
        write_csv(&path, &schedule.records).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.get(0), Some("year"));
        assert!(headers.iter().any(|h| h == "closing_balance"));
        assert_eq!(reader.records().count(), schedule.records.len());
    }

    #[test]
    fn test_write_report_emits_every_table() {
        let json = r#"{
            "current_year": 2025,
            "roster": {"primary": {"name": "Alex", "birth_year": 1970}},
            "household": {"projection_years": 5, "target_income": 50000},
            "calculators": [
                {"type": "debt", "label": "Line of credit", "loan": {"principal": 15000, "annual_interest_rate_percent": 7, "amortization_years": 3}}
            ]
        }"#;
        let report = ScenarioRunner::new(ScenarioFile::from_json_str(json).unwrap(), 2025).run();

        let dir = tempdir().unwrap();
        let written = write_report(dir.path(), &report).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "income.csv",
                "assets.csv",
                "liabilities.csv",
                "net_worth.csv",
                "estate.csv",
                "01_line_of_credit_amortization.csv",
            ]
        );

        let mut reader = csv::Reader::from_path(dir.path().join("income.csv")).unwrap();
        assert_eq!(reader.records().count(), 5);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Cottage (Muskoka)", 2), "03_cottage__muskoka");
        assert_eq!(file_stem("", 0), "calculator_1");
    }
}
