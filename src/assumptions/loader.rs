//! CSV loaders for sparse per-year overrides
//!
//! Loan overrides: `year_offset,manual_payment,refinance_balance,refinance_rate_percent`
//! Property overrides: `year_offset,sale_proceeds,purchase_basis,mortgage_balance`
//!
//! A blank cell means "no override" for that column.

use super::loan::{LoanOverrides, Refinance, YearOverride};
use super::property::PropertyOverrides;
use crate::error::{Error, Result};
use crate::numeric::parse_numeric_or_default;
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Optional amount from a cell; blank or unparseable cells are absent
fn cell(record: &StringRecord, index: usize) -> Option<f64> {
    let raw = record.get(index)?.trim();
    if raw.is_empty() {
        return None;
    }
    let value = parse_numeric_or_default(raw, f64::NAN);
    if value.is_nan() {
        log::warn!("ignoring non-numeric override cell {:?}", raw);
        None
    } else {
        Some(value)
    }
}

fn year_offset(record: &StringRecord) -> Result<u32> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let raw = record.get(0).unwrap_or("").trim();
    raw.parse::<u32>().map_err(|_| Error::InvalidRow {
        line,
        reason: format!("year offset {:?} is not a non-negative integer", raw),
    })
}

/// Load loan overrides from any CSV reader
pub fn read_loan_overrides<R: Read>(reader: R) -> Result<LoanOverrides> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut overrides = LoanOverrides::new();

    for result in reader.records() {
        let record = result?;
        let offset = year_offset(&record)?;

        let refinance = Refinance {
            new_balance: cell(&record, 2),
            new_annual_rate_percent: cell(&record, 3),
        };
        let entry = overrides.entry(offset).or_insert_with(YearOverride::default);
        entry.manual_payment += cell(&record, 1).unwrap_or(0.0);
        if !refinance.is_empty() {
            entry.refinance = Some(refinance);
        }
    }

    Ok(overrides)
}

/// Load loan overrides from a CSV file
pub fn load_loan_overrides<P: AsRef<Path>>(path: P) -> Result<LoanOverrides> {
    read_loan_overrides(File::open(path)?)
}

/// Load property overrides from any CSV reader
pub fn read_property_overrides<R: Read>(reader: R) -> Result<PropertyOverrides> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut overrides = PropertyOverrides::default();

    for result in reader.records() {
        let record = result?;
        let offset = year_offset(&record)?;

        if let Some(proceeds) = cell(&record, 1) {
            overrides.sale_proceeds.insert(offset, proceeds);
        }
        if let Some(basis) = cell(&record, 2) {
            overrides.purchase_basis.insert(offset, basis);
        }
        if let Some(balance) = cell(&record, 3) {
            overrides.mortgage_balance.insert(offset, balance);
        }
    }

    Ok(overrides)
}

/// Load property overrides from a CSV file
pub fn load_property_overrides<P: AsRef<Path>>(path: P) -> Result<PropertyOverrides> {
    read_property_overrides(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_loan_overrides() {
        let data = "year_offset,manual_payment,refinance_balance,refinance_rate_percent\n\
                    2,5000,,\n\
                    5,,150000,6.5\n\
                    7,abc,,3\n";
        let overrides = read_loan_overrides(data.as_bytes()).unwrap();

        assert_eq!(overrides.len(), 3);
        assert_eq!(overrides[&2], YearOverride::manual_payment(5000.0));
        assert_eq!(overrides[&5], YearOverride::refinance(Some(150_000.0), Some(6.5)));
        assert_eq!(overrides[&7].manual_payment, 0.0);
        assert_eq!(overrides[&7].refinance, Some(Refinance { new_balance: None, new_annual_rate_percent: Some(3.0) }));
    }

    #[test]
    fn test_bad_offset_reports_line() {
        let data = "year_offset,manual_payment\n1,100\nlater,200\n";
        match read_loan_overrides(data.as_bytes()) {
            Err(Error::InvalidRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected InvalidRow, got {:?}", other),
        }
    }

    #[test]
    fn test_load_property_overrides_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "year_offset,sale_proceeds,purchase_basis,mortgage_balance").unwrap();
        writeln!(file, "0,,400000,250000").unwrap();
        writeln!(file, "10,900000,,").unwrap();

        let overrides = load_property_overrides(file.path()).unwrap();
        assert_eq!(overrides.sale(10), Some(900_000.0));
        assert_eq!(overrides.sale(0), None);
        assert_eq!(overrides.purchase_basis[&0], 400_000.0);
        assert_eq!(overrides.mortgage_balance[&0], 250_000.0);
    }
}
