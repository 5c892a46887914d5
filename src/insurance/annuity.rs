//! Present value helpers for income replacement

use crate::numeric::finite_or;

/// Inflation-adjusted discount rate: `(1 + nominal) / (1 + inflation) − 1`
pub fn real_discount_rate(nominal: f64, inflation: f64) -> f64 {
    finite_or((1.0 + nominal) / (1.0 + inflation) - 1.0, 0.0)
}

/// PV of `years` level end-of-year payments of `payment` at `rate`
///
/// `PV = pmt·(1 − (1+r)^−n) / r`, or `pmt·n` when the rate is zero.
pub fn present_value_annuity(rate: f64, years: u32, payment: f64) -> f64 {
    if years == 0 {
        return 0.0;
    }
    if rate.abs() < 1e-12 {
        return payment * years as f64;
    }
    payment * (1.0 - (1.0 + rate).powf(-(years as f64))) / rate
}
