//! Real adjusted salary
//!
//! `adjusted = nominal / (cost_of_living_index / 100)`, rounded to two decimals.
//! An index of 100 leaves the salary unchanged; an index of 50 doubles it. Both
//! stages call [`adjusted_salary`] so their results agree bit for bit.

/// Decimal places kept on the adjusted salary
pub const SALARY_DECIMALS: i32 = 2;

/// Round half to even at `decimals` places, scaling by a power of ten first
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Nominal salary rescaled by the cost-of-living index; `None` if either input is missing
#[must_use]
pub fn adjusted_salary(nominal_salary: Option<f64>, cost_of_living_index: Option<f64>) -> Option<f64> {
    let nominal = nominal_salary?;
    let index = cost_of_living_index?;
    Some(round_to(nominal / (index / 100.0), SALARY_DECIMALS))
}
