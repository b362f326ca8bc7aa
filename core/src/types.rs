//! Shared primitive types used across the generator.

/// A monetary amount in the loan's currency, rounded to cents.
pub type Amount = f64;

/// A nominal annual interest rate as a fraction (0.035 = 3.5%).
pub type Rate = f64;

/// A loan term in whole years.
pub type TermYears = u32;

/// A count of monthly periods.
pub type Months = u32;

/// Longest term the generator will ever place, in years.
pub const MAX_TERM_YEARS: TermYears = 50;

/// Installments per year. All generated loans pay monthly.
pub const PERIODS_PER_YEAR: u32 = 12;
