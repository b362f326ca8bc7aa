//! Places a loan's origination and maturity relative to the reporting period.
//!
//!   continuing:  paymentDate < previous ........ current < contractualEndDate
//!   new:         previous <= paymentDate <= current < contractualEndDate
//!   expired:     paymentDate < previous < contractualEndDate <= current
//!
//! The term is always a whole number of years and both dates are derived
//! from each other by calendar-year arithmetic, so
//! `contractualEndDate.year - paymentDate.year == termYears` holds exactly.

use crate::{
    config::ReportingSettings,
    error::{GenError, GenResult},
    loan::LoanCategory,
    numeric::{months_between, skewed_sample, uniform_date, uniform_int},
    rng::LoanRng,
    types::{Months, TermYears, MAX_TERM_YEARS, PERIODS_PER_YEAR},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Exponent for realistic term sampling; favours short terms.
pub const TERM_SKEW: f64 = 2.0;

/// Placement draws allowed before giving up on a category.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 16;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemporalPlacement {
    pub payment_date: NaiveDate,
    pub contractual_end_date: NaiveDate,
    pub term_years: TermYears,
}

impl TemporalPlacement {
    pub fn term_months(&self) -> Months {
        self.term_years * PERIODS_PER_YEAR
    }

    /// Installments paid by `instant`.
    ///
    /// Whole calendar months since origination, clamped to the term. Before
    /// maturity the count stops at `n - 1`: a loan that matures later in the
    /// same calendar month as `instant` would otherwise report all `n`
    /// installments paid and a zero balance while still alive. A live loan's
    /// balance must stay positive, and that takes precedence over the plain
    /// `[0, n]` clamp.
    pub fn elapsed_at(&self, instant: NaiveDate) -> Months {
        let full = self.term_months();
        let elapsed = months_between(self.payment_date, instant).min(full);
        if instant < self.contractual_end_date {
            elapsed.min(full.saturating_sub(1))
        } else {
            elapsed
        }
    }

    /// Whether the placement has the shape `category` promises.
    pub fn fits(&self, category: LoanCategory, settings: &ReportingSettings) -> bool {
        let previous = settings.previous_reporting_date;
        let current = settings.current_reporting_date;
        if self.payment_date >= self.contractual_end_date {
            return false;
        }
        match category {
            LoanCategory::Continuing => {
                self.payment_date < previous && self.contractual_end_date > current
            }
            LoanCategory::New => {
                self.payment_date >= previous
                    && self.payment_date <= current
                    && self.contractual_end_date > current
            }
            LoanCategory::Expired => {
                self.contractual_end_date > previous && self.contractual_end_date <= current
            }
        }
    }
}

/// Draw a placement for `category` inside the settings' reporting period.
///
/// `settings` must already be validated; `LoanGenerator::new` does that once
/// per run.
pub fn resolve(
    settings: &ReportingSettings,
    category: LoanCategory,
    realistic: bool,
    rng: &mut LoanRng,
) -> GenResult<TemporalPlacement> {
    let min_term = min_term_years(settings, category)?;

    for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
        let term_years = sample_term(rng, min_term, realistic)?;
        let placement = place(settings, category, term_years, rng)?;
        if placement.fits(category, settings) {
            return Ok(placement);
        }
        log::warn!(
            "temporal: {} placement {:?} rejected, redrawing (attempt {attempt})",
            category.as_str(),
            placement
        );
    }

    Err(GenError::PlacementFailed {
        category: category.as_str(),
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

/// Shortest term that lets `category` straddle the period.
///
/// Expired loans can be one year long. New loans must still be running at
/// the current reporting date, and continuing loans additionally need a
/// free origination day before the previous reporting date.
pub fn min_term_years(settings: &ReportingSettings, category: LoanCategory) -> GenResult<TermYears> {
    let previous = settings.previous_reporting_date;
    let current = settings.current_reporting_date;
    for years in 1..=MAX_TERM_YEARS {
        let fits = match category {
            LoanCategory::Expired => true,
            LoanCategory::New => add_years(previous, years)? > current,
            LoanCategory::Continuing => {
                sub_years(current, years)? + Duration::days(1) < previous
                    && add_years(previous, years)? > current
            }
        };
        if fits {
            return Ok(years);
        }
    }
    Err(GenError::invalid_config(format!(
        "reporting period {previous} .. {current} is longer than the maximum term of {MAX_TERM_YEARS} years"
    )))
}

fn sample_term(rng: &mut LoanRng, min_term: TermYears, realistic: bool) -> GenResult<TermYears> {
    let term = if realistic {
        let raw = skewed_sample(rng, min_term as f64, MAX_TERM_YEARS as f64, TERM_SKEW, 6)?;
        raw.trunc() as TermYears
    } else {
        uniform_int(rng, min_term as i64, MAX_TERM_YEARS as i64) as TermYears
    };
    Ok(term.clamp(min_term, MAX_TERM_YEARS))
}

fn place(
    settings: &ReportingSettings,
    category: LoanCategory,
    term_years: TermYears,
    rng: &mut LoanRng,
) -> GenResult<TemporalPlacement> {
    let previous = settings.previous_reporting_date;
    let current = settings.current_reporting_date;
    let one_day = Duration::days(1);

    let (payment_date, contractual_end_date) = match category {
        LoanCategory::Continuing => {
            let earliest = sub_years(current, term_years)? + one_day;
            let payment_date = uniform_date(rng, earliest, previous - one_day);
            (payment_date, add_years(payment_date, term_years)?)
        }
        LoanCategory::New => {
            let payment_date = uniform_date(rng, previous, current);
            (payment_date, add_years(payment_date, term_years)?)
        }
        LoanCategory::Expired => {
            let end_date = uniform_date(rng, previous + one_day, current);
            (sub_years(end_date, term_years)?, end_date)
        }
    };

    Ok(TemporalPlacement {
        payment_date,
        contractual_end_date,
        term_years,
    })
}

pub fn add_years(date: NaiveDate, years: TermYears) -> GenResult<NaiveDate> {
    date.checked_add_months(chrono::Months::new(years * PERIODS_PER_YEAR))
        .ok_or_else(|| GenError::DateOutOfRange {
            reason: format!("{date} + {years} years"),
        })
}

pub fn sub_years(date: NaiveDate, years: TermYears) -> GenResult<NaiveDate> {
    date.checked_sub_months(chrono::Months::new(years * PERIODS_PER_YEAR))
        .ok_or_else(|| GenError::DateOutOfRange {
            reason: format!("{date} - {years} years"),
        })
}
