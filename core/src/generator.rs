//! Generates one annuity loan and its reporting snapshots.
//!
//! Each call samples principal and rate, places the loan in time, derives
//! the installment, then evaluates the outstanding balance at whichever
//! reporting dates the loan is alive for. Either a complete pair comes back
//! or an error; never a half-filled record.

use crate::{
    amortization::{balance_after, installment_rate},
    config::ReportingSettings,
    error::{GenError, GenResult},
    loan::{Loan, LoanCategory, LoanPair, LoanTerms, ValidityMode},
    numeric::{skewed_sample, uniform_float},
    rng::LoanRng,
    temporal,
    types::{Amount, Rate},
};
use chrono::NaiveDate;
use uuid::Uuid;

pub const PAYMENT_AMOUNT_MIN: Amount = 1_000.0;
pub const PAYMENT_AMOUNT_MAX: Amount = 1_000_000_000.0;
/// Strong pull toward small loans; most principals land in the tens of thousands.
pub const PAYMENT_AMOUNT_SKEW: f64 = 15.0;

pub const REALISTIC_RATE_MIN: Rate = 0.001;
pub const REALISTIC_RATE_MAX: Rate = 0.07;
pub const REALISTIC_RATE_SKEW: f64 = 1.0;
pub const UNREALISTIC_RATE_MIN: Rate = 0.0001;
pub const UNREALISTIC_RATE_MAX: Rate = 0.1;
pub const RATE_DIGITS: u32 = 4;

pub struct LoanGenerator {
    settings: ReportingSettings,
    realistic: bool,
}

impl LoanGenerator {
    /// Fails if the settings describe an empty or reversed period.
    pub fn new(settings: ReportingSettings, realistic: bool) -> GenResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            realistic,
        })
    }

    pub fn generate(
        &self,
        category: LoanCategory,
        mode: ValidityMode,
        rng: &mut LoanRng,
    ) -> GenResult<LoanPair> {
        if mode != ValidityMode::Valid {
            return Err(GenError::UnsupportedMode {
                mode: mode.as_str(),
            });
        }

        let contract_id = contract_id(rng);
        let interest_rate = self.sample_interest_rate(rng)?;
        let payment_amount = self.sample_payment_amount(rng)?;
        let placement = temporal::resolve(&self.settings, category, self.realistic, rng)?;
        let installment = installment_rate(payment_amount, interest_rate, placement.term_months());

        let terms = LoanTerms {
            contract_id,
            payment_amount,
            interest_rate,
            installment_rate: installment,
            placement,
        };

        let previous = category
            .has_previous_snapshot()
            .then(|| self.snapshot_at(&terms, self.settings.previous_reporting_date));
        let current = category
            .has_current_snapshot()
            .then(|| self.snapshot_at(&terms, self.settings.current_reporting_date));

        log::debug!(
            "generator: {} {contract_id} K={payment_amount:.2} r={interest_rate} term={}y R={installment:.2}",
            category.as_str(),
            placement.term_years,
        );

        Ok(LoanPair { previous, current })
    }

    fn snapshot_at(&self, terms: &LoanTerms, instant: NaiveDate) -> Loan {
        let months = terms.placement.term_months();
        let elapsed = terms.placement.elapsed_at(instant);
        let balance = balance_after(terms.payment_amount, terms.interest_rate, months, elapsed);
        Loan::snapshot(terms, balance, &self.settings.number_format)
    }

    fn sample_payment_amount(&self, rng: &mut LoanRng) -> GenResult<Amount> {
        if self.realistic {
            skewed_sample(rng, PAYMENT_AMOUNT_MIN, PAYMENT_AMOUNT_MAX, PAYMENT_AMOUNT_SKEW, 2)
        } else {
            Ok(uniform_float(rng, PAYMENT_AMOUNT_MIN, PAYMENT_AMOUNT_MAX, 2))
        }
    }

    fn sample_interest_rate(&self, rng: &mut LoanRng) -> GenResult<Rate> {
        if self.realistic {
            skewed_sample(
                rng,
                REALISTIC_RATE_MIN,
                REALISTIC_RATE_MAX,
                REALISTIC_RATE_SKEW,
                RATE_DIGITS,
            )
        } else {
            Ok(uniform_float(
                rng,
                UNREALISTIC_RATE_MIN,
                UNREALISTIC_RATE_MAX,
                RATE_DIGITS,
            ))
        }
    }
}

/// One-shot form of `LoanGenerator::generate`.
pub fn generate_loan(
    settings: &ReportingSettings,
    category: LoanCategory,
    mode: ValidityMode,
    realistic: bool,
    rng: &mut LoanRng,
) -> GenResult<LoanPair> {
    LoanGenerator::new(settings.clone(), realistic)?.generate(category, mode, rng)
}

/// Version-4 UUID built from the loan's own RNG stream, so ids are
/// reproducible for a given seed.
pub fn contract_id(rng: &mut LoanRng) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}
