//! Loan records and the enums that steer their generation.

use crate::{
    temporal::TemporalPlacement,
    types::{Amount, Rate, TermYears, PERIODS_PER_YEAR},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const REDEMPTION_METHOD_ANNUITY: &str = "A";
pub const DEFAULT_CURRENCY: &str = "EUR";
pub const DEFAULT_INTEREST_METHOD: &str = "30/360";

/// Where a loan sits relative to the reporting period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LoanCategory {
    /// Originated before the period, matures after it.
    Continuing,
    /// Originated inside the period.
    New,
    /// Matures inside the period.
    Expired,
}

impl LoanCategory {
    pub const ALL: [LoanCategory; 3] = [Self::Continuing, Self::Expired, Self::New];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continuing => "continuing",
            Self::New => "new",
            Self::Expired => "expired",
        }
    }

    /// Loans alive at the previous reporting date.
    pub fn has_previous_snapshot(&self) -> bool {
        matches!(self, Self::Continuing | Self::Expired)
    }

    /// Loans alive at the current reporting date.
    pub fn has_current_snapshot(&self) -> bool {
        matches!(self, Self::Continuing | Self::New)
    }
}

/// Whether generated records should pass downstream validation.
/// Only `Valid` is implemented; the rest are reserved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidityMode {
    Valid,
    Invalid,
    Warn,
    Error,
}

impl ValidityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// The values shared by both snapshots of one loan.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanTerms {
    pub contract_id: Uuid,
    pub payment_amount: Amount,
    pub interest_rate: Rate,
    pub installment_rate: Amount,
    pub placement: TemporalPlacement,
}

/// One loan observed at one reporting instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub contract_id: Uuid,
    pub current_balance: Amount,
    pub installment_rate: Amount,
    pub interest_rate: Rate,
    pub redemption_method: String,
    #[serde(alias = "curreny")]
    pub currency: String,
    pub payment_amount: Amount,
    pub payment_date: NaiveDate,
    pub contractual_end_date: NaiveDate,
    pub term_years: TermYears,
    pub yearly_interest_payments: u32,
    pub yearly_redemption_payments: u32,
    pub interest_payment_date: NaiveDate,
    pub redemption_payment_date: NaiveDate,
    pub interest_method: String,
    pub number_format: String,
}

impl Loan {
    /// Build the snapshot of `terms` whose outstanding principal is `balance`.
    pub fn snapshot(terms: &LoanTerms, balance: Amount, number_format: &str) -> Self {
        let placement = &terms.placement;
        Self {
            contract_id: terms.contract_id,
            current_balance: balance,
            installment_rate: terms.installment_rate,
            interest_rate: terms.interest_rate,
            redemption_method: REDEMPTION_METHOD_ANNUITY.into(),
            currency: DEFAULT_CURRENCY.into(),
            payment_amount: terms.payment_amount,
            payment_date: placement.payment_date,
            contractual_end_date: placement.contractual_end_date,
            term_years: placement.term_years,
            yearly_interest_payments: PERIODS_PER_YEAR,
            yearly_redemption_payments: PERIODS_PER_YEAR,
            interest_payment_date: placement.payment_date,
            redemption_payment_date: placement.payment_date,
            interest_method: DEFAULT_INTEREST_METHOD.into(),
            number_format: number_format.to_string(),
        }
    }
}

/// Output of one generator call. A continuing loan fills both sides,
/// a new loan only `current`, an expired loan only `previous`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoanPair {
    pub previous: Option<Loan>,
    pub current: Option<Loan>,
}
