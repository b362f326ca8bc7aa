//! Export document: the portfolio in the shape external writers consume.
//!
//! Loan dates are rendered with the settings' `dateFormat`; everything else
//! is copied from the loan records as-is. The embedded `settings` block keeps
//! ISO dates so it can be fed back to `ReportingSettings::load` to reproduce
//! the run. Writing the document anywhere is
//! the caller's business.

use crate::{
    config::ReportingSettings,
    error::GenResult,
    loan::Loan,
    portfolio::{Portfolio, PortfolioSummary},
    types::{Amount, Rate, TermYears},
};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    pub contract_id: String,
    pub current_balance: Amount,
    pub installment_rate: Amount,
    pub interest_rate: Rate,
    pub redemption_method: String,
    pub currency: String,
    pub payment_amount: Amount,
    pub payment_date: String,
    pub contractual_end_date: String,
    pub term_years: TermYears,
    pub yearly_interest_payments: u32,
    pub yearly_redemption_payments: u32,
    pub interest_payment_date: String,
    pub redemption_payment_date: String,
    pub interest_method: String,
    pub number_format: String,
}

impl LoanRecord {
    pub fn from_loan(loan: &Loan, date_format: &str) -> Self {
        let fmt = |d: NaiveDate| d.format(date_format).to_string();
        Self {
            contract_id: loan.contract_id.to_string(),
            current_balance: loan.current_balance,
            installment_rate: loan.installment_rate,
            interest_rate: loan.interest_rate,
            redemption_method: loan.redemption_method.clone(),
            currency: loan.currency.clone(),
            payment_amount: loan.payment_amount,
            payment_date: fmt(loan.payment_date),
            contractual_end_date: fmt(loan.contractual_end_date),
            term_years: loan.term_years,
            yearly_interest_payments: loan.yearly_interest_payments,
            yearly_redemption_payments: loan.yearly_redemption_payments,
            interest_payment_date: fmt(loan.interest_payment_date),
            redemption_payment_date: fmt(loan.redemption_payment_date),
            interest_method: loan.interest_method.clone(),
            number_format: loan.number_format.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub seed: u64,
    pub realistic: bool,
    /// ISO dates regardless of `dateFormat`, so the block reloads as-is.
    pub settings: ReportingSettings,
    pub summary: PortfolioSummary,
    pub current_loans: Vec<LoanRecord>,
    pub previous_loans: Vec<LoanRecord>,
}

impl PortfolioSnapshot {
    pub fn new(settings: &ReportingSettings, portfolio: &Portfolio, seed: u64, realistic: bool) -> Self {
        let records = |loans: &[Loan]| {
            loans
                .iter()
                .map(|l| LoanRecord::from_loan(l, &settings.date_format))
                .collect()
        };
        Self {
            seed,
            realistic,
            settings: settings.clone(),
            summary: portfolio.summary,
            current_loans: records(&portfolio.current_loans),
            previous_loans: records(&portfolio.previous_loans),
        }
    }

    pub fn to_json_pretty(&self) -> GenResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
