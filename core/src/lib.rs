//! Synthetic annuity-loan portfolios for exercising loan-reporting pipelines.
//!
//! Every generated loan is internally consistent: principal, rate, term and
//! installment satisfy the annuity equation, and the balance reported at
//! each reporting date matches the installments paid by then.

pub mod amortization;
pub mod config;
pub mod error;
pub mod generator;
pub mod loan;
pub mod numeric;
pub mod portfolio;
pub mod rng;
pub mod snapshot;
pub mod temporal;
pub mod types;
