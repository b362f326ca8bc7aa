//! Annuity math for monthly-paying fixed-rate loans.
//!
//! With nominal annual rate `r` the monthly growth factor is
//! `q = (1 + r)^(1/12)`. For principal `K` over `n` months:
//!
//!   installment    R    = K·qⁿ·(q − 1) / (qⁿ − 1)
//!   balance after  B(t) = K·(qⁿ − qᵗ) / (qⁿ − 1)
//!   term from R    n    = −ln(1 − (q − 1)·K / R) / ln q
//!
//! At zero rate the formulas collapse to their straight-line limits.

use crate::{
    numeric::round_to,
    types::{Amount, Months, Rate, PERIODS_PER_YEAR},
};

/// Monthly growth factor `q` for a nominal annual rate.
pub fn monthly_factor(annual_rate: Rate) -> f64 {
    (1.0 + annual_rate).powf(1.0 / PERIODS_PER_YEAR as f64)
}

/// Constant monthly installment that fully repays `principal` in `months`.
pub fn installment_rate(principal: Amount, annual_rate: Rate, months: Months) -> Amount {
    if months == 0 {
        return round_to(principal, 2);
    }
    let q = monthly_factor(annual_rate);
    let qn = q.powi(months as i32);
    if qn == 1.0 {
        return round_to(principal / months as f64, 2);
    }
    round_to(principal * qn * (q - 1.0) / (qn - 1.0), 2)
}

/// Outstanding principal after `elapsed` installments have been paid.
/// `elapsed` beyond the term is treated as the full term.
pub fn balance_after(principal: Amount, annual_rate: Rate, months: Months, elapsed: Months) -> Amount {
    if months == 0 {
        return 0.0;
    }
    let t = elapsed.min(months);
    let q = monthly_factor(annual_rate);
    let qn = q.powi(months as i32);
    if qn == 1.0 {
        let remaining = (months - t) as f64 / months as f64;
        return round_to(principal * remaining, 2);
    }
    let qt = q.powi(t as i32);
    round_to(principal * (qn - qt) / (qn - 1.0), 2)
}

/// Number of months an installment of `installment` needs to repay
/// `principal`, solved from the annuity equation.
///
/// Returns `None` when the installment never covers the interest, or when
/// either amount is not positive.
pub fn term_months(principal: Amount, installment: Amount, annual_rate: Rate) -> Option<f64> {
    if principal <= 0.0 || installment <= 0.0 {
        return None;
    }
    let q = monthly_factor(annual_rate);
    let i = q - 1.0;
    if i == 0.0 {
        return Some(principal / installment);
    }
    let inner = 1.0 - i * principal / installment;
    if inner <= 0.0 {
        return None;
    }
    Some(-inner.ln() / q.ln())
}
