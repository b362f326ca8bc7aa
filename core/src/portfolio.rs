//! Builds a whole portfolio: N loans, each with a category drawn from the
//! category policy, split into current and previous snapshot lists.

use crate::{
    config::ReportingSettings,
    error::{GenError, GenResult},
    generator::LoanGenerator,
    loan::{Loan, LoanCategory, ValidityMode},
    numeric::uniform_int,
    rng::{LoanRng, RngBank},
};
use serde::Serialize;

/// Category mix of a realistic portfolio. Most loans on a book are
/// simply running on from the previous period.
pub const CATEGORY_WEIGHTS: [(LoanCategory, f64); 3] = [
    (LoanCategory::Continuing, 0.80),
    (LoanCategory::Expired, 0.10),
    (LoanCategory::New, 0.10),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    pub current_loans: Vec<Loan>,
    pub previous_loans: Vec<Loan>,
    pub summary: PortfolioSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub continuing: usize,
    pub new: usize,
    pub expired: usize,
}

impl PortfolioSummary {
    fn record(&mut self, category: LoanCategory) {
        match category {
            LoanCategory::Continuing => self.continuing += 1,
            LoanCategory::New => self.new += 1,
            LoanCategory::Expired => self.expired += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.continuing + self.new + self.expired
    }
}

/// Reject negative loan counts coming from untyped input.
pub fn validate_count(count: i64) -> GenResult<usize> {
    usize::try_from(count)
        .map_err(|_| GenError::invalid_config(format!("loan count must be >= 0, got {count}")))
}

/// Draw a category: weighted by `CATEGORY_WEIGHTS` when realistic,
/// uniform over the three otherwise.
pub fn pick_category(rng: &mut LoanRng, realistic: bool) -> LoanCategory {
    if !realistic {
        return LoanCategory::ALL[uniform_int(rng, 0, 2) as usize];
    }
    let roll = rng.next_f64();
    let mut cumulative = 0.0;
    for (category, weight) in CATEGORY_WEIGHTS {
        cumulative += weight;
        if roll < cumulative {
            return category;
        }
    }
    LoanCategory::Continuing
}

/// Generate `count` valid loans for `settings`.
///
/// Loan `i` draws only from stream `i` of the seed's `RngBank`, so the
/// same seed always yields the same portfolio and a longer run extends a
/// shorter one.
pub fn assemble(
    settings: &ReportingSettings,
    count: usize,
    realistic: bool,
    seed: u64,
) -> GenResult<Portfolio> {
    let generator = LoanGenerator::new(settings.clone(), realistic)?;
    let bank = RngBank::new(seed);
    let mut portfolio = Portfolio {
        current_loans: Vec::with_capacity(count),
        previous_loans: Vec::with_capacity(count),
        summary: PortfolioSummary::default(),
    };

    for i in 0..count {
        let mut rng = bank.for_loan(i);
        let category = pick_category(&mut rng, realistic);
        let pair = generator.generate(category, ValidityMode::Valid, &mut rng)?;
        if let Some(current) = pair.current {
            portfolio.current_loans.push(current);
        }
        if let Some(previous) = pair.previous {
            portfolio.previous_loans.push(previous);
        }
        portfolio.summary.record(category);
    }

    let summary = portfolio.summary;
    log::info!(
        "portfolio: seed={seed} generated {} loans ({} continuing, {} new, {} expired); {} current / {} previous records",
        summary.total(),
        summary.continuing,
        summary.new,
        summary.expired,
        portfolio.current_loans.len(),
        portfolio.previous_loans.len(),
    );
    Ok(portfolio)
}
