//! Single-loan generation: snapshot presence, invariants, failure modes.

use chrono::{Datelike, NaiveDate};
use loansynth_core::{
    amortization::term_months,
    config::ReportingSettings,
    error::GenError,
    generator::{generate_loan, LoanGenerator},
    loan::{Loan, LoanCategory, ValidityMode},
    rng::LoanRng,
};

fn settings() -> ReportingSettings {
    ReportingSettings::default_test()
}

fn check_invariants(loan: &Loan, realistic: bool) {
    assert!(
        (1_000.0..=1_000_000_000.0).contains(&loan.payment_amount),
        "principal out of range: {loan:?}"
    );
    if realistic {
        assert!((0.001..=0.07).contains(&loan.interest_rate), "{loan:?}");
    } else {
        assert!((0.0001..=0.1).contains(&loan.interest_rate), "{loan:?}");
    }

    assert!(loan.current_balance > 0.0, "balance must stay positive: {loan:?}");
    assert!(loan.current_balance <= loan.payment_amount, "{loan:?}");

    assert!(loan.payment_date < loan.contractual_end_date, "{loan:?}");
    assert_eq!(
        loan.contractual_end_date.year() - loan.payment_date.year(),
        loan.term_years as i32
    );

    let months = term_months(loan.payment_amount, loan.installment_rate, loan.interest_rate)
        .expect("installment must amortize the principal");
    assert_eq!(
        (months / 12.0).round() as u32,
        loan.term_years,
        "term not recoverable from installment: {months} months for {loan:?}"
    );
    assert!(loan.installment_rate < loan.payment_amount, "{loan:?}");
}

#[test]
fn new_unrealistic_loan_originates_in_reporting_year() {
    let mut rng = LoanRng::seed_from_u64(2020);
    let pair = generate_loan(&settings(), LoanCategory::New, ValidityMode::Valid, false, &mut rng)
        .unwrap();

    assert!(pair.previous.is_none());
    let loan = pair.current.expect("new loan has a current snapshot");
    check_invariants(&loan, false);
    assert_eq!(loan.payment_date.year(), 2020);
    assert!(loan.contractual_end_date.year() > 2020);
}

#[test]
fn continuing_unrealistic_loan_has_both_snapshots() {
    let mut rng = LoanRng::seed_from_u64(2021);
    let pair = generate_loan(
        &settings(),
        LoanCategory::Continuing,
        ValidityMode::Valid,
        false,
        &mut rng,
    )
    .unwrap();

    let current = pair.current.expect("current snapshot");
    let previous = pair.previous.expect("previous snapshot");
    assert_eq!(current.contract_id, previous.contract_id);
    assert_eq!(current.installment_rate, previous.installment_rate);
    assert_eq!(current.interest_rate, previous.interest_rate);
    assert_eq!(current.payment_amount, previous.payment_amount);
    assert_eq!(current.payment_date, previous.payment_date);
    assert_eq!(current.contractual_end_date, previous.contractual_end_date);
    assert!(previous.current_balance >= current.current_balance);
}

#[test]
fn expired_loan_has_only_previous_snapshot() {
    let mut rng = LoanRng::seed_from_u64(2022);
    let pair = generate_loan(&settings(), LoanCategory::Expired, ValidityMode::Valid, true, &mut rng)
        .unwrap();

    assert!(pair.current.is_none());
    let loan = pair.previous.expect("expired loan has a previous snapshot");
    check_invariants(&loan, true);
    assert!(loan.payment_date.year() < 2020);
    assert_eq!(loan.contractual_end_date.year(), 2020);
}

#[test]
fn every_category_holds_invariants_across_many_seeds() {
    for realistic in [true, false] {
        let generator = LoanGenerator::new(settings(), realistic).unwrap();
        for category in LoanCategory::ALL {
            for seed in 0..300 {
                let mut rng = LoanRng::seed_from_u64(seed);
                let pair = generator
                    .generate(category, ValidityMode::Valid, &mut rng)
                    .unwrap();
                assert_eq!(pair.previous.is_some(), category.has_previous_snapshot());
                assert_eq!(pair.current.is_some(), category.has_current_snapshot());
                for loan in pair.previous.iter().chain(pair.current.iter()) {
                    check_invariants(loan, realistic);
                }
                if let (Some(prev), Some(curr)) = (&pair.previous, &pair.current) {
                    assert!(prev.current_balance >= curr.current_balance);
                }
            }
        }
    }
}

#[test]
fn cosmetic_fields_carry_fixed_defaults() {
    let mut s = settings();
    s.number_format = "de".into();
    let mut rng = LoanRng::seed_from_u64(5);
    let loan = generate_loan(&s, LoanCategory::New, ValidityMode::Valid, true, &mut rng)
        .unwrap()
        .current
        .unwrap();

    assert_eq!(loan.redemption_method, "A");
    assert_eq!(loan.currency, "EUR");
    assert_eq!(loan.yearly_interest_payments, 12);
    assert_eq!(loan.yearly_redemption_payments, 12);
    assert_eq!(loan.interest_payment_date, loan.payment_date);
    assert_eq!(loan.redemption_payment_date, loan.payment_date);
    assert_eq!(loan.number_format, "de");
    assert_eq!(loan.contract_id.get_version_num(), 4);
}

#[test]
fn loan_json_uses_camel_case_and_accepts_legacy_currency_key() {
    let mut rng = LoanRng::seed_from_u64(6);
    let loan = generate_loan(&settings(), LoanCategory::New, ValidityMode::Valid, true, &mut rng)
        .unwrap()
        .current
        .unwrap();

    let mut value = serde_json::to_value(&loan).unwrap();
    assert!(value.get("installmentRate").is_some());
    assert!(value.get("contractualEndDate").is_some());

    let obj = value.as_object_mut().unwrap();
    let currency = obj.remove("currency").unwrap();
    obj.insert("curreny".into(), currency);
    let back: Loan = serde_json::from_value(value).unwrap();
    assert_eq!(back.currency, "EUR");
    assert_eq!(back.contract_id, loan.contract_id);
    assert_eq!(back.payment_date, loan.payment_date);
}

#[test]
fn unsupported_modes_fail_before_sampling() {
    for mode in [ValidityMode::Invalid, ValidityMode::Warn, ValidityMode::Error] {
        let mut rng = LoanRng::seed_from_u64(7);
        let err = generate_loan(&settings(), LoanCategory::Continuing, mode, true, &mut rng)
            .unwrap_err();
        assert!(matches!(err, GenError::UnsupportedMode { .. }), "{err}");

        // The stream was not touched.
        let mut fresh = LoanRng::seed_from_u64(7);
        assert_eq!(rng.next_u64(), fresh.next_u64());
    }
}

#[test]
fn reversed_period_fails_fast() {
    let mut s = settings();
    s.previous_reporting_date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    let mut rng = LoanRng::seed_from_u64(8);
    let err = generate_loan(&s, LoanCategory::New, ValidityMode::Valid, true, &mut rng).unwrap_err();
    assert!(matches!(err, GenError::InvalidConfig { .. }), "{err}");
    assert!(LoanGenerator::new(s, false).is_err());
}

#[test]
fn broken_date_format_is_rejected_at_construction() {
    let mut s = settings();
    s.date_format = "%Y-%".into();
    let err = LoanGenerator::new(s.clone(), true).err().expect("generator must reject");
    assert!(matches!(err, GenError::InvalidConfig { .. }), "{err}");

    let mut rng = LoanRng::seed_from_u64(9);
    let err = generate_loan(&s, LoanCategory::New, ValidityMode::Valid, true, &mut rng).unwrap_err();
    assert!(matches!(err, GenError::InvalidConfig { .. }), "{err}");
}
