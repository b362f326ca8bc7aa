//! Rounding, sampling and calendar helpers shared by every generator stage.
//!
//! All samplers take the caller's `LoanRng`; nothing here owns state.

use crate::{
    error::{GenError, GenResult},
    rng::LoanRng,
    types::Months,
};
use chrono::{Datelike, Duration, NaiveDate};
use std::f64::consts::PI;

/// Fresh draws allowed before `skewed_sample` gives up.
pub const MAX_RESAMPLE_ATTEMPTS: u32 = 64;

/// Round half away from zero at `digits` decimals.
///
/// `f64::EPSILON` is pushed onto the value first, away from zero, so values
/// such as 1.005 that are stored just below their decimal form still round
/// up.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let rounder = 10f64.powi(digits as i32);
    ((value + f64::EPSILON.copysign(value)) * rounder).round() / rounder
}

/// Uniform integer in the inclusive range [min, max].
pub fn uniform_int(rng: &mut LoanRng, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    let span = (max - min + 1) as f64;
    min + (rng.next_f64() * span) as i64
}

/// Uniform float in [min, max], rounded to `digits`.
pub fn uniform_float(rng: &mut LoanRng, min: f64, max: f64, digits: u32) -> f64 {
    round_to(rng.next_f64() * (max - min) + min, digits).clamp(min, max)
}

/// Skewed pseudo-normal sample in [min, max].
///
/// A Box–Muller normal draw is squeezed into [0, 1] via `z / 10 + 0.5`,
/// redrawn from scratch when it lands outside, then raised to `skew`.
/// `skew > 1` pulls values toward `min`, `skew < 1` toward `max`.
pub fn skewed_sample(
    rng: &mut LoanRng,
    min: f64,
    max: f64,
    skew: f64,
    digits: u32,
) -> GenResult<f64> {
    if !(skew.is_finite() && skew > 0.0) {
        return Err(GenError::invalid_config(format!(
            "skew must be a positive finite number, got {skew}"
        )));
    }
    if !(min.is_finite() && max.is_finite()) || min > max {
        return Err(GenError::invalid_config(format!(
            "invalid sampling range [{min}, {max}]"
        )));
    }

    for attempt in 1..=MAX_RESAMPLE_ATTEMPTS {
        let u = rng.next_f64_nonzero();
        let v = rng.next_f64_nonzero();
        let z = (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos();

        let unit = z / 10.0 + 0.5;
        if !(0.0..=1.0).contains(&unit) {
            log::warn!("skewed_sample: draw {unit:.4} outside [0, 1], resampling (attempt {attempt})");
            continue;
        }

        let stretched = unit.powf(skew) * (max - min) + min;
        return Ok(round_to(stretched, digits).clamp(min, max));
    }

    Err(GenError::SamplingFailed {
        attempts: MAX_RESAMPLE_ATTEMPTS,
        min,
        max,
        skew,
    })
}

/// Uniform calendar day in the inclusive range [min, max].
/// Returns `min` when the range is empty.
pub fn uniform_date(rng: &mut LoanRng, min: NaiveDate, max: NaiveDate) -> NaiveDate {
    let span_days = (max - min).num_days();
    if span_days <= 0 {
        return min;
    }
    min + Duration::days(uniform_int(rng, 0, span_days))
}

/// Whole calendar months from `from` to `to`, ignoring the day of month.
/// Never negative.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> Months {
    let months = (to.year() - from.year()) * 12 - from.month() as i32 + to.month() as i32;
    months.max(0) as Months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to(1.005, 2), 1.01);
        assert_eq!(round_to(-1.5, 0), -2.0);
        assert_eq!(round_to(0.123_456, 4), 0.1235);
        assert_eq!(round_to(1_234.5, 0), 1_235.0);
    }

    #[test]
    fn rounding_is_idempotent() {
        let mut rng = LoanRng::seed_from_u64(99);
        for _ in 0..10_000 {
            let x = (rng.next_f64() - 0.5) * 2.0e9;
            let once = round_to(x, 2);
            assert_eq!(round_to(once, 2), once, "not idempotent for {x}");
        }
        for x in [0.0, 0.005, 0.015, 1.005, 99.995, -0.005, -12.345] {
            let once = round_to(x, 2);
            assert_eq!(round_to(once, 2), once, "not idempotent for {x}");
        }
    }

    #[test]
    fn uniform_int_covers_inclusive_range() {
        let mut rng = LoanRng::seed_from_u64(3);
        let mut seen = [false; 3];
        for _ in 0..1_000 {
            let v = uniform_int(&mut rng, 0, 2);
            assert!((0..=2).contains(&v));
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "every value should appear: {seen:?}");
        assert_eq!(uniform_int(&mut rng, 5, 5), 5);
    }

    #[test]
    fn uniform_float_respects_bounds_and_digits() {
        let mut rng = LoanRng::seed_from_u64(4);
        for _ in 0..1_000 {
            let v = uniform_float(&mut rng, 0.0001, 0.1, 4);
            assert!((0.0001..=0.1).contains(&v));
            assert_eq!(round_to(v, 4), v);
        }
    }

    #[test]
    fn skewed_sample_stays_in_bounds() {
        let mut rng = LoanRng::seed_from_u64(5);
        for skew in [0.5, 1.0, 2.0, 4.0] {
            for _ in 0..10_000 {
                let v = skewed_sample(&mut rng, 10.0, 500.0, skew, 2).unwrap();
                assert!((10.0..=500.0).contains(&v), "skew {skew} gave {v}");
            }
        }
    }

    #[test]
    fn higher_skew_pulls_toward_min() {
        let mut rng = LoanRng::seed_from_u64(6);
        let mean = |rng: &mut LoanRng, skew: f64| {
            (0..5_000)
                .map(|_| skewed_sample(rng, 0.0, 1.0, skew, 6).unwrap())
                .sum::<f64>()
                / 5_000.0
        };
        let low = mean(&mut rng, 0.5);
        let flat = mean(&mut rng, 1.0);
        let high = mean(&mut rng, 4.0);
        assert!(low > flat && flat > high, "means {low} / {flat} / {high}");
        assert!((flat - 0.5).abs() < 0.02, "skew 1 should centre on 0.5, got {flat}");
    }

    #[test]
    fn skewed_sample_rejects_bad_parameters() {
        let mut rng = LoanRng::seed_from_u64(7);
        assert!(matches!(
            skewed_sample(&mut rng, 0.0, 1.0, 0.0, 2),
            Err(GenError::InvalidConfig { .. })
        ));
        assert!(matches!(
            skewed_sample(&mut rng, 0.0, 1.0, f64::NAN, 2),
            Err(GenError::InvalidConfig { .. })
        ));
        assert!(matches!(
            skewed_sample(&mut rng, 5.0, 1.0, 1.0, 2),
            Err(GenError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn uniform_date_covers_both_ends() {
        let mut rng = LoanRng::seed_from_u64(8);
        let min = at(2020, 1, 1);
        let max = at(2020, 1, 3);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..1_000 {
            let d = uniform_date(&mut rng, min, max);
            assert!(d >= min && d <= max, "{d} outside [{min}, {max}]");
            seen_min |= d == min;
            seen_max |= d == max;
        }
        assert!(seen_min && seen_max);
        assert_eq!(uniform_date(&mut rng, max, min), max);
    }

    #[test]
    fn months_between_ignores_days_and_floors_at_zero() {
        assert_eq!(months_between(at(2015, 3, 31), at(2020, 1, 1)), 58);
        assert_eq!(months_between(at(2020, 1, 31), at(2020, 2, 1)), 1);
        assert_eq!(months_between(at(2020, 6, 1), at(2020, 6, 30)), 0);
        assert_eq!(months_between(at(2021, 1, 1), at(2020, 1, 1)), 0);
    }
}
