//! Per-person derived metrics: totals, dispersion, age.

use chrono::{Datelike, NaiveDate};

/// Metrics over one person's daily counts.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonMetrics {
    pub total: u32,
    pub max_day: u32,
    pub mean: f64,
    pub stddev: f64,
    /// Coefficient of variation (stddev / mean). `None` when the mean is
    /// zero or the value is otherwise non-finite; such rows are excluded
    /// from the consistency ranking rather than ranked at zero.
    pub cv: Option<f64>,
}

/// Compute totals and dispersion for one day-count sequence.
///
/// Standard deviation is the sample deviation (n - 1 divisor), matching how
/// the report has always computed consistency.
pub fn person_metrics(daily_counts: &[u32]) -> PersonMetrics {
    let n = daily_counts.len();
    let total: u32 = daily_counts.iter().sum();
    let max_day = daily_counts.iter().copied().max().unwrap_or(0);
    let mean = if n > 0 { total as f64 / n as f64 } else { 0.0 };

    let stddev = if n > 1 {
        let variance = daily_counts
            .iter()
            .map(|&count| {
                let delta = count as f64 - mean;
                delta * delta
            })
            .sum::<f64>()
            / (n - 1) as f64;
        variance.sqrt()
    } else {
        f64::NAN
    };

    let raw_cv = stddev / mean;
    let cv = raw_cv.is_finite().then_some(raw_cv);

    PersonMetrics {
        total,
        max_day,
        mean,
        stddev,
        cv,
    }
}

/// Age in whole years on the reference date, from a `dd.mm.yyyy` string.
///
/// Returns `None` for sentinels and for anything that is not a real calendar
/// date; cleaning lets syntactically valid nonsense like `32.13.2000`
/// through, and this is where it gets dropped.
pub fn age_on(birth_date: &str, reference: NaiveDate) -> Option<i32> {
    let mut fragments = birth_date.split('.');
    let day = fragments.next()?;
    let month = fragments.next()?;
    let year = fragments.next()?;
    if fragments.next().is_some() {
        return None;
    }

    let birth = NaiveDate::from_ymd_opt(
        year.trim().parse().ok()?,
        month.trim().parse().ok()?,
        day.trim().parse().ok()?,
    )?;

    let mut age = reference.year() - birth.year();
    if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    Some(age)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 20).unwrap()
    }

    #[test]
    fn test_person_metrics_basic() {
        let metrics = person_metrics(&[2, 4, 6]);
        assert_eq!(metrics.total, 12);
        assert_eq!(metrics.max_day, 6);
        assert!((metrics.mean - 4.0).abs() < 1e-9);
        assert!((metrics.stddev - 2.0).abs() < 1e-9);
        assert!((metrics.cv.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_cv_zero_for_perfectly_steady_days() {
        let metrics = person_metrics(&[3, 3, 3, 3]);
        assert_eq!(metrics.cv, Some(0.0));
    }

    #[test]
    fn test_cv_undefined_for_zero_mean() {
        let metrics = person_metrics(&[0, 0, 0]);
        assert_eq!(metrics.total, 0);
        assert_eq!(metrics.cv, None);
    }

    #[test]
    fn test_cv_undefined_for_single_day() {
        // Sample deviation needs at least two observations.
        assert_eq!(person_metrics(&[5]).cv, None);
    }

    #[test]
    fn test_age_birthday_already_passed() {
        assert_eq!(age_on("01.01.2000", reference()), Some(25));
        assert_eq!(age_on("20.09.2000", reference()), Some(25));
    }

    #[test]
    fn test_age_birthday_not_yet_reached() {
        assert_eq!(age_on("21.09.2000", reference()), Some(24));
        assert_eq!(age_on("01.12.2000", reference()), Some(24));
    }

    #[test]
    fn test_age_undefined_for_sentinel_and_invalid_dates() {
        assert_eq!(age_on("N/A", reference()), None);
        assert_eq!(age_on("0", reference()), None);
        assert_eq!(age_on("", reference()), None);
        assert_eq!(age_on("32.13.2000", reference()), None);
        assert_eq!(age_on("29.02.2001", reference()), None);
        assert_eq!(age_on("01.01.2000.extra", reference()), None);
    }
}
