//! Missing-aware series helpers shared by the enrichment and aggregation stages.
//!
//! Every helper treats `None` as a missing observation and skips it, and
//! reports an undefined result (empty input, division by zero) as `None`
//! rather than `NaN`.

use statrs::statistics::Statistics;

fn present(values: impl IntoIterator<Item = Option<f64>>) -> Vec<f64> {
    values.into_iter().flatten().filter(|v| !v.is_nan()).collect()
}

fn defined(value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}

pub fn mean(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let values = present(values);
    if values.is_empty() {
        return None;
    }
    defined(values.iter().mean())
}

/// Sample (Bessel-corrected) standard deviation; undefined below two values.
pub fn sample_std_dev(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let values = present(values);
    if values.len() < 2 {
        return None;
    }
    defined(values.iter().std_dev())
}

pub fn max(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let values = present(values);
    if values.is_empty() {
        return None;
    }
    defined(Statistics::<f64>::max(values.iter()))
}

pub fn min(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let values = present(values);
    if values.is_empty() {
        return None;
    }
    defined(Statistics::<f64>::min(values.iter()))
}

/// Period-over-period percent change. The first period has no predecessor.
pub fn pct_change(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(values.len());
    for (k, current) in values.iter().enumerate() {
        let change = match (k.checked_sub(1).and_then(|p| values[p]), current) {
            (Some(previous), Some(current)) if previous != 0.0 => {
                defined((current - previous) / previous * 100.0)
            }
            _ => None,
        };
        changes.push(change);
    }
    changes
}

/// Trailing mean over up to `window` rows, filling in as the window grows.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean(values[start..=i].iter().copied())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.map_or(false, |a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn pct_change_leaves_first_period_undefined() {
        let growth = pct_change(&[Some(100.0), Some(110.0), Some(121.0)]);
        assert_eq!(growth[0], None);
        assert!(close(growth[1], 10.0));
        assert!(close(growth[2], 10.0));
    }

    #[test]
    fn pct_change_skips_missing_and_zero_bases() {
        let growth = pct_change(&[Some(0.0), Some(5.0), None, Some(8.0)]);
        assert_eq!(growth, vec![None, None, None, None]);
    }

    #[test]
    fn rolling_mean_fills_in_before_window_is_full() {
        let values = [Some(100.0), Some(110.0), Some(121.0)];
        let rolled = rolling_mean(&values, 5);
        assert!(close(rolled[0], 100.0));
        assert!(close(rolled[1], 105.0));
        assert!(close(rolled[2], 331.0 / 3.0));
    }

    #[test]
    fn rolling_mean_drops_values_that_leave_the_window() {
        let values = [Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let rolled = rolling_mean(&values, 2);
        assert!(close(rolled[3], 3.5));
        assert!(close(rolled[1], 1.5));
    }

    #[test]
    fn rolling_mean_ignores_missing_values_inside_window() {
        let rolled = rolling_mean(&[None, Some(4.0), None], 3);
        assert_eq!(rolled[0], None);
        assert!(close(rolled[1], 4.0));
        assert!(close(rolled[2], 4.0));
    }

    #[test]
    fn std_dev_is_sample_and_needs_two_values() {
        assert_eq!(sample_std_dev([Some(3.0)]), None);
        // sample variance of [2, 4, 4, 4, 5, 5, 7, 9] is 32 / 7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].map(Some);
        assert!(close(sample_std_dev(values), (32.0f64 / 7.0).sqrt()));
    }

    #[test]
    fn aggregates_of_nothing_are_undefined() {
        assert_eq!(mean([None, None]), None);
        assert_eq!(max(Vec::new()), None);
        assert_eq!(min([None]), None);
        assert!(close(max([Some(1.0), None, Some(7.5)]), 7.5));
        assert!(close(min([Some(1.0), None, Some(-7.5)]), -7.5));
    }
}
