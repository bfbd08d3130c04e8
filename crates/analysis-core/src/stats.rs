//! Small numeric helpers shared by the indicator and scoring crates.

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Compute sample standard deviation.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    variance.sqrt()
}

/// Percentage change between consecutive values. Pairs whose base is zero are skipped.
pub fn pct_changes(data: &[f64]) -> Vec<f64> {
    data.windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] / w[0] - 1.0) * 100.0)
        .collect()
}

/// Percentage return of the last value against the value `window - 1` steps
/// earlier, i.e. across a trailing window of `window` samples.
///
/// `None` when the window is not filled or the base price is not positive.
pub fn trailing_return(data: &[f64], window: usize) -> Option<f64> {
    if window < 2 || data.len() < window {
        return None;
    }
    let base = data[data.len() - window];
    let last = *data.last()?;
    if base <= 0.0 {
        return None;
    }
    Some((last / base - 1.0) * 100.0)
}

/// Mean of the trailing `window` values.
pub fn trailing_mean(data: &[f64], window: usize) -> Option<f64> {
    if window == 0 || data.len() < window {
        return None;
    }
    Some(mean(&data[data.len() - window..]))
}

/// Maximum of the trailing `window` values.
pub fn trailing_max(data: &[f64], window: usize) -> Option<f64> {
    if window == 0 || data.len() < window {
        return None;
    }
    data[data.len() - window..].iter().copied().reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_std_dev_is_sample() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // population std is 2.0, sample std is sqrt(32/7)
        assert_relative_eq!(std_dev(&data), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_trailing_return_uses_window_start() {
        let data = vec![50.0, 100.0, 105.0, 110.0];
        assert_relative_eq!(trailing_return(&data, 3).unwrap(), 10.0, epsilon = 1e-9);
        assert!(trailing_return(&data, 5).is_none());
    }

    #[test]
    fn test_trailing_return_rejects_zero_base() {
        let data = vec![0.0, 1.0, 2.0];
        assert!(trailing_return(&data, 3).is_none());
    }

    #[test]
    fn test_trailing_mean_and_max() {
        let data = vec![1.0, 9.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(trailing_mean(&data, 3).unwrap(), 4.0);
        assert_eq!(trailing_max(&data, 4), Some(9.0));
        assert_eq!(trailing_max(&data, 3), Some(5.0));
        assert!(trailing_mean(&data, 6).is_none());
    }

    #[test]
    fn test_pct_changes() {
        let changes = pct_changes(&[100.0, 110.0, 99.0]);
        assert_eq!(changes.len(), 2);
        assert_relative_eq!(changes[0], 10.0, epsilon = 1e-9);
        assert_relative_eq!(changes[1], -10.0, epsilon = 1e-9);
    }
}
