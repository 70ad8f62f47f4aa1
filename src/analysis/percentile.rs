use std::cmp::Ordering;

/// Percentile with linear interpolation between closest ranks, the rank of
/// `p` being `p / 100 * (m - 1)` over the sorted values. Returns `None` for
/// an empty slice.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(percentile_of_sorted(&sorted_values(values), p))
}

/// Ascending copy of `values`; NaNs compare equal to everything.
pub fn sorted_values(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// `sorted` must be non-empty and ascending.
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }

    let clamped = p.clamp(0.0, 100.0) / 100.0;
    let position = clamped * (sorted.len() - 1) as f64;
    let lower_index = position.floor() as usize;
    let upper_index = position.ceil() as usize;

    if lower_index == upper_index {
        sorted[lower_index]
    } else {
        let lower = sorted[lower_index];
        let upper = sorted[upper_index];
        lower + (upper - lower) * (position - lower_index as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn interpolates_between_ranks() {
        let values = [3.0, 1.0, 2.0, 4.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 100.0), Some(4.0));
        assert!(close(percentile(&values, 50.0).unwrap(), 2.5));
        assert!(close(percentile(&values, 5.0).unwrap(), 1.15));
        assert!(close(percentile(&values, 95.0).unwrap(), 3.85));
    }

    #[test]
    fn exact_rank_needs_no_interpolation() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&values, 25.0), Some(20.0));
        assert_eq!(percentile(&values, 75.0), Some(40.0));
    }

    #[test]
    fn single_and_empty() {
        assert_eq!(percentile(&[7.0], 5.0), Some(7.0));
        assert_eq!(percentile(&[], 5.0), None);
    }

    #[test]
    fn monotone_in_p() {
        let values = [0.4, -1.2, 3.3, 0.0, 2.2, -0.7, 1.1];
        let mut prev = f64::NEG_INFINITY;
        for step in 0..=100 {
            let value = percentile(&values, step as f64).unwrap();
            assert!(value >= prev);
            prev = value;
        }
    }
}
