//! Three-point (PERT beta) duration estimates.

/// Mean duration and variance derived from a three-point estimate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DurationEstimate {
    pub length: f64,
    pub variance: f64,
}

/// Convert optimistic/most-likely/pessimistic durations into mean and variance.
///
/// `length = (a + 4m + b) / 6`, `variance = ((b - a) / 6)^2`. Ordering of the
/// inputs is not enforced here; see [`is_well_ordered`].
pub fn estimate_duration(a: f64, m: f64, b: f64) -> DurationEstimate {
    DurationEstimate {
        length: (a + 4.0 * m + b) / 6.0,
        variance: ((b - a) / 6.0).powi(2),
    }
}

/// True when `0 <= a <= m <= b`.
pub fn is_well_ordered(a: f64, m: f64, b: f64) -> bool {
    0.0 <= a && a <= m && m <= b
}

/// True when all three estimates are finite numbers.
pub fn is_finite(a: f64, m: f64, b: f64) -> bool {
    a.is_finite() && m.is_finite() && b.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_estimate() {
        let est = estimate_duration(1.0, 2.0, 3.0);
        assert!((est.length - 2.0).abs() < 1e-12);
        assert!((est.variance - 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_skewed_estimate() {
        // (2 + 12 + 10) / 6 = 4, ((10 - 2) / 6)^2 = 16/9
        let est = estimate_duration(2.0, 3.0, 10.0);
        assert!((est.length - 4.0).abs() < 1e-12);
        assert!((est.variance - 16.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_fixed_duration_has_no_variance() {
        let est = estimate_duration(5.0, 5.0, 5.0);
        assert!((est.length - 5.0).abs() < 1e-12);
        assert_eq!(est.variance, 0.0);
    }

    #[test]
    fn test_ordering_check() {
        assert!(is_well_ordered(1.0, 2.0, 3.0));
        assert!(is_well_ordered(0.0, 0.0, 0.0));
        assert!(!is_well_ordered(3.0, 2.0, 1.0));
        assert!(!is_well_ordered(-1.0, 2.0, 3.0));
        // Misordered input still yields the raw formula
        let est = estimate_duration(3.0, 2.0, 1.0);
        assert!((est.length - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_finite_check() {
        assert!(is_finite(1.0, 2.0, 3.0));
        assert!(!is_finite(f64::NAN, 2.0, 3.0));
        assert!(!is_finite(1.0, 2.0, f64::INFINITY));
    }
}
