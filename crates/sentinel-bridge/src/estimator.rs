// SPDX-License-Identifier: Apache-2.0
//! Closed-form observable estimate.

/// Estimate the expectation value of the observable for rotation angle `theta`.
///
/// Evaluates `sin(theta / 2)`, the single-qubit expectation value under a
/// rotation generator at half the given angle. There is no sampling, so the
/// result is exact up to floating-point evaluation and always lies in
/// `[-1, 1]` for finite input. Non-finite input is not rejected; it yields NaN.
///
/// ```rust
/// use std::f64::consts::PI;
/// use sentinel_bridge::estimate_observable;
///
/// assert_eq!(estimate_observable(0.0), 0.0);
/// assert!((estimate_observable(PI) - 1.0).abs() < 1e-9);
/// ```
#[inline]
#[must_use]
pub fn estimate_observable(theta: f64) -> f64 {
    (theta / 2.0).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_known_angles() {
        assert_eq!(estimate_observable(0.0), 0.0);
        assert!((estimate_observable(PI) - 1.0).abs() < 1e-9);
        assert!((estimate_observable(-PI) + 1.0).abs() < 1e-9);
        assert!((estimate_observable(PI / 3.0) - 0.5).abs() < 1e-9);
        assert!(estimate_observable(2.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_propagates() {
        assert!(estimate_observable(f64::NAN).is_nan());
        assert!(estimate_observable(f64::INFINITY).is_nan());
        assert!(estimate_observable(f64::NEG_INFINITY).is_nan());
    }

    #[test]
    fn test_large_angles_stay_bounded() {
        for theta in [1e3, -1e6, 1e12, f64::MAX, f64::MIN] {
            let value = estimate_observable(theta);
            assert!((-1.0..=1.0).contains(&value), "theta={theta} gave {value}");
        }
    }
}
