//! Fixed-precision rounding applied to every numeric result of the engine.
//!
//! # Convention
//!
//! Values are rounded to a number of **decimal places** (not significant
//! digits), `DEFAULT_DECIMALS` by default, half away from zero. Every matrix
//! cell, solver intermediate and joint angle produced by this crate goes
//! through [`round_default`], so equal poses never differ by sub-precision
//! floating noise or by the sign of zero.
//!
//! Large-magnitude coordinates therefore keep their absolute resolution of
//! `1e-6` rather than a relative one.

/// Decimal places kept by the engine.
pub const DEFAULT_DECIMALS: u32 = 6;

/// Map negative zero to positive zero. `NaN` and infinities are untouched.
#[inline]
pub fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Round `value` to `decimals` decimal places.
///
/// `NaN`, `+inf` and `-inf` pass through unchanged. A `-0` result is
/// returned as `0`. When scaling by `10^decimals` would overflow, the value
/// is returned as is (normalized).
pub fn round_to_precision(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || !factor.is_finite() {
        return normalize_zero(value);
    }

    normalize_zero(scaled.round() / factor)
}

/// Round to [`DEFAULT_DECIMALS`].
#[inline]
pub fn round_default(value: f64) -> f64 {
    round_to_precision(value, DEFAULT_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_default_precision() {
        assert_eq!(round_default(1.123456789), 1.123457);
        assert_eq!(round_to_precision(1.987654321, 2), 1.99);
        assert_eq!(round_to_precision(1.987654321, 0), 2.0);
        assert_eq!(round_to_precision(-1.23456789, 3), -1.235);
        assert_eq!(round_to_precision(0.0000123456, 5), 0.00001);
        assert_eq!(round_to_precision(123456789.987654321, 2), 123456789.99);
    }

    #[test]
    fn test_leaves_short_values_alone() {
        assert_eq!(round_to_precision(1.2, 3), 1.2);
        assert_eq!(round_to_precision(42.0, 4), 42.0);
        assert_eq!(round_to_precision(1.1234, 10), 1.1234);
    }

    #[test]
    fn test_non_finite_pass_through() {
        assert!(round_default(f64::NAN).is_nan());
        assert_eq!(round_default(f64::INFINITY), f64::INFINITY);
        assert_eq!(round_default(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn test_negative_zero_is_canonicalized() {
        let rounded = round_default(-0.0000004);
        assert_eq!(rounded, 0.0);
        assert!(rounded.is_sign_positive());

        assert!(normalize_zero(-0.0).is_sign_positive());
        assert_eq!(normalize_zero(-2.5), -2.5);
        assert!(normalize_zero(f64::NAN).is_nan());
    }

    #[test]
    fn test_overflowing_scale_returns_value() {
        assert_eq!(round_to_precision(1e300, 10), 1e300);
    }
}
