//! Closed scalar interval used for data ranges and current (mapped) ranges.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransferFunctionError};

/// A `(min, max)` pair of data-space positions.
///
/// Used both as the fixed *data range* of a dataset and as the
/// user-adjustable *current range* clamped inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Range {
    /// Construct a range from its bounds as given.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Construct a range from two bounds in either order.
    pub fn ordered(a: f64, b: f64) -> Self {
        if a <= b { Self::new(a, b) } else { Self::new(b, a) }
    }

    /// Signed width `max - min`.
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Midpoint of the interval.
    pub fn center(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    /// `true` when the bounds coincide, so positions cannot be normalized.
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp `value` into `[min, max]`.
    ///
    /// Unlike `f64::clamp` this never panics on an inverted range; the
    /// lower bound wins.
    pub fn clamp(&self, value: f64) -> f64 {
        value.min(self.max).max(self.min)
    }

    /// Map `value` to its normalized position, `0` at `min` and `1` at `max`.
    ///
    /// Fails with [`TransferFunctionError::DegenerateRange`] when the
    /// width is zero.
    pub fn normalize(&self, value: f64) -> Result<f64> {
        self.check_normalizable()?;
        Ok((value - self.min) / self.width())
    }

    /// Inverse of [`Range::normalize`].
    pub fn denormalize(&self, t: f64) -> f64 {
        self.min + t * self.width()
    }

    /// Validate that positions can be normalized against this range.
    pub fn check_normalizable(&self) -> Result<()> {
        if !self.is_finite() {
            return Err(TransferFunctionError::NonFiniteValue("range bound"));
        }
        if self.is_degenerate() {
            return Err(TransferFunctionError::DegenerateRange {
                lo: self.min,
                hi: self.max,
            });
        }
        Ok(())
    }
}

impl Default for Range {
    /// The 8-bit scalar domain `[0, 255]`.
    fn default() -> Self {
        Self::new(0.0, 255.0)
    }
}

impl From<(f64, f64)> for Range {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_normalize_and_denormalize_are_inverse() {
        let r = Range::new(-10.0, 30.0);
        let t = r.normalize(5.0).unwrap();
        assert!((t - 0.375).abs() < EPSILON);
        assert!((r.denormalize(t) - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_degenerate_range_rejects_normalize() {
        let r = Range::new(4.0, 4.0);
        assert!(r.is_degenerate());
        assert!(matches!(
            r.normalize(4.0),
            Err(TransferFunctionError::DegenerateRange { lo, hi }) if lo == 4.0 && hi == 4.0
        ));
    }

    #[test]
    fn test_non_finite_range_rejects_normalize() {
        let r = Range::new(0.0, f64::INFINITY);
        assert!(matches!(
            r.normalize(1.0),
            Err(TransferFunctionError::NonFiniteValue(_))
        ));
    }

    #[test]
    fn test_ordered_swaps_bounds() {
        assert_eq!(Range::ordered(3.0, 1.0), Range::new(1.0, 3.0));
        assert_eq!(Range::ordered(1.0, 3.0), Range::new(1.0, 3.0));
    }

    #[test]
    fn test_clamp_holds_value_inside() {
        let r = Range::new(0.0, 1.0);
        assert_eq!(r.clamp(-0.5), 0.0);
        assert_eq!(r.clamp(0.25), 0.25);
        assert_eq!(r.clamp(2.0), 1.0);
    }
}
