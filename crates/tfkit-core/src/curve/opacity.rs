//! Opacity curve — scalar piecewise function paired with a color curve.

use serde::{Deserialize, Serialize};

use crate::curve::interpolate::{evaluate_sorted, sorted_by_position};
use crate::curve::point::OpacityControlPoint;
use crate::error::{Result, TransferFunctionError};
use crate::range::Range;

/// Ordered opacity control points.
///
/// Points are kept in insertion order; nothing here re-sorts them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpacityCurve {
    points: Vec<OpacityControlPoint>,
}

impl OpacityCurve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<OpacityControlPoint>) -> Self {
        Self { points }
    }

    /// A two-point linear ramp from `(x0, a0)` to `(x1, a1)`.
    pub fn ramp(x0: f64, a0: f64, x1: f64, a1: f64) -> Self {
        Self::from_points(vec![
            OpacityControlPoint::new(x0, a0),
            OpacityControlPoint::new(x1, a1),
        ])
    }

    pub fn size(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[OpacityControlPoint] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut [OpacityControlPoint] {
        &mut self.points
    }

    pub fn point(&self, index: usize) -> Result<OpacityControlPoint> {
        self.points
            .get(index)
            .copied()
            .ok_or(TransferFunctionError::PointOutOfBounds {
                index,
                len: self.points.len(),
            })
    }

    pub fn set_point(&mut self, index: usize, point: OpacityControlPoint) -> Result<()> {
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or(TransferFunctionError::PointOutOfBounds { index, len })?;
        *slot = point;
        Ok(())
    }

    /// Append a point at the end of the sequence.
    pub fn add_point(&mut self, point: OpacityControlPoint) {
        self.points.push(point);
    }

    /// Append `(position, opacity)` with default shape parameters.
    pub fn add(&mut self, position: f64, opacity: f64) {
        self.add_point(OpacityControlPoint::new(position, opacity));
    }

    pub fn remove_all_points(&mut self) {
        self.points.clear();
    }

    /// Min/max over point positions. `(0, 0)` when empty.
    pub fn range(&self) -> Range {
        position_range(self.points.iter().map(|p| p.position))
    }

    /// Opacity at `x`, or `None` for an empty curve.
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        let sorted = sorted_by_position(&self.points);
        evaluate_sorted::<_, 1>(&sorted, x).map(|[a]| a)
    }
}

/// Min/max over a sequence of positions. `(0, 0)` when empty.
pub(crate) fn position_range(positions: impl Iterator<Item = f64>) -> Range {
    let mut bounds: Option<(f64, f64)> = None;
    for x in positions {
        bounds = Some(match bounds {
            None => (x, x),
            Some((lo, hi)) => (lo.min(x), hi.max(x)),
        });
    }
    let (lo, hi) = bounds.unwrap_or((0.0, 0.0));
    Range::new(lo, hi)
}
