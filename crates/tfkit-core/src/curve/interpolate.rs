//! Piecewise evaluation of color and opacity curves.
//!
//! Each segment runs from one control point to the next and is shaped by
//! the left point's `midpoint` and `sharpness`.
//!
//! # Algorithm
//! For a segment `[x1, x2]` with values `v1, v2`, midpoint `m`, sharpness `s`:
//! ```text
//! t  = (x − x1) / (x2 − x1)
//! t' = t < m ? 0.5 × t / m : 0.5 + 0.5 × (t − m) / (1 − m)
//!
//! s < 0.01  →  v1 + t' × (v2 − v1)                        (linear)
//! s > 0.99  →  t' < 0.5 ? v1 : v2                         (step)
//! otherwise →  h00(t')×v1 + h01(t')×v2 + (h10(t') + h11(t'))×(1 − s)×(v2 − v1)
//! ```
//! where `h00..h11` are the cubic Hermite basis functions. Outside the
//! span of the points the end values are held.
//!
//! # Complexity
//! - Snapshot: O(N log N) sort by position
//! - Evaluate: O(log N) binary search + O(1) interpolation

use crate::curve::function::TransferFunction;
use crate::curve::point::{ColorControlPoint, OpacityControlPoint};

/// Midpoints are kept strictly inside `(0, 1)` so the bend never divides by zero.
const MIDPOINT_EPSILON: f64 = 1e-5;

/// Common view over color and opacity control points.
pub trait Node: Copy {
    /// Number of value channels carried by the node.
    const CHANNELS: usize;

    fn position(&self) -> f64;
    fn midpoint(&self) -> f64;
    fn sharpness(&self) -> f64;
    fn channel(&self, index: usize) -> f64;
}

impl Node for ColorControlPoint {
    const CHANNELS: usize = 3;

    fn position(&self) -> f64 {
        self.position
    }
    fn midpoint(&self) -> f64 {
        self.midpoint
    }
    fn sharpness(&self) -> f64 {
        self.sharpness
    }
    fn channel(&self, index: usize) -> f64 {
        self.color[index]
    }
}

impl Node for OpacityControlPoint {
    const CHANNELS: usize = 1;

    fn position(&self) -> f64 {
        self.position
    }
    fn midpoint(&self) -> f64 {
        self.midpoint
    }
    fn sharpness(&self) -> f64 {
        self.sharpness
    }
    fn channel(&self, _index: usize) -> f64 {
        self.opacity
    }
}

/// Copy `points` into position order.
///
/// Reversed or inverted sequences keep their values attached to their
/// positions, so the result is still a function of position. The sort is
/// stable: coincident positions keep their stored order.
pub fn sorted_by_position<P: Node>(points: &[P]) -> Vec<P> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.position().total_cmp(&b.position()));
    sorted
}

/// Evaluate a position-sorted curve at `x`.
///
/// `N` must equal `P::CHANNELS`. Returns `None` for an empty curve.
pub(crate) fn evaluate_sorted<P: Node, const N: usize>(
    sorted: &[P],
    x: f64,
) -> Option<[f64; N]> {
    debug_assert_eq!(N, P::CHANNELS);
    let first = sorted.first()?;
    let last = sorted[sorted.len() - 1];

    if x <= first.position() {
        return Some(channels(first));
    }
    if x >= last.position() {
        return Some(channels(&last));
    }

    // Binary search for the segment containing x
    let mut lo = 0;
    let mut hi = sorted.len() - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if sorted[mid].position() <= x {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let left = &sorted[lo];
    let right = &sorted[hi];
    let span = right.position() - left.position();
    if span <= 0.0 {
        return Some(channels(right));
    }
    let t = (x - left.position()) / span;

    let mut out = [0.0; N];
    for (c, value) in out.iter_mut().enumerate() {
        *value = segment_value(
            left.channel(c),
            right.channel(c),
            t,
            left.midpoint(),
            left.sharpness(),
        );
    }
    Some(out)
}

fn channels<P: Node, const N: usize>(point: &P) -> [f64; N] {
    std::array::from_fn(|c| point.channel(c))
}

/// Interpolate one channel across a segment at parameter `t ∈ [0, 1]`.
pub fn segment_value(v1: f64, v2: f64, t: f64, midpoint: f64, sharpness: f64) -> f64 {
    let m = midpoint.clamp(MIDPOINT_EPSILON, 1.0 - MIDPOINT_EPSILON);
    let t = if t < m {
        0.5 * t / m
    } else {
        0.5 + 0.5 * (t - m) / (1.0 - m)
    };

    if sharpness < 0.01 {
        return v1 + t * (v2 - v1);
    }
    if sharpness > 0.99 {
        return if t < 0.5 { v1 } else { v2 };
    }

    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h10 = t3 - 2.0 * t2 + t;
    let h11 = t3 - t2;
    let tangent = (1.0 - sharpness) * (v2 - v1);

    h00 * v1 + h01 * v2 + (h10 + h11) * tangent
}

/// Position-sorted snapshot of a transfer function for repeated sampling.
///
/// # Performance
/// Sorts once so lookup-table bakes do not re-sort per sample.
#[derive(Debug, Clone)]
pub struct CurveSampler {
    colors: Vec<ColorControlPoint>,
    opacities: Vec<OpacityControlPoint>,
    opacity_mapping: bool,
}

impl CurveSampler {
    pub fn new(function: &TransferFunction) -> Self {
        Self {
            colors: sorted_by_position(function.points()),
            opacities: function
                .opacity()
                .map(|curve| sorted_by_position(curve.points()))
                .unwrap_or_default(),
            opacity_mapping: function.opacity_mapping(),
        }
    }

    /// Color at `x`. Black for a curve without points.
    pub fn color(&self, x: f64) -> [f64; 3] {
        evaluate_sorted(&self.colors, x).unwrap_or([0.0; 3])
    }

    /// Opacity at `x`. Fully opaque when opacity mapping is off or no
    /// opacity points exist.
    pub fn opacity(&self, x: f64) -> f64 {
        if !self.opacity_mapping {
            return 1.0;
        }
        evaluate_sorted::<_, 1>(&self.opacities, x).map_or(1.0, |[a]| a)
    }

    pub fn rgba(&self, x: f64) -> [f64; 4] {
        let [r, g, b] = self.color(x);
        [r, g, b, self.opacity(x)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_segment_linear_at_default_shape() {
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let v = segment_value(0.2, 0.8, t, 0.5, 0.0);
            assert!((v - (0.2 + 0.6 * t)).abs() < EPSILON, "t={t}: {v}");
        }
    }

    #[test]
    fn test_segment_step_at_full_sharpness() {
        assert_eq!(segment_value(0.0, 1.0, 0.49, 0.5, 1.0), 0.0);
        assert_eq!(segment_value(0.0, 1.0, 0.51, 0.5, 1.0), 1.0);
    }

    #[test]
    fn test_segment_midpoint_reaches_half_value() {
        let v = segment_value(0.0, 1.0, 0.25, 0.25, 0.0);
        assert!((v - 0.5).abs() < EPSILON);
        let v = segment_value(0.0, 1.0, 0.25, 0.25, 0.5);
        assert!((v - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_segment_hermite_hits_endpoints() {
        assert!((segment_value(0.1, 0.9, 0.0, 0.5, 0.5) - 0.1).abs() < EPSILON);
        assert!((segment_value(0.1, 0.9, 1.0, 0.5, 0.5) - 0.9).abs() < EPSILON);
    }

    #[test]
    fn test_evaluate_holds_end_values() {
        let pts = [
            ColorControlPoint::new(0.0, [0.0, 0.0, 1.0]),
            ColorControlPoint::new(10.0, [1.0, 0.0, 0.0]),
        ];
        assert_eq!(evaluate_sorted::<_, 3>(&pts, -5.0), Some([0.0, 0.0, 1.0]));
        assert_eq!(evaluate_sorted::<_, 3>(&pts, 50.0), Some([1.0, 0.0, 0.0]));
        let [r, _, b] = evaluate_sorted::<_, 3>(&pts, 5.0).unwrap();
        assert!((r - 0.5).abs() < EPSILON);
        assert!((b - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_evaluate_empty_is_none() {
        let pts: [OpacityControlPoint; 0] = [];
        assert_eq!(evaluate_sorted::<_, 1>(&pts, 0.0), None);
    }

    #[test]
    fn test_sorted_by_position_reorders_descending_sequence() {
        let pts = [
            OpacityControlPoint::new(2.0, 0.1),
            OpacityControlPoint::new(1.0, 0.2),
            OpacityControlPoint::new(0.0, 0.3),
        ];
        let sorted = sorted_by_position(&pts);
        let positions: Vec<f64> = sorted.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0.0, 1.0, 2.0]);
        assert_eq!(sorted[0].opacity, 0.3);
    }
}
