//! Control point types for the color and opacity curves.

use serde::{Deserialize, Serialize};

/// Default midpoint: the segment value reaches halfway at half the span.
pub const DEFAULT_MIDPOINT: f64 = 0.5;
/// Default sharpness: plain linear interpolation.
pub const DEFAULT_SHARPNESS: f64 = 0.0;

/// One entry of the color curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorControlPoint {
    /// Data-space x-coordinate.
    pub position: f64,
    /// `[r, g, b]`, conventionally in `[0, 1]`. Not validated.
    pub color: [f64; 3],
    /// Where the segment to the next point reaches its halfway value, in `(0, 1]`.
    pub midpoint: f64,
    /// Curvature of the segment to the next point, in `[0, 1]`.
    pub sharpness: f64,
}

impl ColorControlPoint {
    /// A point with default midpoint (0.5) and sharpness (0.0).
    pub const fn new(position: f64, color: [f64; 3]) -> Self {
        Self {
            position,
            color,
            midpoint: DEFAULT_MIDPOINT,
            sharpness: DEFAULT_SHARPNESS,
        }
    }

    /// Replace the segment shape parameters.
    pub const fn with_shape(mut self, midpoint: f64, sharpness: f64) -> Self {
        self.midpoint = midpoint;
        self.sharpness = sharpness;
        self
    }
}

/// One entry of the opacity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpacityControlPoint {
    /// Data-space x-coordinate.
    pub position: f64,
    /// Opacity value, conventionally in `[0, 1]`.
    pub opacity: f64,
    pub midpoint: f64,
    pub sharpness: f64,
}

impl OpacityControlPoint {
    /// A point with default midpoint (0.5) and sharpness (0.0).
    pub const fn new(position: f64, opacity: f64) -> Self {
        Self {
            position,
            opacity,
            midpoint: DEFAULT_MIDPOINT,
            sharpness: DEFAULT_SHARPNESS,
        }
    }

    pub const fn with_shape(mut self, midpoint: f64, sharpness: f64) -> Self {
        self.midpoint = midpoint;
        self.sharpness = sharpness;
        self
    }
}
