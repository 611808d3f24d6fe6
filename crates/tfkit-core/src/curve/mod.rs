//! Color/opacity curve store — control points, curves, and evaluation.

pub mod function;
pub mod interpolate;
pub mod opacity;
pub mod point;

pub use function::TransferFunction;
pub use interpolate::CurveSampler;
pub use opacity::OpacityCurve;
pub use point::{ColorControlPoint, OpacityControlPoint};
