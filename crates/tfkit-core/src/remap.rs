//! Transfer-function remapping, reversal, and opacity attenuation.
//!
//! # Algorithm
//! Remapping is a linear re-parameterization of every control point
//! position from a source range into a target window:
//! ```text
//! normalized = (x − source.min) / (source.max − source.min)
//! x'         = new_min + normalized × (new_max − new_min)
//! ```
//! Colors, opacities, midpoints, and sharpness are carried unchanged.
//! The opacity curve is normalized against the *color* source range so
//! both curves stay aligned.
//!
//! `new_max < new_min` is accepted and mirrors the curve: points keep
//! their index order, so positions come out descending.
//!
//! # Complexity
//! All operations are O(N) in the number of control points.

use crate::config::EditorConfig;
use crate::curve::{ColorControlPoint, OpacityControlPoint, TransferFunction};
use crate::error::{Result, TransferFunctionError};
use crate::range::Range;

/// Lowest opacity `set_transparency` leaves on a point.
pub const TRANSPARENCY_FLOOR: f64 = 1e-6;
/// Highest opacity `set_transparency` leaves on a point.
pub const TRANSPARENCY_CEILING: f64 = 1.0;

/// Rebuild `target` as `source` re-positioned from `source_range` into
/// `[new_min, new_max]`.
///
/// If `source` has no opacity curve an empty one is attached to it first,
/// and `target` always ends up with an opacity curve. `target` is
/// finalized afterwards.
///
/// Fails with [`TransferFunctionError::DegenerateRange`] when
/// `source_range` has zero width and there is at least one point to map.
/// Validation happens before `target` is touched.
pub fn remap(
    source: &mut TransferFunction,
    target: &mut TransferFunction,
    source_range: Range,
    new_min: f64,
    new_max: f64,
) -> Result<()> {
    let (colors, opacities) = remapped_points(source, source_range, new_min, new_max)?;
    tracing::debug!(
        "remap [{}, {}] -> [{}, {}]: {} color, {} opacity points",
        source_range.min,
        source_range.max,
        new_min,
        new_max,
        colors.len(),
        opacities.len()
    );
    write_back(target, colors, opacities);
    Ok(())
}

/// Move `curve` from its own range onto `[new_min, new_max]`.
///
/// Maps into a scratch curve, then copies the scratch points back
/// without further transformation. Range metadata kept elsewhere (e.g.
/// a [`RangeController`]) is the caller's to update.
///
/// [`RangeController`]: crate::interaction::RangeController
pub fn remap_in_place(curve: &mut TransferFunction, new_min: f64, new_max: f64) -> Result<()> {
    let source_range = curve.range();
    let mut scratch = TransferFunction::new();
    remap(curve, &mut scratch, source_range, new_min, new_max)?;

    let colors = scratch.points().to_vec();
    let opacities = scratch
        .opacity()
        .map(|o| o.points().to_vec())
        .unwrap_or_default();
    write_back(curve, colors, opacities);
    Ok(())
}

/// Mirror the curve: positions of points `i` and `N−1−i` are swapped while
/// colors and shape parameters stay at their index.
///
/// Applying it twice restores the original positions exactly.
pub fn reverse(curve: &mut TransferFunction) {
    let points = curve.points_mut();
    let n = points.len();
    for i in 0..n / 2 {
        let j = n - 1 - i;
        let x = points[i].position;
        points[i].position = points[j].position;
        points[j].position = x;
    }
    tracing::debug!("reversed {n} color points");
    curve.modified();
}

/// Scale every opacity by `factor`, clamped to `[1e-6, 1.0]`.
///
/// The floor keeps a point from vanishing entirely. No-op without an
/// opacity curve.
pub fn set_transparency(curve: &mut TransferFunction, factor: f64) {
    set_transparency_with(curve, factor, TRANSPARENCY_FLOOR, TRANSPARENCY_CEILING);
}

/// [`set_transparency`] with explicit clamp bounds.
pub fn set_transparency_with(curve: &mut TransferFunction, factor: f64, floor: f64, ceiling: f64) {
    let Some(opacity) = curve.opacity_mut() else {
        tracing::debug!("set_transparency: no opacity curve attached");
        return;
    };
    for point in opacity.points_mut() {
        point.opacity = (point.opacity * factor).max(floor).min(ceiling);
    }
    curve.opacity_modified();
}

/// [`set_transparency`] clamped to the configured
/// `transparency_floor`/`transparency_ceiling`.
pub fn set_transparency_configured(
    curve: &mut TransferFunction,
    factor: f64,
    config: &EditorConfig,
) {
    set_transparency_with(
        curve,
        factor,
        config.transparency_floor,
        config.transparency_ceiling,
    );
}

/// Compute remapped copies of both curves of `source`.
fn remapped_points(
    source: &mut TransferFunction,
    source_range: Range,
    new_min: f64,
    new_max: f64,
) -> Result<(Vec<ColorControlPoint>, Vec<OpacityControlPoint>)> {
    if !new_min.is_finite() || !new_max.is_finite() {
        return Err(TransferFunctionError::NonFiniteValue("target bound"));
    }

    source.ensure_opacity();
    let has_points = !source.is_empty() || source.opacity().is_some_and(|o| !o.is_empty());
    if has_points {
        source_range.check_normalizable()?;
    }

    let width = new_max - new_min;
    let reposition = |x: f64| new_min + (x - source_range.min) / source_range.width() * width;

    let colors = source
        .points()
        .iter()
        .map(|p| ColorControlPoint {
            position: reposition(p.position),
            ..*p
        })
        .collect();
    let opacities = source
        .opacity()
        .map(|o| {
            o.points()
                .iter()
                .map(|p| OpacityControlPoint {
                    position: reposition(p.position),
                    ..*p
                })
                .collect()
        })
        .unwrap_or_default();

    Ok((colors, opacities))
}

/// Replace both curves of `target` and finalize it.
fn write_back(
    target: &mut TransferFunction,
    colors: Vec<ColorControlPoint>,
    opacities: Vec<OpacityControlPoint>,
) {
    target.replace_points(colors);
    let opacity = target.ensure_opacity();
    opacity.remove_all_points();
    for point in opacities {
        opacity.add_point(point);
    }
    target.modified();
    target.opacity_modified();
    target.finalize();
}
