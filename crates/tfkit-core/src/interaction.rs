//! Range-drag protocol between a chart and its transfer function.
//!
//! A chart shows two markers for the current range inside the fixed data
//! range. Pressing near a marker grabs it; dragging moves it (clamped to
//! the data range, never crossing the other marker) and re-times the
//! function onto the new window; releasing drops it.
//!
//! ```text
//!  data.min      current.min           current.max      data.max
//!     |-------------[#]====================[#]--------------|
//!                   ^ grab zone: [px − catch, px + catch)
//! ```
//!
//! Pointer dispatch and painting stay with the chart; this module only
//! holds the range state and calls the remapper.

use glam::{DAffine2, DVec2};

use crate::config::EditorConfig;
use crate::curve::TransferFunction;
use crate::error::{Result, TransferFunctionError};
use crate::events::CurveEvent;
use crate::range::Range;
use crate::remap::remap_in_place;

/// Which range endpoint, if any, is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeHandle {
    #[default]
    None,
    Min,
    Max,
}

/// Affine mapping between data-space x and pixel-space x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotTransform {
    to_pixel: DAffine2,
    to_data: DAffine2,
}

impl PlotTransform {
    /// Map `data_span` onto the pixel interval starting at `pixel_left`
    /// and `pixel_width` pixels wide.
    pub fn new(data_span: Range, pixel_left: f64, pixel_width: f64) -> Result<Self> {
        data_span.check_normalizable()?;
        if !(pixel_width.is_finite() && pixel_width > 0.0) || !pixel_left.is_finite() {
            return Err(TransferFunctionError::NonFiniteValue("plot pixel extent"));
        }
        let scale = pixel_width / data_span.width();
        let to_pixel = DAffine2::from_translation(DVec2::new(pixel_left, 0.0))
            * DAffine2::from_scale(DVec2::new(scale, 1.0))
            * DAffine2::from_translation(DVec2::new(-data_span.min, 0.0));
        Ok(Self {
            to_pixel,
            to_data: to_pixel.inverse(),
        })
    }

    /// Wrap an existing data-to-pixel transform. It must be invertible.
    pub fn from_affine(to_pixel: DAffine2) -> Result<Self> {
        let to_data = to_pixel.inverse();
        if !to_data.is_finite() {
            return Err(TransferFunctionError::NonFiniteValue("plot transform inverse"));
        }
        Ok(Self { to_pixel, to_data })
    }

    pub fn to_pixel(&self, x: f64) -> f64 {
        self.to_pixel.transform_point2(DVec2::new(x, 0.0)).x
    }

    pub fn to_data(&self, pixel_x: f64) -> f64 {
        self.to_data.transform_point2(DVec2::new(pixel_x, 0.0)).x
    }
}

/// Current-range state of one chart plus the selected control point.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeController {
    data_range: Range,
    current_range: Range,
    moving: RangeHandle,
    catch_width_px: f64,
    empty_range: Range,
    current_point: Option<usize>,
}

impl Default for RangeController {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl RangeController {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            data_range: config.empty_function_range,
            current_range: config.empty_function_range,
            moving: RangeHandle::None,
            catch_width_px: config.catch_width_px,
            empty_range: config.empty_function_range,
            current_point: None,
        }
    }

    /// Start a session over `data_range`; the current range resets to it.
    pub fn attach(&mut self, data_range: Range) {
        self.data_range = data_range;
        self.current_range = data_range;
        self.moving = RangeHandle::None;
        self.current_point = None;
        tracing::debug!(
            "range controller attached: data range [{}, {}]",
            data_range.min,
            data_range.max
        );
    }

    /// Start a session over the function's own range, or the configured
    /// empty range when there is no function.
    pub fn attach_function(&mut self, function: Option<&TransferFunction>) {
        let range = function.map_or(self.empty_range, TransferFunction::range);
        self.attach(range);
    }

    pub fn data_range(&self) -> Range {
        self.data_range
    }

    pub fn current_range(&self) -> Range {
        self.current_range
    }

    pub fn moving(&self) -> RangeHandle {
        self.moving
    }

    pub fn catch_width_px(&self) -> f64 {
        self.catch_width_px
    }

    // ── Drag protocol ───────────────────────────────────────────

    /// Pointer pressed at `pixel_x`. Grabs the endpoint whose marker lies
    /// within the catch width; the min endpoint wins when both do.
    pub fn press(&mut self, pixel_x: f64, transform: &PlotTransform) -> RangeHandle {
        if self.moving != RangeHandle::None {
            return self.moving;
        }
        let catch = self.catch_width_px;
        let in_zone = |marker: f64| {
            let px = transform.to_pixel(marker);
            pixel_x >= px - catch && pixel_x < px + catch
        };
        self.moving = if in_zone(self.current_range.min) {
            RangeHandle::Min
        } else if in_zone(self.current_range.max) {
            RangeHandle::Max
        } else {
            RangeHandle::None
        };
        if self.moving != RangeHandle::None {
            tracing::debug!("grabbed {:?} range marker at x={pixel_x}", self.moving);
        }
        self.moving
    }

    /// Pointer dragged to `pixel_x` while an endpoint is held.
    ///
    /// The candidate value is clamped to the data range and may not cross
    /// the other endpoint; the function, if any, is then re-timed onto the
    /// updated current range.
    pub fn drag_to(
        &mut self,
        pixel_x: f64,
        transform: &PlotTransform,
        function: Option<&mut TransferFunction>,
    ) -> Result<()> {
        let value = transform.to_data(pixel_x);
        let mut candidate = self.current_range;
        match self.moving {
            RangeHandle::None => return Ok(()),
            RangeHandle::Min => {
                if value < self.data_range.min {
                    candidate.min = self.data_range.min;
                } else if value < candidate.max {
                    candidate.min = value;
                }
            }
            RangeHandle::Max => {
                if value > self.data_range.max {
                    candidate.max = self.data_range.max;
                } else if value > candidate.min {
                    candidate.max = value;
                }
            }
        }
        tracing::trace!(
            "drag {:?} to {value}: candidate range [{}, {}]",
            self.moving,
            candidate.min,
            candidate.max
        );
        self.commit(candidate, function)
    }

    /// Pointer released: drop whichever endpoint was held.
    pub fn release(&mut self) {
        self.moving = RangeHandle::None;
    }

    // ── Direct range edits ──────────────────────────────────────

    /// Set the current range from typed-in bounds.
    ///
    /// Both bounds are clamped into the data range and only applied when
    /// `min < max`. The function is re-timed onto the current range
    /// either way.
    pub fn set_current_range(
        &mut self,
        min: f64,
        max: f64,
        function: Option<&mut TransferFunction>,
    ) -> Result<()> {
        let min = self.data_range.clamp(min);
        let max = self.data_range.clamp(max);
        let candidate = if min < max {
            Range::new(min, max)
        } else {
            tracing::debug!("rejected current range [{min}, {max}]: min must be below max");
            self.current_range
        };
        self.commit(candidate, function)
    }

    /// Restore the current range to the full data range.
    pub fn reset_range(&mut self, function: Option<&mut TransferFunction>) -> Result<()> {
        let Range { min, max } = self.data_range;
        self.set_current_range(min, max, function)
    }

    /// Slide the current window, keeping its width, so it centers on
    /// `center` as far as the data range allows.
    pub fn center_range(
        &mut self,
        center: f64,
        function: Option<&mut TransferFunction>,
    ) -> Result<()> {
        let half = self.current_range.width() / 2.0;
        let allowed = Range::new(self.data_range.min + half, self.data_range.max - half);
        let center = allowed.clamp(center);
        let new_min = center - half;
        let new_max = new_min + 2.0 * half;
        self.set_current_range(new_min, new_max, function)
    }

    /// Re-time the function onto `candidate`, then adopt it as the current
    /// range. On error the current range is left as it was.
    fn commit(&mut self, candidate: Range, function: Option<&mut TransferFunction>) -> Result<()> {
        if let Some(function) = function {
            remap_in_place(function, candidate.min, candidate.max)?;
            function.notify(CurveEvent::RangeChanged {
                min: candidate.min,
                max: candidate.max,
            });
        }
        self.current_range = candidate;
        Ok(())
    }

    // ── Current control point ───────────────────────────────────

    pub fn current_point(&self) -> Option<usize> {
        self.current_point
    }

    /// Select a control point (or clear the selection) and tell subscribers.
    pub fn set_current_point(&mut self, index: Option<usize>, function: &mut TransferFunction) {
        if self.current_point != index {
            self.current_point = index;
            function.notify(CurveEvent::CurrentPointChanged(index));
        }
    }

    /// RGB of the selected control point, if there is a valid selection.
    pub fn current_point_color(&self, function: &TransferFunction) -> Option<[f64; 3]> {
        let index = self.current_point?;
        function.point(index).ok().map(|p| p.color)
    }

    /// Recolor the selected control point. No-op without a selection.
    pub fn set_current_point_color(
        &self,
        function: &mut TransferFunction,
        rgb: [f64; 3],
    ) -> Result<()> {
        let Some(index) = self.current_point else {
            return Ok(());
        };
        let mut point = function.point(index)?;
        point.color = rgb;
        function.set_point(index, point)
    }
}
