//! The transfer function: color curve, optional opacity curve, and the
//! derived lookup table.
//!
//! A `TransferFunction` is the single owned curve store of an editing
//! session. Mutators notify subscribers; derived state (the lookup table)
//! is rebuilt by [`TransferFunction::finalize`].

use serde::{Deserialize, Serialize};

use crate::curve::interpolate::CurveSampler;
use crate::curve::opacity::{OpacityCurve, position_range};
use crate::curve::point::ColorControlPoint;
use crate::error::{Result, TransferFunctionError};
use crate::events::{CurveEvent, Observers, SubscriptionId};
use crate::lookup::{DEFAULT_TABLE_SIZE, LookupTable};
use crate::range::Range;

/// Color used for NaN scalars when none is configured.
const DEFAULT_NAN_COLOR: [f64; 4] = [0.5, 0.0, 0.0, 1.0];
/// Number of flat bands when discretization is switched on.
const DEFAULT_NUMBER_OF_VALUES: usize = 256;

fn default_table_size() -> usize {
    DEFAULT_TABLE_SIZE
}

fn default_stale() -> bool {
    true
}

fn default_number_of_values() -> usize {
    DEFAULT_NUMBER_OF_VALUES
}

/// Maps scalar data values to color and opacity through control points.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransferFunction {
    points: Vec<ColorControlPoint>,
    opacity: Option<OpacityCurve>,
    /// Whether the opacity curve contributes to mapped alpha.
    #[serde(default)]
    opacity_mapping: bool,
    #[serde(default)]
    discretize: bool,
    #[serde(default = "default_number_of_values")]
    number_of_values: usize,
    nan_color: [f64; 4],
    #[serde(default = "default_table_size")]
    table_size: usize,

    #[serde(skip)]
    revision: u64,
    #[serde(skip)]
    lookup: Option<LookupTable>,
    #[serde(skip, default = "default_stale")]
    stale: bool,
    #[serde(skip)]
    observers: Observers,
}

impl Default for TransferFunction {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            opacity: None,
            opacity_mapping: false,
            discretize: false,
            number_of_values: DEFAULT_NUMBER_OF_VALUES,
            nan_color: DEFAULT_NAN_COLOR,
            table_size: DEFAULT_TABLE_SIZE,
            revision: 0,
            lookup: None,
            stale: true,
            observers: Observers::default(),
        }
    }
}

impl Clone for TransferFunction {
    /// Clones the curve data. Subscribers stay with the original.
    fn clone(&self) -> Self {
        Self {
            points: self.points.clone(),
            opacity: self.opacity.clone(),
            opacity_mapping: self.opacity_mapping,
            discretize: self.discretize,
            number_of_values: self.number_of_values,
            nan_color: self.nan_color,
            table_size: self.table_size,
            revision: self.revision,
            lookup: self.lookup.clone(),
            stale: self.stale,
            observers: Observers::default(),
        }
    }
}

impl TransferFunction {
    /// An empty function without an opacity curve.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<ColorControlPoint>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Attach `opacity` and enable opacity mapping.
    pub fn with_opacity(mut self, opacity: OpacityCurve) -> Self {
        self.opacity = Some(opacity);
        self.opacity_mapping = true;
        self
    }

    // ── Color points ────────────────────────────────────────────

    pub fn size(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ColorControlPoint] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut [ColorControlPoint] {
        &mut self.points
    }

    /// Swap in a whole new point sequence without notifying.
    pub(crate) fn replace_points(&mut self, points: Vec<ColorControlPoint>) {
        self.points = points;
    }

    pub fn point(&self, index: usize) -> Result<ColorControlPoint> {
        self.points
            .get(index)
            .copied()
            .ok_or(TransferFunctionError::PointOutOfBounds {
                index,
                len: self.points.len(),
            })
    }

    pub fn set_point(&mut self, index: usize, point: ColorControlPoint) -> Result<()> {
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or(TransferFunctionError::PointOutOfBounds { index, len })?;
        *slot = point;
        self.modified();
        Ok(())
    }

    /// Append a point at the end of the sequence. No re-sorting.
    pub fn add_point(&mut self, point: ColorControlPoint) {
        self.points.push(point);
        self.modified();
    }

    /// Append `(x, r, g, b)` with default midpoint and sharpness.
    pub fn add_rgb_point(&mut self, x: f64, r: f64, g: f64, b: f64) {
        self.add_point(ColorControlPoint::new(x, [r, g, b]));
    }

    pub fn remove_all_points(&mut self) {
        self.points.clear();
        self.modified();
    }

    /// Min/max over color point positions. `(0, 0)` when empty.
    pub fn range(&self) -> Range {
        position_range(self.points.iter().map(|p| p.position))
    }

    // ── Opacity ─────────────────────────────────────────────────

    pub fn opacity(&self) -> Option<&OpacityCurve> {
        self.opacity.as_ref()
    }

    /// Mutable access to the opacity curve. Call
    /// [`TransferFunction::opacity_modified`] after editing.
    pub fn opacity_mut(&mut self) -> Option<&mut OpacityCurve> {
        self.opacity.as_mut()
    }

    pub fn set_opacity(&mut self, opacity: Option<OpacityCurve>) {
        self.opacity = opacity;
        self.opacity_modified();
    }

    /// The opacity curve, creating an empty one if none is attached.
    pub fn ensure_opacity(&mut self) -> &mut OpacityCurve {
        self.opacity.get_or_insert_with(OpacityCurve::new)
    }

    pub fn opacity_mapping(&self) -> bool {
        self.opacity_mapping
    }

    pub fn set_opacity_mapping(&mut self, enabled: bool) {
        if self.opacity_mapping != enabled {
            self.opacity_mapping = enabled;
            self.opacity_modified();
        }
    }

    // ── Table options ───────────────────────────────────────────

    pub fn discretize(&self) -> bool {
        self.discretize
    }

    pub fn set_discretize(&mut self, enabled: bool) {
        if self.discretize != enabled {
            self.discretize = enabled;
            self.modified();
        }
    }

    pub fn number_of_values(&self) -> usize {
        self.number_of_values
    }

    /// Band count used when discretizing. At least one.
    pub fn set_number_of_values(&mut self, count: usize) {
        let count = count.max(1);
        if self.number_of_values != count {
            self.number_of_values = count;
            self.modified();
        }
    }

    pub fn nan_color(&self) -> [f64; 4] {
        self.nan_color
    }

    pub fn set_nan_color(&mut self, rgba: [f64; 4]) {
        self.nan_color = rgba;
        self.modified();
    }

    pub fn table_size(&self) -> usize {
        self.table_size
    }

    /// Number of samples in the finalized lookup table. At least two.
    pub fn set_table_size(&mut self, size: usize) {
        self.table_size = size.max(2);
        self.stale = true;
    }

    // ── Derived state ───────────────────────────────────────────

    /// Rebuild the lookup table from the current points.
    ///
    /// Required after wholesale point replacement (e.g. after a remap)
    /// before the table is used for mapping.
    pub fn finalize(&mut self) {
        let table = LookupTable::build(self, self.table_size);
        tracing::trace!(
            "lookup table rebuilt: {} entries over [{}, {}]",
            table.len(),
            table.range().min,
            table.range().max
        );
        self.lookup = Some(table);
        self.stale = false;
        self.observers.emit(CurveEvent::Rebuilt);
    }

    /// The last finalized table, if any. May be stale; see [`Self::is_stale`].
    pub fn lookup_table(&self) -> Option<&LookupTable> {
        self.lookup.as_ref()
    }

    /// `true` when points changed since the last [`Self::finalize`].
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Exact RGBA for scalar `x`, evaluated from the control points.
    ///
    /// NaN maps to the NaN color.
    pub fn map_value(&self, x: f64) -> [f64; 4] {
        if x.is_nan() {
            return self.nan_color;
        }
        CurveSampler::new(self).rgba(x)
    }

    // ── Change tracking ─────────────────────────────────────────

    /// Monotonic counter bumped by every modification.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Mark the color curve changed: invalidates the lookup table and
    /// notifies subscribers with [`CurveEvent::PointsChanged`].
    pub fn modified(&mut self) {
        self.touch(CurveEvent::PointsChanged);
    }

    /// Mark the opacity curve changed; notifies with [`CurveEvent::OpacityChanged`].
    pub fn opacity_modified(&mut self) {
        self.touch(CurveEvent::OpacityChanged);
    }

    fn touch(&mut self, event: CurveEvent) {
        self.revision += 1;
        self.stale = true;
        self.observers.emit(event);
    }

    /// Deliver an interaction-layer event without changing the curve.
    pub fn notify(&mut self, event: CurveEvent) {
        self.observers.emit(event);
    }

    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&CurveEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Take over the subscribers of `previous`, dropping any of our own.
    pub(crate) fn adopt_subscribers(&mut self, previous: TransferFunction) {
        self.observers = previous.observers;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn blue_to_red() -> TransferFunction {
        let mut ctf = TransferFunction::new();
        ctf.add_rgb_point(0.0, 0.0, 0.0, 1.0);
        ctf.add_rgb_point(255.0, 1.0, 0.0, 0.0);
        ctf
    }

    #[test]
    fn test_range_tracks_min_max_position() {
        let ctf = blue_to_red();
        assert_eq!(ctf.range(), Range::new(0.0, 255.0));
        assert_eq!(TransferFunction::new().range(), Range::new(0.0, 0.0));
    }

    #[test]
    fn test_mutators_bump_revision_and_mark_stale() {
        let mut ctf = blue_to_red();
        ctf.finalize();
        assert!(!ctf.is_stale());
        let rev = ctf.revision();
        ctf.set_point(0, ColorControlPoint::new(1.0, [0.0, 1.0, 0.0]))
            .unwrap();
        assert!(ctf.revision() > rev);
        assert!(ctf.is_stale());
    }

    #[test]
    fn test_subscribers_see_events_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut ctf = blue_to_red();
        {
            let log = Arc::clone(&log);
            ctf.subscribe(move |event| log.lock().unwrap().push(*event));
        }
        ctf.add_rgb_point(128.0, 0.0, 1.0, 0.0);
        ctf.finalize();
        ctf.set_opacity(Some(OpacityCurve::ramp(0.0, 0.0, 255.0, 1.0)));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                CurveEvent::PointsChanged,
                CurveEvent::Rebuilt,
                CurveEvent::OpacityChanged
            ]
        );
    }

    #[test]
    fn test_ensure_opacity_creates_empty_curve_once() {
        let mut ctf = blue_to_red();
        assert!(ctf.opacity().is_none());
        ctf.ensure_opacity().add(0.0, 0.25);
        assert_eq!(ctf.ensure_opacity().size(), 1);
    }

    #[test]
    fn test_map_value_uses_opacity_only_when_mapping_enabled() {
        let mut ctf = blue_to_red();
        ctf.set_opacity(Some(OpacityCurve::ramp(0.0, 0.0, 255.0, 1.0)));
        assert_eq!(ctf.map_value(0.0)[3], 1.0);
        ctf.set_opacity_mapping(true);
        assert_eq!(ctf.map_value(0.0)[3], 0.0);
        assert_eq!(ctf.map_value(f64::NAN), ctf.nan_color());
    }

    #[test]
    fn test_clone_does_not_carry_subscribers() {
        let mut ctf = blue_to_red();
        ctf.subscribe(|_| {});
        let copy = ctf.clone();
        assert_eq!(copy.observers.len(), 0);
        assert_eq!(copy.points(), ctf.points());
    }

    #[test]
    fn test_serde_roundtrip_keeps_points_and_options() {
        let mut ctf = blue_to_red().with_opacity(OpacityCurve::ramp(0.0, 0.0, 255.0, 1.0));
        ctf.set_discretize(true);
        ctf.set_number_of_values(8);
        let json = serde_json::to_string(&ctf).unwrap();
        let back: TransferFunction = serde_json::from_str(&json).unwrap();
        assert_eq!(back.points(), ctf.points());
        assert_eq!(back.opacity(), ctf.opacity());
        assert!(back.discretize());
        assert_eq!(back.number_of_values(), 8);
        assert!(back.is_stale());
        assert!(back.lookup_table().is_none());
    }
}
