//! Named preset palettes offered to the user as starting curves.
//!
//! The catalog always starts with a "None" entry (no function). Every
//! function added is promoted so it carries an opacity curve.

use crate::config::EditorConfig;
use crate::curve::{ColorControlPoint, OpacityCurve, TransferFunction};
use crate::lookup::LookupTable;

/// Label of the leading "no function" entry.
pub const NONE_LABEL: &str = "None";

/// Ordered list of named transfer functions.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    entries: Vec<(String, Option<TransferFunction>)>,
    config: EditorConfig,
}

impl PresetCatalog {
    /// A catalog holding only the "None" entry.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            entries: vec![(NONE_LABEL.to_string(), None)],
            config,
        }
    }

    /// A catalog with the built-in palettes after the "None" entry.
    pub fn with_builtins(config: EditorConfig) -> Self {
        let mut catalog = Self::new(config);
        for (name, points) in builtin_palettes() {
            catalog.add(name, TransferFunction::from_points(points));
        }
        catalog
    }

    /// Append a named function, promoting it first. Returns its index.
    pub fn add(&mut self, name: impl Into<String>, function: TransferFunction) -> usize {
        let function = promote(function, &self.config);
        self.entries.push((name.into(), Some(function)));
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: the "None" entry is always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// The function at `index`. `None` for the "None" entry or a bad index.
    pub fn get(&self, index: usize) -> Option<&TransferFunction> {
        self.entries.get(index)?.1.as_ref()
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    /// A finalized working copy of the preset at `index`.
    pub fn instantiate(&self, index: usize) -> Option<TransferFunction> {
        let mut function = self.get(index)?.clone();
        function.set_table_size(self.config.lookup_table_size);
        function.finalize();
        Some(function)
    }

    /// 8-bit RGBA swatch of the preset at `index`, composited over the
    /// configured background. `palette_width` entries wide.
    pub fn swatch(&self, index: usize) -> Option<Vec<[u8; 4]>> {
        let function = self.get(index)?;
        let table = LookupTable::build(function, self.config.palette_width.max(2));
        let [br, bg, bb, _] = self.config.background_color;
        let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let swatch = table
            .entries()
            .iter()
            .map(|&[r, g, b, a]| {
                [
                    to_u8(a * r + (1.0 - a) * br),
                    to_u8(a * g + (1.0 - a) * bg),
                    to_u8(a * b + (1.0 - a) * bb),
                    255,
                ]
            })
            .collect();
        Some(swatch)
    }
}

/// Turn a color-only function into a full transfer function.
///
/// A function without an opacity curve gets the configured default ramp.
/// Opacity mapping is switched on either way.
pub fn promote(mut function: TransferFunction, config: &EditorConfig) -> TransferFunction {
    if function.opacity().is_none() {
        let [(x0, a0), (x1, a1)] = config.default_opacity_ramp;
        function.set_opacity(Some(OpacityCurve::ramp(x0, a0, x1, a1)));
    }
    function.set_opacity_mapping(true);
    function.set_table_size(config.lookup_table_size);
    function
}

fn builtin_palettes() -> Vec<(&'static str, Vec<ColorControlPoint>)> {
    vec![
        (
            "Grayscale",
            vec![
                ColorControlPoint::new(0.0, [0.0, 0.0, 0.0]),
                ColorControlPoint::new(255.0, [1.0, 1.0, 1.0]),
            ],
        ),
        (
            "Cool to Warm",
            vec![
                ColorControlPoint::new(0.0, [0.230, 0.299, 0.754]),
                ColorControlPoint::new(127.5, [0.865, 0.865, 0.865]),
                ColorControlPoint::new(255.0, [0.706, 0.016, 0.150]),
            ],
        ),
        (
            "Blue to Red",
            vec![
                ColorControlPoint::new(0.0, [0.0, 0.0, 1.0]),
                ColorControlPoint::new(255.0, [1.0, 0.0, 0.0]),
            ],
        ),
        (
            "Rainbow",
            vec![
                ColorControlPoint::new(0.0, [0.0, 0.0, 1.0]),
                ColorControlPoint::new(63.75, [0.0, 1.0, 1.0]),
                ColorControlPoint::new(127.5, [0.0, 1.0, 0.0]),
                ColorControlPoint::new(191.25, [1.0, 1.0, 0.0]),
                ColorControlPoint::new(255.0, [1.0, 0.0, 0.0]),
            ],
        ),
    ]
}
