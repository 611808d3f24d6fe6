//! Finalized lookup table — uniform samples of a transfer function.
//!
//! Rendering layers map scalars through this table instead of walking the
//! control points. When the function is discretized, samples collapse
//! into `number_of_values` flat bands.

use palette::Srgb;

use crate::curve::function::TransferFunction;
use crate::curve::interpolate::CurveSampler;
use crate::range::Range;

/// Samples per table unless configured otherwise.
pub const DEFAULT_TABLE_SIZE: usize = 256;

/// Uniformly sampled RGBA table over a function's range.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    range: Range,
    entries: Vec<[f64; 4]>,
    nan_color: [f64; 4],
}

impl LookupTable {
    /// Sample `function` at `size` evenly spaced positions across its range.
    pub fn build(function: &TransferFunction, size: usize) -> Self {
        let size = size.max(2);
        let range = function.range();
        let sampler = CurveSampler::new(function);
        let bands = function.discretize().then(|| function.number_of_values().max(1));

        let entries = (0..size)
            .map(|i| {
                let t = i as f64 / (size - 1) as f64;
                let t = match bands {
                    Some(n) => band_center(t, n),
                    None => t,
                };
                sampler.rgba(range.denormalize(t))
            })
            .collect();

        Self {
            range,
            entries,
            nan_color: function.nan_color(),
        }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[[f64; 4]] {
        &self.entries
    }

    /// Nearest-entry RGBA for `x`. Values outside the range clamp to the
    /// end entries; NaN maps to the NaN color.
    pub fn map(&self, x: f64) -> [f64; 4] {
        if x.is_nan() {
            return self.nan_color;
        }
        let last = self.entries.len() - 1;
        let t = if self.range.is_degenerate() {
            0.0
        } else {
            ((x - self.range.min) / self.range.width()).clamp(0.0, 1.0)
        };
        self.entries[(t * last as f64).round() as usize]
    }

    /// Entries encoded as 8-bit RGBA for texture upload.
    pub fn to_rgba8(&self) -> Vec<[u8; 4]> {
        self.entries.iter().map(|rgba| encode_rgba8(*rgba)).collect()
    }
}

/// Normalized position of the band containing `t`, sampled at its center.
fn band_center(t: f64, bands: usize) -> f64 {
    let n = bands as f64;
    let band = (t * n).floor().min(n - 1.0);
    (band + 0.5) / n
}

fn encode_rgba8([r, g, b, a]: [f64; 4]) -> [u8; 4] {
    let rgb: Srgb<u8> = Srgb::new(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
        .into_format();
    let alpha = (a.clamp(0.0, 1.0) * 255.0).round() as u8;
    [rgb.red, rgb.green, rgb.blue, alpha]
}
