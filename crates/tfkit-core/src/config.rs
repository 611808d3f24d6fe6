//! Editor configuration.
//!
//! Values that used to be process-wide defaults (background color,
//! palette width) live here and are handed to components explicitly.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransferFunctionError};
use crate::lookup::DEFAULT_TABLE_SIZE;
use crate::range::Range;
use crate::remap::{TRANSPARENCY_CEILING, TRANSPARENCY_FLOOR};

/// Default pixel tolerance when hit-testing range endpoints.
const DEFAULT_CATCH_WIDTH_PX: f64 = 5.0;
/// Default width, in entries, of a preset palette swatch.
const DEFAULT_PALETTE_WIDTH: usize = 256;
/// Default chart background (RGBA).
const DEFAULT_BACKGROUND: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

/// Environment variable overriding [`EditorConfig::catch_width_px`].
pub const CATCH_WIDTH_ENV: &str = "TFKIT_CATCH_WIDTH";
/// Environment variable overriding [`EditorConfig::lookup_table_size`].
pub const LUT_SIZE_ENV: &str = "TFKIT_LUT_SIZE";

/// Parsed override, or `default` when unset or unparsable.
fn parse_override<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

/// Runtime configuration for transfer function editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Half-width, in pixels, of the grab zone around a range endpoint.
    pub catch_width_px: f64,
    /// Samples in a finalized lookup table.
    pub lookup_table_size: usize,
    /// Lowest opacity left by transparency scaling.
    pub transparency_floor: f64,
    /// Highest opacity left by transparency scaling.
    pub transparency_ceiling: f64,
    /// `(position, opacity)` ramp attached when promoting a color-only curve.
    pub default_opacity_ramp: [(f64, f64); 2],
    /// Range used when a chart is given no function.
    pub empty_function_range: Range,
    /// Chart background color (RGBA).
    pub background_color: [f64; 4],
    /// Entries per preset palette swatch.
    pub palette_width: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            catch_width_px: parse_override(
                std::env::var(CATCH_WIDTH_ENV).ok(),
                DEFAULT_CATCH_WIDTH_PX,
            ),
            lookup_table_size: parse_override(std::env::var(LUT_SIZE_ENV).ok(), DEFAULT_TABLE_SIZE),
            transparency_floor: TRANSPARENCY_FLOOR,
            transparency_ceiling: TRANSPARENCY_CEILING,
            default_opacity_ramp: [(0.0, 0.0), (255.0, 1.0)],
            empty_function_range: Range::new(0.0, 255.0),
            background_color: DEFAULT_BACKGROUND,
            palette_width: DEFAULT_PALETTE_WIDTH,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !(self.catch_width_px.is_finite() && self.catch_width_px > 0.0) {
            return Err(TransferFunctionError::InvalidConfig(format!(
                "catch_width_px must be positive, got {}",
                self.catch_width_px
            )));
        }
        if self.lookup_table_size < 2 {
            return Err(TransferFunctionError::InvalidConfig(format!(
                "lookup_table_size must be at least 2, got {}",
                self.lookup_table_size
            )));
        }
        if !(self.transparency_floor > 0.0 && self.transparency_floor <= self.transparency_ceiling)
        {
            return Err(TransferFunctionError::InvalidConfig(format!(
                "transparency bounds must satisfy 0 < floor <= ceiling, got [{}, {}]",
                self.transparency_floor, self.transparency_ceiling
            )));
        }
        let range = self.empty_function_range;
        if !range.is_finite() || range.min >= range.max {
            return Err(TransferFunctionError::InvalidConfig(format!(
                "empty_function_range must be an increasing finite range, got [{}, {}]",
                range.min, range.max
            )));
        }
        if self.palette_width == 0 {
            return Err(TransferFunctionError::InvalidConfig(
                "palette_width must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
