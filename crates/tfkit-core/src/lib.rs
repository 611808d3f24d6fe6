//! tfkit Core — domain layer for transfer function editing.
//!
//! This crate contains the color/opacity curve store, the remapping
//! kernel (remap, reverse, transparency), lookup-table baking, and the
//! range-drag protocol used by chart layers. No GUI or rendering
//! framework dependencies.

pub mod config;
pub mod curve;
pub mod error;
pub mod events;
pub mod interaction;
pub mod lookup;
pub mod presets;
pub mod range;
pub mod remap;
pub mod shared;

// Re-exports for convenience.
pub use config::EditorConfig;
pub use curve::{ColorControlPoint, OpacityControlPoint, OpacityCurve, TransferFunction};
pub use error::{Result, TransferFunctionError};
pub use events::{CurveEvent, SubscriptionId};
pub use interaction::{PlotTransform, RangeController, RangeHandle};
pub use lookup::LookupTable;
pub use presets::PresetCatalog;
pub use range::Range;
pub use remap::{
    remap, remap_in_place, reverse, set_transparency, set_transparency_configured,
    set_transparency_with,
};
pub use shared::{SharedTransferFunction, TransferFunctionView};
