//! Data models for readings, axes and the per-session selection.

pub mod axis;
pub mod reading;
pub mod rgb;
pub mod selection;

pub use axis::{AxisDefinition, AxisSlot, AxisTriple, AXIS_MIN_VALUE, DEFAULT_AXIS_MAX_VALUE};
pub use reading::Reading;
pub use rgb::RgbColor;
pub use selection::{Filter, FilterKind, Filters, Selection, Vec3, ViewPreset, FILTER_ALL};
