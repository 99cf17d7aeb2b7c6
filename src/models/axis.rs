//! Axis (dimension) definitions.

use serde::{Deserialize, Serialize};

use super::RgbColor;

/// Lowest score on every axis scale.
pub const AXIS_MIN_VALUE: u8 = 1;

/// Highest score on an axis scale unless the definition overrides it.
pub const DEFAULT_AXIS_MAX_VALUE: u8 = 10;

/// One theoretical continuum along which readings are scored.
///
/// The `key` is the JSON object key in `axis_definitions.json` and doubles as
/// the dimension key in every reading's `dimensions` map. It is filled in by
/// the loader, so it is skipped when deserializing the definition body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisDefinition {
    /// Unique identifier, shared with `Reading::dimensions`
    #[serde(default, skip_deserializing)]
    pub key: String,
    /// Display name (e.g., "Culture vs. Power")
    pub name: String,
    /// Compact label used in hover text (e.g., "Culture/Power")
    pub short_name: String,
    /// What the axis measures, used as the scene axis title
    pub description: String,
    /// Label for the low end of the scale
    pub min_label: String,
    /// Label for the high end of the scale
    pub max_label: String,
    /// Explanation of the low end
    pub min_description: String,
    /// Explanation of the high end
    pub max_description: String,
    /// Accent color for the axis
    pub color: RgbColor,
    /// Top of the scale (bottom is always [`AXIS_MIN_VALUE`])
    #[serde(default = "default_max_value")]
    pub max_value: u8,
}

const fn default_max_value() -> u8 {
    DEFAULT_AXIS_MAX_VALUE
}

impl AxisDefinition {
    /// Returns true if `value` lies on this axis' scale.
    #[must_use]
    pub fn accepts(&self, value: u8) -> bool {
        (AXIS_MIN_VALUE..=self.max_value).contains(&value)
    }

    /// Fixed display range of the axis, independent of the plotted data.
    #[must_use]
    pub fn range(&self) -> [f64; 2] {
        [f64::from(AXIS_MIN_VALUE), f64::from(self.max_value)]
    }
}

/// The three axis keys mapped onto X, Y and Z.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisTriple {
    /// Key plotted on the X axis
    pub x: String,
    /// Key plotted on the Y axis
    pub y: String,
    /// Key plotted on the Z axis
    pub z: String,
}

impl AxisTriple {
    /// Creates a triple from three keys.
    pub fn new(x: impl Into<String>, y: impl Into<String>, z: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// Returns the key assigned to `slot`.
    #[must_use]
    pub fn get(&self, slot: AxisSlot) -> &str {
        match slot {
            AxisSlot::X => &self.x,
            AxisSlot::Y => &self.y,
            AxisSlot::Z => &self.z,
        }
    }

    /// Assigns `key` to `slot`.
    pub fn set(&mut self, slot: AxisSlot, key: impl Into<String>) {
        let key = key.into();
        match slot {
            AxisSlot::X => self.x = key,
            AxisSlot::Y => self.y = key,
            AxisSlot::Z => self.z = key,
        }
    }

    /// Iterates `(slot, key)` in X, Y, Z order.
    pub fn iter(&self) -> impl Iterator<Item = (AxisSlot, &str)> {
        AxisSlot::ALL.into_iter().map(|slot| (slot, self.get(slot)))
    }
}

/// One of the three plot axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSlot {
    /// Horizontal axis
    X,
    /// Vertical axis
    Y,
    /// Depth axis
    Z,
}

impl AxisSlot {
    /// All slots in display order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Uppercase label ("X", "Y", "Z").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }
}
