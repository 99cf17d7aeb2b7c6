//! Per-session UI selection: axes, filters, view preset, clicked point.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AxisSlot, AxisTriple, Reading};

/// Filter value used by the page for "no filter".
pub const FILTER_ALL: &str = "all";

/// A single dropdown filter: either everything or one exact value.
///
/// Serialized as a plain string so the page can bind it directly to a
/// `<select>`; `"all"` maps to [`Filter::All`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Filter {
    /// Matches every reading
    #[default]
    All,
    /// Matches readings whose field equals the value
    Only(String),
}

impl Filter {
    /// Returns true if `value` passes the filter.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl From<String> for Filter {
    fn from(value: String) -> Self {
        if value.is_empty() || value == FILTER_ALL {
            Self::All
        } else {
            Self::Only(value)
        }
    }
}

impl From<&str> for Filter {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Filter> for String {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::All => FILTER_ALL.to_string(),
            Filter::Only(value) => value,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(FILTER_ALL),
            Self::Only(value) => f.write_str(value),
        }
    }
}

/// Which reading field a filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Course section
    Section,
    /// Thematic category
    Category,
    /// Author list
    Author,
}

impl FilterKind {
    /// Reads the field this filter kind applies to.
    #[must_use]
    pub fn field(self, reading: &Reading) -> &str {
        match self {
            Self::Section => &reading.section,
            Self::Category => &reading.category,
            Self::Author => &reading.author,
        }
    }
}

/// The active filter set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    /// Course section filter
    pub section: Filter,
    /// Category filter
    pub category: Filter,
    /// Author filter
    pub author: Filter,
}

impl Filters {
    /// Returns the filter for `kind`.
    #[must_use]
    pub fn get(&self, kind: FilterKind) -> &Filter {
        match kind {
            FilterKind::Section => &self.section,
            FilterKind::Category => &self.category,
            FilterKind::Author => &self.author,
        }
    }

    /// Replaces the filter for `kind`.
    pub fn set(&mut self, kind: FilterKind, filter: Filter) {
        match kind {
            FilterKind::Section => self.section = filter,
            FilterKind::Category => self.category = filter,
            FilterKind::Author => self.author = filter,
        }
    }

    /// Returns true if `reading` passes every filter.
    #[must_use]
    pub fn matches(&self, reading: &Reading) -> bool {
        self.section.matches(&reading.section)
            && self.category.matches(&reading.category)
            && self.author.matches(&reading.author)
    }
}

/// Camera position of the 3D scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vec3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vec3 {
    /// Creates a vector.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Fixed camera shortcuts offered next to the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewPreset {
    /// Top view onto the XY plane
    #[serde(rename = "xy")]
    Xy,
    /// Front view onto the XZ plane
    #[serde(rename = "xz")]
    Xz,
    /// Side view onto the YZ plane
    #[serde(rename = "yz")]
    Yz,
    /// Default perspective view
    #[default]
    #[serde(rename = "3d")]
    Perspective,
}

impl ViewPreset {
    /// All presets in button order.
    pub const ALL: [Self; 4] = [Self::Xy, Self::Xz, Self::Yz, Self::Perspective];

    /// Camera eye position for the preset (the camera always looks at the origin).
    #[must_use]
    pub const fn eye(self) -> Vec3 {
        match self {
            Self::Xy => Vec3::new(0.0, 0.0, 2.5),
            Self::Xz => Vec3::new(0.0, -2.5, 0.0),
            Self::Yz => Vec3::new(2.5, 0.0, 0.0),
            Self::Perspective => Vec3::new(1.5, 1.5, 1.3),
        }
    }

    /// The axis pointing at the camera in a planar view.
    #[must_use]
    pub const fn hidden_slot(self) -> Option<AxisSlot> {
        match self {
            Self::Xy => Some(AxisSlot::Z),
            Self::Xz => Some(AxisSlot::Y),
            Self::Yz => Some(AxisSlot::X),
            Self::Perspective => None,
        }
    }

    /// Button caption.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Xy => "XY View (Top)",
            Self::Xz => "XZ View (Front)",
            Self::Yz => "YZ View (Side)",
            Self::Perspective => "3D View (Default)",
        }
    }

    /// Wire name ("xy", "xz", "yz", "3d").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xy => "xy",
            Self::Xz => "xz",
            Self::Yz => "yz",
            Self::Perspective => "3d",
        }
    }
}

/// Everything the page has chosen for one browser session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    /// Axis keys for X, Y and Z
    #[serde(flatten)]
    pub axes: AxisTriple,
    /// Active filters
    #[serde(flatten)]
    pub filters: Filters,
    /// Camera preset
    #[serde(default)]
    pub view: ViewPreset,
    /// Index of the clicked reading, if any
    #[serde(default)]
    pub selected: Option<usize>,
    /// Bumped on every preset button press so the chart drops any manual
    /// rotation, even when the same preset is pressed again
    #[serde(default)]
    pub camera_revision: u32,
}

impl Selection {
    /// Unfiltered selection on `axes` with the default camera and no clicked point.
    #[must_use]
    pub fn new(axes: AxisTriple) -> Self {
        Self {
            axes,
            filters: Filters::default(),
            view: ViewPreset::default(),
            selected: None,
            camera_revision: 0,
        }
    }
}
