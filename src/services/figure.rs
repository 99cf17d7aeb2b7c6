//! 3D scatter figure construction.
//!
//! Output serializes to the `{data, layout}` shape Plotly.js expects, so the
//! page can hand it straight to `Plotly.react`. Building a figure is a pure
//! function of the dataset and the request.

use anyhow::{Context, Result};
use serde::Serialize;

use super::Dataset;
use crate::models::{
    AxisDefinition, AxisSlot, AxisTriple, Filters, Reading, Selection, Vec3, ViewPreset,
    AXIS_MIN_VALUE,
};

/// Title shown when the filters leave nothing to plot.
pub const EMPTY_FIGURE_TITLE: &str = "No readings match the selected filters";

/// Marker colors assigned to categories, by the category's sorted position.
pub const CATEGORY_PALETTE: [&str; 10] = [
    "#FF6B6B", "#06B6D4", "#2A73FF", "#2ACC88", "#FFD93D", "#A78BFA", "#F97316", "#EC4899",
    "#10B981", "#8B5CF6",
];

const FALLBACK_COLOR: &str = "#999999";
const INK: &str = "#191F3C";
const GRID: &str = "#EAEEF5";

// ============================================================================
// Request
// ============================================================================

/// Inputs that determine a figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureRequest {
    /// Axis keys for X, Y and Z
    pub axes: AxisTriple,
    /// Active filters
    pub filters: Filters,
    /// Camera preset
    pub view: ViewPreset,
    /// Preset press counter; part of the chart's `uirevision`
    pub camera_revision: u32,
}

impl FigureRequest {
    /// Unfiltered 3D request on `axes`.
    #[must_use]
    pub fn new(axes: AxisTriple) -> Self {
        Self {
            axes,
            filters: Filters::default(),
            view: ViewPreset::default(),
            camera_revision: 0,
        }
    }
}

impl From<&Selection> for FigureRequest {
    fn from(selection: &Selection) -> Self {
        Self {
            axes: selection.axes.clone(),
            filters: selection.filters.clone(),
            view: selection.view,
            camera_revision: selection.camera_revision,
        }
    }
}

// ============================================================================
// Figure Types
// ============================================================================

/// One plotted reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotPoint {
    /// Index of the reading in the dataset
    pub reading: usize,
    /// X coordinate
    pub x: u8,
    /// Y coordinate
    pub y: u8,
    /// Z coordinate
    pub z: u8,
    /// Category (selects the trace)
    pub category: String,
    /// HTML hover label
    pub hover: String,
}

/// Complete figure: Plotly traces and layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// One marker trace per category
    pub data: Vec<Trace>,
    /// Scene, title and legend
    pub layout: Layout,
    #[serde(skip)]
    points: Vec<PlotPoint>,
}

impl Figure {
    /// Plotted readings in dataset order.
    #[must_use]
    pub fn points(&self) -> &[PlotPoint] {
        &self.points
    }

    /// Returns true if no reading survived the filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A `scatter3d` marker trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    /// Plotly trace type
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Drawing mode
    pub mode: &'static str,
    /// Legend entry (the category)
    pub name: String,
    /// X coordinates
    pub x: Vec<u8>,
    /// Y coordinates
    pub y: Vec<u8>,
    /// Z coordinates
    pub z: Vec<u8>,
    /// Reading titles
    pub text: Vec<String>,
    /// Hover labels
    pub hovertext: Vec<String>,
    /// Which hover fields Plotly shows
    pub hoverinfo: &'static str,
    /// Reading indices, echoed back by click events
    pub customdata: Vec<usize>,
    /// Marker style
    pub marker: Marker,
}

/// Marker style for a trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Marker diameter in pixels
    pub size: u8,
    /// Fill color
    pub color: String,
    /// Fill opacity
    pub opacity: f64,
    /// Outline
    pub line: MarkerLine,
}

/// Marker outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLine {
    /// Outline width
    pub width: f64,
    /// Outline color
    pub color: &'static str,
}

/// Figure layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Figure title
    pub title: Title,
    /// 3D scene
    pub scene: Scene,
    /// Background outside the scene
    pub paper_bgcolor: &'static str,
    /// Hover behavior
    pub hovermode: &'static str,
    /// Whether the category legend is drawn
    pub showlegend: bool,
    /// Legend placement
    pub legend: Legend,
    /// Figure height in pixels
    pub height: u32,
    /// Outer margins
    pub margin: Margin,
    /// Keeps user camera changes until a preset button is pressed
    pub uirevision: String,
}

/// Text with font settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    /// Title text (may contain Plotly's HTML subset)
    pub text: String,
    /// Font settings
    pub font: Font,
    /// Horizontal position, if not default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Horizontal anchor, if not default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xanchor: Option<&'static str>,
}

/// Font settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    /// Point size
    pub size: u8,
    /// Text color
    pub color: &'static str,
}

/// The 3D scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// X axis
    pub xaxis: SceneAxis,
    /// Y axis
    pub yaxis: SceneAxis,
    /// Z axis
    pub zaxis: SceneAxis,
    /// Camera placement
    pub camera: Camera,
    /// Scene background
    pub bgcolor: &'static str,
}

impl Scene {
    /// Returns the scene axis for `slot`.
    #[must_use]
    pub fn axis(&self, slot: AxisSlot) -> &SceneAxis {
        match slot {
            AxisSlot::X => &self.xaxis,
            AxisSlot::Y => &self.yaxis,
            AxisSlot::Z => &self.zaxis,
        }
    }
}

/// One scene axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneAxis {
    /// Axis title
    pub title: Title,
    /// Fixed display range
    pub range: [f64; 2],
    /// Hidden for the axis facing the camera in planar views
    pub visible: bool,
    /// Grid color
    pub gridcolor: &'static str,
    /// Whether the grid is drawn
    pub showgrid: bool,
    /// Whether the zero line is drawn
    pub zeroline: bool,
    /// Axis plane color
    pub backgroundcolor: &'static str,
    /// Axis line and tick color (the axis accent)
    pub color: String,
}

/// Scene camera.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Camera {
    /// Eye position
    pub eye: Vec3,
    /// Look-at point
    pub center: Vec3,
}

/// Legend placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    /// Legend heading
    pub title: Title,
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Background color
    pub bgcolor: &'static str,
    /// Border color
    pub bordercolor: &'static str,
    /// Border width
    pub borderwidth: u8,
}

/// Outer margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margin {
    /// Left
    pub l: u32,
    /// Right
    pub r: u32,
    /// Top
    pub t: u32,
    /// Bottom
    pub b: u32,
}

// ============================================================================
// Builder
// ============================================================================

/// Builds the scatter figure for `request`.
///
/// Readings pass when every filter matches; they are plotted at their scores
/// on the three requested axes. Using the same key on several axes is valid
/// and collapses the points onto a plane or line.
///
/// # Errors
///
/// Returns an error if any requested axis key is not defined in the dataset.
pub fn build_figure(dataset: &Dataset, request: &FigureRequest) -> Result<Figure> {
    let x_axis = resolve_axis(dataset, &request.axes.x)?;
    let y_axis = resolve_axis(dataset, &request.axes.y)?;
    let z_axis = resolve_axis(dataset, &request.axes.z)?;

    let mut points = Vec::new();
    for (index, reading) in dataset.readings().iter().enumerate() {
        if !request.filters.matches(reading) {
            continue;
        }
        points.push(PlotPoint {
            reading: index,
            x: score(reading, x_axis)?,
            y: score(reading, y_axis)?,
            z: score(reading, z_axis)?,
            category: reading.category.clone(),
            hover: hover_text(reading, [x_axis, y_axis, z_axis]),
        });
    }

    let data = group_traces(dataset, &points);

    let title = if points.is_empty() {
        EMPTY_FIGURE_TITLE.to_string()
    } else {
        format!(
            "Institutional Economics Readings: {} × {} × {}",
            escape_html(&x_axis.name),
            escape_html(&y_axis.name),
            escape_html(&z_axis.name)
        )
    };

    let hidden = request.view.hidden_slot();
    let layout = Layout {
        title: Title {
            text: title,
            font: Font {
                size: 18,
                color: INK,
            },
            x: Some(0.5),
            xanchor: Some("center"),
        },
        scene: Scene {
            xaxis: scene_axis(x_axis, hidden != Some(AxisSlot::X)),
            yaxis: scene_axis(y_axis, hidden != Some(AxisSlot::Y)),
            zaxis: scene_axis(z_axis, hidden != Some(AxisSlot::Z)),
            camera: Camera {
                eye: request.view.eye(),
                center: Vec3::new(0.0, 0.0, 0.0),
            },
            bgcolor: "rgba(250, 251, 252, 0.5)",
        },
        paper_bgcolor: "white",
        hovermode: "closest",
        showlegend: !data.is_empty(),
        legend: Legend {
            title: Title {
                text: "Categories".to_string(),
                font: Font {
                    size: 12,
                    color: INK,
                },
                x: None,
                xanchor: None,
            },
            x: 0.02,
            y: 0.98,
            bgcolor: "rgba(255,255,255,0.9)",
            bordercolor: "#C1CDE4",
            borderwidth: 1,
        },
        height: 800,
        margin: Margin {
            l: 0,
            r: 0,
            t: 80,
            b: 0,
        },
        uirevision: format!("{}-{}", request.view.as_str(), request.camera_revision),
    };

    Ok(Figure {
        data,
        layout,
        points,
    })
}

/// Marker color of `category`, stable across filter changes.
#[must_use]
pub fn category_color(dataset: &Dataset, category: &str) -> &'static str {
    dataset
        .categories()
        .iter()
        .position(|c| c == category)
        .map_or(FALLBACK_COLOR, |idx| {
            CATEGORY_PALETTE[idx % CATEGORY_PALETTE.len()]
        })
}

fn resolve_axis<'a>(dataset: &'a Dataset, key: &str) -> Result<&'a AxisDefinition> {
    dataset
        .axis(key)
        .with_context(|| format!("Unknown axis '{key}'"))
}

fn score(reading: &Reading, axis: &AxisDefinition) -> Result<u8> {
    reading.value(&axis.key).with_context(|| {
        format!(
            "Reading '{}' has no value for axis '{}'",
            reading.title, axis.key
        )
    })
}

/// Splits points into one trace per category, in order of first appearance.
fn group_traces(dataset: &Dataset, points: &[PlotPoint]) -> Vec<Trace> {
    let mut traces: Vec<Trace> = Vec::new();

    for point in points {
        let pos = match traces.iter().position(|t| t.name == point.category) {
            Some(pos) => pos,
            None => {
                traces.push(empty_trace(dataset, &point.category));
                traces.len() - 1
            }
        };
        let trace = &mut traces[pos];
        trace.x.push(point.x);
        trace.y.push(point.y);
        trace.z.push(point.z);
        trace.text.push(
            dataset
                .reading(point.reading)
                .map(|r| r.title.clone())
                .unwrap_or_default(),
        );
        trace.hovertext.push(point.hover.clone());
        trace.customdata.push(point.reading);
    }

    traces
}

fn empty_trace(dataset: &Dataset, category: &str) -> Trace {
    Trace {
        kind: "scatter3d",
        mode: "markers",
        name: category.to_string(),
        x: Vec::new(),
        y: Vec::new(),
        z: Vec::new(),
        text: Vec::new(),
        hovertext: Vec::new(),
        hoverinfo: "text",
        customdata: Vec::new(),
        marker: Marker {
            size: 8,
            color: category_color(dataset, category).to_string(),
            opacity: 0.85,
            line: MarkerLine {
                width: 0.5,
                color: "white",
            },
        },
    }
}

fn scene_axis(axis: &AxisDefinition, visible: bool) -> SceneAxis {
    SceneAxis {
        title: Title {
            text: scale_title(axis),
            font: Font {
                size: 12,
                color: INK,
            },
            x: None,
            xanchor: None,
        },
        range: axis.range(),
        visible,
        gridcolor: GRID,
        showgrid: true,
        zeroline: false,
        backgroundcolor: "white",
        color: axis.color.to_hex(),
    }
}

/// Scene axis title, e.g. `"Theory focus<br>(1=Culture → 10=Power)"`.
fn scale_title(axis: &AxisDefinition) -> String {
    format!(
        "{}<br>({}={} → {}={})",
        escape_html(&axis.description),
        AXIS_MIN_VALUE,
        escape_html(&axis.min_label),
        axis.max_value,
        escape_html(&axis.max_label)
    )
}

fn hover_text(reading: &Reading, axes: [&AxisDefinition; 3]) -> String {
    let mut text = format!(
        "<b>{}</b><br>{} · {}<br><i>{}</i><br>",
        escape_html(&reading.title),
        escape_html(&reading.category),
        escape_html(&reading.section),
        escape_html(reading.summary()),
    );
    for axis in axes {
        let value = reading.value(&axis.key).unwrap_or_default();
        text.push_str(&format!("<br>{}: {}", escape_html(&axis.short_name), value));
    }
    text
}

/// Escapes the characters Plotly would otherwise read as markup.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
