//! Core services: data loading, figure building and panel rendering.
//!
//! Everything here is synchronous and side-effect free apart from the
//! initial file read in [`Dataset::load`].

pub mod dataset;
pub mod details;
pub mod figure;

pub use dataset::Dataset;
pub use details::{axis_explanation, reading_details, AxisExplanation, DimensionValue, ReadingDetails};
pub use figure::{build_figure, category_color, Figure, FigureRequest, PlotPoint};
