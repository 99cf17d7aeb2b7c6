//! Side panels: the clicked-reading details and the axis explanation.

use anyhow::{Context, Result};
use serde::Serialize;

use super::Dataset;
use crate::models::{AxisSlot, AxisTriple, AXIS_MIN_VALUE};

/// Everything shown for a clicked reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingDetails {
    /// Index of the reading in the dataset
    pub index: usize,
    /// Reading title
    pub title: String,
    /// Author list
    pub author: String,
    /// Category
    pub category: String,
    /// Course section
    pub section: String,
    /// Full description
    pub description: String,
    /// One-line summary, if the data has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_liner: Option<String>,
    /// Scores on every axis, in axis order
    pub dimensions: Vec<DimensionValue>,
    /// Reminder of the active axes, e.g. "X=Culture/Power, Y=..., Z=..."
    pub currently_viewing: String,
}

/// One score bar in the details panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionValue {
    /// Axis key
    pub key: String,
    /// Axis display name
    pub name: String,
    /// Score
    pub value: u8,
    /// Top of the scale
    pub max: u8,
    /// Bar fill, `value / max * 100`
    pub percent: f64,
    /// Axis accent color
    pub color: String,
}

/// Explanation card for one of the active axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisExplanation {
    /// "X", "Y" or "Z"
    pub slot: &'static str,
    /// Axis key
    pub key: String,
    /// Axis display name
    pub name: String,
    /// Axis accent color
    pub color: String,
    /// Bottom of the scale
    pub min_value: u8,
    /// Low end label
    pub min_label: String,
    /// Low end explanation
    pub min_description: String,
    /// Top of the scale
    pub max_value: u8,
    /// High end label
    pub max_label: String,
    /// High end explanation
    pub max_description: String,
}

/// Builds the details panel for reading `index` under the active `axes`.
pub fn reading_details(dataset: &Dataset, index: usize, axes: &AxisTriple) -> Result<ReadingDetails> {
    let reading = dataset
        .reading(index)
        .with_context(|| format!("No reading at index {index}"))?;

    let dimensions = dataset
        .axes()
        .iter()
        .map(|axis| {
            let value = reading.value(&axis.key).unwrap_or_default();
            DimensionValue {
                key: axis.key.clone(),
                name: axis.name.clone(),
                value,
                max: axis.max_value,
                percent: f64::from(value) / f64::from(axis.max_value) * 100.0,
                color: axis.color.to_hex(),
            }
        })
        .collect();

    let mut viewing = Vec::with_capacity(3);
    for (slot, key) in axes.iter() {
        let axis = dataset
            .axis(key)
            .with_context(|| format!("Unknown axis '{key}'"))?;
        viewing.push(format!("{}={}", slot.label(), axis.short_name));
    }

    Ok(ReadingDetails {
        index,
        title: reading.title.clone(),
        author: reading.author.clone(),
        category: reading.category.clone(),
        section: reading.section.clone(),
        description: reading.description.clone(),
        one_liner: reading.one_liner.clone(),
        dimensions,
        currently_viewing: viewing.join(", "),
    })
}

/// Builds the explanation cards for the X, Y and Z axes.
pub fn axis_explanation(dataset: &Dataset, axes: &AxisTriple) -> Result<Vec<AxisExplanation>> {
    AxisSlot::ALL
        .into_iter()
        .map(|slot| {
            let key = axes.get(slot);
            let axis = dataset
                .axis(key)
                .with_context(|| format!("Unknown axis '{key}'"))?;
            Ok(AxisExplanation {
                slot: slot.label(),
                key: axis.key.clone(),
                name: axis.name.clone(),
                color: axis.color.to_hex(),
                min_value: AXIS_MIN_VALUE,
                min_label: axis.min_label.clone(),
                min_description: axis.min_description.clone(),
                max_value: axis.max_value,
                max_label: axis.max_label.clone(),
                max_description: axis.max_description.clone(),
            })
        })
        .collect()
}
