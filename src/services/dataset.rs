//! Loading and validating the reading/axis data files.
//!
//! Both files are read once at startup. Any problem (missing file, malformed
//! JSON, a reading that does not score every axis, a score off the scale) is
//! fatal: the server refuses to start rather than plotting partial data.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::models::{AxisDefinition, AxisTriple, Reading, AXIS_MIN_VALUE};

/// Schema of `readings_data.json`.
#[derive(Debug, Deserialize)]
struct ReadingsFile {
    readings: Vec<Reading>,
}

/// Schema of `axis_definitions.json`.
///
/// `axes` stays a raw JSON map so the file order survives; the order drives
/// the axis dropdowns and the details panel.
#[derive(Debug, Deserialize)]
struct AxesFile {
    axes: serde_json::Map<String, serde_json::Value>,
    default_axes: AxisTriple,
}

/// Immutable data context shared by every request.
///
/// Built once, then only read. Holds the readings in file order, the axis
/// definitions in file order and the precomputed filter choices.
#[derive(Debug, Clone)]
pub struct Dataset {
    readings: Vec<Reading>,
    axes: Vec<AxisDefinition>,
    axis_lookup: HashMap<String, usize>,
    default_axes: AxisTriple,
    sections: Vec<String>,
    categories: Vec<String>,
    authors: Vec<String>,
}

impl Dataset {
    /// Loads and validates both data files.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use reading_atlas::services::Dataset;
    ///
    /// let dataset = Dataset::load(
    ///     Path::new("data/readings_data.json"),
    ///     Path::new("data/axis_definitions.json"),
    /// )?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(readings_path: &Path, axes_path: &Path) -> Result<Self> {
        let readings_json = fs::read_to_string(readings_path).with_context(|| {
            format!("Failed to read readings file: {}", readings_path.display())
        })?;
        let axes_json = fs::read_to_string(axes_path)
            .with_context(|| format!("Failed to read axis file: {}", axes_path.display()))?;

        let dataset = Self::from_json(&readings_json, &axes_json).with_context(|| {
            format!(
                "Invalid data in {} / {}",
                readings_path.display(),
                axes_path.display()
            )
        })?;

        info!(
            "Loaded {} readings with {} dimensions",
            dataset.readings.len(),
            dataset.axes.len()
        );

        Ok(dataset)
    }

    /// Parses and validates the two JSON documents.
    pub fn from_json(readings_json: &str, axes_json: &str) -> Result<Self> {
        let axes_file: AxesFile =
            serde_json::from_str(axes_json).context("Failed to parse axis definitions")?;
        let readings_file: ReadingsFile =
            serde_json::from_str(readings_json).context("Failed to parse readings data")?;

        let mut axes = Vec::with_capacity(axes_file.axes.len());
        for (key, body) in axes_file.axes {
            let mut axis: AxisDefinition = serde_json::from_value(body)
                .with_context(|| format!("Invalid definition for axis '{key}'"))?;
            axis.key = key;
            axes.push(axis);
        }

        Self::from_parts(readings_file.readings, axes, axes_file.default_axes)
    }

    /// Builds a dataset from already-parsed parts, running every integrity check.
    pub fn from_parts(
        readings: Vec<Reading>,
        axes: Vec<AxisDefinition>,
        default_axes: AxisTriple,
    ) -> Result<Self> {
        if axes.is_empty() {
            anyhow::bail!("No axes defined");
        }

        let mut axis_lookup = HashMap::with_capacity(axes.len());
        for (idx, axis) in axes.iter().enumerate() {
            validate_axis(axis)?;
            if axis_lookup.insert(axis.key.clone(), idx).is_some() {
                anyhow::bail!("Duplicate axis key '{}'", axis.key);
            }
        }

        for (slot, key) in default_axes.iter() {
            if !axis_lookup.contains_key(key) {
                anyhow::bail!(
                    "Default {} axis '{}' is not a defined axis",
                    slot.label(),
                    key
                );
            }
        }

        for (idx, reading) in readings.iter().enumerate() {
            validate_reading(reading, &axes, &axis_lookup)
                .with_context(|| format!("Reading #{} '{}' is invalid", idx + 1, reading.title))?;
        }

        let sections = distinct(readings.iter().map(|r| r.section.as_str()));
        let categories = distinct(readings.iter().map(|r| r.category.as_str()));
        let authors = distinct(readings.iter().map(|r| r.author.as_str()));

        Ok(Self {
            readings,
            axes,
            axis_lookup,
            default_axes,
            sections,
            categories,
            authors,
        })
    }

    /// All readings in file order.
    #[must_use]
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Reading at `index`.
    #[must_use]
    pub fn reading(&self, index: usize) -> Option<&Reading> {
        self.readings.get(index)
    }

    /// All axis definitions in file order.
    #[must_use]
    pub fn axes(&self) -> &[AxisDefinition] {
        &self.axes
    }

    /// Axis definition for `key`.
    #[must_use]
    pub fn axis(&self, key: &str) -> Option<&AxisDefinition> {
        self.axis_lookup.get(key).map(|&idx| &self.axes[idx])
    }

    /// Axes shown when a session starts.
    #[must_use]
    pub fn default_axes(&self) -> &AxisTriple {
        &self.default_axes
    }

    /// Distinct course sections, sorted.
    #[must_use]
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    /// Distinct categories, sorted.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Distinct non-empty authors, sorted.
    #[must_use]
    pub fn authors(&self) -> &[String] {
        &self.authors
    }
}

fn validate_axis(axis: &AxisDefinition) -> Result<()> {
    if axis.key.trim().is_empty() {
        anyhow::bail!("Axis key cannot be empty");
    }
    if axis.max_value < AXIS_MIN_VALUE {
        anyhow::bail!(
            "Axis '{}' has max_value {} below the scale minimum {}",
            axis.key,
            axis.max_value,
            AXIS_MIN_VALUE
        );
    }
    Ok(())
}

fn validate_reading(
    reading: &Reading,
    axes: &[AxisDefinition],
    axis_lookup: &HashMap<String, usize>,
) -> Result<()> {
    if let Some(unknown) = reading
        .dimensions
        .keys()
        .find(|key| !axis_lookup.contains_key(key.as_str()))
    {
        anyhow::bail!("Unknown dimension '{unknown}'");
    }

    for axis in axes {
        let value = reading
            .value(&axis.key)
            .with_context(|| format!("Missing value for dimension '{}'", axis.key))?;
        if !axis.accepts(value) {
            anyhow::bail!(
                "Dimension '{}' = {} is outside {}..={}",
                axis.key,
                value,
                AXIS_MIN_VALUE,
                axis.max_value
            );
        }
    }

    Ok(())
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
