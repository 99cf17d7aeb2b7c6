//! Shared test fixtures for dataset, figure, controller and web tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use reading_atlas::models::{AxisDefinition, AxisTriple, Reading, RgbColor};
use reading_atlas::services::Dataset;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Axis keys used by the fixture dataset, in definition order.
pub const AXIS_KEYS: [&str; 3] = ["culture_power", "micro_macro", "formal_informal"];

/// Creates an axis definition with a 1-10 scale.
pub fn test_axis(key: &str, name: &str, short_name: &str, color: &str) -> AxisDefinition {
    AxisDefinition {
        key: key.to_string(),
        name: name.to_string(),
        short_name: short_name.to_string(),
        description: format!("{name} description"),
        min_label: format!("{short_name} low"),
        max_label: format!("{short_name} high"),
        min_description: format!("Low end of {name}"),
        max_description: format!("High end of {name}"),
        color: RgbColor::from_hex(color).expect("fixture color is valid"),
        max_value: 10,
    }
}

/// The three fixture axes.
pub fn test_axes() -> Vec<AxisDefinition> {
    vec![
        test_axis("culture_power", "Culture vs. Power", "Culture/Power", "#FF6B6B"),
        test_axis("micro_macro", "Micro vs. Macro", "Micro/Macro", "#2A73FF"),
        test_axis("formal_informal", "Formal vs. Informal", "Formal/Informal", "#2ACC88"),
    ]
}

/// Creates a reading scored `[culture_power, micro_macro, formal_informal]`.
pub fn test_reading(title: &str, section: &str, category: &str, scores: [u8; 3]) -> Reading {
    let dimensions: BTreeMap<String, u8> = AXIS_KEYS
        .iter()
        .zip(scores)
        .map(|(key, value)| ((*key).to_string(), value))
        .collect();

    Reading {
        title: title.to_string(),
        author: format!("Author of {title}"),
        category: category.to_string(),
        section: section.to_string(),
        description: format!("Description of {title}"),
        one_liner: None,
        dimensions,
    }
}

/// The three-reading scenario: R1 (L1-4, Game Theory), R2 (L5, Historical),
/// R3 (L1-4, Historical).
pub fn scenario_readings() -> Vec<Reading> {
    vec![
        test_reading("R1", "L1-4", "Game Theory", [2, 3, 4]),
        test_reading("R2", "L5", "Historical", [7, 8, 9]),
        test_reading("R3", "L1-4", "Historical", [5, 1, 10]),
    ]
}

/// Dataset built from [`scenario_readings`] with default axes X/Y/Z in key order.
pub fn scenario_dataset() -> Dataset {
    Dataset::from_parts(
        scenario_readings(),
        test_axes(),
        AxisTriple::new(AXIS_KEYS[0], AXIS_KEYS[1], AXIS_KEYS[2]),
    )
    .expect("fixture dataset is valid")
}

/// JSON text of an axis definitions file for the fixture axes.
pub fn axes_json() -> String {
    let axes: serde_json::Map<String, serde_json::Value> = test_axes()
        .into_iter()
        .map(|axis| {
            let key = axis.key.clone();
            let mut body = serde_json::to_value(&axis).expect("axis serializes");
            if let Some(obj) = body.as_object_mut() {
                obj.remove("key");
            }
            (key, body)
        })
        .collect();

    serde_json::json!({
        "axes": axes,
        "default_axes": {"x": AXIS_KEYS[0], "y": AXIS_KEYS[1], "z": AXIS_KEYS[2]}
    })
    .to_string()
}

/// JSON text of a readings file for `readings`.
pub fn readings_json(readings: &[Reading]) -> String {
    serde_json::json!({ "readings": readings }).to_string()
}

/// Writes both data files into `dir` and returns their paths.
pub fn write_data_files(dir: &Path, readings_json: &str, axes_json: &str) -> (PathBuf, PathBuf) {
    let readings_path = dir.join("readings_data.json");
    let axes_path = dir.join("axis_definitions.json");
    fs::write(&readings_path, readings_json).expect("Failed to write readings file");
    fs::write(&axes_path, axes_json).expect("Failed to write axes file");
    (readings_path, axes_path)
}

/// Directory holding the data shipped with the crate.
pub fn shipped_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}
