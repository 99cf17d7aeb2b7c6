//! Loader tests against real files on disk.

use tempfile::TempDir;

use reading_atlas::models::AXIS_MIN_VALUE;
use reading_atlas::services::Dataset;

mod fixtures;
use fixtures::{
    axes_json, readings_json, scenario_readings, shipped_data_dir, test_reading,
    write_data_files,
};

#[test]
fn test_load_from_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let (readings_path, axes_path) = write_data_files(
        temp_dir.path(),
        &readings_json(&scenario_readings()),
        &axes_json(),
    );

    let dataset = Dataset::load(&readings_path, &axes_path).expect("dataset loads");

    assert_eq!(dataset.readings().len(), 3);
    assert_eq!(dataset.axes().len(), 3);
    assert_eq!(dataset.sections(), ["L1-4".to_string(), "L5".to_string()]);
    assert_eq!(
        dataset.categories(),
        ["Game Theory".to_string(), "Historical".to_string()]
    );
    assert_eq!(dataset.reading(1).map(|r| r.title.as_str()), Some("R2"));
    assert!(dataset.reading(3).is_none());
}

#[test]
fn test_missing_file_fails_fast() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let (readings_path, _) = write_data_files(
        temp_dir.path(),
        &readings_json(&scenario_readings()),
        &axes_json(),
    );

    let err = Dataset::load(&readings_path, &temp_dir.path().join("missing.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read axis file"));
}

#[test]
fn test_reading_without_dimensions_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let readings = r#"{"readings": [{
        "reading": "No Scores", "category": "Historical", "section": "L5",
        "description": "Missing the dimensions map."
    }]}"#;
    let (readings_path, axes_path) = write_data_files(temp_dir.path(), readings, &axes_json());

    let err = Dataset::load(&readings_path, &axes_path).unwrap_err();
    assert!(format!("{err:#}").contains("dimensions"), "{err:#}");
}

#[test]
fn test_out_of_range_scores_are_rejected() {
    for bad in [0, 11] {
        let readings = vec![test_reading("Bad", "L5", "Historical", [5, bad, 5])];
        let err = Dataset::from_json(&readings_json(&readings), &axes_json()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Reading #1 'Bad' is invalid"), "{message}");
        assert!(message.contains("micro_macro"), "{message}");
    }
}

#[test]
fn test_shipped_data_is_consistent() {
    let dir = shipped_data_dir();
    let dataset = Dataset::load(
        &dir.join("readings_data.json"),
        &dir.join("axis_definitions.json"),
    )
    .expect("shipped data loads");

    assert_eq!(dataset.axes().len(), 6);
    assert!(!dataset.readings().is_empty());

    // Every reading scores every axis within its scale
    for reading in dataset.readings() {
        for axis in dataset.axes() {
            let value = reading
                .value(&axis.key)
                .unwrap_or_else(|| panic!("{} lacks {}", reading.title, axis.key));
            assert!(
                (AXIS_MIN_VALUE..=axis.max_value).contains(&value),
                "{} has {} = {}",
                reading.title,
                axis.key,
                value
            );
        }
    }

    for (_, key) in dataset.default_axes().iter() {
        assert!(dataset.axis(key).is_some());
    }
}
