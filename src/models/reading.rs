//! Course reading records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One academic text with its course metadata and per-dimension scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Title of the text
    #[serde(rename = "reading")]
    pub title: String,
    /// Author list as printed in the syllabus
    #[serde(default)]
    pub author: String,
    /// Thematic category (e.g., "Game Theory", "Historical")
    pub category: String,
    /// Course session label (e.g., "L1-4")
    pub section: String,
    /// Longer summary shown in the details panel
    pub description: String,
    /// Optional one-sentence summary preferred in hover text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_liner: Option<String>,
    /// Score per axis key
    pub dimensions: BTreeMap<String, u8>,
}

impl Reading {
    /// Returns the score on `axis_key`, if the reading has one.
    #[must_use]
    pub fn value(&self, axis_key: &str) -> Option<u8> {
        self.dimensions.get(axis_key).copied()
    }

    /// Short summary for hover text: the one-liner if present, else the description.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.one_liner
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.description)
    }
}
