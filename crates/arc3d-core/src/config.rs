//! Editor configuration.

use crate::shapes::SerializableColor;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the editor. Every field has a default, so a partial JSON
/// object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Quiet period after the last change before auto-save fires.
    pub autosave_delay_ms: u64,
    /// Offset applied to pasted and duplicated elements, in both axes.
    pub paste_offset: f64,
    /// Maximum gap between two clicks on the same target to count as a
    /// double click.
    pub double_click_ms: u64,
    /// Fill for newly placed shapes.
    pub default_fill: SerializableColor,
    /// Hit-test slack in canvas units.
    pub hit_tolerance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: 3_000,
            paste_offset: 20.0,
            double_click_ms: 300,
            default_fill: SerializableColor::ACCENT,
            hit_tolerance: 2.0,
        }
    }
}

impl EditorConfig {
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
