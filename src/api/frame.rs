use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analytics::TrendLine;
use crate::core::SamplePoint;
use crate::error::{EngineError, EngineResult};

/// Viewport bounds embedded in a frame, for axis-label rendering and
/// host-level synchronization (linked charts).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameBounds {
    /// Currently scrolled-into-view time window.
    pub time_start: f64,
    pub time_end: f64,
    /// Price range the frame was projected with (auto-fit or fixed).
    pub price_min: f64,
    pub price_max: f64,
    pub zoom_level: f64,
    pub pan_offset_px: f64,
}

/// An event marker projected into pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventMarkerPoint {
    pub x: f64,
    pub y: f64,
    pub time: f64,
    pub price: f64,
    pub magnitude: f64,
}

/// Complete per-frame render description.
///
/// A pure value object: the presentation layer consumes it and decides
/// colors, fonts and styling on its own. Building a frame never mutates
/// engine state, so frames can be diffed, serialized and replayed in
/// tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub points: Vec<SamplePoint>,
    pub trend_lines: Vec<TrendLine>,
    pub event_markers: Vec<EventMarkerPoint>,
    pub bounds: FrameBounds,
    pub series_id: String,
    pub series_metadata: IndexMap<String, String>,
}

impl RenderFrame {
    /// Serializes the frame as pretty-printed JSON for host tooling and
    /// snapshot tests.
    pub fn to_json_pretty(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| EngineError::InvalidData(format!("frame serialization failed: {err}")))
    }
}
