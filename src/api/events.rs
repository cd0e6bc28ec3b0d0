use serde::{Deserialize, Serialize};

/// Payload raised when a click completes a selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionChanged {
    pub time: f64,
    pub price: f64,
    pub volume: u64,
    /// Price change against the immediate store predecessor.
    pub change: f64,
    /// Suppressed when the predecessor price is zero or absent.
    pub change_percent: Option<f64>,
}

/// Payload raised whenever pan or zoom mutates the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportChanged {
    pub time_start: f64,
    pub time_end: f64,
    pub zoom_level: f64,
    pub pan_offset_px: f64,
}

/// Host-facing engine events, drained explicitly via
/// [`crate::api::ViewEngine::drain_events`]. There is no implicit
/// notification graph: every emission is the documented effect of one
/// setter or gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    SelectionChanged(SelectionChanged),
    ViewportChanged(ViewportChanged),
}
