use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Dragging,
    /// Transient state between a click-classified release and the
    /// completed nearest-sample lookup.
    Selecting,
}

/// Tuning for pointer gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerConfig {
    /// Releases with less total drag travel than this are clicks.
    pub click_threshold_px: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            click_threshold_px: 4.0,
        }
    }
}

/// The most recently selected sample and its change against the immediate
/// store predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub sample: Sample,
    pub change: f64,
    /// Suppressed when the predecessor price is zero or absent.
    pub change_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct DragState {
    anchor_x: f64,
    anchor_y: f64,
    last_x: f64,
    last_y: f64,
    total_travel_px: f64,
}

/// Outcome of a pointer release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseAction {
    /// The gesture was a drag; the viewport pan already tracked it.
    Pan,
    /// The gesture was a click; a nearest-sample selection should run.
    Click,
}

/// Pointer state machine: `Idle -> Dragging -> (Idle | Selecting -> Idle)`.
///
/// The machine owns gesture classification and selection state; converting
/// pixel deltas into viewport mutations is the engine's job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    mode: InteractionMode,
    config: PointerConfig,
    drag: DragState,
    selection: Option<SelectionState>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new(PointerConfig::default())
    }
}

impl InteractionState {
    #[must_use]
    pub fn new(config: PointerConfig) -> Self {
        Self {
            mode: InteractionMode::Idle,
            config,
            drag: DragState::default(),
            selection: None,
        }
    }

    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    /// `true` while a drag is in progress. Auto-scroll must check this
    /// before mutating the pan offset.
    #[must_use]
    pub fn is_dragging(self) -> bool {
        self.mode == InteractionMode::Dragging
    }

    #[must_use]
    pub fn selection(self) -> Option<SelectionState> {
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Records the drag anchor and enters `Dragging`.
    pub fn on_pointer_down(&mut self, x: f64, y: f64) {
        self.mode = InteractionMode::Dragging;
        self.drag = DragState {
            anchor_x: x,
            anchor_y: y,
            last_x: x,
            last_y: y,
            total_travel_px: 0.0,
        };
    }

    /// Returns the horizontal pixel delta since the last move while
    /// dragging, `None` otherwise.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> Option<f64> {
        if self.mode != InteractionMode::Dragging {
            return None;
        }

        let delta_x = x - self.drag.last_x;
        let delta_y = y - self.drag.last_y;
        self.drag.total_travel_px += delta_x.hypot(delta_y);
        self.drag.last_x = x;
        self.drag.last_y = y;
        Some(delta_x)
    }

    /// Ends the drag. Releases below the click threshold are reclassified
    /// as clicks and leave the machine in `Selecting` until the engine
    /// completes the nearest-sample lookup.
    pub fn on_pointer_up(&mut self) -> ReleaseAction {
        if self.mode != InteractionMode::Dragging {
            self.mode = InteractionMode::Idle;
            return ReleaseAction::Pan;
        }

        if self.drag.total_travel_px < self.config.click_threshold_px {
            self.mode = InteractionMode::Selecting;
            ReleaseAction::Click
        } else {
            self.mode = InteractionMode::Idle;
            ReleaseAction::Pan
        }
    }

    /// Stores the resolved selection (if any) and returns to `Idle`.
    pub fn complete_selection(&mut self, selection: Option<SelectionState>) {
        if let Some(selection) = selection {
            self.selection = Some(selection);
        }
        self.mode = InteractionMode::Idle;
    }
}

/// Finds the sample nearest to a pointer position in normalized space.
///
/// Both axes are scaled by the current viewport extents so a sample close
/// in time but far in price is not preferred over one moderately close on
/// both axes. Degenerate (non-positive) spans disable that axis's
/// contribution rather than producing non-finite distances.
#[must_use]
pub fn nearest_sample(
    visible: &[Sample],
    pointer_time: f64,
    pointer_price: f64,
    time_span: f64,
    price_span: f64,
) -> Option<Sample> {
    visible
        .iter()
        .min_by_key(|sample| {
            let dt = if time_span > 0.0 {
                (sample.time - pointer_time) / time_span
            } else {
                0.0
            };
            let dp = if price_span > 0.0 {
                (sample.price - pointer_price) / price_span
            } else {
                0.0
            };
            OrderedFloat(dt * dt + dp * dp)
        })
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f64, price: f64) -> Sample {
        Sample::new(time, price, 1).expect("valid sample")
    }

    #[test]
    fn short_release_is_a_click() {
        let mut state = InteractionState::default();
        state.on_pointer_down(100.0, 100.0);
        state.on_pointer_move(101.0, 100.5);
        assert_eq!(state.on_pointer_up(), ReleaseAction::Click);
        assert_eq!(state.mode(), InteractionMode::Selecting);

        state.complete_selection(None);
        assert_eq!(state.mode(), InteractionMode::Idle);
    }

    #[test]
    fn long_drag_is_a_pan() {
        let mut state = InteractionState::default();
        state.on_pointer_down(100.0, 100.0);
        assert_eq!(state.on_pointer_move(150.0, 100.0), Some(50.0));
        assert_eq!(state.on_pointer_up(), ReleaseAction::Pan);
        assert_eq!(state.mode(), InteractionMode::Idle);
    }

    #[test]
    fn move_without_drag_reports_nothing() {
        let mut state = InteractionState::default();
        assert_eq!(state.on_pointer_move(10.0, 10.0), None);
    }

    #[test]
    fn nearest_sample_uses_both_axes_in_normalized_space() {
        // Close in time but far in price vs moderately close on both axes.
        let visible = vec![sample(10.0, 900.0), sample(14.0, 105.0)];
        let found = nearest_sample(&visible, 10.5, 100.0, 100.0, 1_000.0)
            .expect("non-empty visible set");
        assert_eq!(found.time, 14.0);
    }

    #[test]
    fn nearest_sample_on_empty_set_is_none() {
        assert!(nearest_sample(&[], 0.0, 0.0, 1.0, 1.0).is_none());
    }
}
