use chrono::Utc;
use indexmap::IndexMap;
use tracing::debug;

use crate::analytics::{EventDetectorConfig, TrendWindows, detect_events, fit_trend_lines};
use crate::api::events::{EngineEvent, SelectionChanged, ViewportChanged};
use crate::api::frame::{EventMarkerPoint, FrameBounds, RenderFrame};
use crate::api::scheduler::{RenderScheduler, TickOutcome};
use crate::core::mapper::ViewportMapper;
use crate::core::primitives::datetime_to_unix_seconds;
use crate::core::windowing::visible_slice;
use crate::core::{
    PriceFitMode, Sample, SampleStore, TimeRange, Viewport, ViewportState, project_samples,
};
use crate::error::{EngineError, EngineResult};
use crate::interaction::{
    InteractionMode, InteractionState, ReleaseAction, SelectionState, nearest_sample,
};

use super::{PerformanceMode, ViewEngineConfig};

/// Main orchestration facade consumed by host applications.
///
/// Owns the sample store, viewport state, interaction state machine and
/// render scheduler of one series view. All mutation is synchronous on the
/// caller's thread; there is no internal locking or background work.
///
/// Recomputation is explicit: each setter documents exactly what it
/// refreshes, and hosts read results through [`ViewEngine::frame`] and
/// [`ViewEngine::drain_events`].
pub struct ViewEngine {
    config: ViewEngineConfig,
    store: SampleStore,
    viewport: ViewportState,
    interaction: InteractionState,
    scheduler: RenderScheduler,
    series_metadata: IndexMap<String, String>,
    pending_events: Vec<EngineEvent>,
}

impl ViewEngine {
    pub fn new(config: ViewEngineConfig) -> EngineResult<Self> {
        let config = config.validate()?;
        let mut viewport = ViewportState::new(
            config.viewport,
            config.insets,
            config.padding_ratio,
            now_seconds(),
        )?;
        viewport.set_zoom(config.zoom_level)?;

        Ok(Self {
            config,
            store: SampleStore::new(),
            viewport,
            interaction: InteractionState::new(config.pointer),
            scheduler: RenderScheduler::new(config.scheduler)?,
            series_metadata: IndexMap::new(),
            pending_events: Vec::new(),
        })
    }

    // --- data feed -------------------------------------------------------

    /// Replaces the whole series (batch feed semantics).
    ///
    /// Recomputes: retention pruning, viewport bounds,
    /// `pixels_per_time_unit`. Zoom/pan/selection survive.
    pub fn set_samples(&mut self, series_id: impl Into<String>, samples: Vec<Sample>) {
        self.store.replace(series_id, samples);
        self.store.prune_to_range(self.config.time_range);
        self.refit_bounds();
    }

    /// Appends one live sample.
    ///
    /// Recomputes: retention pruning, viewport bounds,
    /// `pixels_per_time_unit`.
    pub fn append_sample(&mut self, sample: Sample) {
        self.store.append(sample);
        self.store.prune_to_range(self.config.time_range);
        self.refit_bounds();
    }

    // --- explicit setters --------------------------------------------------

    /// Resizes the pixel surface. Recomputes `pixels_per_time_unit`.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) -> EngineResult<()> {
        self.viewport.set_viewport_size(Viewport::new(width, height))
    }

    /// Sets the absolute zoom level. Recomputes `pixels_per_time_unit` and
    /// emits `ViewportChanged`.
    pub fn set_zoom(&mut self, zoom_level: f64) -> EngineResult<()> {
        self.viewport.set_zoom(zoom_level)?;
        self.emit_viewport_changed();
        Ok(())
    }

    /// Changes the retention window. Recomputes: store pruning, viewport
    /// bounds.
    pub fn set_time_range(&mut self, time_range: TimeRange) {
        self.config.time_range = time_range;
        self.store.prune_to_range(time_range);
        self.refit_bounds();
    }

    /// Switches the virtualization cap and analytics gating. Takes effect
    /// on the next frame; no immediate recomputation.
    pub fn set_performance_mode(&mut self, mode: PerformanceMode) {
        self.config.performance_mode = mode;
    }

    /// Switches vertical auto-fit behavior. Takes effect on the next frame.
    pub fn set_price_fit_mode(&mut self, mode: PriceFitMode) {
        self.config.price_fit_mode = mode;
    }

    /// Overrides the event-detection threshold (relative deviation,
    /// strict `>` comparison). Takes effect on the next frame.
    pub fn set_event_threshold(&mut self, threshold: f64) -> EngineResult<()> {
        self.config.event_detector = EventDetectorConfig { threshold }.validate()?;
        Ok(())
    }

    /// Overrides the trend window lengths. Takes effect on the next frame.
    pub fn set_trend_windows(
        &mut self,
        short_window: usize,
        long_window: usize,
    ) -> EngineResult<()> {
        self.config.trend_windows = TrendWindows {
            short_window,
            long_window,
        }
        .validate()?;
        Ok(())
    }

    /// Attaches a metadata entry carried verbatim on every frame.
    pub fn set_series_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.series_metadata.insert(key.into(), value.into());
    }

    pub fn set_data_refresh_enabled(&mut self, enabled: bool) {
        self.scheduler.set_data_refresh_enabled(enabled);
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        self.scheduler.set_animation_enabled(enabled);
    }

    pub fn set_auto_scroll_enabled(&mut self, enabled: bool) {
        self.scheduler.set_auto_scroll_enabled(enabled);
    }

    // --- pointer input -----------------------------------------------------

    /// Pointer-down: enters `Dragging` and records the anchor.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.interaction.on_pointer_down(x, y);
    }

    /// Pointer-move: while dragging, pans the viewport by the pixel delta
    /// (drag right brings earlier times into view) and emits
    /// `ViewportChanged`.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> EngineResult<()> {
        if !x.is_finite() || !y.is_finite() {
            return Err(EngineError::InvalidData(
                "pointer position must be finite".to_owned(),
            ));
        }
        if let Some(delta_x) = self.interaction.on_pointer_move(x, y) {
            self.viewport.pan_by_pixels(delta_x)?;
            self.emit_viewport_changed();
        }
        Ok(())
    }

    /// Pointer-up: ends the drag. Releases below the click threshold are
    /// reclassified as clicks and resolve the nearest sample, updating the
    /// selection and emitting `SelectionChanged`. An empty visible set
    /// leaves the selection untouched and emits nothing.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> EngineResult<()> {
        match self.interaction.on_pointer_up() {
            ReleaseAction::Pan => Ok(()),
            ReleaseAction::Click => self.select_at(x, y),
        }
    }

    /// Cursor-anchored zoom: the time under `anchor_x` stays at the same
    /// pixel after the factor is applied. Recomputes
    /// `pixels_per_time_unit` and the pan offset; emits `ViewportChanged`.
    pub fn wheel_zoom(&mut self, factor: f64, anchor_x: f64) -> EngineResult<()> {
        self.viewport.zoom_around_anchor(factor, anchor_x)?;
        self.emit_viewport_changed();
        Ok(())
    }

    /// Clears the selection without emitting an event.
    pub fn clear_selection(&mut self) {
        self.interaction.clear_selection();
    }

    // --- time driver -------------------------------------------------------

    /// Advances the scheduler by host time.
    ///
    /// When the auto-scroll cadence fires (and no drag is in progress, the
    /// drag being the sole owner of the pan offset while active), the pan
    /// offset is set so the newest sample sits at the right edge, emitting
    /// `ViewportChanged`. Data-refresh fires are reported back so the host
    /// rebuilds its frame; animation fires carry no engine state.
    pub fn advance(&mut self, delta_seconds: f64) -> EngineResult<TickOutcome> {
        let outcome = self.scheduler.tick(delta_seconds)?;

        if outcome.auto_scroll_fired > 0 && !self.interaction.is_dragging() {
            if let Some(latest_time) = self.store.latest().map(|sample| sample.time) {
                self.viewport.scroll_time_to_right_edge(latest_time)?;
                self.emit_viewport_changed();
            }
        }

        Ok(outcome)
    }

    // --- outputs -----------------------------------------------------------

    /// Builds the per-frame render description: visible samples projected
    /// to screen space, trend polylines, event markers and the viewport
    /// bounds the host needs for axis labels.
    pub fn frame(&self) -> EngineResult<RenderFrame> {
        let visible = self.visible_set();
        let (window_start, window_end) = self.viewport.visible_time_window();
        let (price_min, price_max) = self
            .viewport
            .price_range_for(self.config.price_fit_mode, &visible);
        let mapper = self.viewport.mapper_with_price_range(price_min, price_max)?;

        let points = project_samples(&visible, mapper)?;

        let (trend_lines, event_markers) = if self.config.analytics_enabled() {
            let lines = fit_trend_lines(&visible, self.config.trend_windows, mapper)?;
            let mut markers = Vec::new();
            for event in detect_events(&visible, self.config.event_detector) {
                markers.push(EventMarkerPoint {
                    x: mapper.time_to_x(event.sample.time)?,
                    y: mapper.price_to_y(event.sample.price)?,
                    time: event.sample.time,
                    price: event.sample.price,
                    magnitude: event.magnitude,
                });
            }
            (lines.into_vec(), markers)
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(RenderFrame {
            points,
            trend_lines,
            event_markers,
            bounds: FrameBounds {
                time_start: window_start,
                time_end: window_end,
                price_min,
                price_max,
                zoom_level: self.viewport.zoom_level(),
                pan_offset_px: self.viewport.pan_offset_px(),
            },
            series_id: self.store.series_id().to_owned(),
            series_metadata: self.series_metadata.clone(),
        })
    }

    pub fn frame_json_pretty(&self) -> EngineResult<String> {
        self.frame()?.to_json_pretty()
    }

    /// Returns and clears the pending event queue.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // --- accessors -----------------------------------------------------------

    #[must_use]
    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    #[must_use]
    pub fn viewport_state(&self) -> ViewportState {
        self.viewport
    }

    #[must_use]
    pub fn config(&self) -> &ViewEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    #[must_use]
    pub fn selection(&self) -> Option<SelectionState> {
        self.interaction.selection()
    }

    /// The capped visible subset for the currently scrolled window.
    #[must_use]
    pub fn visible_set(&self) -> Vec<Sample> {
        let (start, end) = self.viewport.visible_time_window();
        visible_slice(self.store.samples(), start, end, self.config.active_cap())
    }

    pub fn map_time_to_x(&self, time: f64) -> EngineResult<f64> {
        self.current_mapper()?.time_to_x(time)
    }

    pub fn map_x_to_time(&self, x: f64) -> EngineResult<f64> {
        self.current_mapper()?.x_to_time(x)
    }

    pub fn map_price_to_y(&self, price: f64) -> EngineResult<f64> {
        self.current_mapper()?.price_to_y(price)
    }

    pub fn map_y_to_price(&self, y: f64) -> EngineResult<f64> {
        self.current_mapper()?.y_to_price(y)
    }

    // --- internals -----------------------------------------------------------

    /// Mapper consistent with what [`ViewEngine::frame`] projects with:
    /// the price axis follows the configured fit mode over the current
    /// visible set.
    fn current_mapper(&self) -> EngineResult<ViewportMapper> {
        let visible = self.visible_set();
        let (price_min, price_max) = self
            .viewport
            .price_range_for(self.config.price_fit_mode, &visible);
        self.viewport.mapper_with_price_range(price_min, price_max)
    }

    fn refit_bounds(&mut self) {
        self.viewport.fit_to_extent(self.store.extent(), now_seconds());
        debug!(
            samples = self.store.len(),
            revision = self.store.revision(),
            "viewport bounds refit after data mutation"
        );
    }

    fn select_at(&mut self, x: f64, y: f64) -> EngineResult<()> {
        let visible = self.visible_set();
        if visible.is_empty() {
            self.interaction.complete_selection(None);
            return Ok(());
        }

        let mapper = self.current_mapper()?;
        let pointer_time = mapper.x_to_time(x)?;
        let pointer_price = mapper.y_to_price(y)?;
        let (window_start, window_end) = self.viewport.visible_time_window();
        let (price_min, price_max) = mapper.price_range();

        let Some(sample) = nearest_sample(
            &visible,
            pointer_time,
            pointer_price,
            window_end - window_start,
            price_max - price_min,
        ) else {
            self.interaction.complete_selection(None);
            return Ok(());
        };

        let index = self.store.position_of(&sample).ok_or_else(|| {
            EngineError::InvalidData("selected sample missing from store".to_owned())
        })?;
        let (change, change_percent) = self.store.change_at(index)?;

        self.interaction.complete_selection(Some(SelectionState {
            sample,
            change,
            change_percent,
        }));
        self.pending_events
            .push(EngineEvent::SelectionChanged(SelectionChanged {
                time: sample.time,
                price: sample.price,
                volume: sample.volume,
                change,
                change_percent,
            }));
        Ok(())
    }

    fn emit_viewport_changed(&mut self) {
        let (time_start, time_end) = self.viewport.visible_time_window();
        self.pending_events
            .push(EngineEvent::ViewportChanged(ViewportChanged {
                time_start,
                time_end,
                zoom_level: self.viewport.zoom_level(),
                pan_offset_px: self.viewport.pan_offset_px(),
            }));
    }
}

fn now_seconds() -> f64 {
    datetime_to_unix_seconds(Utc::now())
}
