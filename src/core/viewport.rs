use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::mapper::{PlotInsets, ViewportMapper};
use crate::core::store::StoreExtent;
use crate::core::{Sample, Viewport};
use crate::error::{EngineError, EngineResult};

const MIN_TIME_SPAN_SECONDS: f64 = 1.0;
const FALLBACK_WINDOW_SECONDS: f64 = 86_400.0;

/// Vertical auto-fit policy for the price axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PriceFitMode {
    /// Price axis follows the visible samples' extent, so panning rescales
    /// the vertical axis continuously.
    #[default]
    AutoFit,
    /// Price axis stays pinned to the whole store's padded extent.
    FixedRange,
}

/// Padded time/price bounds fitted from the store's extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub time_start: f64,
    pub time_end: f64,
    pub price_min: f64,
    pub price_max: f64,
}

/// Current viewport: fitted bounds plus user-driven zoom/pan state.
///
/// Bounds are derived, not authoritative: they are refit from the store's
/// extent (plus padding) on every data mutation, and
/// `pixels_per_time_unit` is recomputed from the zoom level and plot width
/// whenever either changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    bounds: ViewportBounds,
    zoom_level: f64,
    pan_offset_px: f64,
    pixels_per_time_unit: f64,
    viewport: Viewport,
    insets: PlotInsets,
    padding_ratio: f64,
}

impl ViewportState {
    /// Creates a state over the fallback window ending at `now_seconds`.
    pub fn new(
        viewport: Viewport,
        insets: PlotInsets,
        padding_ratio: f64,
        now_seconds: f64,
    ) -> EngineResult<Self> {
        if !viewport.is_valid() {
            return Err(EngineError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let insets = insets.validate()?;
        if insets.plot_width(viewport) <= 0.0 || insets.plot_height(viewport) <= 0.0 {
            return Err(EngineError::InvalidData(
                "plot area must have positive width and height".to_owned(),
            ));
        }
        if !padding_ratio.is_finite() || padding_ratio < 0.0 {
            return Err(EngineError::InvalidData(
                "padding ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !now_seconds.is_finite() {
            return Err(EngineError::InvalidData(
                "reference time must be finite".to_owned(),
            ));
        }

        let mut state = Self {
            bounds: fallback_bounds(now_seconds),
            zoom_level: 1.0,
            pan_offset_px: 0.0,
            pixels_per_time_unit: 1.0,
            viewport,
            insets,
            padding_ratio,
        };
        state.recompute_scale();
        Ok(state)
    }

    #[must_use]
    pub fn bounds(self) -> ViewportBounds {
        self.bounds
    }

    #[must_use]
    pub fn viewport(self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn insets(self) -> PlotInsets {
        self.insets
    }

    #[must_use]
    pub fn zoom_level(self) -> f64 {
        self.zoom_level
    }

    #[must_use]
    pub fn pan_offset_px(self) -> f64 {
        self.pan_offset_px
    }

    #[must_use]
    pub fn pixels_per_time_unit(self) -> f64 {
        self.pixels_per_time_unit
    }

    /// Refits bounds from the store extent with the configured padding on
    /// each axis, falling back to a `now - 1 day .. now` window when the
    /// store is empty. Zoom and pan are user state and survive refits.
    pub fn fit_to_extent(&mut self, extent: Option<StoreExtent>, now_seconds: f64) {
        self.bounds = match extent {
            Some(extent) => {
                let (time_start, time_end) = pad_span(
                    extent.time_min,
                    extent.time_max,
                    self.padding_ratio,
                    MIN_TIME_SPAN_SECONDS,
                );
                let (price_min, price_max) = pad_span(
                    extent.price_min,
                    extent.price_max,
                    self.padding_ratio,
                    min_price_span(extent.price_min, extent.price_max),
                );
                ViewportBounds {
                    time_start,
                    time_end,
                    price_min,
                    price_max,
                }
            }
            None => fallback_bounds(now_seconds),
        };
        self.recompute_scale();
        trace!(
            time_start = self.bounds.time_start,
            time_end = self.bounds.time_end,
            "viewport bounds refit"
        );
    }

    /// Resizes the pixel surface and recomputes `pixels_per_time_unit`.
    pub fn set_viewport_size(&mut self, viewport: Viewport) -> EngineResult<()> {
        if !viewport.is_valid()
            || self.insets.plot_width(viewport) <= 0.0
            || self.insets.plot_height(viewport) <= 0.0
        {
            return Err(EngineError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.viewport = viewport;
        self.recompute_scale();
        Ok(())
    }

    /// Sets the zoom level and recomputes `pixels_per_time_unit`. The pan
    /// offset is untouched; use [`Self::zoom_around_anchor`] for
    /// cursor-anchored zooming.
    pub fn set_zoom(&mut self, zoom_level: f64) -> EngineResult<()> {
        if !zoom_level.is_finite() || zoom_level <= 0.0 {
            return Err(EngineError::InvalidData(
                "zoom level must be finite and > 0".to_owned(),
            ));
        }
        self.zoom_level = zoom_level;
        self.recompute_scale();
        Ok(())
    }

    /// Applies a multiplicative zoom while keeping the time under
    /// `anchor_x` at the same pixel position.
    pub fn zoom_around_anchor(&mut self, factor: f64, anchor_x: f64) -> EngineResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(EngineError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        if !anchor_x.is_finite() {
            return Err(EngineError::InvalidData(
                "zoom anchor px must be finite".to_owned(),
            ));
        }

        let anchor_time = self
            .mapper_with_price_range(self.bounds.price_min, self.bounds.price_max)?
            .x_to_time(anchor_x)?;
        self.set_zoom(self.zoom_level * factor)?;
        self.pan_offset_px = anchor_x
            - self.insets.left_px
            - (anchor_time - self.bounds.time_start) * self.pixels_per_time_unit;
        Ok(())
    }

    /// Shifts the pan offset by a raw pixel delta (positive moves content
    /// right, bringing earlier times into view).
    pub fn pan_by_pixels(&mut self, delta_px: f64) -> EngineResult<()> {
        if !delta_px.is_finite() {
            return Err(EngineError::InvalidData(
                "pan pixel delta must be finite".to_owned(),
            ));
        }
        self.pan_offset_px += delta_px;
        Ok(())
    }

    /// Sets the pan offset so `latest_time` sits at the right edge of the
    /// plot area.
    pub fn scroll_time_to_right_edge(&mut self, latest_time: f64) -> EngineResult<()> {
        if !latest_time.is_finite() {
            return Err(EngineError::InvalidData(
                "scroll target time must be finite".to_owned(),
            ));
        }
        self.pan_offset_px = self.insets.plot_width(self.viewport)
            - (latest_time - self.bounds.time_start) * self.pixels_per_time_unit;
        Ok(())
    }

    /// Time window currently scrolled into the plot area.
    #[must_use]
    pub fn visible_time_window(self) -> (f64, f64) {
        let start = self.bounds.time_start - self.pan_offset_px / self.pixels_per_time_unit;
        let end = start + self.insets.plot_width(self.viewport) / self.pixels_per_time_unit;
        (start, end)
    }

    /// Builds a mapper over the nominal fitted price bounds.
    pub fn mapper(self) -> EngineResult<ViewportMapper> {
        self.mapper_with_price_range(self.bounds.price_min, self.bounds.price_max)
    }

    /// Builds a mapper with an explicit price range (vertical auto-fit).
    pub fn mapper_with_price_range(
        self,
        price_min: f64,
        price_max: f64,
    ) -> EngineResult<ViewportMapper> {
        ViewportMapper::new(
            self.bounds.time_start,
            self.pixels_per_time_unit,
            self.pan_offset_px,
            price_min,
            price_max,
            self.insets,
            self.viewport,
        )
    }

    /// Price range for rendering under the given fit mode: the visible
    /// samples' padded extent when auto-fitting, the fitted store bounds
    /// otherwise. Falls back to the fitted bounds when nothing is visible.
    #[must_use]
    pub fn price_range_for(self, mode: PriceFitMode, visible: &[Sample]) -> (f64, f64) {
        if mode == PriceFitMode::FixedRange || visible.is_empty() {
            return (self.bounds.price_min, self.bounds.price_max);
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for sample in visible {
            min = min.min(sample.price);
            max = max.max(sample.price);
        }
        pad_span(min, max, self.padding_ratio, min_price_span(min, max))
    }

    fn recompute_scale(&mut self) {
        let span = self.bounds.time_end - self.bounds.time_start;
        self.pixels_per_time_unit = self.zoom_level * self.insets.plot_width(self.viewport) / span;
    }
}

/// Expands a raw span by `ratio` on each side, widening degenerate spans to
/// at least `min_span` around their midpoint first.
fn pad_span(min: f64, max: f64, ratio: f64, min_span: f64) -> (f64, f64) {
    let (min, max) = if max - min < min_span {
        let mid = (min + max) / 2.0;
        (mid - min_span / 2.0, mid + min_span / 2.0)
    } else {
        (min, max)
    };
    let padding = (max - min) * ratio;
    (min - padding, max + padding)
}

/// Minimum price span floor, scaled to the magnitude of the data so a
/// single-sample store still yields a usable axis.
fn min_price_span(min: f64, max: f64) -> f64 {
    let magnitude = min.abs().max(max.abs());
    (magnitude * 1e-3).max(1e-9)
}

fn fallback_bounds(now_seconds: f64) -> ViewportBounds {
    ViewportBounds {
        time_start: now_seconds - FALLBACK_WINDOW_SECONDS,
        time_end: now_seconds,
        price_min: 0.0,
        price_max: 1.0,
    }
}
