use serde::{Deserialize, Serialize};

use crate::analytics::{EventDetectorConfig, TrendWindows};
use crate::api::scheduler::SchedulerConfig;
use crate::core::mapper::PlotInsets;
use crate::core::{PriceFitMode, TimeRange, Viewport};
use crate::error::{EngineError, EngineResult};
use crate::interaction::PointerConfig;

/// Virtualization and analytics gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PerformanceMode {
    /// Full virtualization cap; trend and event analytics run.
    #[default]
    Normal,
    /// Reduced cap; trend and event analytics are skipped entirely.
    Reduced,
}

/// Public engine bootstrap configuration.
///
/// Serializable so host applications can persist/load engine setup without
/// inventing their own ad-hoc format. Every field has a sensible default;
/// `with_*` builders cover the common overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewEngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub time_range: TimeRange,
    #[serde(default = "default_zoom_level")]
    pub zoom_level: f64,
    #[serde(default)]
    pub performance_mode: PerformanceMode,
    #[serde(default)]
    pub price_fit_mode: PriceFitMode,
    #[serde(default = "default_virtualization_cap")]
    pub virtualization_cap: usize,
    #[serde(default = "default_reduced_cap")]
    pub reduced_cap: usize,
    #[serde(default)]
    pub event_detector: EventDetectorConfig,
    #[serde(default)]
    pub trend_windows: TrendWindows,
    #[serde(default)]
    pub pointer: PointerConfig,
    #[serde(default)]
    pub insets: PlotInsets,
    #[serde(default = "default_padding_ratio")]
    pub padding_ratio: f64,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl ViewEngineConfig {
    /// Creates a config over the given pixel surface with all defaults.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            time_range: TimeRange::default(),
            zoom_level: default_zoom_level(),
            performance_mode: PerformanceMode::default(),
            price_fit_mode: PriceFitMode::default(),
            virtualization_cap: default_virtualization_cap(),
            reduced_cap: default_reduced_cap(),
            event_detector: EventDetectorConfig::default(),
            trend_windows: TrendWindows::default(),
            pointer: PointerConfig::default(),
            insets: PlotInsets::default(),
            padding_ratio: default_padding_ratio(),
            scheduler: SchedulerConfig::default(),
        }
    }

    #[must_use]
    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    #[must_use]
    pub fn with_zoom_level(mut self, zoom_level: f64) -> Self {
        self.zoom_level = zoom_level;
        self
    }

    #[must_use]
    pub fn with_performance_mode(mut self, mode: PerformanceMode) -> Self {
        self.performance_mode = mode;
        self
    }

    #[must_use]
    pub fn with_price_fit_mode(mut self, mode: PriceFitMode) -> Self {
        self.price_fit_mode = mode;
        self
    }

    #[must_use]
    pub fn with_virtualization_caps(mut self, normal: usize, reduced: usize) -> Self {
        self.virtualization_cap = normal;
        self.reduced_cap = reduced;
        self
    }

    #[must_use]
    pub fn with_event_threshold(mut self, threshold: f64) -> Self {
        self.event_detector = EventDetectorConfig { threshold };
        self
    }

    #[must_use]
    pub fn with_trend_windows(mut self, short_window: usize, long_window: usize) -> Self {
        self.trend_windows = TrendWindows {
            short_window,
            long_window,
        };
        self
    }

    #[must_use]
    pub fn with_insets(mut self, insets: PlotInsets) -> Self {
        self.insets = insets;
        self
    }

    #[must_use]
    pub fn with_scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Virtualization cap under the active performance mode.
    #[must_use]
    pub fn active_cap(&self) -> usize {
        match self.performance_mode {
            PerformanceMode::Normal => self.virtualization_cap,
            PerformanceMode::Reduced => self.reduced_cap,
        }
    }

    /// Whether trend/event analytics run at all.
    #[must_use]
    pub fn analytics_enabled(&self) -> bool {
        self.performance_mode == PerformanceMode::Normal
    }

    pub fn validate(self) -> EngineResult<Self> {
        if !self.viewport.is_valid() {
            return Err(EngineError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.zoom_level.is_finite() || self.zoom_level <= 0.0 {
            return Err(EngineError::InvalidData(
                "zoom level must be finite and > 0".to_owned(),
            ));
        }
        if self.virtualization_cap == 0 || self.reduced_cap == 0 {
            return Err(EngineError::InvalidData(
                "virtualization caps must be > 0".to_owned(),
            ));
        }
        if !self.padding_ratio.is_finite() || self.padding_ratio < 0.0 {
            return Err(EngineError::InvalidData(
                "padding ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !self.pointer.click_threshold_px.is_finite() || self.pointer.click_threshold_px < 0.0 {
            return Err(EngineError::InvalidData(
                "click threshold must be finite and >= 0".to_owned(),
            ));
        }
        self.insets.validate()?;
        self.event_detector.validate()?;
        self.trend_windows.validate()?;
        self.scheduler.validate()?;
        Ok(self)
    }
}

fn default_zoom_level() -> f64 {
    1.0
}

fn default_virtualization_cap() -> usize {
    1_000
}

fn default_reduced_cap() -> usize {
    200
}

fn default_padding_ratio() -> f64 {
    0.10
}
