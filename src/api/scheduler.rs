use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One repeating cadence: an interval plus an enable flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CadenceConfig {
    pub interval_seconds: f64,
    pub enabled: bool,
}

impl CadenceConfig {
    #[must_use]
    pub fn new(interval_seconds: f64, enabled: bool) -> Self {
        Self {
            interval_seconds,
            enabled,
        }
    }

    pub fn validate(self) -> EngineResult<Self> {
        if !self.interval_seconds.is_finite() || self.interval_seconds <= 0.0 {
            return Err(EngineError::InvalidData(
                "cadence interval must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Intervals and enable flags for the three independent cadences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Recomputes visible set, trend lines and event markers.
    pub data_refresh: CadenceConfig,
    /// Cosmetic per-frame interpolation hook; the engine only reports the
    /// tick, it carries no correctness.
    pub animation: CadenceConfig,
    /// Pins the newest sample to the right edge while enabled.
    pub auto_scroll: CadenceConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            data_refresh: CadenceConfig::new(0.1, true),
            animation: CadenceConfig::new(0.016, true),
            auto_scroll: CadenceConfig::new(0.1, false),
        }
    }
}

impl SchedulerConfig {
    pub fn validate(self) -> EngineResult<Self> {
        self.data_refresh.validate()?;
        self.animation.validate()?;
        self.auto_scroll.validate()?;
        Ok(self)
    }
}

/// Fired-tick counts reported by one scheduler step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickOutcome {
    pub data_refresh_fired: u32,
    pub animation_fired: u32,
    pub auto_scroll_fired: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cadence {
    config: CadenceConfig,
    accumulated_seconds: f64,
}

impl Cadence {
    fn new(config: CadenceConfig) -> Self {
        Self {
            config,
            accumulated_seconds: 0.0,
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        self.accumulated_seconds = 0.0;
    }

    fn tick(&mut self, delta_seconds: f64) -> u32 {
        if !self.config.enabled {
            return 0;
        }

        self.accumulated_seconds += delta_seconds;
        let fired = (self.accumulated_seconds / self.config.interval_seconds) as u32;
        self.accumulated_seconds -= f64::from(fired) * self.config.interval_seconds;
        fired
    }
}

/// Drives the three cadences from an explicit host-supplied clock.
///
/// Nothing here blocks or spawns: the host calls `tick(delta_seconds)`
/// from whatever loop it owns (game loop, animation frame, test harness)
/// and reacts to the fired counts. Disabling a cadence is the only form of
/// cancellation; each tick is synchronous and short.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderScheduler {
    data_refresh: Cadence,
    animation: Cadence,
    auto_scroll: Cadence,
}

impl RenderScheduler {
    pub fn new(config: SchedulerConfig) -> EngineResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            data_refresh: Cadence::new(config.data_refresh),
            animation: Cadence::new(config.animation),
            auto_scroll: Cadence::new(config.auto_scroll),
        })
    }

    /// Advances all cadences by `delta_seconds` of host time.
    ///
    /// A delta spanning several intervals reports multiple fires, so slow
    /// hosts never silently lose refresh ticks.
    pub fn tick(&mut self, delta_seconds: f64) -> EngineResult<TickOutcome> {
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            return Err(EngineError::InvalidData(
                "tick delta must be finite and >= 0".to_owned(),
            ));
        }

        Ok(TickOutcome {
            data_refresh_fired: self.data_refresh.tick(delta_seconds),
            animation_fired: self.animation.tick(delta_seconds),
            auto_scroll_fired: self.auto_scroll.tick(delta_seconds),
        })
    }

    pub fn set_data_refresh_enabled(&mut self, enabled: bool) {
        self.data_refresh.set_enabled(enabled);
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        self.animation.set_enabled(enabled);
    }

    pub fn set_auto_scroll_enabled(&mut self, enabled: bool) {
        self.auto_scroll.set_enabled(enabled);
    }

    #[must_use]
    pub fn auto_scroll_enabled(&self) -> bool {
        self.auto_scroll.config.enabled
    }
}
