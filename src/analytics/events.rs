use serde::{Deserialize, Serialize};

use crate::core::Sample;
use crate::error::{EngineError, EngineResult};

/// Half-width of the symmetric neighborhood used by the detector.
const NEIGHBORHOOD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventDetectorConfig {
    /// Relative deviation above which a sample is flagged. The comparison
    /// is strict: a deviation exactly at the threshold is not an event.
    pub threshold: f64,
}

impl Default for EventDetectorConfig {
    fn default() -> Self {
        Self { threshold: 0.05 }
    }
}

impl EventDetectorConfig {
    pub fn validate(self) -> EngineResult<Self> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(EngineError::InvalidData(
                "event threshold must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// A sample flagged as a statistically notable local price movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventMarker {
    pub sample: Sample,
    /// Largest relative deviation that triggered the flag, for
    /// presentation-layer emphasis.
    pub magnitude: f64,
}

/// Flags samples whose price deviates from their symmetric neighborhood
/// mean by more than the configured threshold.
///
/// For each interior sample the mean of the `NEIGHBORHOOD` preceding and
/// following samples is compared against the sample's price. This is a
/// recall-oriented breakout detector for sharp local moves, not a
/// statistical significance test. Samples lacking a full neighborhood (the
/// first and last five of the visible set) are never flagged, so fewer
/// than eleven visible samples yield no events. Zero denominators suppress
/// that side of the comparison instead of propagating non-finite values.
#[must_use]
pub fn detect_events(visible: &[Sample], config: EventDetectorConfig) -> Vec<EventMarker> {
    if visible.len() < 2 * NEIGHBORHOOD + 1 {
        return Vec::new();
    }

    let mut markers = Vec::new();
    for index in NEIGHBORHOOD..visible.len() - NEIGHBORHOOD {
        let sample = visible[index];
        let preceding_mean = mean_price(&visible[index - NEIGHBORHOOD..index]);
        let following_mean = mean_price(&visible[index + 1..index + 1 + NEIGHBORHOOD]);

        let mut magnitude: f64 = 0.0;
        if preceding_mean != 0.0 {
            magnitude = magnitude.max((sample.price - preceding_mean).abs() / preceding_mean.abs());
        }
        if sample.price != 0.0 {
            magnitude = magnitude.max((following_mean - sample.price).abs() / sample.price.abs());
        }

        if magnitude > config.threshold {
            markers.push(EventMarker { sample, magnitude });
        }
    }
    markers
}

fn mean_price(samples: &[Sample]) -> f64 {
    let sum: f64 = samples.iter().map(|s| s.price).sum();
    sum / samples.len() as f64
}
