use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Sample;
use crate::error::{EngineError, EngineResult};

/// Retention window applied to the active series.
///
/// Samples older than the window (measured from the newest sample) are
/// pruned on every mutation, bounding store growth under live feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeRange {
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl TimeRange {
    /// Retention span in seconds. `Month` uses 30 days.
    #[must_use]
    pub fn retention_seconds(self) -> f64 {
        match self {
            Self::Hour => 3_600.0,
            Self::Day => 86_400.0,
            Self::Week => 7.0 * 86_400.0,
            Self::Month => 30.0 * 86_400.0,
        }
    }
}

/// Time and price extent of the stored series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoreExtent {
    pub time_min: f64,
    pub time_max: f64,
    pub price_min: f64,
    pub price_max: f64,
}

/// Sole mutable owner of the active series.
///
/// The sample sequence is kept sorted ascending by timestamp at all times;
/// equal-timestamp samples keep their arrival order. Every mutation bumps
/// `revision` so downstream consumers can invalidate derived state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleStore {
    series_id: String,
    samples: Vec<Sample>,
    revision: u64,
}

impl SampleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Monotonic counter bumped on every mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Replaces the whole series.
    ///
    /// Input ordering is not required; the store stable-sorts by timestamp
    /// so equal-timestamp samples keep their arrival order.
    pub fn replace(&mut self, series_id: impl Into<String>, mut samples: Vec<Sample>) {
        samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.series_id = series_id.into();
        self.samples = samples;
        self.revision += 1;
        debug!(
            series_id = %self.series_id,
            count = self.samples.len(),
            "sample store replaced"
        );
    }

    /// Appends one sample, keeping the sequence sorted.
    ///
    /// In-order appends (the live-feed common case) are O(1); out-of-order
    /// arrivals are inserted after any equal-timestamp run to preserve
    /// arrival order.
    pub fn append(&mut self, sample: Sample) {
        match self.samples.last() {
            Some(last) if sample.time < last.time => {
                let index = self.samples.partition_point(|s| s.time <= sample.time);
                self.samples.insert(index, sample);
            }
            _ => self.samples.push(sample),
        }
        self.revision += 1;
    }

    /// Drops samples older than the retention window measured from the
    /// newest sample. No-op on an empty store.
    pub fn prune_to_range(&mut self, range: TimeRange) {
        let Some(latest) = self.samples.last() else {
            return;
        };

        let cutoff = latest.time - range.retention_seconds();
        let keep_from = self.samples.partition_point(|s| s.time < cutoff);
        if keep_from > 0 {
            self.samples.drain(..keep_from);
            self.revision += 1;
            debug!(pruned = keep_from, "sample store pruned to retention window");
        }
    }

    /// Time/price extent of the stored series, `None` when empty.
    #[must_use]
    pub fn extent(&self) -> Option<StoreExtent> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;

        let mut price_min = f64::INFINITY;
        let mut price_max = f64::NEG_INFINITY;
        for sample in &self.samples {
            price_min = price_min.min(sample.price);
            price_max = price_max.max(sample.price);
        }

        Some(StoreExtent {
            time_min: first.time,
            time_max: last.time,
            price_min,
            price_max,
        })
    }

    /// Index of `sample` in the stored sequence.
    ///
    /// Resolves duplicates at the same timestamp by scanning the
    /// equal-timestamp run, which is short in practice.
    #[must_use]
    pub fn position_of(&self, sample: &Sample) -> Option<usize> {
        let start = self.samples.partition_point(|s| s.time < sample.time);
        self.samples[start..]
            .iter()
            .take_while(|s| s.time == sample.time)
            .position(|s| s == sample)
            .map(|offset| start + offset)
    }

    /// Price change of the sample at `index` relative to its immediate
    /// predecessor: `(change, change_percent)`.
    ///
    /// The first sample has no predecessor and yields `(0.0, None)`;
    /// a zero predecessor price suppresses the percentage rather than
    /// propagating a non-finite value.
    pub fn change_at(&self, index: usize) -> EngineResult<(f64, Option<f64>)> {
        let sample = self.samples.get(index).ok_or_else(|| {
            EngineError::InvalidData(format!("sample index {index} out of bounds"))
        })?;

        let Some(previous) = index.checked_sub(1).and_then(|i| self.samples.get(i)) else {
            return Ok((0.0, None));
        };

        let change = sample.price - previous.price;
        let change_percent = if previous.price == 0.0 {
            None
        } else {
            Some(change / previous.price * 100.0)
        };
        Ok((change, change_percent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f64, price: f64) -> Sample {
        Sample::new(time, price, 1).expect("valid sample")
    }

    #[test]
    fn replace_sorts_and_keeps_duplicate_arrival_order() {
        let mut store = SampleStore::new();
        store.replace(
            "btc-usd",
            vec![sample(3.0, 30.0), sample(1.0, 10.0), sample(3.0, 31.0)],
        );

        let times: Vec<f64> = store.samples().iter().map(|s| s.time).collect();
        assert_eq!(times, vec![1.0, 3.0, 3.0]);
        assert_eq!(store.samples()[1].price, 30.0);
        assert_eq!(store.samples()[2].price, 31.0);
    }

    #[test]
    fn out_of_order_append_inserts_after_equal_run() {
        let mut store = SampleStore::new();
        store.replace("s", vec![sample(1.0, 1.0), sample(2.0, 2.0)]);
        store.append(sample(1.0, 1.5));

        let prices: Vec<f64> = store.samples().iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![1.0, 1.5, 2.0]);
    }

    #[test]
    fn prune_drops_samples_outside_retention() {
        let mut store = SampleStore::new();
        store.replace(
            "s",
            vec![sample(0.0, 1.0), sample(10.0, 2.0), sample(4_000.0, 3.0)],
        );
        store.prune_to_range(TimeRange::Hour);

        assert_eq!(store.len(), 1);
        assert_eq!(store.samples()[0].time, 4_000.0);
    }

    #[test]
    fn change_at_uses_immediate_predecessor() {
        let mut store = SampleStore::new();
        store.replace("s", vec![sample(1.0, 100.0), sample(2.0, 110.0)]);

        let (change, pct) = store.change_at(1).expect("change");
        assert_eq!(change, 10.0);
        assert!((pct.expect("percent") - 10.0).abs() < 1e-12);

        let (first_change, first_pct) = store.change_at(0).expect("change");
        assert_eq!(first_change, 0.0);
        assert!(first_pct.is_none());
    }

    #[test]
    fn change_percent_suppressed_on_zero_predecessor() {
        let mut store = SampleStore::new();
        store.replace("s", vec![sample(1.0, 0.0), sample(2.0, 5.0)]);

        let (change, pct) = store.change_at(1).expect("change");
        assert_eq!(change, 5.0);
        assert!(pct.is_none());
    }
}
