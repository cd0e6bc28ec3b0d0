use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::mapper::ViewportMapper;
use crate::core::{Sample, ScreenPoint};
use crate::error::{EngineError, EngineResult};

/// Trailing window lengths for the two simultaneously fitted trend lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendWindows {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for TrendWindows {
    fn default() -> Self {
        Self {
            short_window: 20,
            long_window: 50,
        }
    }
}

impl TrendWindows {
    pub fn validate(self) -> EngineResult<Self> {
        if self.short_window < 2 || self.long_window < 2 {
            return Err(EngineError::InvalidData(
                "trend windows must span at least 2 samples".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Least-squares fit over a trailing sample window, with its screen-space
/// endpoints already projected through the viewport mapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub window_sample_count: usize,
    /// Price change per sample index (not per time unit).
    pub slope: f64,
    pub intercept: f64,
    pub start_point: ScreenPoint,
    pub end_point: ScreenPoint,
}

/// Fits a trend line over the trailing `window` samples of the visible set.
///
/// The regression runs on price against sample index rather than raw
/// timestamps, which keeps the normal equations well conditioned for large
/// epoch values. Windows smaller than 2 samples produce no line.
pub fn fit_trend_line(
    visible: &[Sample],
    window: usize,
    mapper: ViewportMapper,
) -> EngineResult<Option<TrendLine>> {
    let count = window.min(visible.len());
    if count < 2 {
        return Ok(None);
    }

    let tail = &visible[visible.len() - count..];
    let n = count as f64;

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (index, sample) in tail.iter().enumerate() {
        let x = index as f64;
        sum_x += x;
        sum_y += sample.price;
        sum_xy += x * sample.price;
        sum_xx += x * x;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return Ok(None);
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    let first = tail.first().ok_or_else(|| {
        EngineError::InvalidData("trend window unexpectedly empty".to_owned())
    })?;
    let last = tail.last().ok_or_else(|| {
        EngineError::InvalidData("trend window unexpectedly empty".to_owned())
    })?;

    let start_point = ScreenPoint::new(
        mapper.time_to_x(first.time)?,
        mapper.price_to_y(intercept)?,
    );
    let end_point = ScreenPoint::new(
        mapper.time_to_x(last.time)?,
        mapper.price_to_y(intercept + slope * (n - 1.0))?,
    );

    Ok(Some(TrendLine {
        window_sample_count: count,
        slope,
        intercept,
        start_point,
        end_point,
    }))
}

/// Fits the short and long trend lines over the visible set.
///
/// The two windows are functionally identical and differ only in length;
/// visual distinction is the presentation layer's concern.
pub fn fit_trend_lines(
    visible: &[Sample],
    windows: TrendWindows,
    mapper: ViewportMapper,
) -> EngineResult<SmallVec<[TrendLine; 2]>> {
    let mut lines = SmallVec::new();
    if let Some(line) = fit_trend_line(visible, windows.short_window, mapper)? {
        lines.push(line);
    }
    if let Some(line) = fit_trend_line(visible, windows.long_window, mapper)? {
        lines.push(line);
    }
    Ok(lines)
}
