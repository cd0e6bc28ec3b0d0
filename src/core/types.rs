use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::error::{EngineError, EngineResult};

/// Pixel surface the engine maps into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One timestamped price/volume observation.
///
/// Samples are immutable once ingested. Duplicate timestamps are allowed;
/// the store preserves their arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Unix seconds. Fractional part carries sub-second resolution.
    pub time: f64,
    pub price: f64,
    pub volume: u64,
}

impl Sample {
    /// Builds a validated sample from raw floating values.
    pub fn new(time: f64, price: f64, volume: u64) -> EngineResult<Self> {
        if !time.is_finite() || !price.is_finite() {
            return Err(EngineError::InvalidData(
                "sample time and price must be finite".to_owned(),
            ));
        }

        Ok(Self {
            time,
            price,
            volume,
        })
    }

    /// Converts strongly-typed temporal/decimal input into a validated sample.
    pub fn from_decimal_time(
        time: DateTime<Utc>,
        price: Decimal,
        volume: u64,
    ) -> EngineResult<Self> {
        Self::new(
            datetime_to_unix_seconds(time),
            decimal_to_f64(price, "price")?,
            volume,
        )
    }
}

/// A point in pixel coordinates, origin at the top-left of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
