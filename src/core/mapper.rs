use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{EngineError, EngineResult};

/// Fixed gutters reserved inside the viewport: a left strip for the price
/// scale and a bottom strip for the time scale. The plot area is what
/// remains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotInsets {
    pub left_px: f64,
    pub bottom_px: f64,
}

impl Default for PlotInsets {
    fn default() -> Self {
        Self {
            left_px: 64.0,
            bottom_px: 24.0,
        }
    }
}

impl PlotInsets {
    pub fn validate(self) -> EngineResult<Self> {
        if !self.left_px.is_finite()
            || !self.bottom_px.is_finite()
            || self.left_px < 0.0
            || self.bottom_px < 0.0
        {
            return Err(EngineError::InvalidData(
                "plot insets must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn plot_width(self, viewport: Viewport) -> f64 {
        f64::from(viewport.width) - self.left_px
    }

    #[must_use]
    pub fn plot_height(self, viewport: Viewport) -> f64 {
        f64::from(viewport.height) - self.bottom_px
    }
}

/// Pure bidirectional mapping between domain coordinates (time, price) and
/// pixel coordinates (x, y).
///
/// `time_to_x` is affine in elapsed time since `time_start`, scaled by
/// `pixels_per_time_unit` and offset by the left gutter plus the pan
/// offset. `price_to_y` inverts the price axis (higher price, smaller y)
/// above the bottom gutter. Zoom only ever changes the scale factor and
/// pan only the pixel offset, so each function is the exact inverse of its
/// pair within floating-point tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportMapper {
    time_start: f64,
    pixels_per_time_unit: f64,
    pan_offset_px: f64,
    price_min: f64,
    price_max: f64,
    left_gutter_px: f64,
    plot_height_px: f64,
}

impl ViewportMapper {
    pub fn new(
        time_start: f64,
        pixels_per_time_unit: f64,
        pan_offset_px: f64,
        price_min: f64,
        price_max: f64,
        insets: PlotInsets,
        viewport: Viewport,
    ) -> EngineResult<Self> {
        if !viewport.is_valid() {
            return Err(EngineError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if !time_start.is_finite() || !pan_offset_px.is_finite() {
            return Err(EngineError::InvalidData(
                "mapper time origin and pan offset must be finite".to_owned(),
            ));
        }
        if !pixels_per_time_unit.is_finite() || pixels_per_time_unit <= 0.0 {
            return Err(EngineError::InvalidData(
                "pixels per time unit must be finite and > 0".to_owned(),
            ));
        }
        if !price_min.is_finite() || !price_max.is_finite() || price_min >= price_max {
            return Err(EngineError::InvalidData(
                "mapper price range must be finite and non-empty".to_owned(),
            ));
        }

        let insets = insets.validate()?;
        let plot_height_px = insets.plot_height(viewport);
        if plot_height_px <= 0.0 || insets.plot_width(viewport) <= 0.0 {
            return Err(EngineError::InvalidData(
                "plot area must have positive width and height".to_owned(),
            ));
        }

        Ok(Self {
            time_start,
            pixels_per_time_unit,
            pan_offset_px,
            price_min,
            price_max,
            left_gutter_px: insets.left_px,
            plot_height_px,
        })
    }

    pub fn time_to_x(self, time: f64) -> EngineResult<f64> {
        if !time.is_finite() {
            return Err(EngineError::InvalidData("time must be finite".to_owned()));
        }
        Ok(self.left_gutter_px
            + (time - self.time_start) * self.pixels_per_time_unit
            + self.pan_offset_px)
    }

    pub fn x_to_time(self, x: f64) -> EngineResult<f64> {
        if !x.is_finite() {
            return Err(EngineError::InvalidData("pixel must be finite".to_owned()));
        }
        Ok(self.time_start
            + (x - self.left_gutter_px - self.pan_offset_px) / self.pixels_per_time_unit)
    }

    pub fn price_to_y(self, price: f64) -> EngineResult<f64> {
        if !price.is_finite() {
            return Err(EngineError::InvalidData("price must be finite".to_owned()));
        }
        let span = self.price_max - self.price_min;
        Ok(self.plot_height_px * (self.price_max - price) / span)
    }

    pub fn y_to_price(self, y: f64) -> EngineResult<f64> {
        if !y.is_finite() {
            return Err(EngineError::InvalidData("pixel must be finite".to_owned()));
        }
        let span = self.price_max - self.price_min;
        Ok(self.price_max - y / self.plot_height_px * span)
    }

    #[must_use]
    pub fn price_range(self) -> (f64, f64) {
        (self.price_min, self.price_max)
    }

    #[must_use]
    pub fn pixels_per_time_unit(self) -> f64 {
        self.pixels_per_time_unit
    }
}
