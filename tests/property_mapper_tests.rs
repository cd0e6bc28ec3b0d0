use proptest::prelude::*;
use tickline::api::{ViewEngine, ViewEngineConfig};
use tickline::core::mapper::{PlotInsets, ViewportMapper};
use tickline::core::{Sample, Viewport};

fn mapper(
    time_start: f64,
    pixels_per_time_unit: f64,
    pan_offset_px: f64,
    price_min: f64,
    price_max: f64,
) -> ViewportMapper {
    ViewportMapper::new(
        time_start,
        pixels_per_time_unit,
        pan_offset_px,
        price_min,
        price_max,
        PlotInsets::default(),
        Viewport::new(1280, 720),
    )
    .expect("valid mapper")
}

proptest! {
    #[test]
    fn time_axis_round_trips_within_tolerance(
        time_start in -1.0e6f64..1.0e6,
        ppt in 1.0e-3f64..1.0e3,
        pan in -1.0e4f64..1.0e4,
        x in 0.0f64..2_000.0
    ) {
        let mapper = mapper(time_start, ppt, pan, 0.0, 100.0);
        let time = mapper.x_to_time(x).expect("x to time");
        let back = mapper.time_to_x(time).expect("time to x");
        prop_assert!((back - x).abs() <= 1e-4);
    }

    #[test]
    fn price_axis_round_trips_within_tolerance(
        price_min in -1.0e6f64..1.0e6,
        span in 1.0e-3f64..1.0e6,
        y in 0.0f64..696.0
    ) {
        let mapper = mapper(0.0, 1.0, 0.0, price_min, price_min + span);
        let price = mapper.y_to_price(y).expect("y to price");
        let back = mapper.price_to_y(price).expect("price to y");
        prop_assert!((back - y).abs() <= 1e-4);
    }

    #[test]
    fn price_axis_is_inverted(
        price_min in -1.0e3f64..1.0e3,
        span in 1.0f64..1.0e3
    ) {
        let mapper = mapper(0.0, 1.0, 0.0, price_min, price_min + span);
        let y_low = mapper.price_to_y(price_min).expect("low");
        let y_high = mapper.price_to_y(price_min + span).expect("high");
        // Higher price maps to a smaller y.
        prop_assert!(y_high < y_low);
    }

    #[test]
    fn wheel_zoom_keeps_the_anchored_time_under_the_pointer(
        factor in 0.2f64..5.0,
        anchor_x in 70.0f64..1_270.0
    ) {
        let config = ViewEngineConfig::new(Viewport::new(1280, 720));
        let mut engine = ViewEngine::new(config).expect("engine init");
        let samples: Vec<Sample> = (0..100)
            .map(|i| {
                Sample::new(1_700_000_000.0 + i as f64 * 60.0, 500.0 + i as f64, 1)
                    .expect("valid sample")
            })
            .collect();
        engine.set_samples("series", samples);

        let anchored_time = engine.map_x_to_time(anchor_x).expect("anchor time");
        engine.wheel_zoom(factor, anchor_x).expect("wheel zoom");
        let x_after = engine.map_time_to_x(anchored_time).expect("map back");

        prop_assert!((x_after - anchor_x).abs() <= 1e-6);
    }
}
