use tickline::api::{EngineEvent, ViewEngine, ViewEngineConfig};
use tickline::core::{Sample, Viewport};
use tickline::interaction::InteractionMode;

const BASE_TIME: f64 = 1_700_000_000.0;

fn engine_with_samples(count: usize) -> ViewEngine {
    let config = ViewEngineConfig::new(Viewport::new(1280, 720));
    let mut engine = ViewEngine::new(config).expect("engine init");
    let samples: Vec<Sample> = (0..count)
        .map(|i| {
            Sample::new(BASE_TIME + i as f64 * 60.0, 1_000.0 + i as f64, 5).expect("valid sample")
        })
        .collect();
    engine.set_samples("series", samples);
    engine.drain_events();
    engine
}

#[test]
fn dragging_right_brings_earlier_times_into_view() {
    let mut engine = engine_with_samples(100);
    let (start_before, _) = engine.viewport_state().visible_time_window();

    engine.pointer_down(600.0, 300.0);
    engine.pointer_move(680.0, 300.0).expect("pointer move");
    engine.pointer_up(680.0, 300.0).expect("pointer up");

    let (start_after, _) = engine.viewport_state().visible_time_window();
    assert!(start_after < start_before);
    assert_eq!(engine.interaction_mode(), InteractionMode::Idle);
    // A pan is not a click: no selection happened.
    assert!(engine.selection().is_none());
}

#[test]
fn dragged_content_follows_the_pointer() {
    let mut engine = engine_with_samples(100);
    let time_under_pointer = engine.map_x_to_time(600.0).expect("time under pointer");

    engine.pointer_down(600.0, 300.0);
    engine.pointer_move(680.0, 300.0).expect("pointer move");

    let x_after = engine.map_time_to_x(time_under_pointer).expect("map back");
    assert!((x_after - 680.0).abs() < 1e-6);
}

#[test]
fn pan_emits_viewport_changed_events() {
    let mut engine = engine_with_samples(100);
    engine.pointer_down(600.0, 300.0);
    engine.pointer_move(650.0, 300.0).expect("pointer move");

    let events = engine.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        EngineEvent::ViewportChanged(payload) if payload.pan_offset_px != 0.0
    )));
}

#[test]
fn click_selects_nearest_sample_in_normalized_space() {
    let mut engine = engine_with_samples(100);

    let target_time = BASE_TIME + 40.0 * 60.0;
    let x = engine.map_time_to_x(target_time).expect("x");
    let y = engine.map_price_to_y(1_040.0).expect("y");

    // Pointer lands slightly off the sample but well within its cell.
    engine.pointer_down(x + 1.0, y - 1.0);
    engine.pointer_up(x + 1.0, y - 1.0).expect("pointer up");

    let selection = engine.selection().expect("selection");
    assert_eq!(selection.sample.time, target_time);
    assert_eq!(selection.change, 1.0);
}

#[test]
fn clear_selection_resets_state_without_events() {
    let mut engine = engine_with_samples(20);
    let x = engine.map_time_to_x(BASE_TIME).expect("x");
    let y = engine.map_price_to_y(1_000.0).expect("y");
    engine.pointer_down(x, y);
    engine.pointer_up(x, y).expect("pointer up");
    assert!(engine.selection().is_some());
    engine.drain_events();

    engine.clear_selection();
    assert!(engine.selection().is_none());
    assert!(engine.drain_events().is_empty());
}

#[test]
fn auto_scroll_pins_latest_sample_to_the_right_edge() {
    let mut engine = engine_with_samples(100);
    engine.set_auto_scroll_enabled(true);

    engine.advance(0.1).expect("advance");

    let latest_time = engine.store().latest().expect("latest").time;
    let x = engine.map_time_to_x(latest_time).expect("x");
    let viewport = engine.viewport_state();
    let right_edge =
        viewport.insets().left_px + viewport.insets().plot_width(viewport.viewport());
    assert!((x - right_edge).abs() < 1e-6);
}

#[test]
fn drag_in_progress_suppresses_auto_scroll() {
    let mut engine = engine_with_samples(100);
    engine.set_auto_scroll_enabled(true);

    engine.pointer_down(600.0, 300.0);
    engine.pointer_move(700.0, 300.0).expect("pointer move");
    let pan_during_drag = engine.viewport_state().pan_offset_px();

    engine.advance(0.1).expect("advance");
    assert_eq!(engine.viewport_state().pan_offset_px(), pan_during_drag);

    // Releasing the drag hands the pan offset back to auto-scroll.
    engine.pointer_up(700.0, 300.0).expect("pointer up");
    engine.advance(0.1).expect("advance");
    assert_ne!(engine.viewport_state().pan_offset_px(), pan_during_drag);
}

#[test]
fn appending_live_samples_keeps_selection_and_refits_bounds() {
    let mut engine = engine_with_samples(50);
    let bounds_before = engine.viewport_state().bounds();

    engine.append_sample(
        Sample::new(BASE_TIME + 50.0 * 60.0, 2_000.0, 7).expect("valid sample"),
    );

    let bounds_after = engine.viewport_state().bounds();
    assert!(bounds_after.time_end > bounds_before.time_end);
    assert!(bounds_after.price_max > bounds_before.price_max);
}
