use tickline::analytics::{EventDetectorConfig, detect_events};
use tickline::core::Sample;

fn series(prices: &[f64]) -> Vec<Sample> {
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| Sample::new(i as f64, *price, 1).expect("valid sample"))
        .collect()
}

/// Eleven flat samples with the center price overridden.
fn flat_with_center(center_price: f64) -> Vec<Sample> {
    let mut prices = vec![100.0; 11];
    prices[5] = center_price;
    series(&prices)
}

#[test]
fn deviation_exactly_at_threshold_is_not_flagged() {
    // 105 against a preceding mean of 100 is exactly a 5.0% deviation; the
    // comparison is strict, so the boundary case stays unflagged.
    let events = detect_events(&flat_with_center(105.0), EventDetectorConfig::default());
    assert!(events.is_empty());
}

#[test]
fn deviation_just_above_threshold_is_flagged() {
    let events = detect_events(&flat_with_center(105.01), EventDetectorConfig::default());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].sample.time, 5.0);
    assert!(events[0].magnitude > 0.05);
}

#[test]
fn drop_below_threshold_on_the_following_side_is_flagged() {
    // Flat at 100, then a cliff: sample 5 sits right before the drop, so
    // its following mean deviates from its own price.
    let mut prices = vec![100.0; 6];
    prices.extend(vec![80.0; 5]);
    let events = detect_events(&series(&prices), EventDetectorConfig::default());

    assert!(!events.is_empty());
    assert!(events.iter().any(|e| e.sample.time == 5.0));
}

#[test]
fn fewer_than_eleven_samples_yield_no_events() {
    let mut prices = vec![100.0; 10];
    prices[5] = 200.0;
    let events = detect_events(&series(&prices), EventDetectorConfig::default());
    assert!(events.is_empty());
}

#[test]
fn first_and_last_five_samples_are_never_flagged() {
    let mut prices = vec![100.0; 13];
    prices[1] = 500.0;
    prices[12] = 500.0;
    let events = detect_events(&series(&prices), EventDetectorConfig::default());
    // The spikes sit inside the guard bands; only interior samples whose
    // neighborhood means shift may be flagged, and none of them are the
    // spikes themselves.
    assert!(events.iter().all(|e| e.sample.time != 1.0 && e.sample.time != 12.0));
}

#[test]
fn zero_denominators_suppress_the_comparison_instead_of_flagging_nan() {
    let events = detect_events(&series(&[0.0; 11]), EventDetectorConfig::default());
    assert!(events.is_empty());
}

#[test]
fn custom_threshold_is_respected() {
    let config = EventDetectorConfig { threshold: 0.01 };
    let events = detect_events(&flat_with_center(102.0), config);
    assert_eq!(events.len(), 1);
}
