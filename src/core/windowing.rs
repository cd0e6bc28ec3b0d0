use crate::core::Sample;

/// Selects the ordered subset of `samples` whose timestamp falls inside the
/// inclusive time window, capped at `max_count`.
///
/// `samples` must be sorted ascending by timestamp (the store invariant);
/// window bounds are located with binary search so per-frame cost stays
/// sublinear in the store size. When the raw slice exceeds the cap it is
/// thinned by stride, keeping every Nth sample so the whole window stays
/// represented instead of truncating its tail.
#[must_use]
pub fn visible_slice(samples: &[Sample], start: f64, end: f64, max_count: usize) -> Vec<Sample> {
    if max_count == 0 || samples.is_empty() {
        return Vec::new();
    }

    let (min_t, max_t) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };

    let from = samples.partition_point(|s| s.time < min_t);
    let to = samples.partition_point(|s| s.time <= max_t);
    let window = &samples[from..to];

    if window.len() <= max_count {
        return window.to_vec();
    }

    let stride = window.len().div_ceil(max_count);
    window.iter().step_by(stride).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(count: usize) -> Vec<Sample> {
        (0..count)
            .map(|i| Sample::new(i as f64, 100.0 + i as f64, 1).expect("valid sample"))
            .collect()
    }

    #[test]
    fn selects_only_samples_inside_window() {
        let samples = series(10);
        let visible = visible_slice(&samples, 2.0, 5.0, 100);

        let times: Vec<f64> = visible.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn reversed_window_bounds_are_normalized() {
        let samples = series(10);
        assert_eq!(visible_slice(&samples, 5.0, 2.0, 100).len(), 4);
    }

    #[test]
    fn window_outside_extent_is_empty() {
        let samples = series(10);
        assert!(visible_slice(&samples, 50.0, 90.0, 100).is_empty());
        assert!(visible_slice(&samples, -10.0, -1.0, 100).is_empty());
    }

    #[test]
    fn thinning_keeps_every_nth_across_the_whole_window() {
        let samples = series(100);
        let visible = visible_slice(&samples, 0.0, 99.0, 10);

        assert!(visible.len() <= 10);
        assert_eq!(visible.first().map(|s| s.time), Some(0.0));
        // Stride thinning must reach deep into the window, not stop at the
        // first max_count samples.
        assert!(visible.last().map(|s| s.time).expect("non-empty") >= 90.0);
    }

    #[test]
    fn thinned_result_is_an_ordered_subsequence() {
        let samples = series(57);
        let visible = visible_slice(&samples, 0.0, 56.0, 9);

        let mut cursor = 0usize;
        for sample in &visible {
            let found = samples[cursor..]
                .iter()
                .position(|s| s == sample)
                .expect("visible sample must come from the store in order");
            cursor += found + 1;
        }
    }
}
