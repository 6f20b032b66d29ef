use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use tick_latency::metrics::DEFAULT_RANKS;
use tick_latency::{LatencyError, PercentileMethod, Statistics};

fn series(values_us: &[u64]) -> Vec<Duration> {
    values_us.iter().map(|&v| Duration::from_micros(v)).collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_five_sample_run() {
    let mut samples = series(&[30, 50, 10, 40, 20]);
    let stats = Statistics::compute(&mut samples, &DEFAULT_RANKS, PercentileMethod::Linear).unwrap();

    assert_eq!(stats.count, 5);
    assert_eq!(stats.min_us, 10.0);
    assert_eq!(stats.max_us, 50.0);
    assert_eq!(stats.mean_us, 30.0);
    // Σ(x − 30)² = 1000, / (5 − 1)
    assert_close(stats.stddev_us, 250f64.sqrt());

    assert_eq!(stats.percentile(50.0), Some(30.0));
    assert_close(stats.percentile(95.0).unwrap(), 48.0);
    assert_close(stats.percentile(99.0).unwrap(), 49.6);
    assert_close(stats.percentile(99.9).unwrap(), 49.96);
}

#[test]
fn test_five_sample_run_rank_method() {
    let mut samples = series(&[10, 20, 30, 40, 50]);
    let stats = Statistics::compute(&mut samples, &DEFAULT_RANKS, PercentileMethod::Rank).unwrap();

    // index = 2.5 → halfway between 30 and 40
    assert_eq!(stats.percentile(50.0), Some(35.0));
    // index 4.75, 4.95, 4.995 all clamp onto the last element
    assert_eq!(stats.percentile(95.0), Some(50.0));
    assert_eq!(stats.percentile(99.0), Some(50.0));
    assert_eq!(stats.percentile(99.9), Some(50.0));
}

#[test]
fn test_hundredth_percentile_is_max() {
    let mut samples = series(&[7, 3, 9, 1]);
    for method in [PercentileMethod::Linear, PercentileMethod::Rank] {
        let stats = Statistics::compute(&mut samples, &[100.0], method).unwrap();
        assert_eq!(stats.percentile(100.0), Some(stats.max_us));
        assert_eq!(stats.max_us, 9.0);
    }
}

#[test]
fn test_median_of_odd_and_even_length() {
    let mut odd = series(&[9, 1, 5, 3, 7]);
    let stats = Statistics::compute(&mut odd, &[50.0], PercentileMethod::Linear).unwrap();
    assert_eq!(stats.percentile(50.0), Some(5.0));

    let mut even = series(&[4_000, 1_000, 3_000, 2_000]);
    let stats = Statistics::compute(&mut even, &[50.0], PercentileMethod::Linear).unwrap();
    assert_eq!(stats.percentile(50.0), Some(2_500.0));
}

#[test]
fn test_identical_samples() {
    let mut samples = vec![Duration::from_nanos(4_000_250); 1_000];
    let stats = Statistics::compute(&mut samples, &DEFAULT_RANKS, PercentileMethod::Linear).unwrap();

    assert_eq!(stats.mean_us, 4_000.25);
    assert_eq!(stats.stddev_us, 0.0);
    assert_eq!(stats.min_us, 4_000.25);
    assert_eq!(stats.max_us, 4_000.25);
    for p in &stats.percentiles {
        assert_eq!(p.value_us, 4_000.25, "p{}", p.rank);
    }
}

#[test]
fn test_min_max_ignore_input_order() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut samples: Vec<Duration> = (1..=500u64).map(|v| Duration::from_micros(v * 3)).collect();
    samples.shuffle(&mut rng);

    let stats = Statistics::compute(&mut samples, &DEFAULT_RANKS, PercentileMethod::Linear).unwrap();
    assert_eq!(stats.min_us, 3.0);
    assert_eq!(stats.max_us, 1_500.0);
}

#[test]
fn test_percentiles_are_monotonic() {
    let mut rng = StdRng::seed_from_u64(42);
    let ranks: Vec<f64> = vec![1.0, 10.0, 25.0, 50.0, 75.0, 90.0, 95.0, 99.0, 99.9, 100.0];

    for method in [PercentileMethod::Linear, PercentileMethod::Rank] {
        let mut samples: Vec<Duration> = (0..997)
            .map(|_| Duration::from_nanos(rng.gen_range(3_500_000..4_500_000)))
            .collect();
        let stats = Statistics::compute(&mut samples, &ranks, method).unwrap();

        for pair in stats.percentiles.windows(2) {
            assert!(
                pair[0].value_us <= pair[1].value_us,
                "{:?}: p{} = {} > p{} = {}",
                method,
                pair[0].rank,
                pair[0].value_us,
                pair[1].rank,
                pair[1].value_us
            );
        }
        assert!(stats.min_us <= stats.percentiles[0].value_us);
        assert!(stats.percentiles.last().unwrap().value_us <= stats.max_us);
    }
}

#[test]
fn test_compute_is_repeatable() {
    let mut samples = series(&[12, 4, 8, 16, 2, 6]);
    let first = Statistics::compute(&mut samples, &DEFAULT_RANKS, PercentileMethod::Linear).unwrap();
    let second = Statistics::compute(&mut samples, &DEFAULT_RANKS, PercentileMethod::Linear).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_mean_sums_before_converting() {
    // 1.5 µs + 2.5 µs: converting each sample to whole µs first would give 1.5
    let mut samples = vec![Duration::from_nanos(1_500), Duration::from_nanos(2_500)];
    let stats = Statistics::compute(&mut samples, &[], PercentileMethod::Linear).unwrap();
    assert_eq!(stats.mean_us, 2.0);
    assert!(stats.percentiles.is_empty());
}

#[test]
fn test_fewer_than_two_samples() {
    for len in [0, 1] {
        let mut samples = vec![Duration::from_micros(4); len];
        let err = Statistics::compute(&mut samples, &DEFAULT_RANKS, PercentileMethod::Linear)
            .unwrap_err();
        assert!(matches!(
            err,
            LatencyError::InsufficientSamples { count, required: 2 } if count == len
        ));
    }
}
