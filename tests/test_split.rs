use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stock_forecast::error::ForecastError;
use stock_forecast::features::{Dataset, FeatureRow};
use stock_forecast::split::{random_fraction, tail_window};

fn dataset_of(n: usize) -> Dataset {
    let rows = (0..n)
        .map(|i| FeatureRow::new(i as f64, vec![i as f64 - 1.0]))
        .collect();
    Dataset::new(rows, 1)
}

#[test]
fn test_tail_window_reserves_last_rows_in_order() {
    let dataset = dataset_of(6);
    let split = tail_window(&dataset, 2).unwrap();

    assert_eq!(split.train.len(), 4);
    assert_eq!(split.test.len(), 2);
    assert_eq!(split.train.labels(), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(split.test.labels(), vec![4.0, 5.0]);
}

#[test]
fn test_tail_window_partition_is_exact() {
    let dataset = dataset_of(20);
    let split = tail_window(&dataset, 7).unwrap();

    let mut recombined = split.train.labels();
    recombined.extend(split.test.labels());
    assert_eq!(recombined, dataset.labels());
}

#[test]
fn test_tail_window_rejects_degenerate_sizes() {
    let dataset = dataset_of(5);
    assert!(matches!(
        tail_window(&dataset, 0),
        Err(ForecastError::InsufficientData(_))
    ));
    assert!(matches!(
        tail_window(&dataset, 5),
        Err(ForecastError::InsufficientData(_))
    ));
    assert!(matches!(
        tail_window(&dataset, 9),
        Err(ForecastError::InsufficientData(_))
    ));
}

#[test]
fn test_random_fraction_partitions_every_row() {
    let dataset = dataset_of(100);
    let mut rng = StdRng::seed_from_u64(7);
    let split = random_fraction(&dataset, 0.3, &mut rng).unwrap();

    assert_eq!(split.train.len() + split.test.len(), dataset.len());
    assert!(!split.train.is_empty());
    assert!(!split.test.is_empty());

    // Every row lands in exactly one side
    let mut labels: Vec<f64> = split.train.labels();
    labels.extend(split.test.labels());
    labels.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(labels, dataset.labels());

    // The holdout should be in the neighborhood of the requested fraction
    let fraction = split.test.len() as f64 / dataset.len() as f64;
    assert!((0.1..0.5).contains(&fraction), "got fraction {}", fraction);
}

#[test]
fn test_random_fraction_rejects_bad_fractions() {
    let dataset = dataset_of(10);
    let mut rng = StdRng::seed_from_u64(7);
    for bad in [0.0, 1.0, 1.5, -0.2] {
        assert!(matches!(
            random_fraction(&dataset, bad, &mut rng),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
}

#[test]
fn test_random_fraction_rejects_empty_side() {
    // A single row always leaves one side empty
    let dataset = dataset_of(1);
    let mut rng = StdRng::seed_from_u64(7);
    assert!(matches!(
        random_fraction(&dataset, 0.5, &mut rng),
        Err(ForecastError::InsufficientData(_))
    ));
}
