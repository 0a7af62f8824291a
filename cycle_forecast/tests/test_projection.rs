use assert_approx_eq::assert_approx_eq;
use chrono::{Duration, NaiveDate};
use cycle_forecast::matching::AnalogMatch;
use cycle_forecast::projection::{ensemble_bounds, project_from_matches, Projection};

fn dates(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0..n).map(|i| start + Duration::days(i as i64)).collect()
}

fn projection(values: Vec<f64>) -> Projection {
    Projection {
        correlation: 0.9,
        values,
        start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
    }
}

#[test]
fn test_projection_extraction_and_truncation() {
    let cycle: Vec<f64> = (0..100).map(|i| i as f64).collect();
    let dates = dates(100);

    let matches = vec![
        AnalogMatch {
            start_idx: 10,
            end_idx: 30,
            correlation: 0.95,
        },
        // Ends 5 samples before the end of history: shorter projection
        AnalogMatch {
            start_idx: 75,
            end_idx: 95,
            correlation: 0.80,
        },
    ];

    let projections = project_from_matches(&cycle, &dates, &matches, 20);
    assert_eq!(projections.len(), 2);

    assert_eq!(projections[0].len(), 20);
    assert_approx_eq!(projections[0].values[0], 30.0);
    assert_eq!(projections[0].start_date, dates[10]);
    assert_eq!(projections[0].end_date, dates[30]);

    // Truncated to the 5 remaining samples, not padded
    assert_eq!(projections[1].len(), 5);
    assert_approx_eq!(projections[1].values[4], 99.0);
}

#[test]
fn test_match_at_end_of_history_is_skipped() {
    let cycle: Vec<f64> = (0..50).map(|i| i as f64).collect();
    let matches = vec![AnalogMatch {
        start_idx: 30,
        end_idx: 50,
        correlation: 0.9,
    }];
    let projections = project_from_matches(&cycle, &dates(50), &matches, 10);
    assert!(projections.is_empty());
}

#[test]
fn test_empty_projections_give_no_forecast() {
    assert!(ensemble_bounds(&[], 1.0).is_none());
}

#[test]
fn test_two_member_ensemble_uses_plain_extremes() {
    let projections = vec![
        projection(vec![1.0, 2.0, 3.0]),
        projection(vec![3.0, 0.0, 5.0]),
    ];

    let bounds = ensemble_bounds(&projections, 1.0).unwrap();
    assert_eq!(bounds.mean.len(), 3);
    assert_approx_eq!(bounds.mean[0], 2.0);
    assert_approx_eq!(bounds.upper[1], 2.0);
    assert_approx_eq!(bounds.lower[1], 0.0);

    for i in 0..3 {
        assert!(bounds.upper[i] >= bounds.mean[i]);
        assert!(bounds.mean[i] >= bounds.lower[i]);
    }
}

#[test]
fn test_second_most_extreme_bounds() {
    let projections = vec![
        projection(vec![1.0]),
        projection(vec![2.0]),
        projection(vec![3.0]),
        projection(vec![4.0]),
        projection(vec![100.0]),
    ];

    let bounds = ensemble_bounds(&projections, 1.0).unwrap();
    // The single most extreme analog (100.0) is discarded per direction
    assert_approx_eq!(bounds.upper[0], 4.0);
    assert_approx_eq!(bounds.lower[0], 2.0);
    assert_approx_eq!(bounds.mean[0], 22.0);
}

#[test]
fn test_ensemble_truncates_to_shortest_member() {
    let projections = vec![
        projection(vec![1.0, 1.0, 1.0, 1.0]),
        projection(vec![2.0, 2.0]),
        projection(vec![3.0, 3.0, 3.0]),
    ];

    let bounds = ensemble_bounds(&projections, 1.0).unwrap();
    assert_eq!(bounds.mean.len(), 2);
    assert_eq!(bounds.upper.len(), 2);
    assert_eq!(bounds.lower.len(), 2);
    assert_approx_eq!(bounds.mean[0], 2.0);
}

#[test]
fn test_normalization_divides_by_factor() {
    let projections = vec![projection(vec![2.0]), projection(vec![4.0])];
    let bounds = ensemble_bounds(&projections, 2.0).unwrap();
    assert_approx_eq!(bounds.mean[0], 1.5);
    assert_approx_eq!(bounds.upper[0], 2.0);
    assert_approx_eq!(bounds.lower[0], 1.0);
}
