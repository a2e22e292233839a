//! Integration tests for the rendering crate's data-shaping layers

use chrono::{Duration, NaiveDate, TimeZone};
use wwgraph_common::time::LOCAL_TZ;
use wwgraph_data::{Measurement, Snapshot};
use wwgraph_graphs::panel::{select_window, PanelSpec};
use wwgraph_graphs::{loess, render};

fn snapshot_with_two_plants() -> Snapshot {
    let start = NaiveDate::from_ymd_opt(2023, 10, 1).unwrap();
    let mut measurements = Vec::new();
    for plant in ["Iona Island WWTP (Vancouver)", "Lions Gate WWTP (North Shore)"] {
        for i in 0..120i64 {
            measurements.push(Measurement {
                plant: plant.to_string(),
                date: start + Duration::days(i),
                value: Some(50.0),
                daily_load: Some(8.0e8 + (i as f64) * 5.0e6),
                note: None,
            });
        }
    }
    Snapshot {
        measurements,
        last_updated: LOCAL_TZ.with_ymd_and_hms(2024, 1, 29, 8, 0, 0).unwrap(),
    }
}

#[test]
fn recent_spec_window_trims_old_samples() {
    let snapshot = snapshot_with_two_plants();
    let spec = PanelSpec::recent();
    let rows = select_window(&snapshot, spec.window_days);
    assert!(!rows.is_empty());
    assert!(rows.len() < snapshot.measurements.len());

    let latest = snapshot.latest_sample_date().unwrap();
    let cutoff = latest - Duration::days(60);
    assert!(rows.iter().all(|m| m.date >= cutoff));
}

#[test]
fn loess_follows_a_slow_ramp() {
    let points: Vec<(f64, f64)> = (0..100).map(|i| (i as f64, i as f64 * 0.5)).collect();
    let fitted = loess::smooth(&points, 0.1);
    assert_eq!(fitted.len(), points.len());
    // Endpoints of a linear ramp must be fitted closely
    assert!((fitted[0].1 - 0.0).abs() < 1e-6);
    assert!((fitted[99].1 - 49.5).abs() < 1e-6);
}

#[test]
fn rendering_an_empty_snapshot_fails_fast() {
    let snapshot = Snapshot {
        measurements: vec![],
        last_updated: LOCAL_TZ.with_ymd_and_hms(2024, 1, 29, 8, 0, 0).unwrap(),
    };
    let now = LOCAL_TZ.with_ymd_and_hms(2024, 1, 29, 9, 0, 0).unwrap();
    assert!(render(&snapshot, now).is_err());
}
