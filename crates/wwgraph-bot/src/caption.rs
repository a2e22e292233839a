//! Caption text shared by all platforms

use wwgraph_common::time::format_month_day;
use wwgraph_data::Snapshot;

/// Build the base caption for a snapshot.
///
/// Platform adapters append their own suffix via
/// [`Publisher::caption_suffix`](crate::Publisher::caption_suffix).
pub fn base_caption(snapshot: &Snapshot) -> String {
    let published = snapshot.last_updated.date_naive();
    let sampled = snapshot
        .latest_sample_date()
        .unwrap_or_else(|| snapshot.last_updated.date_naive());
    format!(
        "Metro Vancouver wastewater COVID surveillance data was published {}. \
         The most recent test was {}.",
        format_month_day(published),
        format_month_day(sampled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use wwgraph_common::time::LOCAL_TZ;
    use wwgraph_data::Measurement;

    fn snapshot(measurements: Vec<Measurement>) -> Snapshot {
        Snapshot {
            measurements,
            last_updated: LOCAL_TZ.with_ymd_and_hms(2024, 3, 5, 9, 5, 0).unwrap(),
        }
    }

    fn measurement(date: NaiveDate) -> Measurement {
        Measurement {
            plant: "Annacis Island".to_string(),
            date,
            value: Some(100.0),
            daily_load: Some(1.0e12),
            note: None,
        }
    }

    #[test]
    fn test_caption_names_publish_and_sample_dates() {
        let snapshot = snapshot(vec![
            measurement(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()),
            measurement(NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()),
        ]);
        assert_eq!(
            base_caption(&snapshot),
            "Metro Vancouver wastewater COVID surveillance data was published March 5. \
             The most recent test was March 3."
        );
    }

    #[test]
    fn test_caption_falls_back_to_publish_date_without_samples() {
        let snapshot = snapshot(vec![]);
        assert_eq!(
            base_caption(&snapshot),
            "Metro Vancouver wastewater COVID surveillance data was published March 5. \
             The most recent test was March 5."
        );
    }
}
