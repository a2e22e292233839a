//! Cleaned dataset model

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

/// One cleaned row: a (plant, date) pair with the measured concentration
/// and the computed daily viral load. Rows whose note marks them as
/// unsampled never reach this type; rows the lab reported without a usable
/// measurement do, with `None` values, so the CSV dump stays complete.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Display name of the treatment plant
    pub plant: String,
    /// Sample date
    pub date: NaiveDate,
    /// Measured concentration as reported by the portal
    pub value: Option<f64>,
    /// Computed daily viral load (copies/day); plotted scaled by 1e9
    pub daily_load: Option<f64>,
    /// Upstream annotation, e.g. a re-test remark
    pub note: Option<String>,
}

/// Result of one fetch: cleaned rows plus the upstream modification time.
/// Built fresh each run and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub measurements: Vec<Measurement>,
    /// When the portal last modified the list, in the local timezone
    pub last_updated: DateTime<Tz>,
}

impl Snapshot {
    /// Date of the most recent sample across all plants.
    pub fn latest_sample_date(&self) -> Option<NaiveDate> {
        self.measurements.iter().map(|m| m.date).max()
    }

    /// Plant display names in order of first appearance.
    pub fn plants(&self) -> Vec<&str> {
        let mut plants: Vec<&str> = Vec::new();
        for m in &self.measurements {
            if !plants.contains(&m.plant.as_str()) {
                plants.push(m.plant.as_str());
            }
        }
        plants
    }

    /// Render the cleaned dataset as CSV, for the `--dump-csv` flag. Missing
    /// values and notes render as empty cells.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("CalculatedDate,Plant,Value,DailyLoad,Note\n");
        for m in &self.measurements {
            out.push_str(&format!(
                "{},\"{}\",{},{},{}\n",
                m.date,
                m.plant,
                m.value.map(|v| v.to_string()).unwrap_or_default(),
                m.daily_load.map(|v| v.to_string()).unwrap_or_default(),
                m.note.as_ref().map(|n| format!("\"{n}\"")).unwrap_or_default(),
            ));
        }
        out
    }
}

/// Map a raw plant identifier to its display name; unknown identifiers pass
/// through unchanged.
pub fn display_plant_name(raw: &str) -> String {
    match raw {
        "Iona Island" => "Iona Island WWTP (Vancouver)",
        "Annacis Island" => "Annacis Island WWTP (Fraser area)",
        "Lulu Island" => "Lulu Island WWTP (Richmond)",
        "Lions Gate" => "Lions Gate WWTP (North Shore)",
        "Northwest Langley" => "Northwest Langley WWTP",
        other => other,
    }
    .to_string()
}
