//! Faceted time-series panel stacks
//!
//! A panel is a vertical stack of per-plant facets sharing the x axis range
//! but each with its own y scale. Every facet shows the raw daily loads as a
//! scatter, a LOESS trend curve, and a vertical marker at today's date.

use crate::loess;
use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;
use wwgraph_common::{Result, WwgraphError};
use wwgraph_data::{Measurement, Snapshot};

/// Daily loads are plotted scaled down by this factor
pub const LOAD_SCALE: f64 = 1e9;

/// Trend curve color (matplotlib default blue)
const TREND_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Layout and smoothing parameters for one panel stack
#[derive(Debug, Clone)]
pub struct PanelSpec {
    pub title: &'static str,
    /// Restrict the data to the last N days relative to the newest sample
    pub window_days: Option<i64>,
    /// LOESS span as a fraction of the windowed dataset
    pub loess_span: f64,
    /// Clamp the y axis floor to zero
    pub clamp_zero: bool,
    /// strftime pattern for x tick labels
    pub x_label_format: &'static str,
}

impl PanelSpec {
    /// Full-history panel: tight smoothing over the whole record.
    pub fn all_time() -> Self {
        Self {
            title: "All time",
            window_days: None,
            loess_span: 0.1,
            clamp_zero: false,
            x_label_format: "%b %Y",
        }
    }

    /// Recent-trend panel: last 60 days, wider smoothing, floor at zero.
    pub fn recent() -> Self {
        Self {
            title: "Last 60 days",
            window_days: Some(60),
            loess_span: 0.5,
            clamp_zero: true,
            x_label_format: "%b %d",
        }
    }
}

/// Select the measurements a panel shows. A window is taken relative to the
/// newest sample date in the snapshot, not the wall clock.
pub fn select_window(snapshot: &Snapshot, window_days: Option<i64>) -> Vec<&Measurement> {
    match (window_days, snapshot.latest_sample_date()) {
        (Some(days), Some(latest)) => {
            let cutoff = latest - Duration::days(days);
            snapshot
                .measurements
                .iter()
                .filter(|m| m.date >= cutoff)
                .collect()
        }
        _ => snapshot.measurements.iter().collect(),
    }
}

/// Draw one panel stack into the given drawing area.
pub fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    snapshot: &Snapshot,
    spec: &PanelSpec,
    today: NaiveDate,
    family: &str,
) -> Result<()>
where
    DB::ErrorType: std::error::Error + Send + Sync + 'static,
{
    let rows = select_window(snapshot, spec.window_days);
    if rows.is_empty() {
        return Err(WwgraphError::graph(format!(
            "no data to render for panel '{}'",
            spec.title
        )));
    }

    let plants = plants_in_order(&rows);
    debug!(panel = spec.title, facets = plants.len(), rows = rows.len(), "drawing panel");

    // All facets of a panel share the x range; only y scales are free
    let x_min = panel_x_start(&rows).ok_or_else(|| {
        WwgraphError::graph(format!("no dated rows for panel '{}'", spec.title))
    })?;

    let titled = area.titled(spec.title, (family, 48))?;
    let facets = titled.split_evenly((plants.len(), 1));
    for (facet, plant) in facets.iter().zip(&plants) {
        draw_facet(facet, &rows, plant, spec, x_min, today, family)?;
    }
    Ok(())
}

/// Earliest sample date across every plant in the windowed rows; the shared
/// x origin of a panel's facets.
fn panel_x_start(rows: &[&Measurement]) -> Option<NaiveDate> {
    rows.iter().map(|m| m.date).min()
}

fn plants_in_order(rows: &[&Measurement]) -> Vec<String> {
    let mut plants: Vec<String> = Vec::new();
    for m in rows {
        if !plants.iter().any(|p| p == &m.plant) {
            plants.push(m.plant.clone());
        }
    }
    plants
}

fn draw_facet<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[&Measurement],
    plant: &str,
    spec: &PanelSpec,
    x_min: NaiveDate,
    today: NaiveDate,
    family: &str,
) -> Result<()>
where
    DB::ErrorType: std::error::Error + Send + Sync + 'static,
{
    // Rows without a measured load exist for the CSV dump only
    let mut points: Vec<(NaiveDate, f64)> = rows
        .iter()
        .filter(|m| m.plant == plant)
        .filter_map(|m| m.daily_load.map(|load| (m.date, load / LOAD_SCALE)))
        .collect();
    points.sort_by_key(|(date, _)| *date);

    if points.is_empty() {
        return Ok(());
    }
    let x_end = today.max(x_min + Duration::days(1));

    let y_max_raw = points.iter().map(|(_, v)| *v).fold(f64::MIN, f64::max);
    let y_min_raw = points.iter().map(|(_, v)| *v).fold(f64::MAX, f64::min);
    let mut y_max = y_max_raw * 1.1;
    let y_min = if spec.clamp_zero {
        0.0
    } else {
        y_min_raw - (y_max_raw - y_min_raw) * 0.05
    };
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }

    let mut chart = ChartBuilder::on(area)
        .caption(plant, (family, 30))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(100)
        .build_cartesian_2d(x_min..x_end, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_labels(6)
        .y_labels(4)
        .x_label_formatter(&|date: &NaiveDate| date.format(spec.x_label_format).to_string())
        .label_style((family, 22))
        .axis_desc_style((family, 24))
        .x_desc("Date")
        .y_desc("COVID-19 copies/day / 1e9")
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|(date, load)| Circle::new((*date, *load), 4, BLACK.filled())),
    )?;

    // Trend curve: smooth in day-number space, then zip the fitted values
    // back onto the sorted dates
    let xs: Vec<(f64, f64)> = points
        .iter()
        .map(|(date, load)| (day_number(*date), *load))
        .collect();
    let fitted = loess::smooth(&xs, spec.loess_span);
    let trend: Vec<(NaiveDate, f64)> = points
        .iter()
        .map(|(date, _)| *date)
        .zip(fitted.iter().map(|(_, y)| *y))
        .collect();
    chart.draw_series(LineSeries::new(
        trend,
        ShapeStyle::from(&TREND_COLOR).stroke_width(3),
    ))?;

    // Today marker
    if today >= x_min {
        chart.draw_series(LineSeries::new(
            vec![(today, y_min), (today, y_max)],
            BLACK.mix(0.4),
        ))?;
    }

    Ok(())
}

fn day_number(date: NaiveDate) -> f64 {
    use chrono::Datelike;
    date.num_days_from_ce() as f64
}
