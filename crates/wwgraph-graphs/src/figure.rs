//! Composite figure assembly and text overlays

use crate::panel::{draw_panel, PanelSpec};
use crate::fonts;
use chrono::DateTime;
use chrono_tz::Tz;
use image::{ImageOutputFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::info;
use wwgraph_common::time::format_short;
use wwgraph_common::{Result, WwgraphError};
use wwgraph_data::Snapshot;

/// Canvas geometry: two 2400x2400 panels side by side, pasted 50px from the
/// top, leaving room for the title above and the footer below.
pub const CANVAS_WIDTH: u32 = 4800;
pub const CANVAS_HEIGHT: u32 = 2600;
const PANEL_WIDTH: u32 = 2400;
const PANEL_TOP: u32 = 50;
const PANEL_HEIGHT: u32 = 2400;

const TITLE_TEXT: &str = "@wastewater@tds.xyz Metro Vancouver Wastewater COVID-19 Summary";
const TITLE_POS: (i32, i32) = (50, 50);
const TITLE_SIZE: i32 = 72;
const FOOTER_POS: (i32, i32) = (20, 2500);
const FOOTER_SIZE: i32 = 36;

/// A rendered figure: a raw RGB raster plus its dimensions. Ephemeral; lives
/// only for the duration of one run.
#[derive(Debug, Clone)]
pub struct Figure {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Figure {
    /// Encode the figure as PNG bytes for upload.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let image = RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| WwgraphError::graph("figure buffer does not match its dimensions"))?;
        let mut cursor = Cursor::new(Vec::new());
        image
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .map_err(|e| WwgraphError::graph_with_source("PNG encoding failed", e))?;
        Ok(cursor.into_inner())
    }

    /// Write the figure as a PNG file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_png()?)?;
        info!(path = %path.as_ref().display(), "saved figure");
        Ok(())
    }
}

/// Render the composite figure for a snapshot. Fails fast with a descriptive
/// error when the snapshot is empty.
pub fn render(snapshot: &Snapshot, now: DateTime<Tz>) -> Result<Figure> {
    if snapshot.measurements.is_empty() {
        return Err(WwgraphError::graph("cannot render an empty snapshot"));
    }

    let family = fonts::font_family();
    let today = now.date_naive();
    let mut pixels = vec![0u8; (CANVAS_WIDTH * CANVAS_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (CANVAS_WIDTH, CANVAS_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE)?;

        // Grid: one column break at the panel seam, row breaks above and
        // below the panel band. Cells are row-major; the middle row holds
        // the two panels.
        let cells = root.split_by_breakpoints(
            [PANEL_WIDTH as i32],
            [PANEL_TOP as i32, (PANEL_TOP + PANEL_HEIGHT) as i32],
        );
        draw_panel(&cells[2], snapshot, &PanelSpec::all_time(), today, family)?;
        draw_panel(&cells[3], snapshot, &PanelSpec::recent(), today, family)?;

        let title_style = TextStyle::from((family, TITLE_SIZE).into_font()).color(&BLACK);
        root.draw(&Text::new(TITLE_TEXT, TITLE_POS, title_style))?;

        let footer = format!(
            "Plot generated {}. Data last updated {}. Data courtesy Metro Vancouver. \
             Follow me at https://mastodon.tds.xyz/@wastewater or @YVRCovidPlots on Twitter.",
            format_short(&now),
            format_short(&snapshot.last_updated),
        );
        let footer_style = TextStyle::from((family, FOOTER_SIZE).into_font()).color(&BLACK);
        root.draw(&Text::new(footer, FOOTER_POS, footer_style))?;

        root.present()?;
    }

    info!(
        width = CANVAS_WIDTH,
        height = CANVAS_HEIGHT,
        "rendered composite figure"
    );
    Ok(Figure {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use wwgraph_common::time::LOCAL_TZ;
    use wwgraph_data::Measurement;

    fn now() -> DateTime<Tz> {
        LOCAL_TZ.with_ymd_and_hms(2024, 3, 5, 9, 5, 0).unwrap()
    }

    #[test]
    fn test_empty_snapshot_is_rejected() {
        let snapshot = Snapshot {
            measurements: vec![],
            last_updated: now(),
        };
        let err = render(&snapshot, now()).unwrap_err();
        assert!(err.to_string().contains("empty snapshot"));
    }

    #[test]
    fn test_png_encoding_of_a_solid_figure() {
        let figure = Figure {
            width: 8,
            height: 4,
            pixels: vec![255; 8 * 4 * 3],
        };
        let png = figure.to_png().unwrap();
        // PNG magic number
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }

    #[test]
    fn test_mismatched_buffer_is_an_error() {
        let figure = Figure {
            width: 8,
            height: 4,
            pixels: vec![255; 10],
        };
        assert!(figure.to_png().is_err());
    }

    // Drawing text requires a resolvable system font, which not every test
    // host has; the full render path is exercised manually and in release
    // environments.
    #[test]
    #[ignore = "requires a system font"]
    fn test_full_render_produces_a_canvas_sized_figure() {
        let measurements = (1..=90u32)
            .map(|i| Measurement {
                plant: "Iona Island WWTP (Vancouver)".to_string(),
                date: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                value: Some(100.0),
                daily_load: Some(1.0e9 + (i as f64) * 1.0e7),
                note: None,
            })
            .collect();
        let snapshot = Snapshot {
            measurements,
            last_updated: now(),
        };
        let figure = render(&snapshot, now()).unwrap();
        let png = figure.to_png().unwrap();
        assert!(!png.is_empty());
    }
}
