//! Font selection with an explicit fallback chain
//!
//! The candidate list mirrors the faces commonly installed on the Linux and
//! macOS hosts this runs on. Selection never fails: when no candidate can be
//! laid out, the generic sans-serif face is used and plotters resolves it
//! through the system font database at draw time.

use plotters::style::{FontDesc, FontFamily, FontStyle};
use tracing::debug;

const CANDIDATE_FAMILIES: &[&str] = &["Liberation Sans", "Helvetica", "DejaVu Sans"];

const FALLBACK_FAMILY: &str = "sans-serif";

/// Pick the first candidate family that can actually be laid out.
pub fn font_family() -> &'static str {
    for &name in CANDIDATE_FAMILIES {
        let desc = FontDesc::new(FontFamily::Name(name), 12.0, FontStyle::Normal);
        if desc.layout_box("Ag").is_ok() {
            debug!(family = name, "selected font family");
            return name;
        }
    }
    debug!("no candidate font found, using generic sans-serif");
    FALLBACK_FAMILY
}
