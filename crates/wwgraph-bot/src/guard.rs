//! Duplicate-post guard and marker-file persistence

use chrono::{DateTime, Duration, FixedOffset};
use chrono_tz::Tz;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use wwgraph_common::Result;

/// Upstream data younger than this is considered still settling
const SETTLE_MINUTES: i64 = 30;

/// Decide whether a snapshot should be published.
///
/// Rules, in order: no marker publishes; a marker at or past the snapshot's
/// last-updated time blocks; data newer than 30 minutes blocks; anything
/// else publishes.
pub fn should_publish(
    marker: Option<DateTime<FixedOffset>>,
    last_updated: DateTime<Tz>,
    now: DateTime<Tz>,
) -> bool {
    let Some(marker) = marker else {
        debug!("no marker present, publishing");
        return true;
    };
    if marker >= last_updated {
        debug!(%marker, %last_updated, "data unchanged since last publish");
        return false;
    }
    if now.signed_duration_since(last_updated) < Duration::minutes(SETTLE_MINUTES) {
        debug!(%last_updated, "data still settling, not publishing yet");
        return false;
    }
    true
}

/// The marker file: one RFC 3339 timestamp recording the last-updated time
/// of the most recently published snapshot.
#[derive(Debug, Clone)]
pub struct Marker {
    path: PathBuf,
}

impl Marker {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the marker. A missing or unparseable file reads as absent so the
    /// guard fails open to "should publish".
    pub fn load(&self) -> Option<DateTime<FixedOffset>> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "ignoring unparseable marker file"
                );
                None
            }
        }
    }

    /// Overwrite the marker with the given timestamp.
    pub fn store(&self, ts: &DateTime<Tz>) -> Result<()> {
        std::fs::write(&self.path, ts.to_rfc3339())?;
        debug!(path = %self.path.display(), marker = %ts, "stored marker");
        Ok(())
    }
}
