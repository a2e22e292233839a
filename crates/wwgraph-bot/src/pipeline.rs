//! The run pipeline: fetch, guard, render, publish, mark

use crate::caption::base_caption;
use crate::guard::{self, Marker};
use crate::publisher::Publisher;
use chrono::Utc;
use std::path::PathBuf;
use tracing::{error, info, instrument};
use wwgraph_common::time::LOCAL_TZ;
use wwgraph_common::Result;
use wwgraph_data::{PortalClient, Snapshot};

const PLOT_FILE: &str = "image.png";
const CSV_FILE: &str = "wastewater.csv";

/// What one invocation of the bot should do besides fetching.
#[derive(Debug, Default)]
pub struct RunOptions {
    /// Write the rendered figure to `image.png` in the working directory.
    pub save_plot: bool,
    /// Write the cleaned dataset to `wastewater.csv`.
    pub dump_csv: bool,
    /// Marker file consulted and updated by the duplicate-post guard.
    pub last_run_file: Option<PathBuf>,
}

/// Run the full pipeline once.
///
/// Returns the post identifiers of every successful publish, in publisher
/// order. An empty vector means nothing was posted, either because no
/// publisher was enabled or because the guard said the data was already
/// published.
pub async fn run(
    client: &PortalClient,
    publishers: &[Box<dyn Publisher + Send + Sync>],
    options: &RunOptions,
) -> Result<Vec<String>> {
    let snapshot = client.fetch().await?;
    info!(
        rows = snapshot.measurements.len(),
        last_updated = %snapshot.last_updated,
        "fetched portal snapshot"
    );

    if options.dump_csv {
        std::fs::write(CSV_FILE, snapshot.to_csv())?;
        info!(path = CSV_FILE, "wrote dataset dump");
    }

    let now = Utc::now().with_timezone(&LOCAL_TZ);
    let marker = options.last_run_file.as_ref().map(Marker::new);
    if let Some(marker) = &marker {
        if !guard::should_publish(marker.load(), snapshot.last_updated, now) {
            info!("nothing new to publish, skipping the rest of the run");
            return Ok(Vec::new());
        }
    }

    if !options.save_plot && publishers.is_empty() {
        return Ok(Vec::new());
    }

    let figure = wwgraph_graphs::render(&snapshot, now)?;
    if options.save_plot {
        figure.save(PLOT_FILE)?;
    }
    if publishers.is_empty() {
        return Ok(Vec::new());
    }

    let png = figure.to_png()?;
    let posted = publish_all(publishers, &snapshot, &png).await;
    if !posted.is_empty() {
        if let Some(marker) = &marker {
            marker.store(&snapshot.last_updated)?;
        }
    }
    Ok(posted)
}

/// Post to every publisher, best effort. A failure is logged and does not
/// stop the remaining publishers.
#[instrument(skip_all)]
pub async fn publish_all(
    publishers: &[Box<dyn Publisher + Send + Sync>],
    snapshot: &Snapshot,
    png: &[u8],
) -> Vec<String> {
    let caption = base_caption(snapshot);
    let mut posted = Vec::new();
    for publisher in publishers {
        let text = format!("{}{}", caption, publisher.caption_suffix());
        match publisher.publish(&text, png).await {
            Ok(id) => posted.push(id),
            Err(e) => error!(platform = publisher.name(), error = %e, "publish failed"),
        }
    }
    posted
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;
    use wwgraph_common::WwgraphError;
    use wwgraph_data::Measurement;

    struct StaticPublisher {
        id: &'static str,
        captions: Mutex<Vec<String>>,
    }

    impl StaticPublisher {
        fn boxed(id: &'static str) -> Box<dyn Publisher + Send + Sync> {
            Box::new(Self {
                id,
                captions: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Publisher for StaticPublisher {
        fn name(&self) -> &'static str {
            "static"
        }

        fn caption_suffix(&self) -> &'static str {
            " @CovidPoops19"
        }

        async fn publish(&self, caption: &str, _png: &[u8]) -> Result<String> {
            self.captions.lock().unwrap().push(caption.to_string());
            Ok(self.id.to_string())
        }
    }

    struct FailingPublisher;

    #[async_trait]
    impl Publisher for FailingPublisher {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn publish(&self, _caption: &str, _png: &[u8]) -> Result<String> {
            Err(WwgraphError::publish("failing", "service unavailable"))
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            measurements: vec![Measurement {
                plant: "Annacis Island".to_string(),
                date: chrono::NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
                value: Some(100.0),
                daily_load: Some(1.0e12),
                note: None,
            }],
            last_updated: LOCAL_TZ.with_ymd_and_hms(2024, 3, 5, 9, 5, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_publish_all_collects_post_ids() {
        let publishers: Vec<Box<dyn Publisher + Send + Sync>> =
            vec![StaticPublisher::boxed("123"), StaticPublisher::boxed("456")];
        let posted = publish_all(&publishers, &snapshot(), b"png").await;
        assert_eq!(posted, vec!["123".to_string(), "456".to_string()]);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_the_rest() {
        let publishers: Vec<Box<dyn Publisher + Send + Sync>> =
            vec![Box::new(FailingPublisher), StaticPublisher::boxed("456")];
        let posted = publish_all(&publishers, &snapshot(), b"png").await;
        assert_eq!(posted, vec!["456".to_string()]);
    }

    #[tokio::test]
    async fn test_caption_carries_platform_suffix() {
        let publisher = StaticPublisher {
            id: "789",
            captions: Mutex::new(Vec::new()),
        };
        let caption = base_caption(&snapshot());
        let text = format!("{}{}", caption, publisher.caption_suffix());
        let got = publisher.publish(&text, b"png").await.unwrap();
        assert_eq!(got, "789");
        let captions = publisher.captions.lock().unwrap();
        assert!(captions[0].ends_with(" @CovidPoops19"));
        assert!(captions[0].starts_with("Metro Vancouver wastewater"));
    }
}
