//! Publishing seam shared by the platform adapters

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use wwgraph_common::{Result, WwgraphError};

/// A platform that can turn a caption and a PNG into a public post.
///
/// Implementations are invoked sequentially and independently: one failing
/// must not prevent another from running.
#[async_trait]
pub trait Publisher {
    /// Platform name, for logs and error attribution.
    fn name(&self) -> &'static str;

    /// Platform-specific text appended to the shared caption.
    fn caption_suffix(&self) -> &'static str {
        ""
    }

    /// Upload the image and create a post; returns the platform's post
    /// identifier or URL.
    async fn publish(&self, caption: &str, png: &[u8]) -> Result<String>;
}

/// Check the status of a platform response and parse its JSON body.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
    platform: &'static str,
    what: &str,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(WwgraphError::publish_with_status(
            platform,
            format!("{what} returned {status}: {body}"),
            status.as_u16(),
        ));
    }
    response.json().await.map_err(|e| {
        WwgraphError::publish_with_source(platform, format!("malformed {what} response"), e)
    })
}
