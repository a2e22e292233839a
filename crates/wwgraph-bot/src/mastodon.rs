//! Mastodon adapter: media upload followed by status creation

use crate::publisher::{parse_response, Publisher};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use wwgraph_common::{Result, WwgraphError};
use wwgraph_config::MastodonCredentials;

const PLATFORM: &str = "mastodon";

#[derive(Debug, Deserialize)]
struct MediaResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    url: String,
}

/// Posts a figure to a Mastodon instance.
pub struct MastodonPublisher {
    client: reqwest::Client,
    credentials: MastodonCredentials,
}

impl MastodonPublisher {
    pub fn new(client: reqwest::Client, credentials: MastodonCredentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.credentials.api_base_url.trim_end_matches('/'), path)
    }

    async fn upload_media(&self, png: &[u8]) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(png.to_vec())
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(|e| {
                WwgraphError::publish_with_source(PLATFORM, "building media part failed", e)
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("/api/v2/media"))
            .bearer_auth(&self.credentials.access_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                WwgraphError::publish_with_source(PLATFORM, "media upload request failed", e)
            })?;
        let media: MediaResponse = parse_response(response, PLATFORM, "media upload").await?;
        debug!(media_id = %media.id, "uploaded media to mastodon");
        Ok(media.id)
    }

    async fn create_status(&self, caption: &str, media_id: &str) -> Result<String> {
        let body = serde_json::json!({
            "status": caption,
            "media_ids": [media_id],
        });
        let response = self
            .client
            .post(self.endpoint("/api/v1/statuses"))
            .bearer_auth(&self.credentials.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                WwgraphError::publish_with_source(PLATFORM, "status request failed", e)
            })?;
        let status: StatusResponse =
            parse_response(response, PLATFORM, "status creation").await?;
        Ok(status.url)
    }
}

#[async_trait]
impl Publisher for MastodonPublisher {
    fn name(&self) -> &'static str {
        PLATFORM
    }

    fn caption_suffix(&self) -> &'static str {
        " #covid #covid19 #wastewater #vancouver #yvr"
    }

    async fn publish(&self, caption: &str, png: &[u8]) -> Result<String> {
        let media_id = self.upload_media(png).await?;
        let url = self.create_status(caption, &media_id).await?;
        info!(url = %url, "posted to mastodon");
        Ok(url)
    }
}
