//! Twitter adapter: v1.1 media upload followed by v2 tweet creation

use crate::oauth::OauthSigner;
use crate::publisher::{parse_response, Publisher};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::{debug, info};
use wwgraph_common::{Result, WwgraphError};
use wwgraph_config::TwitterCredentials;

const PLATFORM: &str = "twitter";
const MEDIA_UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";
const CREATE_TWEET_URL: &str = "https://api.twitter.com/2/tweets";

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

/// Posts a figure to Twitter via the two-step media-then-tweet flow.
pub struct TwitterPublisher {
    client: reqwest::Client,
    signer: OauthSigner,
}

impl TwitterPublisher {
    pub fn new(client: reqwest::Client, credentials: TwitterCredentials) -> Self {
        Self {
            client,
            signer: OauthSigner::new(credentials),
        }
    }

    async fn upload_media(&self, png: &[u8]) -> Result<String> {
        // Multipart bodies are excluded from the OAuth signature
        let auth = self.signer.authorization_header("POST", MEDIA_UPLOAD_URL, &[]);
        let part = reqwest::multipart::Part::bytes(png.to_vec())
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(|e| {
                WwgraphError::publish_with_source(PLATFORM, "building media part failed", e)
            })?;
        let form = reqwest::multipart::Form::new().part("media", part);

        let response = self
            .client
            .post(MEDIA_UPLOAD_URL)
            .header(AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                WwgraphError::publish_with_source(PLATFORM, "media upload request failed", e)
            })?;
        let upload: MediaUploadResponse = parse_response(response, PLATFORM, "media upload").await?;
        debug!(media_id = %upload.media_id_string, "uploaded media to twitter");
        Ok(upload.media_id_string)
    }

    async fn create_tweet(&self, caption: &str, media_id: &str) -> Result<String> {
        let auth = self.signer.authorization_header("POST", CREATE_TWEET_URL, &[]);
        let body = serde_json::json!({
            "text": caption,
            "media": { "media_ids": [media_id] },
        });

        let response = self
            .client
            .post(CREATE_TWEET_URL)
            .header(AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                WwgraphError::publish_with_source(PLATFORM, "tweet request failed", e)
            })?;
        let created: CreateTweetResponse =
            parse_response(response, PLATFORM, "tweet creation").await?;
        Ok(created.data.id)
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    fn name(&self) -> &'static str {
        PLATFORM
    }

    fn caption_suffix(&self) -> &'static str {
        " @CovidPoops19"
    }

    async fn publish(&self, caption: &str, png: &[u8]) -> Result<String> {
        let media_id = self.upload_media(png).await?;
        let tweet_id = self.create_tweet(caption, &media_id).await?;
        info!(tweet_id = %tweet_id, "posted to twitter");
        Ok(tweet_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> TwitterCredentials {
        TwitterCredentials {
            consumer_key: "ck".to_string(),
            consumer_secret: "cs".to_string(),
            access_token: "at".to_string(),
            access_token_secret: "ats".to_string(),
        }
    }

    #[test]
    fn test_platform_identity() {
        let publisher = TwitterPublisher::new(reqwest::Client::new(), credentials());
        assert_eq!(publisher.name(), "twitter");
        assert_eq!(publisher.caption_suffix(), " @CovidPoops19");
    }

    #[test]
    fn test_media_upload_response_parsing() {
        let body = r#"{"media_id": 710511363345354753, "media_id_string": "710511363345354753"}"#;
        let parsed: MediaUploadResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.media_id_string, "710511363345354753");
    }

    #[test]
    fn test_create_tweet_response_parsing() {
        let body = r#"{"data": {"id": "123", "text": "hello"}}"#;
        let parsed: CreateTweetResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.id, "123");
    }
}
