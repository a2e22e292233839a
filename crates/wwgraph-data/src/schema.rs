//! Typed schemas for the portal's OData verbose envelopes
//!
//! Every response is wrapped in a `d` object. Only the fields the pipeline
//! needs are modelled; the rest of the envelope (including each row's
//! `__metadata` block) is dropped during deserialization.

use serde::Deserialize;

/// Response of `POST /_api/contextinfo`
#[derive(Debug, Deserialize)]
pub struct ContextInfoResponse {
    pub d: ContextInfoBody,
}

#[derive(Debug, Deserialize)]
pub struct ContextInfoBody {
    #[serde(rename = "GetContextWebInformation")]
    pub web_information: ContextWebInformation,
}

#[derive(Debug, Deserialize)]
pub struct ContextWebInformation {
    /// Digest token passed as `X-RequestDigest` on subsequent calls
    #[serde(rename = "FormDigestValue")]
    pub form_digest_value: String,
}

/// Response of one page of `GET .../items`
#[derive(Debug, Deserialize)]
pub struct ListItemsResponse {
    pub d: ListItemsBody,
}

#[derive(Debug, Deserialize)]
pub struct ListItemsBody {
    pub results: Vec<RawMeasurement>,
    /// Absolute URL of the next page, absent on the last one
    #[serde(rename = "__next")]
    pub next: Option<String>,
}

/// One raw list row, before cleaning
#[derive(Debug, Clone, Deserialize)]
pub struct RawMeasurement {
    /// ISO datetime string, e.g. "2022-01-05T00:00:00"
    #[serde(rename = "CalculatedDate")]
    pub calculated_date: String,
    #[serde(rename = "Plant")]
    pub plant: String,
    #[serde(rename = "Value")]
    pub value: Option<f64>,
    #[serde(rename = "DailyLoad")]
    pub daily_load: Option<f64>,
    /// "No sample collected" marks a row to exclude
    #[serde(rename = "Note")]
    pub note: Option<String>,
}

/// Response of `GET .../lists/getbytitle('...')` (the list's own metadata)
#[derive(Debug, Deserialize)]
pub struct ListMetadataResponse {
    pub d: ListMetadata,
}

#[derive(Debug, Deserialize)]
pub struct ListMetadata {
    #[serde(rename = "LastItemModifiedDate")]
    pub last_item_modified_date: String,
}
