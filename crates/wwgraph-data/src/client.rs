//! HTTP client for the Metro Vancouver wastewater data portal

use crate::schema::{ContextInfoResponse, ListItemsResponse, ListMetadataResponse, RawMeasurement};
use crate::snapshot::{display_plant_name, Measurement, Snapshot};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument};
use wwgraph_common::time::LOCAL_TZ;
use wwgraph_common::{Result, WwgraphError};

const DEFAULT_BASE_URL: &str =
    "http://www.metrovancouver.org/services/liquid-waste/environmental-management/covid-19-wastewater";
const LIST_TITLE: &str = "WastewaterCOVIDData";
const ODATA_ACCEPT: &str = "application/json;odata=verbose";
const DIGEST_HEADER: &str = "X-RequestDigest";
const SELECT_FIELDS: &str = "CalculatedDate,Plant,Value,DailyLoad,Note";
const EXCLUDED_NOTE: &str = "No sample collected";

/// Configuration for the portal client
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Client for the portal's SharePoint OData API
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: reqwest::Client,
    config: PortalConfig,
}

impl PortalClient {
    /// Create a new portal client with the given configuration
    pub fn new(config: PortalConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WwgraphError::network_with_source("Failed to create HTTP client", e))?;
        Ok(Self { client, config })
    }

    /// Create a new client against the production portal URL
    pub fn with_defaults() -> Result<Self> {
        Self::new(PortalConfig::default())
    }

    /// Fetch the full dataset and its last-modified timestamp.
    ///
    /// There are no retries; a transient failure is fatal for the run.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<Snapshot> {
        let digest = self.fetch_digest().await?;
        let rows = self.fetch_all_rows(&digest).await?;
        let last_updated = self.fetch_last_updated(&digest).await?;

        let measurements = clean_rows(rows)?;
        if measurements.is_empty() {
            return Err(WwgraphError::portal(
                "portal returned no usable measurements",
            ));
        }

        info!(
            rows = measurements.len(),
            last_updated = %last_updated,
            "fetched wastewater snapshot"
        );
        Ok(Snapshot {
            measurements,
            last_updated,
        })
    }

    /// First half of the handshake: obtain the form digest token.
    async fn fetch_digest(&self) -> Result<String> {
        let url = format!("{}/_api/contextinfo", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .header(ACCEPT, ODATA_ACCEPT)
            .send()
            .await?;
        let response = check_status(response, "contextinfo")?;
        let ctx: ContextInfoResponse = response
            .json()
            .await
            .map_err(|e| WwgraphError::portal_with_source("malformed contextinfo response", e))?;
        debug!("obtained form digest");
        Ok(ctx.d.web_information.form_digest_value)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        digest: &str,
        select: bool,
        endpoint: &str,
    ) -> Result<T> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, ODATA_ACCEPT)
            .header(DIGEST_HEADER, digest);
        if select {
            request = request.query(&[("$select", SELECT_FIELDS)]);
        }
        let response = check_status(request.send().await?, endpoint)?;
        response
            .json()
            .await
            .map_err(|e| WwgraphError::portal_with_source(format!("malformed {endpoint} response"), e))
    }

    /// Page through the listing endpoint, following `__next` cursors until
    /// exhausted. Cursor URLs already carry their own query string, so the
    /// `$select` clause is only sent on the first page.
    async fn fetch_all_rows(&self, digest: &str) -> Result<Vec<RawMeasurement>> {
        let first = format!(
            "{}/_api/lists/getbytitle('{}')/items",
            self.config.base_url, LIST_TITLE
        );
        let mut page: ListItemsResponse = self.get_json(&first, digest, true, "list items").await?;
        let mut rows = Vec::new();
        loop {
            rows.extend(page.d.results);
            match page.d.next {
                Some(url) => {
                    debug!(rows = rows.len(), "following next-page cursor");
                    page = self.get_json(&url, digest, false, "list items").await?;
                }
                None => break,
            }
        }
        debug!(rows = rows.len(), "accumulated raw rows");
        Ok(rows)
    }

    /// Read the list's own metadata for its last-modified time. Failure here
    /// is fatal: both the publish guard and the figure footer need it.
    async fn fetch_last_updated(&self, digest: &str) -> Result<DateTime<Tz>> {
        let url = format!(
            "{}/_api/lists/getbytitle('{}')",
            self.config.base_url, LIST_TITLE
        );
        let meta: ListMetadataResponse = self.get_json(&url, digest, false, "list metadata").await?;
        parse_last_updated(&meta.d.last_item_modified_date)
    }
}

fn check_status(response: reqwest::Response, endpoint: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(WwgraphError::portal_with_status(
            format!("{endpoint} request returned {status}"),
            status.as_u16(),
        ));
    }
    Ok(response)
}

fn parse_last_updated(raw: &str) -> Result<DateTime<Tz>> {
    let parsed = DateTime::parse_from_rfc3339(raw).map_err(|e| {
        WwgraphError::portal(format!("invalid LastItemModifiedDate '{raw}': {e}"))
    })?;
    Ok(parsed.with_timezone(&LOCAL_TZ))
}

/// `CalculatedDate` arrives as an ISO datetime with no offset; only the date
/// part is meaningful.
fn parse_sample_date(raw: &str) -> Result<NaiveDate> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|e| WwgraphError::portal(format!("invalid CalculatedDate '{raw}': {e}")))
}

/// Apply the cleaning rules: drop unsampled rows, parse dates, remap plant
/// names. Rows without a measured value survive with `None` values so the
/// CSV dump stays complete; a malformed date is a hard parse error.
fn clean_rows(rows: Vec<RawMeasurement>) -> Result<Vec<Measurement>> {
    let mut measurements = Vec::with_capacity(rows.len());
    for row in rows {
        if row.note.as_deref() == Some(EXCLUDED_NOTE) {
            continue;
        }
        measurements.push(Measurement {
            plant: display_plant_name(&row.plant),
            date: parse_sample_date(&row.calculated_date)?,
            value: row.value,
            daily_load: row.daily_load,
            note: row.note,
        });
    }
    Ok(measurements)
}
