//! Finna search API client and wire types
//!
//! [`SearchClient`] issues one GET per page against the search
//! endpoint, with a fixed courtesy delay before every request and
//! retries on transient failures. The wire types mirror only the
//! fields the harvester reads; everything else in the response is
//! ignored.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::retry::request_with_retry;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// One page of search results
///
/// `records` is absent (or empty) past the last page; the harvester
/// treats both the same way and stops paginating.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchResponse {
    /// Result records for this page, if any
    #[serde(default)]
    pub records: Option<Vec<ApiRecord>>,

    /// Total number of results matching the query
    #[serde(default, rename = "resultCount")]
    pub result_count: Option<u64>,

    /// Upstream status string ("OK" on success)
    #[serde(default)]
    pub status: Option<String>,
}

impl SearchResponse {
    /// Records on this page, or `None` when the page is empty or the
    /// field is missing — the pagination termination condition.
    pub fn records(&self) -> Option<&[ApiRecord]> {
        match self.records.as_deref() {
            Some([]) | None => None,
            Some(records) => Some(records),
        }
    }
}

/// A single raw result record as returned by the search API
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiRecord {
    /// Record identifier, e.g. "musketti.M012:HK19670603:74"
    #[serde(default)]
    pub id: Option<String>,

    /// Record title
    #[serde(default)]
    pub title: Option<String>,

    /// Institutions holding the record; the first entry classifies it
    #[serde(default)]
    pub buildings: Vec<Building>,

    /// License information for the record's images
    #[serde(default, rename = "imageRights")]
    pub image_rights: Option<ImageRights>,

    /// Subject headings; the API nests these one level deep
    #[serde(default)]
    pub subjects: Vec<SubjectEntry>,

    /// Image paths relative to the API base URL
    #[serde(default)]
    pub images: Vec<String>,
}

/// A building (institution) facet entry
#[derive(Clone, Debug, Deserialize)]
pub struct Building {
    /// Facet value, e.g. "0/Museovirasto/"
    pub value: String,

    /// Human-readable translated name
    #[serde(default)]
    pub translated: Option<String>,
}

/// Image rights block on a record
#[derive(Clone, Debug, Deserialize)]
pub struct ImageRights {
    /// License URL
    #[serde(default)]
    pub link: Option<String>,

    /// Copyright designation, e.g. "CC BY 4.0"
    #[serde(default)]
    pub copyright: Option<String>,
}

/// One `subjects` entry
///
/// The live API returns a list of single-element string lists; older
/// responses and other indexes return plain strings. Both are accepted.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum SubjectEntry {
    /// A plain subject string
    Flat(String),
    /// A nested list of subject strings
    Nested(Vec<String>),
}

/// HTTP client for the paginated search endpoint
///
/// Every call to [`search_page`](SearchClient::search_page) sleeps for
/// the configured delay first, then issues the request, retrying
/// transient failures per the retry configuration.
#[derive(Debug)]
pub struct SearchClient {
    client: reqwest::Client,
    endpoint: Url,
    format_filter: String,
    page_limit: u32,
    request_delay: Duration,
    retry: crate::config::RetryConfig,
}

impl SearchClient {
    /// Create a client from the harvest configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the endpoint is not a valid
    /// absolute URL.
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            Error::config(format!("invalid endpoint URL: {e}"), "endpoint")
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            format_filter: config.format_filter.clone(),
            page_limit: config.page_limit,
            request_delay: config.request_delay,
            retry: config.retry.clone(),
        })
    }

    /// Fetch one page of results for a building
    ///
    /// The building string is passed verbatim inside the
    /// `filter[]=building:"..."` query parameter.
    pub async fn search_page(&self, building: &str, page: u32) -> Result<SearchResponse> {
        tokio::time::sleep(self.request_delay).await;

        request_with_retry(&self.retry, || self.fetch_page(building, page)).await
    }

    async fn fetch_page(&self, building: &str, page: u32) -> Result<SearchResponse> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("filter[]", format!("format:\"{}\"", self.format_filter)),
                ("filter[]", format!("building:\"{building}\"")),
                ("limit", self.page_limit.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<SearchResponse>().await?)
    }
}
