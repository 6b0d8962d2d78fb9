//! Configuration types for finna-harvest

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Harvest configuration
///
/// The defaults reproduce the upstream catalog's Finna harvest: the
/// public search endpoint, a page size of 100, a 5 second courtesy
/// delay between requests, and the four Finnish heritage institutions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Search endpoint URL (default: "https://api.finna.fi/api/v1/search")
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Base URL prepended to relative image paths (default: "https://api.finna.fi")
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Base URL for record landing pages (default: "https://www.finna.fi/Record/")
    #[serde(default = "default_landing_base")]
    pub landing_base: String,

    /// Format facet passed as `filter[]=format:"..."` (default: "0/Image/")
    #[serde(default = "default_format_filter")]
    pub format_filter: String,

    /// Number of records requested per page (default: 100)
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Fixed delay before every request (default: 5 seconds)
    ///
    /// Applied unconditionally, including before the first request of
    /// each page. Retries add their own backoff on top of this.
    #[serde(default = "default_request_delay", with = "duration_serde")]
    pub request_delay: Duration,

    /// Retry behavior for transient request failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Provider name used when no sub-provider matches (default: "finna")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Buildings to harvest, in order
    ///
    /// Each entry is a Finna building facet value, passed verbatim as
    /// `filter[]=building:"..."`.
    #[serde(default = "default_buildings")]
    pub buildings: Vec<String>,

    /// Sub-provider table, in classification precedence order
    #[serde(default = "default_sub_providers")]
    pub sub_providers: Vec<SubProvider>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_base: default_api_base(),
            landing_base: default_landing_base(),
            format_filter: default_format_filter(),
            page_limit: default_page_limit(),
            request_delay: default_request_delay(),
            retry: RetryConfig::default(),
            provider: default_provider(),
            buildings: default_buildings(),
            sub_providers: default_sub_providers(),
        }
    }
}

/// A named attribution bucket and the buildings that belong to it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubProvider {
    /// Sub-provider name used as the record `source`
    pub name: String,
    /// Building facet values classified into this bucket
    pub buildings: Vec<String>,
}

/// Retry configuration for transient failures
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 30 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

fn default_endpoint() -> String {
    "https://api.finna.fi/api/v1/search".to_string()
}

fn default_api_base() -> String {
    "https://api.finna.fi".to_string()
}

fn default_landing_base() -> String {
    "https://www.finna.fi/Record/".to_string()
}

fn default_format_filter() -> String {
    "0/Image/".to_string()
}

fn default_page_limit() -> u32 {
    100
}

fn default_request_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_provider() -> String {
    "finna".to_string()
}

fn default_buildings() -> Vec<String> {
    vec![
        "0/Suomen kansallismuseo/".to_string(),
        "0/Museovirasto/".to_string(),
        "0/SATMUSEO/".to_string(),
        "0/SA-kuva/".to_string(),
    ]
}

fn default_sub_providers() -> Vec<SubProvider> {
    vec![
        SubProvider {
            name: "finnish_heritage_agency".to_string(),
            buildings: vec!["0/Museovirasto/".to_string()],
        },
        SubProvider {
            name: "finnish_satakunta_museum".to_string(),
            buildings: vec!["0/SATMUSEO/".to_string()],
        },
        SubProvider {
            name: "finnish_defence_forces".to_string(),
            buildings: vec!["0/SA-kuva/".to_string()],
        },
    ]
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

// Duration serialization as integer seconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
