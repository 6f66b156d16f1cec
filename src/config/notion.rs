//! `[notion]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[notion]` section in daybook.toml - search API settings.
///
/// The token itself never lives in the config file; only the name of the
/// environment variable holding it.
///
/// # Example
/// ```toml
/// [notion]
/// timeout_secs = 10
/// root_query = "day books"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct NotionConfig {
    /// REST API base URL.
    #[serde(default = "defaults::notion::api_url")]
    #[educe(Default = defaults::notion::api_url())]
    pub api_url: String,

    /// Value of the `Notion-Version` header.
    #[serde(default = "defaults::notion::version")]
    #[educe(Default = defaults::notion::version())]
    pub version: String,

    /// Results per search, 1..=100.
    #[serde(default = "defaults::notion::page_size")]
    #[educe(Default = defaults::notion::page_size())]
    pub page_size: u8,

    /// Upper bound on each HTTP round-trip.
    #[serde(default = "defaults::notion::timeout_secs")]
    #[educe(Default = defaults::notion::timeout_secs())]
    pub timeout_secs: u64,

    /// Environment variable holding the integration token.
    #[serde(default = "defaults::notion::token_env")]
    #[educe(Default = defaults::notion::token_env())]
    pub token_env: String,

    /// Search that must return exactly one result: the root anchor.
    #[serde(default = "defaults::notion::root_query")]
    #[educe(Default = defaults::notion::root_query())]
    pub root_query: String,
}
