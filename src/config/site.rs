//! `[site]` section configuration.
//!
//! Text and links shared by every generated page.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in daybook.toml.
///
/// # Example
/// ```toml
/// [site]
/// title = "Daybook Redirects"
/// status_url = "https://app.netlify.com/sites/daybook-redirects/deploys"
/// mobile_scheme = "notion"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Heading and `<title>` of the index and not-found pages.
    #[serde(default = "defaults::site::title")]
    #[educe(Default = defaults::site::title())]
    pub title: String,

    /// Favicon href, relative to the output root.
    #[serde(default = "defaults::site::favicon")]
    #[educe(Default = defaults::site::favicon())]
    pub favicon: String,

    /// Deploy dashboard linked from the not-found page.
    #[serde(default = "defaults::site::status_url")]
    #[educe(Default = defaults::site::status_url())]
    pub status_url: Option<String>,

    /// URI scheme of the companion app used by `today-mobile.html`.
    #[serde(default = "defaults::site::mobile_scheme")]
    #[educe(Default = defaults::site::mobile_scheme())]
    pub mobile_scheme: String,
}
