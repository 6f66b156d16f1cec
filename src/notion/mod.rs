//! Document search collaborator.
//!
//! The site builder only depends on the [`SearchClient`] trait and the
//! subset of the Notion search response modelled here: a list of results,
//! each with a `url` and an optional `Name` title property.
//!
//! # Backends
//!
//! | Backend            | Source                                         |
//! |--------------------|------------------------------------------------|
//! | [`NotionClient`]   | `POST /v1/search` on the Notion REST API       |
//! | [`FixtureClient`]  | `fixture-notion-query-<query>.json` files      |
//! | [`CapturingClient`]| wraps another backend, records fixtures        |

mod client;
mod fixture;

pub use client::{BotUser, NotionClient};
pub use fixture::{CapturingClient, FixtureClient, fixture_path};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Search collaborator errors.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unauthorized: Notion token missing or invalid")]
    Unauthorized,

    #[error("Notion API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid search response in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),
}

/// Anything that can answer a free-text document search.
pub trait SearchClient {
    /// Issue exactly one search; no caching, no retry.
    fn search(&self, query: &str) -> Result<SearchResponse, SearchError>;
}

impl<T: SearchClient + ?Sized> SearchClient for &T {
    fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        (**self).search(query)
    }
}

impl<T: SearchClient + ?Sized> SearchClient for Box<T> {
    fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        (**self).search(query)
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Body of a search response. A body without `results` counts as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<TitleProperty>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleProperty {
    #[serde(default)]
    pub title: Vec<RichText>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

impl SearchResult {
    /// Page with a `Name` title made of a single text run.
    #[cfg(test)]
    pub fn titled(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            properties: Some(Properties {
                name: Some(TitleProperty {
                    title: vec![RichText {
                        plain_text: title.into(),
                    }],
                }),
            }),
        }
    }

    /// Full title text, `None` when the result exposes no `Name` title.
    pub fn title(&self) -> Option<String> {
        let name = self.properties.as_ref()?.name.as_ref()?;
        Some(name.title.iter().map(|t| t.plain_text.as_str()).collect())
    }
}
