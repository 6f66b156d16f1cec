//! Blocking HTTP client for the Notion REST API.
//!
//! Every request carries the configured timeout, so a hung search surfaces
//! as a [`SearchError::Http`] for that label instead of stalling the run.

use super::{SearchClient, SearchError, SearchResponse};
use crate::config::NotionConfig;
use anyhow::{Context, Result};
use reqwest::{
    Method, StatusCode,
    blocking::{Client, RequestBuilder, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

/// Header selecting the Notion API version.
const VERSION_HEADER: &str = "Notion-Version";

/// Body of `POST /search`.
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    page_size: u8,
}

/// Response of `GET /users/me` (the integration's bot user).
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NotionClient {
    api_url: String,
    version: String,
    page_size: u8,
    token: String,
    client: Client,
}

impl NotionClient {
    /// Create client with the token read from `[notion].token_env`.
    pub fn from_env(config: &NotionConfig) -> Result<Self> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .with_context(|| format!("Could not find value for env var {}", config.token_env))?;
        Ok(Self::new(config, token)?)
    }

    /// Create with explicit token.
    pub fn new(config: &NotionConfig, token: impl Into<String>) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("daybook/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            version: config.version.clone(),
            page_size: config.page_size,
            token: token.into(),
            client,
        })
    }

    /// The bot user behind the token. Used to verify credentials.
    pub fn me(&self) -> Result<BotUser, SearchError> {
        let response = self.request(Method::GET, "/users/me").send()?;
        Self::handle_response(response)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Build a request with auth and version headers.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.endpoint(path))
            .bearer_auth(&self.token)
            .header(VERSION_HEADER, &self.version)
    }

    fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, SearchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json()?);
        }
        let body = response.text().unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => Err(SearchError::Unauthorized),
            _ => Err(SearchError::Api {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

impl SearchClient for NotionClient {
    fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let body = SearchRequest {
            query,
            page_size: self.page_size,
        };
        let response = self.request(Method::POST, "/search").json(&body).send()?;
        Self::handle_response(response)
    }
}
