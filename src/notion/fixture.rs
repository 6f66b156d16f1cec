//! Offline search backends built on JSON fixture files.
//!
//! Fixtures are plain search responses stored as
//! `<dir>/fixture-notion-query-<query>.json`. [`CapturingClient`] writes them,
//! [`FixtureClient`] reads them back.

use super::{SearchClient, SearchError, SearchResponse};
use crate::log;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Path of the fixture answering `query`.
pub fn fixture_path(dir: &Path, query: &str) -> PathBuf {
    dir.join(format!("fixture-notion-query-{query}.json"))
}

/// Answers searches from a fixture directory.
///
/// A query without a fixture file yields an empty result list.
#[derive(Debug, Clone)]
pub struct FixtureClient {
    dir: PathBuf,
}

impl FixtureClient {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SearchClient for FixtureClient {
    fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let path = fixture_path(&self.dir, query);
        if !path.exists() {
            return Ok(SearchResponse::default());
        }
        let content = fs::read_to_string(&path).map_err(|err| SearchError::Io(path.clone(), err))?;
        serde_json::from_str(&content).map_err(|err| SearchError::Json(path, err))
    }
}

/// Records every response of the wrapped backend as a fixture.
///
/// Write failures are logged and never fail the search itself.
#[derive(Debug, Clone)]
pub struct CapturingClient<S> {
    inner: S,
    dir: PathBuf,
}

impl<S: SearchClient> CapturingClient<S> {
    pub fn new(inner: S, dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            dir: dir.into(),
        }
    }

    fn capture(&self, query: &str, response: &SearchResponse) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = fixture_path(&self.dir, query);
        fs::write(&path, serde_json::to_string_pretty(response)?)?;
        log!("capture"; "{}", path.display());
        Ok(())
    }
}

impl<S: SearchClient> SearchClient for CapturingClient<S> {
    fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let response = self.inner.search(query)?;
        if let Err(e) = self.capture(query, &response) {
            log!("warn"; "could not capture `{}`: {:#}", query, e);
        }
        Ok(response)
    }
}
