//! Maps lookup keys to exactly one document URL.
//!
//! The search backend may return near matches ("2021-11-28 notes" for
//! "2021-11-28"), so [`DocumentLocator::locate`] only accepts a result whose
//! title equals the key.

use crate::notion::{SearchClient, SearchError};
use thiserror::Error;

/// Opaque document URL returned by the search collaborator.
pub type DocumentRef = String;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no document titled `{key}` ({candidates} search results)")]
    NotFound { key: String, candidates: usize },

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Why the root anchor is absent. Never surfaced as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoRoot {
    Empty,
    Ambiguous(usize),
}

pub struct DocumentLocator<S> {
    search: S,
}

impl<S: SearchClient> DocumentLocator<S> {
    pub const fn new(search: S) -> Self {
        Self { search }
    }

    /// Find the single document titled exactly `key`.
    ///
    /// When several results carry the exact title, the first one wins.
    pub fn locate(&self, key: &str) -> Result<DocumentRef, LookupError> {
        let response = self.search.search(key)?;
        let candidates = response.results.len();

        response
            .results
            .into_iter()
            .find(|result| result.title().is_some_and(|title| title == key))
            .map(|result| result.url)
            .ok_or_else(|| LookupError::NotFound {
                key: key.to_owned(),
                candidates,
            })
    }

    /// Find the root anchor: accepted only when the search is unambiguous.
    pub fn locate_root(&self, query: &str) -> Result<Result<DocumentRef, NoRoot>, SearchError> {
        let mut results = self.search.search(query)?.results;
        Ok(match results.len() {
            0 => Err(NoRoot::Empty),
            1 => Ok(results.remove(0).url),
            n => Err(NoRoot::Ambiguous(n)),
        })
    }
}
