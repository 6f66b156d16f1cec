//! Errors raised while loading `daybook.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid daybook.toml: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value serde accepted but the build cannot use.
    /// `field` is the dotted key, e.g. `notion.page_size`.
    #[error("[{field}] {reason}")]
    Validation { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
