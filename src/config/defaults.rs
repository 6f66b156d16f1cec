//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn title() -> String {
        "Daybook Redirects".into()
    }

    pub fn favicon() -> String {
        "favicon.png".into()
    }

    pub fn status_url() -> Option<String> {
        None
    }

    pub fn mobile_scheme() -> String {
        "notion".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn output() -> PathBuf {
        "build".into()
    }

    pub fn static_dir() -> PathBuf {
        "static".into()
    }
}

// ============================================================================
// [notion] Section Defaults
// ============================================================================

pub mod notion {
    pub fn api_url() -> String {
        "https://api.notion.com/v1".into()
    }

    pub fn version() -> String {
        "2022-06-28".into()
    }

    /// The API maximum. Smaller pages sometimes drop exact matches.
    pub fn page_size() -> u8 {
        100
    }

    pub fn timeout_secs() -> u64 {
        30
    }

    pub fn token_env() -> String {
        "NOTION_TOKEN".into()
    }

    pub fn root_query() -> String {
        "day books".into()
    }
}
