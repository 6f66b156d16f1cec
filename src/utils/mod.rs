//! Utility modules for page output.

pub mod minify;
