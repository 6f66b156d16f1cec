//! HTML minification for generated pages.

use crate::config::BuildConfig;
use std::borrow::Cow;

/// Minify HTML when `[build].minify` is on.
///
/// Returns `Cow::Borrowed` if minify disabled, `Cow::Owned` if minified.
pub fn minify<'a>(html: &'a [u8], config: &BuildConfig) -> Cow<'a, [u8]> {
    if config.minify {
        Cow::Owned(minify_html_inner(html))
    } else {
        Cow::Borrowed(html)
    }
}

/// Minify HTML content using `minify_html` crate.
///
/// Closing tags and the `<html>`/`<head>` openers stay, so the redirect
/// `<meta>` and canonical `<link>` survive unchanged.
fn minify_html_inner(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    minify_html::minify(html, &cfg)
}
