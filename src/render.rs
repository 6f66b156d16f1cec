//! HTML for redirect pages, the index and the not-found fallback.
//!
//! All functions are pure: the same inputs always give the same bytes. The
//! only time-dependent text is the footer, which shows the reference instant
//! of the run rather than the wall clock.

use crate::{calendar::ReferenceInstant, config::SiteConfig};
use std::fmt::Write;

/// Timestamp format of the "Updated" footer.
const FOOTER_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Minimal document that redirects to `target` immediately.
pub fn redirect_page(name: &str, target: &str, favicon: &str) -> String {
    let name = escape_html(name);
    let target = escape_html(target);
    let favicon = escape_html(favicon);
    format!(
        r#"<!DOCTYPE html>
<meta charset="utf-8">
<title>Redirecting to {name}: {target}</title>
<meta http-equiv="refresh" content="0; URL={target}">
<link rel="shortcut icon" type="image/png" href="{favicon}"/>
<link rel="canonical" href="{target}">
"#
    )
}

/// Swap the transport scheme of `url` for the companion app's scheme.
///
/// `https://www.notion.so/x` → `notion://www.notion.so/x`. URLs without a
/// scheme are returned unchanged.
pub fn mobile_url(url: &str, scheme: &str) -> String {
    match url.split_once("://") {
        Some((_, rest)) => format!("{scheme}://{rest}"),
        None => url.to_owned(),
    }
}

/// One entry of the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexLink<'a> {
    pub name: &'a str,
    pub url: &'a str,
}

/// Shared page chrome for the index and not-found pages.
pub struct Templates<'a> {
    site: &'a SiteConfig,
    reference: ReferenceInstant,
}

impl<'a> Templates<'a> {
    pub const fn new(site: &'a SiteConfig, reference: ReferenceInstant) -> Self {
        Self { site, reference }
    }

    /// Redirect page using the configured favicon.
    pub fn redirect(&self, name: &str, target: &str) -> String {
        redirect_page(name, target, &self.site.favicon)
    }

    /// Index listing every generated page, in the order given.
    pub fn index(&self, links: &[IndexLink<'_>]) -> String {
        let mut items = String::new();
        for link in links {
            let _ = writeln!(
                items,
                r#"        <li><a href="{}">{}</a></li>"#,
                escape_html(link.url),
                escape_html(link.name)
            );
        }

        let body = format!(
            r#"<h1>{title}</h1>

      <ul>
{items}      </ul>"#,
            title = escape_html(&self.site.title),
        );
        self.base(&self.site.title, &body)
    }

    /// Fallback page, linking home when the root anchor is known.
    pub fn not_found(&self, root: Option<&str>) -> String {
        let title = format!("{} - Not Found", self.site.title);
        let mut body = format!("<h1>{}</h1>\n", escape_html(&title));

        if let Some(root) = root {
            let _ = write!(
                body,
                r#"
      <p><a href="{}">Back to the day books</a></p>
"#,
                escape_html(root)
            );
        }
        if let Some(status) = &self.site.status_url {
            let _ = write!(
                body,
                r#"
      <p>
        <a href="{}">Whoops? Something wrong with the build?</a>
      </p>
"#,
                escape_html(status)
            );
        }
        self.base(&title, body.trim_end())
    }

    fn base(&self, title: &str, body: &str) -> String {
        format!(
            r#"<!DOCTYPE html>

<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="shortcut icon" type="image/png" href="{favicon}"/>

<style>
  html {{
    height: 100%;
  }}

  body {{
    height: 100%;
    font-family: Courier, sans-serif;
    display: flex;
    flex-direction: column;
    justify-content: space-between;
  }}
</style>

</head>

<body>
  <main>
      {body}
  </main>

  <footer>
    <p><em>Updated: {updated}</em></p>
  </footer>
</body>
</html>
"#,
            title = escape_html(title),
            favicon = escape_html(&self.site.favicon),
            updated = self.reference.datetime().format(FOOTER_FORMAT),
        )
    }
}

/// Escape special HTML characters for text and attribute positions.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ============================================================================
// Tests
// ============================================================================
