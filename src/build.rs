//! Site generation orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── reset_output()          remove (if present) + create output root
//!     │
//!     ├── SiteGenerator::generate()
//!     │       │
//!     │       ├── find_root()     "day books" → optional root anchor
//!     │       │
//!     │       ├── for label in Label::ALL (sequential)
//!     │       │       resolve → locate → LabelOutcome
//!     │       │
//!     │       └── fold outcomes → BuildReport + SiteArtifacts
//!     │
//!     ├── write_artifacts()       <label>.html, not-found.html, index.html
//!     │
//!     └── copy_static()           static assets → output root
//! ```
//!
//! A failed lookup only costs its own label. The run itself fails only when
//! the output root cannot be reset or written, or the asset copy fails.

use crate::{
    calendar::{Label, ReferenceInstant, Target, date_key},
    config::DaybookConfig,
    fs::SiteFs,
    locator::{DocumentLocator, DocumentRef, LookupError, NoRoot},
    log,
    notion::SearchClient,
    render::{IndexLink, Templates, mobile_url},
    utils::minify::minify,
};
use anyhow::Result;
use std::path::Path;

/// Index page file name.
pub const INDEX_FILE: &str = "index.html";
/// Fallback page file name.
pub const NOT_FOUND_FILE: &str = "not-found.html";

// ============================================================================
// Results
// ============================================================================

/// One generated redirect page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Page name, e.g. `today` or `today-mobile`.
    pub name: String,
    /// Link used by the index, relative to the output root.
    pub url: String,
    /// Where the page redirects to.
    pub target: DocumentRef,
}

impl Page {
    fn new(name: String, target: DocumentRef) -> Self {
        Self {
            url: format!("./{name}.html"),
            name,
            target,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.html", self.name)
    }
}

/// A label whose document could not be found. Recorded, never fatal.
#[derive(Debug)]
pub struct GenerationError {
    pub label: Label,
    pub key: String,
    pub cause: LookupError,
}

/// Result of one label's resolve → locate step.
#[derive(Debug)]
pub enum LabelOutcome {
    /// Desktop page, plus the mobile variant where the label has one.
    Pages(Vec<Page>),
    Failed(GenerationError),
    /// Label does not apply to this run.
    Skipped,
}

/// Everything one run produced, in label order.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: Vec<Page>,
    pub errors: Vec<GenerationError>,
    pub root: Option<DocumentRef>,
}

/// Rendered files, keyed by name relative to the output root, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteArtifacts {
    pub files: Vec<(String, String)>,
}

// ============================================================================
// Generator
// ============================================================================

/// Resolves every label against one reference instant and renders the site.
pub struct SiteGenerator<'a, S> {
    config: &'a DaybookConfig,
    reference: ReferenceInstant,
    locator: DocumentLocator<S>,
}

impl<'a, S: SearchClient> SiteGenerator<'a, S> {
    pub const fn new(config: &'a DaybookConfig, reference: ReferenceInstant, search: S) -> Self {
        Self {
            config,
            reference,
            locator: DocumentLocator::new(search),
        }
    }

    /// Run every lookup, then render all pages. Never fails as a whole.
    pub fn generate(&self) -> (BuildReport, SiteArtifacts) {
        let root = self.find_root();

        let outcomes: Vec<_> = Label::ALL
            .into_iter()
            .map(|label| self.generate_label(label, root.as_deref()))
            .collect();

        let mut report = BuildReport {
            root,
            ..BuildReport::default()
        };
        for outcome in outcomes {
            match outcome {
                LabelOutcome::Pages(pages) => report.pages.extend(pages),
                LabelOutcome::Failed(error) => report.errors.push(error),
                LabelOutcome::Skipped => {}
            }
        }

        let artifacts = self.render(&report);
        (report, artifacts)
    }

    /// Root anchor, tolerated to be missing or ambiguous.
    fn find_root(&self) -> Option<DocumentRef> {
        let query = &self.config.notion.root_query;
        match self.locator.locate_root(query) {
            Ok(Ok(url)) => {
                log!("root"; "{}", url);
                Some(url)
            }
            Ok(Err(NoRoot::Empty)) => {
                log!("root"; "no results for `{}`", query);
                None
            }
            Ok(Err(NoRoot::Ambiguous(n))) => {
                log!("root"; "{} results for `{}`, ignoring", n, query);
                None
            }
            Err(e) => {
                log!("warn"; "root search failed: {}", e);
                None
            }
        }
    }

    pub fn generate_label(&self, label: Label, root: Option<&str>) -> LabelOutcome {
        match label.resolve(&self.reference) {
            Target::Skip => {
                log!("skip"; "{}: not applicable today", label);
                LabelOutcome::Skipped
            }
            Target::Root => match root {
                Some(url) => LabelOutcome::Pages(self.pages_for(label, url.to_owned())),
                None => {
                    log!("skip"; "{}: no root anchor", label);
                    LabelOutcome::Skipped
                }
            },
            Target::Date(date) => {
                let key = date_key(date);
                log!("lookup"; "{}: {}", label, key);
                match self.locator.locate(&key) {
                    Ok(url) => LabelOutcome::Pages(self.pages_for(label, url)),
                    Err(cause) => LabelOutcome::Failed(GenerationError { label, key, cause }),
                }
            }
        }
    }

    fn pages_for(&self, label: Label, target: DocumentRef) -> Vec<Page> {
        let mut pages = Vec::with_capacity(2);
        if label.has_mobile_variant() {
            let mobile = mobile_url(&target, &self.config.site.mobile_scheme);
            pages.push(Page::new(label.to_string(), target));
            pages.push(Page::new(format!("{label}-mobile"), mobile));
        } else {
            pages.push(Page::new(label.to_string(), target));
        }
        pages
    }

    fn render(&self, report: &BuildReport) -> SiteArtifacts {
        let templates = Templates::new(&self.config.site, self.reference);

        let mut files: Vec<_> = report
            .pages
            .iter()
            .map(|page| (page.file_name(), templates.redirect(&page.name, &page.target)))
            .collect();

        let links: Vec<_> = report
            .pages
            .iter()
            .map(|page| IndexLink {
                name: &page.name,
                url: &page.url,
            })
            .collect();

        files.push((NOT_FOUND_FILE.to_owned(), templates.not_found(report.root.as_deref())));
        files.push((INDEX_FILE.to_owned(), templates.index(&links)));

        SiteArtifacts { files }
    }
}

// ============================================================================
// Build
// ============================================================================

/// Generate the whole site into `[build].output`.
///
/// Lookup failures end up in [`BuildReport::errors`]; only output setup,
/// writes and the static copy return `Err`.
pub fn build_site<S, F>(
    config: &DaybookConfig,
    reference: ReferenceInstant,
    search: S,
    fs: &F,
) -> Result<BuildReport>
where
    S: SearchClient,
    F: SiteFs,
{
    let output = &config.build.output;
    log!("build"; "running at: {}", reference);

    reset_output(fs, output)?;

    let (report, artifacts) = SiteGenerator::new(config, reference, search).generate();

    for error in &report.errors {
        log!("error"; "{} ({}): {}", error.label, error.key, error.cause);
    }
    log!(
        "build";
        "{} pages, {} missing",
        report.pages.len(),
        report.errors.len()
    );

    write_artifacts(fs, output, &artifacts, config)?;
    copy_static(fs, &config.build.static_dir, output)?;

    log!("done"; "{}", output.display());
    Ok(report)
}

/// Remove the output root if present, then create it empty.
fn reset_output<F: SiteFs>(fs: &F, output: &Path) -> Result<()> {
    log!("build"; "setting up {}", output.display());
    if fs.exists(output) {
        fs.remove_dir_all(output)?;
    }
    fs.create_dir_all(output)
}

fn write_artifacts<F: SiteFs>(
    fs: &F,
    output: &Path,
    artifacts: &SiteArtifacts,
    config: &DaybookConfig,
) -> Result<()> {
    for (name, body) in &artifacts.files {
        let html = minify(body.as_bytes(), &config.build);
        fs.write(&output.join(name), &html)?;
        if config.verbose {
            log!("write"; "{}", name);
        }
    }
    Ok(())
}

/// Copy static assets. A missing directory fails the run like any copy error.
fn copy_static<F: SiteFs>(fs: &F, static_dir: &Path, output: &Path) -> Result<()> {
    let copied = fs.copy_tree(static_dir, output)?;
    log!("static"; "copied {} files", copied);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::DiskFs;
    use crate::notion::{SearchError, SearchResponse, SearchResult};
    use anyhow::bail;
    use chrono::NaiveDate;
    use std::{
        cell::RefCell,
        collections::{BTreeMap, BTreeSet, HashMap},
        path::PathBuf,
    };

    const ROOT_URL: &str = "https://www.notion.so/Day-Books-root";

    // ------------------------------------------------------------------------
    // Test doubles
    // ------------------------------------------------------------------------

    /// Map-backed search; unknown queries answer with no results.
    #[derive(Default)]
    struct MapSearch {
        responses: HashMap<String, Vec<SearchResult>>,
        queries: RefCell<Vec<String>>,
    }

    impl MapSearch {
        fn root(mut self) -> Self {
            self.responses.insert(
                "day books".into(),
                vec![SearchResult {
                    url: ROOT_URL.into(),
                    properties: None,
                }],
            );
            self
        }

        fn day(mut self, key: &str) -> Self {
            let url = format!("https://www.notion.so/{key}-page");
            self.responses
                .insert(key.into(), vec![SearchResult::titled(url, key)]);
            self
        }

        fn results(mut self, query: &str, results: Vec<SearchResult>) -> Self {
            self.responses.insert(query.into(), results);
            self
        }
    }

    impl SearchClient for MapSearch {
        fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
            self.queries.borrow_mut().push(query.to_owned());
            Ok(SearchResponse {
                results: self.responses.get(query).cloned().unwrap_or_default(),
            })
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum FsCall {
        Remove(PathBuf),
        Create(PathBuf),
        Write(PathBuf),
        CopyTree(PathBuf, PathBuf),
    }

    /// In-memory filesystem that records every mutating call.
    #[derive(Default)]
    struct MemoryFs {
        existing: BTreeSet<PathBuf>,
        files: RefCell<BTreeMap<PathBuf, String>>,
        calls: RefCell<Vec<FsCall>>,
        fail_create: bool,
    }

    impl MemoryFs {
        fn with_existing(mut self, path: &Path) -> Self {
            self.existing.insert(path.to_path_buf());
            self
        }

        fn writes(&self) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|c| matches!(c, FsCall::Write(_)))
                .count()
        }

        fn file(&self, path: &Path) -> Option<String> {
            self.files.borrow().get(path).cloned()
        }
    }

    impl SiteFs for MemoryFs {
        fn exists(&self, path: &Path) -> bool {
            self.existing.contains(path)
        }

        fn remove_dir_all(&self, path: &Path) -> Result<()> {
            self.calls.borrow_mut().push(FsCall::Remove(path.to_path_buf()));
            Ok(())
        }

        fn create_dir_all(&self, path: &Path) -> Result<()> {
            if self.fail_create {
                bail!("read-only filesystem");
            }
            self.calls.borrow_mut().push(FsCall::Create(path.to_path_buf()));
            Ok(())
        }

        fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
            self.calls.borrow_mut().push(FsCall::Write(path.to_path_buf()));
            self.files.borrow_mut().insert(
                path.to_path_buf(),
                String::from_utf8_lossy(content).into_owned(),
            );
            Ok(())
        }

        fn copy_tree(&self, src: &Path, dest: &Path) -> Result<usize> {
            if !self.existing.contains(src) {
                bail!("no such directory: {}", src.display());
            }
            self.calls
                .borrow_mut()
                .push(FsCall::CopyTree(src.to_path_buf(), dest.to_path_buf()));
            Ok(1)
        }
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Filesystem with the static directory in place.
    fn site_fs() -> MemoryFs {
        MemoryFs::default().with_existing(Path::new("/site/static"))
    }

    fn config() -> DaybookConfig {
        let mut config = DaybookConfig::default();
        config.build.output = PathBuf::from("/site/build");
        config.build.static_dir = PathBuf::from("/site/static");
        config
    }

    fn reference(y: i32, m: u32, d: u32) -> ReferenceInstant {
        let at = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        ReferenceInstant::new(at)
    }

    /// Sunday 2021-11-28 with a daybook page for every resolved date.
    fn scenario_a_search() -> MapSearch {
        MapSearch::default()
            .root()
            .day("2021-11-26")
            .day("2021-11-27")
            .day("2021-11-28")
            .day("2021-11-29")
            .day("2021-12-05")
    }

    /// Saturday 2022-07-16 with only some pages present. 2022-07-17 only has
    /// a near match.
    fn scenario_b_search() -> MapSearch {
        MapSearch::default()
            .root()
            .day("2022-07-16")
            .day("2022-07-18")
            .results(
                "2022-07-17",
                vec![SearchResult::titled("https://www.notion.so/x", "2022-07-17 plans")],
            )
    }

    fn names(report: &BuildReport) -> Vec<&str> {
        report.pages.iter().map(|p| p.name.as_str()).collect()
    }

    // ------------------------------------------------------------------------
    // Scenarios
    // ------------------------------------------------------------------------

    #[test]
    fn test_scenario_a_all_lookups_succeed() {
        let config = config();
        let fs = site_fs();
        let report = build_site(&config, reference(2021, 11, 28), scenario_a_search(), &fs).unwrap();

        assert_eq!(
            names(&report),
            [
                "daybooks",
                "yesterday",
                "today",
                "today-mobile",
                "tomorrow",
                "next-monday",
                "this-weekend",
                "next-weekend",
                "last-friday"
            ]
        );
        assert!(report.errors.is_empty());
        assert_eq!(report.root.as_deref(), Some(ROOT_URL));

        // 8 label pages + mobile + index + not-found
        assert_eq!(fs.writes(), 11);

        let index = fs.file(Path::new("/site/build/index.html")).unwrap();
        for page in &report.pages {
            assert!(index.contains(&format!(r#"<a href="./{0}.html">{0}</a>"#, page.name)));
        }

        let today = fs.file(Path::new("/site/build/today.html")).unwrap();
        assert!(today.contains("URL=https://www.notion.so/2021-11-28-page"));
        let mobile = fs.file(Path::new("/site/build/today-mobile.html")).unwrap();
        assert!(mobile.contains("URL=notion://www.notion.so/2021-11-28-page"));
        let friday = fs.file(Path::new("/site/build/last-friday.html")).unwrap();
        assert!(friday.contains("2021-11-26-page"));
        let daybooks = fs.file(Path::new("/site/build/daybooks.html")).unwrap();
        assert!(daybooks.contains(ROOT_URL));
    }

    #[test]
    fn test_scenario_b_partial_fixtures() {
        let config = config();
        let fs = site_fs();
        let report = build_site(&config, reference(2022, 7, 16), scenario_b_search(), &fs).unwrap();

        assert_eq!(
            names(&report),
            ["daybooks", "today", "today-mobile", "next-monday", "this-weekend"]
        );

        let failed: Vec<_> = report.errors.iter().map(|e| (e.label, e.key.as_str())).collect();
        assert_eq!(
            failed,
            [
                (Label::Yesterday, "2022-07-15"),
                (Label::Tomorrow, "2022-07-17"),
                (Label::NextWeekend, "2022-07-24"),
                (Label::LastFriday, "2022-07-15"),
            ]
        );
        assert!(
            report
                .errors
                .iter()
                .all(|e| matches!(e.cause, LookupError::NotFound { .. }))
        );

        // 5 redirect pages, then not-found and index
        assert_eq!(fs.writes(), 7);
        let index = fs.file(Path::new("/site/build/index.html")).unwrap();
        assert!(!index.contains("yesterday"));
        assert!(!index.contains("tomorrow"));
        assert!(!index.contains("last-friday"));
        assert!(fs.file(Path::new("/site/build/not-found.html")).is_some());
        assert!(fs.file(Path::new("/site/build/tomorrow.html")).is_none());
    }

    #[test]
    fn test_every_lookup_failing_still_completes() {
        let config = config();
        let fs = site_fs();
        let report = build_site(&config, reference(2021, 11, 28), MapSearch::default(), &fs).unwrap();

        assert!(report.pages.is_empty());
        assert!(report.root.is_none());
        // daybooks is skipped (no root), seven dated labels fail on a Sunday
        assert_eq!(report.errors.len(), 7);
        assert_eq!(fs.writes(), 2);

        let not_found = fs.file(Path::new("/site/build/not-found.html")).unwrap();
        assert!(!not_found.contains(ROOT_URL));
    }

    #[test]
    fn test_next_weekend_skipped_on_weekday() {
        let config = config();
        let search = MapSearch::default();
        let generator = SiteGenerator::new(&config, reference(2021, 11, 24), &search);

        assert!(matches!(
            generator.generate_label(Label::NextWeekend, None),
            LabelOutcome::Skipped
        ));
        assert!(search.queries.borrow().is_empty());
    }

    #[test]
    fn test_lookups_are_sequential_and_ordered() {
        let config = config();
        let search = scenario_a_search();
        SiteGenerator::new(&config, reference(2021, 11, 28), &search).generate();

        assert_eq!(
            *search.queries.borrow(),
            [
                "day books",
                "2021-11-27",
                "2021-11-28",
                "2021-11-29",
                "2021-11-29",
                "2021-11-29",
                "2021-12-05",
                "2021-11-26"
            ]
        );
    }

    #[test]
    fn test_ambiguous_root_is_not_an_error() {
        let config = config();
        let search = MapSearch::default().day("2021-11-28").results(
            "day books",
            vec![
                SearchResult::titled("https://n/a", "Day Books"),
                SearchResult::titled("https://n/b", "Day Books archive"),
            ],
        );
        let (report, artifacts) =
            SiteGenerator::new(&config, reference(2021, 11, 28), &search).generate();

        assert!(report.root.is_none());
        assert!(!names(&report).contains(&"daybooks"));
        assert!(report.errors.iter().all(|e| e.label != Label::Daybooks));
        assert!(artifacts.files.iter().all(|(name, _)| name != "daybooks.html"));
    }

    #[test]
    fn test_search_failure_becomes_generation_error() {
        struct Flaky;
        impl SearchClient for Flaky {
            fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
                if query == "2021-11-28" {
                    return Err(SearchError::Api {
                        status: 502,
                        body: "bad gateway".into(),
                    });
                }
                Ok(SearchResponse {
                    results: vec![SearchResult::titled(format!("https://n/{query}"), query)],
                })
            }
        }

        let config = config();
        let (report, _) = SiteGenerator::new(&config, reference(2021, 11, 28), Flaky).generate();

        let today = report.errors.iter().find(|e| e.label == Label::Today).unwrap();
        assert!(matches!(today.cause, LookupError::Search(SearchError::Api { status: 502, .. })));
        assert!(names(&report).contains(&"tomorrow"));
        assert!(!names(&report).contains(&"today-mobile"));
    }

    // ------------------------------------------------------------------------
    // Output handling
    // ------------------------------------------------------------------------

    #[test]
    fn test_existing_output_is_removed_first() {
        let config = config();
        let fs = site_fs().with_existing(Path::new("/site/build"));
        build_site(&config, reference(2021, 11, 28), scenario_a_search(), &fs).unwrap();

        let calls = fs.calls.borrow();
        assert_eq!(calls[0], FsCall::Remove(PathBuf::from("/site/build")));
        assert_eq!(calls[1], FsCall::Create(PathBuf::from("/site/build")));
    }

    #[test]
    fn test_missing_output_is_not_removed() {
        let config = config();
        let fs = site_fs();
        build_site(&config, reference(2021, 11, 28), scenario_a_search(), &fs).unwrap();

        let calls = fs.calls.borrow();
        assert!(!calls.iter().any(|c| matches!(c, FsCall::Remove(_))));
        assert_eq!(calls[0], FsCall::Create(PathBuf::from("/site/build")));
    }

    #[test]
    fn test_output_setup_failure_aborts() {
        let config = config();
        let search = scenario_a_search();
        let fs = MemoryFs {
            fail_create: true,
            ..MemoryFs::default()
        };

        assert!(build_site(&config, reference(2021, 11, 28), &search, &fs).is_err());
        assert!(search.queries.borrow().is_empty());
        assert_eq!(fs.writes(), 0);
    }

    #[test]
    fn test_static_assets_copied_last() {
        let config = config();
        let fs = MemoryFs::default().with_existing(Path::new("/site/static"));
        build_site(&config, reference(2021, 11, 28), scenario_a_search(), &fs).unwrap();

        let calls = fs.calls.borrow();
        assert_eq!(
            calls.last(),
            Some(&FsCall::CopyTree(
                PathBuf::from("/site/static"),
                PathBuf::from("/site/build")
            ))
        );
    }

    #[test]
    fn test_missing_static_dir_fails_build() {
        let config = config();
        let fs = MemoryFs::default();
        let result = build_site(&config, reference(2021, 11, 28), scenario_a_search(), &fs);

        assert!(result.is_err());
        // Pages were already written when the copy failed.
        assert_eq!(fs.writes(), 11);
        assert!(!fs.calls.borrow().iter().any(|c| matches!(c, FsCall::CopyTree(..))));
    }

    #[test]
    fn test_missing_static_dir_on_disk_fails_build() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = DaybookConfig::default();
        config.build.output = dir.path().join("build");
        config.build.static_dir = dir.path().join("static");

        let result = build_site(&config, reference(2021, 11, 28), scenario_a_search(), &DiskFs);
        assert!(result.is_err());
        assert!(config.build.output.join(INDEX_FILE).exists());
    }

    #[test]
    fn test_runs_are_byte_identical() {
        let config = config();
        let first = site_fs();
        let second = site_fs();

        build_site(&config, reference(2021, 11, 28), scenario_a_search(), &first).unwrap();
        build_site(&config, reference(2021, 11, 28), scenario_a_search(), &second).unwrap();

        assert_eq!(*first.files.borrow(), *second.files.borrow());
    }

    #[test]
    fn test_artifacts_write_order() {
        let config = config();
        let (_, artifacts) =
            SiteGenerator::new(&config, reference(2022, 7, 16), scenario_b_search()).generate();

        let order: Vec<_> = artifacts.files.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            order,
            [
                "daybooks.html",
                "today.html",
                "today-mobile.html",
                "next-monday.html",
                "this-weekend.html",
                NOT_FOUND_FILE,
                INDEX_FILE
            ]
        );
    }

    #[test]
    fn test_minified_output() {
        let mut config = config();
        config.build.minify = true;
        let fs = site_fs();
        build_site(&config, reference(2022, 7, 16), scenario_b_search(), &fs).unwrap();

        let index = fs.file(Path::new("/site/build/index.html")).unwrap();
        assert!(!index.contains("\n  <main>"));
        assert!(index.contains("./today.html"));
    }
}
