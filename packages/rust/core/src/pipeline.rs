//! End-to-end workflows.
//!
//! `markers`: discover pages → segment → write back → audit.
//! `build`: render includes → render notebooks → `markers`.
//!
//! The rewrite phase and the audit phase never interleave. Phase 1 hands the
//! collected [`ProcessedFile`] list to phase 2 once every page is written.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use mxdocs_markdown::{Segmented, SegmentedDocument, segment};
use mxdocs_render::{DirectiveKind, Fetcher};
use mxdocs_shared::{AppConfig, MarkersConfig, MxDocsError, Result};
use tracing::{debug, info, instrument, warn};

use crate::discover::discover_markdown_files;
use crate::render::{RenderOptions, render_pages};
use crate::validate::{Diagnostic, audit};

/// Options for [`add_markers`].
#[derive(Debug, Clone)]
pub struct MarkersOptions {
    /// Root directory scanned for pages.
    pub docs_root: PathBuf,
    /// Directory names excluded from the scan.
    pub exclude_dirs: Vec<String>,
    /// File basenames excluded from the scan.
    pub exclude_files: Vec<String>,
    /// Report what would change without writing anything.
    pub check: bool,
}

impl From<&MarkersConfig> for MarkersOptions {
    fn from(config: &MarkersConfig) -> Self {
        Self {
            docs_root: config.docs_root.clone(),
            exclude_dirs: config.exclude_dirs.clone(),
            exclude_files: config.exclude_files.clone(),
            check: false,
        }
    }
}

/// A page that went through segmentation.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub path: PathBuf,
    /// Whether the segmented text differs from what was on disk.
    pub changed: bool,
    pub document: SegmentedDocument,
}

/// Result of [`add_markers`].
#[derive(Debug)]
pub struct MarkersReport {
    /// Segmented pages, in discovery order.
    pub processed: Vec<ProcessedFile>,
    /// Pages left untouched because of the exclude-file marker.
    pub skipped: Vec<PathBuf>,
    /// Audit output.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether this was a check-only run.
    pub check: bool,
    pub elapsed: Duration,
}

impl MarkersReport {
    /// Contexts discovered across all processed pages.
    pub fn context_count(&self) -> usize {
        self.processed.iter().map(|f| f.document.contexts.len()).sum()
    }

    /// Pages whose text changed (or would change, in check mode).
    pub fn changed(&self) -> impl Iterator<Item = &Path> {
        self.processed
            .iter()
            .filter(|f| f.changed)
            .map(|f| f.path.as_path())
    }
}

/// Result of [`build_docs`].
#[derive(Debug)]
pub struct BuildReport {
    /// Pages rewritten by include rendering.
    pub includes: Vec<PathBuf>,
    /// Pages rewritten by notebook rendering.
    pub notebooks: Vec<PathBuf>,
    pub markers: MarkersReport,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each page is handled.
    fn file_processed(&self, path: &Path, current: usize, total: usize);
    /// Called once the markers pipeline completes, before its diagnostics are logged.
    fn done(&self, report: &MarkersReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_processed(&self, _path: &Path, _current: usize, _total: usize) {}
    fn done(&self, _report: &MarkersReport) {}
}

/// Insert context markers into every page below the docs root, then audit.
///
/// A failed read or write aborts the run.
#[instrument(skip_all, fields(root = %opts.docs_root.display(), check = opts.check))]
pub fn add_markers(opts: &MarkersOptions, progress: &dyn ProgressReporter) -> Result<MarkersReport> {
    let start = Instant::now();

    progress.phase("Discovering pages");
    let files = discover_markdown_files(&opts.docs_root, &opts.exclude_dirs, &opts.exclude_files)?;

    // --- Phase 1: rewrite ---
    progress.phase(if opts.check {
        "Checking context markers"
    } else {
        "Adding context markers"
    });

    let total = files.len();
    let mut processed = Vec::with_capacity(total);
    let mut skipped = Vec::new();

    for (i, path) in files.iter().enumerate() {
        info!(path = %path.display(), "processing file");

        let input = fs::read_to_string(path).map_err(|e| MxDocsError::io(path, e))?;

        match segment(path, &input) {
            Segmented::Skipped => skipped.push(path.clone()),
            Segmented::Rewritten(document) => {
                let changed = document.text != input;
                if changed && !opts.check {
                    fs::write(path, &document.text).map_err(|e| MxDocsError::io(path, e))?;
                    debug!(path = %path.display(), "rewritten");
                }
                processed.push(ProcessedFile {
                    path: path.clone(),
                    changed,
                    document,
                });
            }
        }

        progress.file_processed(path, i + 1, total);
    }

    // --- Phase 2: audit ---
    let diagnostics = audit(&processed);

    let report = MarkersReport {
        processed,
        skipped,
        diagnostics,
        check: opts.check,
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    for diagnostic in &report.diagnostics {
        warn!("{diagnostic}");
    }

    info!(
        pages = report.processed.len(),
        skipped = report.skipped.len(),
        changed = report.changed().count(),
        contexts = report.context_count(),
        warnings = report.diagnostics.len(),
        elapsed_ms = report.elapsed.as_millis(),
        "markers pipeline complete"
    );

    Ok(report)
}

/// Render remote content, then add markers. Segmentation starts only after
/// every fetch has completed and been written.
#[instrument(skip_all)]
pub async fn build_docs(
    config: &AppConfig,
    fetcher: &Fetcher,
    progress: &dyn ProgressReporter,
) -> Result<BuildReport> {
    let includes = render_pages(
        DirectiveKind::IncludeFile,
        &RenderOptions::includes(config),
        fetcher,
        progress,
    )
    .await?;

    let notebooks = render_pages(
        DirectiveKind::Notebook,
        &RenderOptions::notebooks(config),
        fetcher,
        progress,
    )
    .await?;

    let markers = add_markers(&MarkersOptions::from(&config.markers), progress)?;

    Ok(BuildReport {
        includes,
        notebooks,
        markers,
    })
}

#[cfg(test)]
mod tests {
    use mxdocs_shared::Marker;

    use super::*;

    const SEP: &str = Marker::Separator.as_str();

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn options(root: &Path) -> MarkersOptions {
        MarkersOptions {
            docs_root: root.to_path_buf(),
            ..MarkersOptions::from(&MarkersConfig::default())
        }
    }

    #[test]
    fn rewrites_pages_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let page = write(dir.path(), "guide/intro.md", "# Title\n\nSome text\n\n## Sub\nmore\n");
        let readme = write(dir.path(), "README.md", "# Readme\n");
        let vendored = write(dir.path(), "node_modules/pkg/doc.md", "# Vendored\n");

        let report = add_markers(&options(dir.path()), &SilentProgress).unwrap();

        let text = fs::read_to_string(&page).unwrap();
        assert_eq!(
            text,
            format!("{SEP}\n\n# Title\n\nSome text\n\n{SEP}\n\n## Sub\nmore\n")
        );
        assert_eq!(fs::read_to_string(&readme).unwrap(), "# Readme\n");
        assert_eq!(fs::read_to_string(&vendored).unwrap(), "# Vendored\n");

        assert_eq!(report.processed.len(), 1);
        assert_eq!(report.context_count(), 2);
        assert_eq!(report.changed().collect::<Vec<_>>(), vec![page.as_path()]);

        // Both contexts are short, and the page has no abstract marker.
        assert_eq!(report.diagnostics.len(), 3);
        assert!(matches!(
            report.diagnostics.last(),
            Some(Diagnostic::MissingAbstract { file }) if *file == page
        ));
    }

    #[test]
    fn excluded_page_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!("#  odd\n\n\n\n# Title\ntext   \n{}\n\n\n", Marker::ExcludeFile);
        let page = write(dir.path(), "skip.md", &content);

        let report = add_markers(&options(dir.path()), &SilentProgress).unwrap();

        assert_eq!(fs::read_to_string(&page).unwrap(), content);
        assert_eq!(report.skipped, vec![page]);
        assert!(report.processed.is_empty());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn second_run_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let page = write(
            dir.path(),
            "a.md",
            "intro\n# One\nbody\n\n\n\n```\n# comment\n```\n## Two\n",
        );

        add_markers(&options(dir.path()), &SilentProgress).unwrap();
        let first = fs::read_to_string(&page).unwrap();

        let report = add_markers(&options(dir.path()), &SilentProgress).unwrap();
        assert_eq!(fs::read_to_string(&page).unwrap(), first);
        assert_eq!(report.changed().count(), 0);
    }

    #[test]
    fn check_mode_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let page = write(dir.path(), "a.md", "# Title\nbody\n");

        let opts = MarkersOptions {
            check: true,
            ..options(dir.path())
        };
        let report = add_markers(&opts, &SilentProgress).unwrap();

        assert_eq!(fs::read_to_string(&page).unwrap(), "# Title\nbody\n");
        assert!(report.check);
        assert_eq!(report.changed().count(), 1);
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: std::sync::Mutex<Vec<String>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            self.events.lock().unwrap().push(format!("phase {name}"));
        }
        fn file_processed(&self, _path: &Path, current: usize, total: usize) {
            self.events.lock().unwrap().push(format!("file {current}/{total}"));
        }
        fn done(&self, report: &MarkersReport) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {}", report.diagnostics.len()));
        }
    }

    #[test]
    fn progress_finishes_with_full_report() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "# Title
body
");
        write(dir.path(), "b.md", "# Other
body
");

        let progress = RecordingProgress::default();
        let report = add_markers(&options(dir.path()), &progress).unwrap();

        let events = progress.events.into_inner().unwrap();
        assert_eq!(
            events,
            vec![
                "phase Discovering pages".to_string(),
                "phase Adding context markers".to_string(),
                "file 1/2".to_string(),
                "file 2/2".to_string(),
                format!("done {}", report.diagnostics.len()),
            ]
        );
        // Two weak contexts and two pages without an abstract.
        assert_eq!(report.diagnostics.len(), 4);
    }

    #[test]
    fn missing_root_aborts() {
        let opts = options(Path::new("/no/such/docs"));
        let err = add_markers(&opts, &SilentProgress).unwrap_err();
        assert!(matches!(err, MxDocsError::Config { .. }));
    }

    #[tokio::test]
    async fn build_renders_before_segmenting() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/part.md"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string("## Included section\n\nFetched body text.\n"),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let begin = format!(
            r#"<!-- BEGIN_INCLUDE_FILE {{ "url": "{}/part.md" }} -->"#,
            server.uri()
        );
        let page = write(
            dir.path(),
            "cookbook.md",
            &format!("# Cookbook\n\n{begin}\n<!-- END_INCLUDE_FILE -->\n"),
        );

        let mut config = AppConfig::default();
        config.markers.docs_root = dir.path().to_path_buf();
        config.render.include_pages = vec![PathBuf::from("cookbook.md")];
        config.render.notebook_pages = Vec::new();

        let fetcher = Fetcher::new(&mxdocs_render::FetchOptions::default()).unwrap();
        let report = build_docs(&config, &fetcher, &SilentProgress).await.unwrap();

        assert_eq!(report.includes, vec![page.clone()]);
        assert!(report.notebooks.is_empty());
        assert_eq!(report.markers.context_count(), 2);

        let text = fs::read_to_string(&page).unwrap();
        assert!(text.contains(&format!("{begin}\n{SEP}\n\n## Included section")));
    }
}
