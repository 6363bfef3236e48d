//! Rendering remote content into the configured pages.

use std::fs;
use std::path::PathBuf;

use mxdocs_render::{DirectiveKind, Fetcher, render_includes, render_notebooks};
use mxdocs_shared::{AppConfig, MxDocsError, Result};
use tracing::{info, instrument};

use crate::pipeline::ProgressReporter;

/// Which pages to render and how.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Pages are resolved relative to this directory.
    pub docs_root: PathBuf,
    pub pages: Vec<PathBuf>,
    /// Site root stripped from notebook links.
    pub docs_url_root: String,
}

impl RenderOptions {
    /// Pages carrying include directives.
    pub fn includes(config: &AppConfig) -> Self {
        Self {
            docs_root: config.markers.docs_root.clone(),
            pages: config.render.include_pages.clone(),
            docs_url_root: config.render.docs_url_root.clone(),
        }
    }

    /// Pages carrying notebook directives.
    pub fn notebooks(config: &AppConfig) -> Self {
        Self {
            docs_root: config.markers.docs_root.clone(),
            pages: config.render.notebook_pages.clone(),
            docs_url_root: config.render.docs_url_root.clone(),
        }
    }
}

/// Fetch and splice `kind` directives into every page. Returns the pages whose
/// text changed. A missing page, a failed fetch or a malformed directive aborts.
#[instrument(skip(opts, fetcher, progress))]
pub async fn render_pages(
    kind: DirectiveKind,
    opts: &RenderOptions,
    fetcher: &Fetcher,
    progress: &dyn ProgressReporter,
) -> Result<Vec<PathBuf>> {
    progress.phase(match kind {
        DirectiveKind::IncludeFile => "Rendering includes",
        DirectiveKind::Notebook => "Rendering notebooks",
    });

    let total = opts.pages.len();
    let mut rewritten = Vec::new();

    for (i, page) in opts.pages.iter().enumerate() {
        let path = opts.docs_root.join(page);
        let input = fs::read_to_string(&path).map_err(|e| MxDocsError::io(&path, e))?;

        let output = match kind {
            DirectiveKind::IncludeFile => render_includes(&input, fetcher).await?,
            DirectiveKind::Notebook => {
                render_notebooks(&input, fetcher, &opts.docs_url_root).await?
            }
        };

        if output != input {
            fs::write(&path, &output).map_err(|e| MxDocsError::io(&path, e))?;
            info!(path = %path.display(), "rendered");
            rewritten.push(path.clone());
        }

        progress.file_processed(&path, i + 1, total);
    }

    Ok(rewritten)
}
