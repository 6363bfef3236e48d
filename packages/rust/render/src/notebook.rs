//! Jupyter notebooks rendered between `BEGIN_NOTEBOOK` / `END_NOTEBOOK`.
//!
//! Markdown cells are copied with absolute links to the docs site made
//! site-relative. Code cells become bare fenced blocks.

use std::collections::HashMap;

use mxdocs_shared::{MxDocsError, Result};
use serde::Deserialize;
use url::Url;

use crate::directive::{DirectiveKind, splice};

// ---------------------------------------------------------------------------
// Notebook format (the subset we read)
// ---------------------------------------------------------------------------

/// A parsed `.ipynb` document.
#[derive(Debug, Clone, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
}

/// One notebook cell.
#[derive(Debug, Clone, Deserialize)]
pub struct Cell {
    pub cell_type: String,
    #[serde(default)]
    pub source: CellSource,
}

/// Cell source: either a list of line strings or one multi-line string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CellSource {
    Lines(Vec<String>),
    Text(String),
}

impl Default for CellSource {
    fn default() -> Self {
        CellSource::Lines(Vec::new())
    }
}

impl CellSource {
    /// Source items, each keeping its own trailing newline.
    pub fn items(&self) -> Vec<&str> {
        match self {
            CellSource::Lines(lines) => lines.iter().map(String::as_str).collect(),
            CellSource::Text(text) => text.split_inclusive('\n').collect(),
        }
    }
}

impl Notebook {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| MxDocsError::parse(format!("invalid notebook JSON: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render every cell of `notebook` to Markdown text.
///
/// `docs_url_root` (e.g. `https://docs.multiversx.com`) is stripped from links
/// in Markdown cells so they resolve inside the site.
pub fn render_notebook(notebook: &Notebook, docs_url_root: &str) -> String {
    let site_prefix = format!("{}/", docs_url_root.trim_end_matches('/'));
    let mut out = String::new();

    for cell in &notebook.cells {
        match cell.cell_type.as_str() {
            "markdown" => {
                for item in cell.source.items() {
                    out.push('\n');
                    out.push_str(item.replace(&site_prefix, "/").trim_end());
                }
            }
            "code" => {
                out.push_str("\n```\n");
                for item in cell.source.items() {
                    out.push_str(item);
                }
                out.push_str("\n```");
            }
            other => tracing::debug!(cell_type = other, "skipping notebook cell"),
        }

        out.push('\n');
    }

    out
}

/// Splice already-fetched notebooks into `text`.
pub fn splice_notebooks(
    text: &str,
    fetched: &HashMap<Url, Notebook>,
    docs_url_root: &str,
) -> Result<String> {
    splice(text, DirectiveKind::Notebook, |directive| {
        let notebook = fetched.get(&directive.url).ok_or_else(|| {
            MxDocsError::directive(format!("no notebook fetched for {}", directive.url))
        })?;

        Ok(render_notebook(notebook, docs_url_root)
            .lines()
            .map(str::to_string)
            .collect())
    })
}
