//! Pipeline orchestration for mxdocs.
//!
//! This crate ties together page discovery, remote-content rendering, context
//! segmentation, and validation into end-to-end workflows (e.g. [`pipeline::add_markers`]).

pub mod discover;
pub mod pipeline;
pub mod render;
pub mod validate;

pub use discover::discover_markdown_files;
pub use pipeline::{
    BuildReport, MarkersOptions, MarkersReport, ProcessedFile, ProgressReporter, SilentProgress,
    add_markers, build_docs,
};
pub use render::{RenderOptions, render_pages};
pub use validate::{Diagnostic, audit};

// The CLI builds its fetcher through this crate.
pub use mxdocs_render::{DirectiveKind, FetchOptions, Fetcher};
