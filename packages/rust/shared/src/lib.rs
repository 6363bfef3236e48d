//! Shared types, error model, and configuration for mxdocs.
//!
//! This crate is the foundation depended on by all other mxdocs crates.
//! It provides:
//! - [`MxDocsError`]: the unified error type
//! - The marker vocabulary ([`Marker`]) embedded in documentation pages
//! - Configuration ([`AppConfig`], [`MarkersConfig`], [`RenderConfig`], config loading)

pub mod config;
pub mod error;
pub mod markers;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, MarkersConfig, RenderConfig, config_dir, init_config, load_config,
    load_config_from, resolve_config_path,
};
pub use error::{MxDocsError, Result};
pub use markers::{Marker, WEAK_CONTENT_THRESHOLD};
