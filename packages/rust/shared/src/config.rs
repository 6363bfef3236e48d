//! Application configuration for mxdocs.
//!
//! Config lives in `mxdocs.toml`, looked up in the working directory first and
//! then at `~/.mxdocs/mxdocs.toml`. CLI flags override config file values,
//! which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MxDocsError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "mxdocs.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".mxdocs";

// ---------------------------------------------------------------------------
// Config structs (matching mxdocs.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Marker insertion settings.
    #[serde(default)]
    pub markers: MarkersConfig,

    /// Remote-content rendering settings.
    #[serde(default)]
    pub render: RenderConfig,
}

/// `[markers]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkersConfig {
    /// Root directory scanned for `.md` pages.
    #[serde(default = "default_docs_root")]
    pub docs_root: PathBuf,

    /// Any page below a directory with one of these names is ignored.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Pages with exactly one of these basenames are ignored.
    #[serde(default = "default_exclude_files")]
    pub exclude_files: Vec<String>,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            docs_root: default_docs_root(),
            exclude_dirs: default_exclude_dirs(),
            exclude_files: default_exclude_files(),
        }
    }
}

fn default_docs_root() -> PathBuf {
    PathBuf::from("docs")
}
fn default_exclude_dirs() -> Vec<String> {
    vec!["node_modules".into()]
}
fn default_exclude_files() -> Vec<String> {
    vec![
        "README.md".into(),
        "utils.md".into(),
        "pull_request_template.md".into(),
    ]
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Absolute links under this root are rewritten to site-relative ones in
    /// rendered notebook cells.
    #[serde(default = "default_docs_url_root")]
    pub docs_url_root: String,

    /// Pages (relative to `docs_root`) carrying `BEGIN_INCLUDE_FILE` directives.
    #[serde(default = "default_include_pages")]
    pub include_pages: Vec<PathBuf>,

    /// Pages (relative to `docs_root`) carrying `BEGIN_NOTEBOOK` directives.
    #[serde(default = "default_notebook_pages")]
    pub notebook_pages: Vec<PathBuf>,

    /// HTTP timeout for remote fetches.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            docs_url_root: default_docs_url_root(),
            include_pages: default_include_pages(),
            notebook_pages: default_notebook_pages(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_docs_url_root() -> String {
    "https://docs.multiversx.com".into()
}
fn default_include_pages() -> Vec<PathBuf> {
    vec![PathBuf::from("sdk-and-tools/sdk-js/sdk-js-cookbook.md")]
}
fn default_notebook_pages() -> Vec<PathBuf> {
    vec![PathBuf::from("sdk-and-tools/sdk-py/sdk-py-cookbook.md")]
}
fn default_timeout_secs() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the per-user config directory (`~/.mxdocs/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| MxDocsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Find the config file to load.
///
/// An explicit path always wins (even if it does not exist, so that loading it
/// reports the problem). Otherwise `./mxdocs.toml`, then `~/.mxdocs/mxdocs.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        return Ok(Some(path.to_path_buf()));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(Some(local));
    }

    let user = config_dir()?.join(CONFIG_FILE_NAME);
    if user.is_file() {
        return Ok(Some(user));
    }

    Ok(None)
}

/// Load the application config. Returns defaults if no config file is found.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match resolve_config_path(explicit)? {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("no config file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MxDocsError::io(path, e))?;

    let config = toml::from_str(&content).map_err(|e| {
        MxDocsError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), "loaded config");

    Ok(config)
}

/// Write a default config file to `path`. Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(MxDocsError::config(format!(
            "{} already exists, not overwriting",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| MxDocsError::io(parent, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| MxDocsError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| MxDocsError::io(path, e))?;
    tracing::info!(path = %path.display(), "created default config file");

    Ok(())
}
