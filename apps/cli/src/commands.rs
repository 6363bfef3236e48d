//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use mxdocs_core::{
    DirectiveKind, FetchOptions, Fetcher, MarkersOptions, MarkersReport, ProgressReporter,
    RenderOptions, add_markers, build_docs, render_pages,
};
use mxdocs_shared::{AppConfig, config::CONFIG_FILE_NAME, init_config, load_config};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// mxdocs: prepare documentation pages for publishing.
#[derive(Parser)]
#[command(
    name = "mxdocs",
    version,
    about = "Render remote content into documentation pages and mark their contexts.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./mxdocs.toml, then ~/.mxdocs/mxdocs.toml).
    #[arg(long, env = "MXDOCS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Insert context separator markers into every page and audit the result.
    Markers {
        /// Docs root (overrides config).
        #[arg(long)]
        root: Option<PathBuf>,

        /// Only report pages that would change; exit non-zero if any would.
        #[arg(long)]
        check: bool,
    },

    /// Fetch and splice BEGIN_INCLUDE_FILE fragments.
    RenderIncludes {
        /// Pages relative to the docs root (overrides config).
        pages: Vec<PathBuf>,

        /// Docs root (overrides config).
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Fetch and render BEGIN_NOTEBOOK notebooks.
    RenderNotebooks {
        /// Pages relative to the docs root (overrides config).
        pages: Vec<PathBuf>,

        /// Docs root (overrides config).
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Render includes, render notebooks, then insert markers.
    Build {
        /// Docs root (overrides config).
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "mxdocs=info",
        1 => "mxdocs=debug",
        _ => "mxdocs=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Markers { root, check } => {
            let config = load_with_root(config_path, root)?;
            cmd_markers(&config, check)
        }
        Command::RenderIncludes { pages, root } => {
            let config = load_with_root(config_path, root)?;
            cmd_render(&config, DirectiveKind::IncludeFile, pages).await
        }
        Command::RenderNotebooks { pages, root } => {
            let config = load_with_root(config_path, root)?;
            cmd_render(&config, DirectiveKind::Notebook, pages).await
        }
        Command::Build { root } => {
            let config = load_with_root(config_path, root)?;
            cmd_build(&config).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load config and apply a `--root` override.
fn load_with_root(config_path: Option<&Path>, root: Option<PathBuf>) -> Result<AppConfig> {
    let mut config = load_config(config_path)?;
    if let Some(root) = root {
        config.markers.docs_root = root;
    }
    Ok(config)
}

fn build_fetcher(config: &AppConfig) -> Result<Fetcher> {
    Ok(Fetcher::new(&FetchOptions {
        timeout_secs: config.render.timeout_secs,
    })?)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_markers(config: &AppConfig, check: bool) -> Result<()> {
    let opts = MarkersOptions {
        check,
        ..MarkersOptions::from(&config.markers)
    };

    info!(root = %opts.docs_root.display(), check, "adding context markers");

    let reporter = CliProgress::new();
    let report = add_markers(&opts, &reporter)?;

    print_markers_summary(&report);

    let changed = report.changed().count();
    if check && changed > 0 {
        return Err(eyre!(
            "{changed} page(s) need context markers; run `mxdocs markers` to fix"
        ));
    }

    Ok(())
}

async fn cmd_render(config: &AppConfig, kind: DirectiveKind, pages: Vec<PathBuf>) -> Result<()> {
    let mut opts = match kind {
        DirectiveKind::IncludeFile => RenderOptions::includes(config),
        DirectiveKind::Notebook => RenderOptions::notebooks(config),
    };
    if !pages.is_empty() {
        opts.pages = pages;
    }

    info!(?kind, pages = opts.pages.len(), "rendering remote content");

    let fetcher = build_fetcher(config)?;
    let reporter = CliProgress::new();
    let rewritten = render_pages(kind, &opts, &fetcher, &reporter).await?;
    drop(reporter);

    println!();
    println!("  Rendered {} of {} page(s)", rewritten.len(), opts.pages.len());
    for path in &rewritten {
        println!("    {}", path.display());
    }
    println!();

    Ok(())
}

async fn cmd_build(config: &AppConfig) -> Result<()> {
    info!(root = %config.markers.docs_root.display(), "building documentation");

    let fetcher = build_fetcher(config)?;
    let reporter = CliProgress::new();
    let report = build_docs(config, &fetcher, &reporter).await?;

    println!();
    println!("  Includes:  {} page(s) rendered", report.includes.len());
    println!("  Notebooks: {} page(s) rendered", report.notebooks.len());
    print_markers_summary(&report.markers);

    Ok(())
}

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    init_config(&path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

fn print_markers_summary(report: &MarkersReport) {
    let changed: Vec<&Path> = report.changed().collect();

    println!();
    if report.check {
        println!("  Context markers checked.");
        for path in &changed {
            println!("  would change: {}", path.display());
        }
    } else {
        println!("  Context markers added.");
    }
    println!("  Pages:     {}", report.processed.len());
    println!("  Changed:   {}", changed.len());
    println!("  Skipped:   {}", report.skipped.len());
    println!("  Contexts:  {}", report.context_count());
    println!("  Warnings:  {}", report.diagnostics.len());
    println!("  Time:      {:.1}s", report.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_processed(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("[{current}/{total}] {}", path.display()));
    }

    fn done(&self, _report: &MarkersReport) {
        self.spinner.finish_and_clear();
    }
}
