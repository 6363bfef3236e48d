//! mxdocs CLI: documentation-build preprocessor.
//!
//! Renders remote content into documentation pages and inserts context
//! separator markers between their sections.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
