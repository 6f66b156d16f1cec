//! Daybook - static redirect pages for relative days backed by Notion.

mod build;
mod calendar;
mod cli;
mod config;
mod fs;
mod locator;
mod logger;
mod notion;
mod render;
mod utils;

use anyhow::Result;
use build::build_site;
use calendar::ReferenceInstant;
use clap::Parser;
use cli::{BuildArgs, Cli, Commands};
use config::DaybookConfig;
use fs::DiskFs;
use notion::{CapturingClient, FixtureClient, NotionClient, SearchClient};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = DaybookConfig::load(&cli)?;
    if config.config_path.exists() {
        log!("config"; "{}", config.config_path.display());
    }

    match &cli.command {
        Commands::Build { build_args } => build_all(&config, build_args),
        Commands::Whoami => whoami(&config),
    }
}

/// Pick the search backend, then generate the site.
///
/// `--fixtures` replaces Notion entirely (no token needed); `--capture`
/// records whatever backend is active. Both are already resolved against
/// the project root.
fn build_all(config: &DaybookConfig, args: &BuildArgs) -> Result<()> {
    let reference = args
        .date
        .map(ReferenceInstant::from_date)
        .unwrap_or_else(ReferenceInstant::now);

    let search: Box<dyn SearchClient> = match &config.fixtures {
        Some(dir) => {
            log!("notion"; "answering from fixtures in {}", dir.display());
            Box::new(FixtureClient::new(dir))
        }
        None => Box::new(NotionClient::from_env(&config.notion)?),
    };
    let search: Box<dyn SearchClient> = match &config.capture {
        Some(dir) => Box::new(CapturingClient::new(search, dir)),
        None => search,
    };

    let report = build_site(config, reference, search, &DiskFs)?;
    if !report.errors.is_empty() {
        log!("warn"; "{} labels have no daybook page", report.errors.len());
    }
    Ok(())
}

/// Verify the token by fetching the integration's bot user.
fn whoami(config: &DaybookConfig) -> Result<()> {
    let client = NotionClient::from_env(&config.notion)?;
    let user = client.me()?;
    log!("notion"; "user id: {}", user.id);
    if let Some(name) = user.name {
        log!("notion"; "name: {}", name);
    }
    Ok(())
}
