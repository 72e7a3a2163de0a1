//! Velcro - a static site composer for hand-written HTML.

mod build;
mod cli;
mod compiler;
mod config;
mod init;
mod logger;

use anyhow::{Result, bail};
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use init::new_site;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::set_verbose(cli.verbose);
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Init { name } => new_site(&config, name),
        Commands::Build { .. } => build_site(&config),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    if cli.is_init() {
        let mut config = SiteConfig::default();
        config.update_with_cli(cli);
        return Ok(config);
    }

    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);
    if !config_path.exists() {
        bail!(
            "Config file `{}` not found. Run `velcro init <NAME>` to create a site.",
            config_path.display()
        );
    }

    let mut config = SiteConfig::from_path(&config_path)?;
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}
