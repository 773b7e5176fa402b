//! `orbport setup --host <URL> --token <TOKEN>`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use orbport_core::config;

/// Save destination registry settings.
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Destination registry host, including scheme.
    #[arg(long, value_name = "URL")]
    pub host: String,

    /// API token for the destination registry.
    #[arg(long)]
    pub token: String,

    /// GraphQL endpoint path relative to the host.
    #[arg(long, value_name = "PATH")]
    pub endpoint: Option<String>,
}

impl SetupArgs {
    pub fn run(self) -> Result<()> {
        let mut cfg = config::load().context("failed to read existing config")?;
        cfg.host = self.host;
        cfg.token = Some(self.token);
        if let Some(endpoint) = self.endpoint {
            cfg.endpoint = endpoint;
        }

        let path = config::save(&cfg).context("failed to save config")?;
        println!("{} Registry host set to '{}'", "✓".green(), cfg.host);
        println!("  Saved to: {}", path.display());
        Ok(())
    }
}
