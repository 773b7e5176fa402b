//! `orbport import <REFERENCE>...`: copy orbs into the destination registry.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};

use orbport_client::OrbRegistryClient;
use orbport_core::{config, CliConfig, DestinationRegistry, SourceRegistry};
use orbport_import::{pipeline, ApplySummary, ImportOutcome};

/// Import namespaces and orb versions.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// `namespace` (latest version of every orb) or `namespace/orb[@version]`.
    #[arg(required = true, value_name = "REFERENCE")]
    pub references: Vec<String>,

    /// Apply without asking for confirmation.
    #[arg(long)]
    pub no_prompt: bool,

    /// Print the plan and exit without changing the destination.
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Read from the destination registry as well (test servers only).
    #[arg(long, hide = true)]
    pub integration_testing: bool,
}

/// Registry connection overrides; unset fields fall back to ~/.orbport/cli.yml.
#[derive(Args, Debug, Default)]
pub struct RegistryArgs {
    /// Destination registry host.
    #[arg(long, env = "ORBPORT_HOST", value_name = "URL")]
    pub host: Option<String>,

    /// API token for the destination registry.
    #[arg(long, env = "ORBPORT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Registry orbs are copied from.
    #[arg(long, value_name = "URL")]
    pub source_host: Option<String>,

    /// GraphQL endpoint on the source registry.
    #[arg(long, value_name = "PATH")]
    pub source_endpoint: Option<String>,
}

impl RegistryArgs {
    /// Layer the overrides onto `base`.
    pub fn apply(self, mut base: CliConfig) -> CliConfig {
        if let Some(host) = self.host {
            base.host = host;
        }
        if let Some(token) = self.token {
            base.token = Some(token);
        }
        if let Some(source_host) = self.source_host {
            base.source_host = source_host;
        }
        if let Some(source_endpoint) = self.source_endpoint {
            base.source_endpoint = source_endpoint;
        }
        base
    }
}

impl ImportArgs {
    pub fn run(self) -> Result<()> {
        let file_config = config::load().context("failed to read ~/.orbport/cli.yml")?;
        let config = self.registry.apply(file_config);

        let destination = OrbRegistryClient::destination(&config)
            .context("invalid destination registry settings")?;
        tracing::debug!(address = destination.address(), "destination registry");

        let outcome = if self.integration_testing {
            execute(&destination, &destination, &self.references, self.dry_run, self.no_prompt)?
        } else {
            let source = OrbRegistryClient::source(&config)
                .context("invalid source registry settings")?;
            tracing::debug!(address = source.address(), "source registry");
            execute(&source, &destination, &self.references, self.dry_run, self.no_prompt)?
        };

        match outcome {
            ImportOutcome::NothingToDo => {}
            ImportOutcome::DryRun => println!("{}", "[dry-run] no changes made".dimmed()),
            ImportOutcome::Declined => println!("Import cancelled."),
            ImportOutcome::Applied(summary) => print_summary(&summary),
        }
        Ok(())
    }
}

fn execute(
    source: &dyn SourceRegistry,
    destination: &dyn DestinationRegistry,
    references: &[String],
    dry_run: bool,
    no_prompt: bool,
) -> Result<ImportOutcome> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut prompt_error = None;

    let outcome = pipeline::run(source, destination, references, dry_run, &mut out, |_| {
        if no_prompt {
            return true;
        }
        match confirm() {
            Ok(answer) => answer,
            Err(e) => {
                prompt_error = Some(e);
                false
            }
        }
    });
    out.flush().ok();

    if let Some(e) = prompt_error {
        return Err(e).context("failed to read confirmation");
    }
    outcome.context("import failed")
}

fn confirm() -> Result<bool, dialoguer::Error> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Are you sure you would like to proceed?")
        .default(false)
        .interact()
}

fn print_summary(summary: &ApplySummary) {
    println!(
        "{} Imported {} version(s) ({} new namespace(s), {} new orb(s))",
        "✓".green(),
        summary.versions,
        summary.namespaces,
        summary.orbs
    );
}
