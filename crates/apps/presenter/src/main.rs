mod cli;
mod config;
mod session;

use std::sync::Arc;

use anyhow::Context;
use catalog::IonAssetResolver;
use clap::Parser;
use panels::DirectorySink;
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, Command};
use crate::config::PresenterConfig;
use crate::session::{Presenter, Session};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut config = PresenterConfig::load(args.config.as_deref())?;
    config.apply_env();
    config.apply_cli_overrides(&args);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &args.command {
        Command::Catalog => {
            println!("{}", serde_json::to_string_pretty(&config.catalog)?);
        }
        Command::Run { session } => {
            let script = Session::load(session)?;
            if config.ion.token.is_none() {
                tracing::warn!("no asset token configured; model placement will fail");
            }
            let resolver = Arc::new(IonAssetResolver::new(
                config.ion.api_url.clone(),
                config.ion.token.clone(),
            ));
            let sink = Arc::new(DirectorySink::new(config.export.out_dir.clone()));
            let mut presenter =
                Presenter::new(&config, resolver, sink).context("building presenter")?;

            tracing::info!(steps = script.steps.len(), "running session");
            let report = presenter.run(&script).await;
            if !report.failures.is_empty() {
                tracing::warn!(failed = report.failures.len(), "session finished with failures");
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
