//! CodeBuild blueprint CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Load configuration**: seed the environment from an optional `.env`
//!    file and resolve [`config::CliConfig`].
//! 2. **Wire observability**: configure `tracing-subscriber` with a JSON layer
//!    on stderr. All `tracing` events emitted by the `blueprint` crate flow
//!    through this layer; stdout carries only the rendered document.
//! 3. **Render**: build the [`blueprint::CodeBuildBlueprint`] and print the
//!    template.
//!
//! The binary takes no flags.

mod config;

use std::io::Write;

use anyhow::{Context, Result};
use blueprint::{Blueprint, CodeBuildBlueprint};
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = CliConfig::load()?;
    let blueprint = CodeBuildBlueprint::new(config.namespace, config.variables, config.blueprint);
    let template = blueprint
        .create_template()
        .with_context(|| format!("failed to assemble blueprint '{}'", blueprint.name()))?;
    let rendered = template.to_json().context("failed to render template")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").context("failed to write template to stdout")?;
    tracing::info!(bytes = rendered.len(), "Template written");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .json()
        .init();
}
