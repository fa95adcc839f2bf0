//! multigat - build many Gatsby sites from one codebase.

mod activate;
mod cli;
mod config;
mod core;
mod freshness;
mod generator;
mod logger;
mod make;
mod site;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, Project};
use config::ProjectConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let project = Project::new(ProjectConfig::load(&cli.config)?);

    match &cli.command {
        Commands::List => cli::site::list(&project),
        Commands::Create { site, extends } => cli::site::create(&project, site, extends),
        Commands::Show { site } => cli::site::show(&project, site),
        Commands::Make { all: true, refresh, .. } => cli::site::make_all(&project, *refresh),
        Commands::Make { site, refresh, .. } => match site {
            Some(site) => cli::site::make(&project, site, *refresh),
            None => anyhow::bail!("a site name or --all is required"),
        },
        Commands::Clean { site } => cli::site::clean(&project, site),
        Commands::Activate { site } => cli::site::activate(&project, site),
        Commands::Build { site } => cli::build::build(&project, site.as_deref()),
        Commands::Start {
            site,
            port,
            no_watch,
        } => cli::start::start(&project, site, *port, !*no_watch),
    }
}
