//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Build many Gatsby sites from one shared codebase
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: multigat.toml)
    #[arg(short = 'C', long, global = true, default_value = "multigat.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List all sites
    #[command(visible_alias = "ls")]
    List,

    /// Create a new site config
    Create {
        /// Site name (directory under `sites/`)
        site: String,

        /// Parent sites to extend (default: `default`)
        #[arg(short, long = "extends", value_name = "PARENT")]
        extends: Vec<String>,
    },

    /// Print a site's mixin chain and effective config
    Show { site: String },

    /// Make the build tree of one or all sites
    #[command(visible_alias = "m")]
    Make {
        /// Site to make
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        site: Option<String>,

        /// Make every site in parallel
        #[arg(short, long)]
        all: bool,

        /// Only update files, skip scaffolding
        #[arg(short, long)]
        refresh: bool,
    },

    /// Remove a site's build tree
    Clean { site: String },

    /// Point the project root at a site
    #[command(visible_alias = "a")]
    Activate { site: String },

    /// Build one site, or all sites when none is given
    #[command(visible_alias = "b")]
    Build { site: Option<String> },

    /// Start a site in development mode
    #[command(visible_alias = "s")]
    Start {
        site: String,

        /// Development server port
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not re-make the site on changes
        #[arg(long)]
        no_watch: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_make_requires_site_or_all() {
        assert!(Cli::try_parse_from(["multigat", "make"]).is_err());
        assert!(Cli::try_parse_from(["multigat", "make", "blog", "--all"]).is_err());

        let cli = Cli::try_parse_from(["multigat", "make", "--all", "-r"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Make { site: None, all: true, refresh: true }
        ));
    }

    #[test]
    fn test_create_extends() {
        let cli =
            Cli::try_parse_from(["multigat", "create", "blog", "-e", "base", "--extends", "dark"])
                .unwrap();
        let Commands::Create { site, extends } = cli.command else {
            panic!("expected create");
        };
        assert_eq!(site, "blog");
        assert_eq!(extends, vec!["base", "dark"]);
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["multigat", "build", "-v", "-C", "other.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(cli.command, Commands::Build { site: None }));
    }

    #[test]
    fn test_start_options() {
        let cli = Cli::try_parse_from(["multigat", "start", "blog", "-p", "9000", "--no-watch"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Start { port: Some(9000), no_watch: true, .. }
        ));
    }
}
