//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Velcro static site composer CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Site root directory (default: current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to the site root
    #[arg(short = 'C', long, default_value = "velcro.toml", global = true)]
    pub config: PathBuf,

    /// Print every file as it is processed
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments of the Build command
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(long)]
    pub clean: bool,

    /// Output directory path (relative to site root), overrides `output_dir`
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a new site from the starter template
    Init {
        /// Name of the site directory (A-Z, a-z, 0-9, `-` and `_`)
        name: String,
    },

    /// Compose the site into the output directory
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::parse_from(["velcro", "build", "--clean", "-o", "public", "-v"]);
        assert!(cli.verbose);
        assert!(!cli.is_init());
        let Commands::Build { build_args } = cli.command else {
            panic!("expected build command");
        };
        assert!(build_args.clean);
        assert_eq!(build_args.output, Some(PathBuf::from("public")));
    }

    #[test]
    fn test_parse_init_with_root() {
        let cli = Cli::parse_from(["velcro", "--root", "sites", "init", "my-blog"]);
        assert!(cli.is_init());
        assert_eq!(cli.root, Some(PathBuf::from("sites")));
        assert_eq!(cli.config, PathBuf::from("velcro.toml"));
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
