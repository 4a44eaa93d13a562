//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use opsdeck_core::config::PROJECT_ROOT_ENV;

/// Command-line arguments for the `opsdeck` console.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use opsdeck_cli::cli_args::Args;
///
/// let args = Args::parse_from(["opsdeck", "--dry-run"]);
/// assert!(args.dry_run);
/// ```
#[derive(Parser, Debug)]
#[command(version, about, term_width = 0)]
pub struct Args {
    /// Path to the catalog YAML.
    ///
    /// If not provided, defaults to `~/.opsdeck/catalog.yml`, falling back to
    /// the built-in catalog when that file does not exist.
    #[arg(long, short = 'c')]
    pub catalog: Option<String>,

    /// Project root whose `scripts/` directory holds the catalog scripts.
    ///
    /// Defaults to the current directory.
    #[arg(long, short = 'p', env = PROJECT_ROOT_ENV)]
    pub project_root: Option<String>,

    /// Record what would be launched instead of opening terminal windows.
    #[arg(long, short = 'd', action)]
    pub dry_run: bool,

    /// Print the catalog and exit without starting the console.
    #[arg(long, short = 'l', action)]
    pub list: bool,

    /// Write log output to this file instead of stderr, which the console
    /// screen would otherwise overwrite.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
