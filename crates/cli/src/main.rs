use std::fs::File;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use env_logger::{Builder, Env, Target};
use log::{debug, info, warn};
use opsdeck_cli::cli_args::Args;
use opsdeck_cli::console::{self, Theme};
use opsdeck_core::config;
use opsdeck_core::dispatch::{current_launcher, Dispatcher, SystemHost};
use opsdeck_core::error::{Error, Result};
use opsdeck_core::file_handling::{self, LoadedCatalog};

/// Sends log output to `log_file` when given; stderr is hidden behind the
/// console's alternate screen.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        None => env_logger::init(),
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::io_error("log".to_string(), path.display().to_string(), e)
            })?;
            Builder::from_env(Env::default().default_filter_or("info"))
                .target(Target::Pipe(Box::new(file)))
                .init();
        }
    }
    Ok(())
}

fn build_dispatcher(args: &Args, project_root: &Path) -> Dispatcher {
    let launcher = current_launcher();
    let dispatcher = if args.dry_run {
        info!("Dry run: commands are recorded, not launched");
        Dispatcher::dry_run(launcher)
    } else {
        Dispatcher::new(launcher, Arc::new(SystemHost))
    };

    dispatcher.with_project_root(project_root)
}

fn execute(args: &Args) -> Result<()> {
    let project_root = config::resolve_project_root(&args.project_root)?;
    let scripts_dir = config::scripts_dir(&project_root);
    debug!("Project root: `{}`", project_root.display());
    if !scripts_dir.is_dir() {
        warn!(
            "Scripts directory `{}` does not exist; launches will fail",
            scripts_dir.display()
        );
    }

    let LoadedCatalog {
        catalog,
        theme,
        source,
    } = file_handling::load_catalog(&args.catalog, &scripts_dir)?;
    debug!("Catalog source: {source}");

    if args.list {
        println!("{}", console::catalog_listing(&catalog));
        return Ok(());
    }

    let theme = Theme::from_definition(&theme)?;
    let dispatcher = Arc::new(build_dispatcher(args, &project_root));

    console::run(catalog, &theme, dispatcher)
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
