//! OpsDeck CLI Library
//!
//! The `opsdeck` binary is a full-screen console over a catalog of
//! operational scripts. Picking a command collects its inputs, asks for
//! confirmation when it is destructive, and opens the script in a new
//! terminal window so the console stays available.
//!
//! - [`cli_args`]: command-line argument parsing
//! - [`console`]: the interactive console
//!
//! ```bash
//! # Use ~/.opsdeck/catalog.yml, or the built-in catalog
//! opsdeck
//!
//! # Scripts live under /srv/ops/scripts
//! opsdeck --project-root /srv/ops
//!
//! # Show what would be launched without opening windows
//! opsdeck --dry-run --log-file /tmp/opsdeck.log
//!
//! # Print the catalog
//! opsdeck --list
//! ```

pub mod cli_args;
pub mod console;
