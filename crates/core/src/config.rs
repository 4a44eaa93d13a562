//! Configuration path utilities for opsdeck.
//!
//! This module resolves the catalog file path and the project root whose
//! `scripts/` directory relative script paths are joined onto.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Default path for the catalog file
pub const DEFAULT_CATALOG_PATH: &str = "~/.opsdeck/catalog.yml";

/// Environment variable naming the project root
pub const PROJECT_ROOT_ENV: &str = "OPSDECK_PROJECT_ROOT";

/// Directory below the project root that holds the scripts
pub const SCRIPTS_DIR: &str = "scripts";

/// Resolves the catalog file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// catalog path. Shell expansions like `~` are resolved.
///
/// # Arguments
///
/// * `catalog_path_arg` - Optional custom catalog file path
///
/// # Examples
///
/// ```
/// use opsdeck_core::config::get_catalog_path;
///
/// let default_path = get_catalog_path(&None);
/// assert!(default_path.ends_with("catalog.yml"));
///
/// let custom_path = get_catalog_path(&Some("/etc/opsdeck.yml".to_string()));
/// assert_eq!(custom_path, "/etc/opsdeck.yml");
/// ```
pub fn get_catalog_path(catalog_path_arg: &Option<String>) -> String {
    let catalog_path = match catalog_path_arg {
        Some(catalog_path) => catalog_path,
        None => DEFAULT_CATALOG_PATH,
    };

    shellexpand::tilde(catalog_path).to_string()
}

/// Resolves the project root.
///
/// An explicit root is tilde-expanded and, when relative, joined onto the
/// current directory; otherwise the current directory is used.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read.
pub fn resolve_project_root(project_root_arg: &Option<String>) -> Result<PathBuf> {
    match project_root_arg {
        Some(root) => {
            let expanded = PathBuf::from(shellexpand::tilde(root).as_ref());
            Ok(std::path::absolute(expanded)?)
        }
        None => Ok(std::env::current_dir()?),
    }
}

pub fn scripts_dir(project_root: &Path) -> PathBuf {
    project_root.join(SCRIPTS_DIR)
}
