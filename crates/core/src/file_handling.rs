//! Loading and validation of catalog files.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::path::Path;

use indexmap::IndexSet;
use log::info;

use crate::catalog::{builtin, Catalog, CatalogFile, Category, Command, ThemeDefinition};
use crate::config::get_catalog_path;
use crate::error::Error::{EmptyName, NonUniqueCommandTitle, NonUniqueFieldLabel};
use crate::error::{Error, Result};

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    File::open(path)
        .map_err(|e| Error::io_error(file_description.to_string(), path.to_string(), e))
}

fn validate_name(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(EmptyName(what.to_string()));
    }

    Ok(())
}

fn validate_flag(command: &str, flag: &str) -> Result<()> {
    if flag.is_empty() {
        return Err(Error::invalid_flag(command, flag, "flag names may not be empty"));
    }

    if flag.chars().any(char::is_whitespace) {
        return Err(Error::invalid_flag(
            command,
            flag,
            "flag names may not contain whitespace",
        ));
    }

    if flag.starts_with('-') {
        return Err(Error::invalid_flag(
            command,
            flag,
            "give the name without leading dashes",
        ));
    }

    Ok(())
}

fn validate_command(category: &Category, command: &Command) -> Result<()> {
    validate_name(
        &format!("command titles (category `{}`)", category.name),
        &command.title,
    )?;

    let mut labels = IndexSet::new();
    for field in &command.prompts {
        validate_name(
            &format!("field labels (command `{}`)", command.title),
            &field.label,
        )?;

        if !labels.insert(field.label.as_str()) {
            return Err(NonUniqueFieldLabel(
                command.title.clone(),
                field.label.clone(),
            ));
        }

        if let Some(flag) = &field.flag {
            validate_flag(&command.title, flag)?;
        }
    }

    Ok(())
}

fn validate_categories(categories: &[Category]) -> Result<()> {
    for category in categories {
        validate_name("category names", &category.name)?;

        let mut titles = IndexSet::new();
        for command in &category.commands {
            validate_command(category, command)?;

            if !titles.insert(command.title.as_str()) {
                return Err(NonUniqueCommandTitle(
                    category.name.clone(),
                    command.title.clone(),
                ));
            }
        }
    }

    Ok(())
}

/// Reads and validates a catalog file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The YAML is malformed or doesn't match the expected structure
/// - The file defines no categories
/// - A name is empty, a title or label is repeated, or a flag name is invalid
///
/// # Examples
///
/// ```no_run
/// use opsdeck_core::file_handling::get_catalog_file;
///
/// let file = get_catalog_file("/etc/opsdeck/catalog.yml")?;
/// println!("Loaded {} categories", file.categories.len());
/// # Ok::<(), opsdeck_core::error::Error>(())
/// ```
pub fn get_catalog_file(catalog_path: &str) -> Result<CatalogFile> {
    let reader = get_reader("catalog", catalog_path)?;

    let parsed: CatalogFile = serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "catalog".to_string(),
            catalog_path.to_string(),
            e,
        )
    })?;

    if parsed.categories.is_empty() {
        return Err(Error::EmptyCatalog {
            path: catalog_path.to_string(),
        });
    }

    validate_categories(&parsed.categories)?;

    Ok(parsed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(String),
    Builtin,
}

impl Display for CatalogSource {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(path) => write!(formatter, "{path}"),
            CatalogSource::Builtin => formatter.write_str("built-in catalog"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub theme: ThemeDefinition,
    pub source: CatalogSource,
}

/// Loads the catalog and resolves its script paths against `scripts_dir`.
///
/// Without an explicit path, a missing default catalog file falls back to
/// the built-in catalog.
///
/// # Errors
///
/// Returns an error if the chosen catalog file cannot be read or is invalid.
pub fn load_catalog(catalog_path_arg: &Option<String>, scripts_dir: &Path) -> Result<LoadedCatalog> {
    let catalog_path = get_catalog_path(catalog_path_arg);

    if catalog_path_arg.is_none() && !Path::new(&catalog_path).exists() {
        info!("No catalog at `{catalog_path}`, using the built-in catalog");
        return Ok(LoadedCatalog {
            catalog: builtin(scripts_dir),
            theme: ThemeDefinition::default(),
            source: CatalogSource::Builtin,
        });
    }

    let file = get_catalog_file(&catalog_path)?;
    let theme = file.theme.clone().unwrap_or_default();
    let mut catalog = Catalog::from(file);
    catalog.resolve_scripts(scripts_dir);
    info!(
        "Loaded {} commands from `{catalog_path}`",
        catalog.command_count()
    );

    Ok(LoadedCatalog {
        catalog,
        theme,
        source: CatalogSource::File(catalog_path),
    })
}
