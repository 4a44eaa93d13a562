//! The static Category → Command → InputField hierarchy.
//!
//! A [`Catalog`] is built once at startup, either from a YAML file (see
//! [`crate::file_handling`]) or from [`builtin`], and is never mutated after
//! its script paths have been resolved.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// A single prompt shown in the input form before a command is launched.
///
/// Field order is significant: it is both the tab order of the form and the
/// order in which values are appended to the argument vector.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InputField {
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
    /// When set, a non-empty value is emitted as `--<flag> <value>`.
    #[serde(default)]
    pub flag: Option<String>,
}

impl InputField {
    pub fn new(label: &str, placeholder: &str, required: bool) -> Self {
        Self {
            label: label.to_string(),
            placeholder: placeholder.to_string(),
            required,
            flag: None,
        }
    }

    #[must_use]
    pub fn with_flag(mut self, flag: &str) -> Self {
        self.flag = Some(flag.to_string());
        self
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub script: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub prompts: Vec<InputField>,
    #[serde(default)]
    pub destructive: bool,
}

impl Command {
    pub fn new(title: &str, description: &str, script: impl Into<PathBuf>) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            script: script.into(),
            args: Vec::new(),
            prompts: Vec::new(),
            destructive: false,
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: &[&str]) -> Self {
        self.args = args.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_prompts(mut self, prompts: Vec<InputField>) -> Self {
        self.prompts = prompts;
        self
    }

    #[must_use]
    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }

    pub fn has_prompts(&self) -> bool {
        !self.prompts.is_empty()
    }

    /// File name of the target script, e.g. `restore.sh`.
    pub fn script_name(&self) -> Option<&str> {
        self.script.file_name().and_then(|name| name.to_str())
    }

    /// Directory the script is launched from.
    pub fn working_dir(&self) -> PathBuf {
        self.script
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

impl Display for Command {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        if self.destructive {
            write!(formatter, "{} ⚠", self.title)
        } else {
            formatter.write_str(&self.title)
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Category {
    pub fn new(name: &str, icon: &str, commands: Vec<Command>) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            commands,
        }
    }
}

impl Display for Category {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        if self.icon.is_empty() {
            formatter.write_str(&self.name)
        } else {
            write!(formatter, "{} {}", self.icon, self.name)
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ColorDefinition {
    pub rgb: Option<(u8, u8, u8)>,
    pub ansi: Option<u8>,
    pub name: Option<String>,
}

/// Optional color overrides for the console, read from the catalog file.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ThemeDefinition {
    pub accent: Option<ColorDefinition>,
    pub item: Option<ColorDefinition>,
    pub selected_background: Option<ColorDefinition>,
    pub description: Option<ColorDefinition>,
    pub script: Option<ColorDefinition>,
    pub help: Option<ColorDefinition>,
    pub category: Option<ColorDefinition>,
    pub error: Option<ColorDefinition>,
    pub success: Option<ColorDefinition>,
    pub warning: Option<ColorDefinition>,
}

/// On-disk shape of a catalog file.
#[derive(Deserialize, Debug, Clone)]
pub struct CatalogFile {
    #[serde(default)]
    pub theme: Option<ThemeDefinition>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn command(&self, category: usize, command: usize) -> Option<&Command> {
        self.categories
            .get(category)
            .and_then(|c| c.commands.get(command))
    }

    /// Total number of commands across all categories.
    pub fn command_count(&self) -> usize {
        self.categories.iter().map(|c| c.commands.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Joins every relative script path onto `scripts_dir` and makes the
    /// result absolute against the current directory.
    ///
    /// A leading `~` is expanded first, so `~/bin/x.sh` stays absolute.
    pub fn resolve_scripts(&mut self, scripts_dir: &Path) {
        for command in self
            .categories
            .iter_mut()
            .flat_map(|category| category.commands.iter_mut())
        {
            let expanded =
                PathBuf::from(shellexpand::tilde(&command.script.to_string_lossy()).as_ref());
            command.script = if expanded.is_absolute() {
                expanded
            } else {
                absolute(scripts_dir.join(expanded))
            };
        }
    }
}

impl From<CatalogFile> for Catalog {
    fn from(file: CatalogFile) -> Self {
        Self::new(file.categories)
    }
}

/// Launched shells start elsewhere, so script paths must not depend on our
/// working directory.
fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

/// The catalog used when no catalog file is configured.
pub fn builtin(scripts_dir: &Path) -> Catalog {
    let script = |name: &str| absolute(scripts_dir.join(name));

    Catalog::new(vec![
        Category::new(
            "Setup & Validation",
            "🔍",
            vec![
                Command::new(
                    "Validate Prerequisites",
                    "Check required tools, cloud credentials, and deployment readiness",
                    script("validate-deployment.sh"),
                ),
                Command::new(
                    "Check Deployment Health",
                    "Validate current deployment status and infrastructure health",
                    script("validate-deployment.sh"),
                )
                .with_args(&["--health"]),
            ],
        ),
        Category::new(
            "Deployment",
            "🚀",
            vec![
                Command::new(
                    "Quick Deploy",
                    "Deploy infrastructure, application, and monitoring stack in one command",
                    script("quick-deploy.sh"),
                ),
                Command::new(
                    "Deploy Training Setup",
                    "Deploy the application with synthetic data for training and testing",
                    script("deploy-training-setup.sh"),
                )
                .with_args(&["--use-default-dataset", "--max-records", "100"]),
            ],
        ),
        Category::new(
            "Backup & Recovery",
            "💾",
            vec![
                Command::new(
                    "Backup Deployment",
                    "Create a backup of the database, cluster configuration, and application data",
                    script("backup.sh"),
                ),
                Command::new(
                    "Restore Deployment",
                    "Restore database and application data from a backup bucket",
                    script("restore.sh"),
                )
                .with_prompts(vec![
                    InputField::new("Backup Bucket", "my-backup-bucket", true),
                    InputField::new("Snapshot ID", "leave empty for the latest snapshot", false),
                ])
                .destructive(),
            ],
        ),
        Category::new(
            "Maintenance",
            "🛠",
            vec![
                Command::new(
                    "Check Component Versions",
                    "Check for available updates across all project components",
                    script("version-manager.sh"),
                )
                .with_args(&["check"]),
                Command::new(
                    "Check Image Versions",
                    "Discover available application image versions",
                    script("check-image-versions.sh"),
                )
                .with_prompts(vec![
                    InputField::new("Version Pattern", "e.g. 7.0", false).with_flag("search")
                ]),
                Command::new(
                    "Search Codebase",
                    "Search for a term across the entire codebase",
                    script("search-codebase.sh"),
                )
                .with_prompts(vec![InputField::new("Search Term", "term", true)]),
            ],
        ),
        Category::new(
            "Danger Zone",
            "⚠",
            vec![
                Command::new(
                    "Clean Deployment",
                    "Remove the application layer while preserving infrastructure",
                    script("clean-deployment.sh"),
                )
                .destructive(),
                Command::new(
                    "Destroy Infrastructure",
                    "Completely destroy all infrastructure resources",
                    script("destroy.sh"),
                )
                .destructive(),
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_resolves_into_scripts_dir() {
        let catalog = builtin(Path::new("/srv/project/scripts"));

        assert!(!catalog.is_empty());
        for category in catalog.categories() {
            for command in &category.commands {
                assert!(command.script.starts_with("/srv/project/scripts"));
            }
        }
    }

    #[test]
    fn test_builtin_catalog_marks_destroy_destructive() {
        let catalog = builtin(Path::new("/tmp"));
        let destroy = catalog
            .categories()
            .iter()
            .flat_map(|c| c.commands.iter())
            .find(|c| c.title == "Destroy Infrastructure")
            .unwrap();
        assert!(destroy.destructive);
        assert!(!destroy.has_prompts());
    }

    #[test]
    fn test_command_count() {
        let catalog = Catalog::new(vec![
            Category::new("A", "", vec![Command::new("1", "", "/a.sh")]),
            Category::new("B", "", vec![]),
            Category::new(
                "C",
                "",
                vec![Command::new("2", "", "/b.sh"), Command::new("3", "", "/c.sh")],
            ),
        ]);
        assert_eq!(catalog.command_count(), 3);
        assert_eq!(catalog.command(2, 1).unwrap().title, "3");
        assert!(catalog.command(1, 0).is_none());
    }

    #[test]
    fn test_resolve_scripts_keeps_absolute_paths() {
        let mut catalog = Catalog::new(vec![Category::new(
            "A",
            "",
            vec![
                Command::new("rel", "", "backup.sh"),
                Command::new("abs", "", "/opt/tools/x.sh"),
            ],
        )]);
        catalog.resolve_scripts(Path::new("/root/project/scripts"));

        assert_eq!(
            catalog.command(0, 0).unwrap().script,
            PathBuf::from("/root/project/scripts/backup.sh")
        );
        assert_eq!(
            catalog.command(0, 1).unwrap().script,
            PathBuf::from("/opt/tools/x.sh")
        );
    }

    #[test]
    fn test_resolve_scripts_with_relative_scripts_dir() {
        let mut catalog = Catalog::new(vec![Category::new(
            "A",
            "",
            vec![Command::new("rel", "", "backup.sh")],
        )]);
        catalog.resolve_scripts(Path::new("ops/scripts"));

        let script = &catalog.command(0, 0).unwrap().script;
        assert!(script.is_absolute());
        assert_eq!(
            *script,
            std::env::current_dir()
                .unwrap()
                .join("ops/scripts/backup.sh")
        );
    }

    #[test]
    fn test_builtin_catalog_with_relative_scripts_dir_is_absolute() {
        let catalog = builtin(Path::new("ops/scripts"));
        for category in catalog.categories() {
            for command in &category.commands {
                assert!(command.script.is_absolute());
                assert!(command.working_dir().is_absolute());
            }
        }
    }

    #[test]
    fn test_command_script_name_and_working_dir() {
        let cmd = Command::new("Restore", "", "/tmp/scripts/restore.sh");
        assert_eq!(cmd.script_name(), Some("restore.sh"));
        assert_eq!(cmd.working_dir(), PathBuf::from("/tmp/scripts"));
    }

    #[test]
    fn test_display_marks_destructive() {
        let cmd = Command::new("Destroy", "", "/tmp/d.sh").destructive();
        assert_eq!(format!("{cmd}"), "Destroy ⚠");

        let category = Category::new("Danger", "!", vec![]);
        assert_eq!(format!("{category}"), "! Danger");
    }
}
