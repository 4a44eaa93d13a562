//! The interactive console.
//!
//! The console follows a message/update/view loop:
//!
//! - [`types`]: messages, effects and the mode the console is in
//! - [`model`]: everything the console knows between frames
//! - [`update`]: the pure state machine driven by key presses and results
//! - [`view`]: renders the model into styled lines
//! - [`ui`]: owns the terminal, polls events and runs launches off-thread
//!
//! # Keys
//!
//! - Arrow keys or `j`/`k` to move, `g`/`G` (or Home/End) to jump
//! - Enter to run the selected command
//! - `?` to toggle help, `q` or Escape to quit
//! - Ctrl+C quits from anywhere

pub mod model;
pub mod theme;
pub mod types;
pub mod ui;
pub mod update;
pub mod view;

use itertools::Itertools;
use opsdeck_core::catalog::Catalog;

pub use theme::Theme;
pub use ui::run;

/// Plain-text listing of the catalog, one command per line under its
/// category header.
pub fn catalog_listing(catalog: &Catalog) -> String {
    catalog
        .categories()
        .iter()
        .map(|category| {
            let commands = category
                .commands
                .iter()
                .map(|command| {
                    let script = std::iter::once(command.script.display().to_string())
                        .chain(command.args.iter().cloned())
                        .join(" ");
                    format!("  {command} - {} ({script})", command.description)
                })
                .join("\n");
            format!("{category}\n{commands}")
        })
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdeck_core::catalog::{Category, Command};

    #[test]
    fn test_catalog_listing() {
        let catalog = Catalog::new(vec![
            Category::new(
                "Backup",
                "💾",
                vec![Command::new("Backup", "Back it up", "/srv/backup.sh").with_args(&["--all"])],
            ),
            Category::new(
                "Danger",
                "",
                vec![Command::new("Wipe", "Wipe it", "/srv/wipe.sh").destructive()],
            ),
        ]);

        assert_eq!(
            catalog_listing(&catalog),
            "💾 Backup\n  Backup - Back it up (/srv/backup.sh --all)\n\nDanger\n  Wipe ⚠ - Wipe it (/srv/wipe.sh)"
        );
    }
}
