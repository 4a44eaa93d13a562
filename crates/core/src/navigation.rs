//! Flat, cursor-navigable view over a [`Catalog`].
//!
//! The flat index lists every category header followed by its commands, in
//! catalog order. The cursor only ever comes to rest on command entries.

use crate::catalog::{Catalog, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatEntry {
    Category { category: usize },
    Command { category: usize, command: usize },
}

impl FlatEntry {
    pub fn is_category(&self) -> bool {
        matches!(self, FlatEntry::Category { .. })
    }

    pub fn is_command(&self) -> bool {
        matches!(self, FlatEntry::Command { .. })
    }
}

/// Direction for [`Navigation::jump_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    First,
    Last,
}

pub fn build_flat_index(catalog: &Catalog) -> Vec<FlatEntry> {
    let mut flat = Vec::with_capacity(catalog.categories().len() + catalog.command_count());
    for (category, entry) in catalog.categories().iter().enumerate() {
        flat.push(FlatEntry::Category { category });
        flat.extend(
            (0..entry.commands.len()).map(|command| FlatEntry::Command { category, command }),
        );
    }
    flat
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    flat_index: Vec<FlatEntry>,
    cursor: usize,
    command_count: usize,
}

impl Navigation {
    /// Builds the flat index and places the cursor on the first command.
    pub fn new(catalog: &Catalog) -> Self {
        let flat_index = build_flat_index(catalog);
        let command_count = flat_index.iter().filter(|e| e.is_command()).count();
        let mut navigation = Self {
            flat_index,
            cursor: 0,
            command_count,
        };
        navigation.jump_to(Jump::First);
        navigation
    }

    pub fn flat_index(&self) -> &[FlatEntry] {
        &self.flat_index
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn command_count(&self) -> usize {
        self.command_count
    }

    /// The entry under the cursor, `None` for an empty catalog.
    pub fn current(&self) -> Option<FlatEntry> {
        self.flat_index.get(self.cursor).copied()
    }

    /// The command under the cursor.
    pub fn selected<'a>(&self, catalog: &'a Catalog) -> Option<&'a Command> {
        match self.current()? {
            FlatEntry::Command { category, command } => catalog.command(category, command),
            FlatEntry::Category { .. } => None,
        }
    }

    /// Steps the cursor by `delta` with wraparound, skipping category headers.
    ///
    /// No-op when the catalog has no commands.
    pub fn move_cursor(&mut self, delta: isize) {
        if self.command_count == 0 || delta == 0 {
            return;
        }

        let len = self.flat_index.len() as isize;
        let step = delta.signum();
        let mut cursor = self.cursor as isize;

        for _ in 0..delta.unsigned_abs() {
            loop {
                cursor = (cursor + step).rem_euclid(len);
                if self.flat_index[cursor as usize].is_command() {
                    break;
                }
            }
        }

        self.cursor = cursor as usize;
    }

    pub fn jump_to(&mut self, jump: Jump) {
        let found = match jump {
            Jump::First => self.flat_index.iter().position(FlatEntry::is_command),
            Jump::Last => self.flat_index.iter().rposition(FlatEntry::is_command),
        };

        if let Some(index) = found {
            self.cursor = index;
        }
    }

    /// 1-based ordinal of the selected command among all commands.
    pub fn command_position(&self) -> usize {
        self.flat_index
            .iter()
            .take(self.cursor + 1)
            .filter(|e| e.is_command())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Command};

    fn create_test_catalog() -> Catalog {
        Catalog::new(vec![
            Category::new(
                "Alpha",
                "A",
                vec![
                    Command::new("Cmd1", "First", "/tmp/a.sh"),
                    Command::new("Cmd2", "Second", "/tmp/b.sh"),
                ],
            ),
            Category::new(
                "Beta",
                "B",
                vec![
                    Command::new("Cmd3", "Third", "/tmp/c.sh").with_args(&["--flag"]),
                    Command::new("Danger", "Destructive", "/tmp/d.sh").destructive(),
                ],
            ),
        ])
    }

    #[test]
    fn test_build_flat_index() {
        let flat = build_flat_index(&create_test_catalog());

        assert_eq!(flat.len(), 6);
        assert_eq!(flat[0], FlatEntry::Category { category: 0 });
        assert_eq!(
            flat[1],
            FlatEntry::Command {
                category: 0,
                command: 0
            }
        );
        assert_eq!(flat[3], FlatEntry::Category { category: 1 });
        assert_eq!(
            flat[5],
            FlatEntry::Command {
                category: 1,
                command: 1
            }
        );
    }

    #[test]
    fn test_build_flat_index_empty() {
        assert!(build_flat_index(&Catalog::default()).is_empty());
    }

    #[test]
    fn test_build_flat_index_keeps_empty_category_header() {
        let catalog = Catalog::new(vec![
            Category::new("Empty", "", vec![]),
            Category::new("Solo", "", vec![Command::new("Only", "", "/tmp/o.sh")]),
        ]);
        let flat = build_flat_index(&catalog);
        assert_eq!(flat.len(), 3);
        assert!(flat[0].is_category());
        assert!(flat[1].is_category());
        assert!(flat[2].is_command());
    }

    #[test]
    fn test_new_starts_on_first_command() {
        let navigation = Navigation::new(&create_test_catalog());
        assert_eq!(navigation.cursor(), 1);
        assert_eq!(navigation.command_count(), 4);
    }

    #[test]
    fn test_move_cursor_skips_category_header() {
        let mut navigation = Navigation::new(&create_test_catalog());
        navigation.move_cursor(1);
        assert_eq!(navigation.cursor(), 2);
        navigation.move_cursor(1);
        assert_eq!(navigation.cursor(), 4);
    }

    #[test]
    fn test_move_cursor_wraps_both_ways() {
        let mut navigation = Navigation::new(&create_test_catalog());
        navigation.move_cursor(-1);
        assert_eq!(navigation.cursor(), 5);
        navigation.move_cursor(1);
        assert_eq!(navigation.cursor(), 1);
    }

    #[test]
    fn test_move_cursor_inverse_from_every_command() {
        let catalog = create_test_catalog();
        let mut navigation = Navigation::new(&catalog);

        for _ in 0..navigation.command_count() {
            let start = navigation.cursor();
            navigation.move_cursor(1);
            assert!(navigation.current().unwrap().is_command());
            navigation.move_cursor(-1);
            assert!(navigation.current().unwrap().is_command());
            assert_eq!(navigation.cursor(), start);
            navigation.move_cursor(1);
        }
    }

    #[test]
    fn test_jump_first_then_forward_reaches_last() {
        let mut navigation = Navigation::new(&create_test_catalog());
        navigation.jump_to(Jump::Last);
        let last = navigation.cursor();
        assert_eq!(last, 5);

        navigation.jump_to(Jump::First);
        for _ in 1..navigation.command_count() {
            navigation.move_cursor(1);
        }
        assert_eq!(navigation.cursor(), last);
    }

    #[test]
    fn test_command_position_traversal() {
        let mut navigation = Navigation::new(&create_test_catalog());
        let mut positions = vec![navigation.command_position()];
        for _ in 1..navigation.command_count() {
            navigation.move_cursor(1);
            positions.push(navigation.command_position());
        }
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_catalog_is_noop() {
        let mut navigation = Navigation::new(&Catalog::default());
        navigation.move_cursor(1);
        navigation.jump_to(Jump::Last);
        assert_eq!(navigation.cursor(), 0);
        assert!(navigation.current().is_none());
        assert_eq!(navigation.command_position(), 0);
    }

    #[test]
    fn test_categories_without_commands_do_not_loop() {
        let catalog = Catalog::new(vec![
            Category::new("Empty", "", vec![]),
            Category::new("Also empty", "", vec![]),
        ]);
        let mut navigation = Navigation::new(&catalog);
        navigation.move_cursor(1);
        assert_eq!(navigation.cursor(), 0);
        assert!(navigation.selected(&catalog).is_none());
    }

    #[test]
    fn test_selected_returns_command() {
        let catalog = create_test_catalog();
        let mut navigation = Navigation::new(&catalog);
        navigation.jump_to(Jump::Last);
        assert_eq!(navigation.selected(&catalog).unwrap().title, "Danger");
    }
}
