use opsdeck_core::catalog::{Catalog, Command};
use opsdeck_core::navigation::{FlatEntry, Navigation};

use super::types::{DispatchResult, Mode, ViewportState};

/// Rows the menu needs besides the list itself.
pub const MENU_CHROME_ROWS: u16 = 9;
/// Extra rows taken by the expanded help.
pub const HELP_ROWS: u16 = 8;

#[derive(Debug, Clone)]
pub struct Model {
    pub catalog: Catalog,
    pub navigation: Navigation,
    pub mode: Mode,
    pub show_help: bool,
    /// A result that arrived after its executing view was dismissed.
    pub last_result: Option<DispatchResult>,
    pub viewport: ViewportState,
    next_ticket: u64,
}

impl Model {
    pub fn new(catalog: Catalog, (width, height): (u16, u16)) -> Self {
        let navigation = Navigation::new(&catalog);
        let mut model = Self {
            catalog,
            navigation,
            mode: Mode::Menu,
            show_help: false,
            last_result: None,
            viewport: ViewportState::new(width, height),
            next_ticket: 1,
        };
        model.scroll_to_cursor();
        model
    }

    pub fn selected_command(&self) -> Option<&Command> {
        self.navigation.selected(&self.catalog)
    }

    pub fn is_quitting(&self) -> bool {
        self.mode == Mode::Quitting
    }

    pub(crate) fn issue_ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    /// Number of flat index rows the menu can show.
    pub fn menu_list_height(&self) -> usize {
        let reserved = MENU_CHROME_ROWS + if self.show_help { HELP_ROWS } else { 0 };
        usize::from(self.viewport.height.saturating_sub(reserved).max(1))
    }

    /// Adjusts the viewport offset so the cursor, and the category header
    /// right above it, are visible.
    pub fn scroll_to_cursor(&mut self) {
        let height = self.menu_list_height();
        let cursor = self.navigation.cursor();
        let flat = self.navigation.flat_index();

        let top = match cursor.checked_sub(1).and_then(|i| flat.get(i)) {
            Some(FlatEntry::Category { .. }) => cursor - 1,
            _ => cursor,
        };

        if top < self.viewport.offset {
            self.viewport.offset = top;
        } else if cursor >= self.viewport.offset + height {
            self.viewport.offset = cursor + 1 - height;
        }

        let max_offset = flat.len().saturating_sub(height);
        self.viewport.offset = self.viewport.offset.min(max_offset);
    }
}
