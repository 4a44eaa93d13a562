//! Type definitions for the console state machine.
//!
//! Messages flow into [`super::update::update`], which mutates the model and
//! answers with an [`Effect`] for the runtime to carry out.

use crossterm::event::KeyEvent;
use opsdeck_core::dispatch::LaunchRequest;
use opsdeck_core::form::InputState;

/// Outcome of a dispatch as shown to the user.
pub type DispatchResult = std::result::Result<String, String>;

#[derive(Debug, Clone)]
pub enum Message {
    Key(KeyEvent),
    Resize { cols: u16, rows: u16 },
    /// Sent once by the background dispatch thread.
    Dispatched { ticket: u64, result: DispatchResult },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Dispatch { ticket: u64, request: LaunchRequest },
    Quit,
}

/// Which part of the console receives keys. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Input(InputState),
    /// Waiting for `Y`. `args` is the finished argument vector.
    Confirming { args: Vec<String> },
    Executing {
        ticket: u64,
        outcome: Option<DispatchResult>,
    },
    Quitting,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Menu => "menu",
            Mode::Input(_) => "input",
            Mode::Confirming { .. } => "confirming",
            Mode::Executing { .. } => "executing",
            Mode::Quitting => "quitting",
        }
    }
}

/// State for the UI viewport.
///
/// Tracks the visible slice of the menu list when the catalog is taller
/// than the terminal.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ViewportState {
    pub offset: usize,
    pub height: u16,
    pub width: u16,
}

impl ViewportState {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            offset: 0,
            height,
            width,
        }
    }
}
