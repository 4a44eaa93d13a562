use std::io::{stdout, Stdout, Write};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::cursor::{self, MoveTo};
use crossterm::event::{self, Event};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue, terminal, ExecutableCommand};
use log::{debug, info};
use opsdeck_core::catalog::Catalog;
use opsdeck_core::dispatch::{Dispatcher, LaunchRequest};
use opsdeck_core::error::Result;

use super::model::Model;
use super::theme::Theme;
use super::types::{Effect, Message};
use super::update::update;
use super::view::{render, Line, Screen, Style, GOODBYE};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
    }
}

/// Runs the console until the user quits.
///
/// Key presses and dispatch results are fed through [`update`]; each launch
/// runs on its own thread so the screen keeps redrawing while a terminal
/// window is being opened.
///
/// # Errors
///
/// Returns an error if the terminal cannot be switched into raw mode or
/// written to.
pub fn run(catalog: Catalog, theme: &Theme, dispatcher: Arc<Dispatcher>) -> Result<()> {
    let mut stdout = stdout();

    stdout.execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let raw_mode_guard = RawModeGuard; // Restores the terminal on every exit path
    stdout.execute(cursor::Hide)?;

    let mut model = Model::new(catalog, terminal::size()?);
    let (sender, receiver) = mpsc::channel::<Message>();
    let mut needs_redraw = true;

    info!(
        "Console started with {} commands, launching via {}",
        model.catalog.command_count(),
        dispatcher.launcher_name()
    );

    while !model.is_quitting() {
        if needs_redraw {
            draw(&mut stdout, &render(&model, theme), &model)?;
            needs_redraw = false;
        }

        let mut messages: Vec<Message> = receiver.try_iter().collect();
        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => messages.push(Message::Key(key)),
                Event::Resize(cols, rows) => messages.push(Message::Resize { cols, rows }),
                _ => {}
            }
        }

        for message in messages {
            needs_redraw = true;
            match update(&mut model, message) {
                Effect::None => {}
                Effect::Quit => break,
                Effect::Dispatch { ticket, request } => {
                    spawn_dispatch(&dispatcher, &sender, ticket, request);
                }
            }
        }
    }

    drop(raw_mode_guard);
    println!("{GOODBYE}");
    Ok(())
}

fn spawn_dispatch(
    dispatcher: &Arc<Dispatcher>,
    sender: &Sender<Message>,
    ticket: u64,
    request: LaunchRequest,
) {
    let dispatcher = Arc::clone(dispatcher);
    let sender = sender.clone();

    thread::spawn(move || {
        let result = dispatcher
            .dispatch(&request)
            .map_err(|error| error.to_string());
        if sender.send(Message::Dispatched { ticket, result }).is_err() {
            debug!("Console closed before dispatch #{ticket} finished");
        }
    });
}

fn draw(stdout: &mut Stdout, screen: &Screen, model: &Model) -> Result<()> {
    let width = usize::from(model.viewport.width);

    queue!(stdout, ResetColor, Clear(ClearType::All))?;

    for (row, line) in (0..model.viewport.height).zip(&screen.lines) {
        queue!(stdout, MoveTo(0, row))?;
        draw_line(stdout, line, width)?;
    }

    stdout.flush()?;
    Ok(())
}

fn draw_line(stdout: &mut Stdout, line: &Line, width: usize) -> Result<()> {
    if let Some(fill) = line.fill {
        queue!(
            stdout,
            SetBackgroundColor(fill),
            Clear(ClearType::UntilNewLine)
        )?;
    }

    let mut remaining = width;
    for span in &line.spans {
        if remaining == 0 {
            break;
        }
        let text: String = span.text.chars().take(remaining).collect();
        remaining -= text.chars().count();

        apply_style(stdout, span.style, line.fill)?;
        queue!(stdout, Print(text), SetAttribute(Attribute::Reset))?;
    }

    queue!(stdout, ResetColor)?;
    Ok(())
}

fn apply_style(stdout: &mut Stdout, style: Style, fill: Option<Color>) -> Result<()> {
    if let Some(background) = style.bg.or(fill) {
        queue!(stdout, SetBackgroundColor(background))?;
    }
    if let Some(foreground) = style.fg {
        queue!(stdout, SetForegroundColor(foreground))?;
    }
    if style.bold {
        queue!(stdout, SetAttribute(Attribute::Bold))?;
    }
    if style.reverse {
        queue!(stdout, SetAttribute(Attribute::Reverse))?;
    }
    Ok(())
}
