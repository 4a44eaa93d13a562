//! Pure rendering of the model into styled lines.
//!
//! Nothing here touches the terminal; [`super::ui`] paints the [`Screen`].

use crossterm::style::Color;
use itertools::Itertools;
use opsdeck_core::catalog::Command;
use opsdeck_core::form::InputState;
use opsdeck_core::navigation::FlatEntry;

use super::model::Model;
use super::theme::Theme;
use super::types::{DispatchResult, Mode};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MAX_OUTPUT_LINES: usize = 100;
pub const GOODBYE: &str = "See you later!";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub reverse: bool,
}

impl Style {
    pub fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn on(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
    /// Background for the whole row, padded to the terminal width.
    pub fill: Option<Color>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans, fill: None }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self::new(vec![Span::new(text, style)])
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub lines: Vec<Line>,
}

impl Screen {
    pub fn plain_text(&self) -> String {
        self.lines.iter().map(Line::text).join("\n")
    }
}

pub fn render(model: &Model, theme: &Theme) -> Screen {
    let lines = match &model.mode {
        Mode::Menu => render_menu(model, theme),
        Mode::Input(form) => render_form(model, form, theme),
        Mode::Confirming { args } => render_confirm(model, args, theme),
        Mode::Executing { outcome, .. } => render_executing(model, outcome.as_ref(), theme),
        Mode::Quitting => vec![Line::styled(GOODBYE, Style::fg(theme.accent))],
    };

    Screen { lines }
}

fn title_line(model: &Model, theme: &Theme) -> Line {
    let mut spans = vec![
        Span::new("OpsDeck Console", Style::fg(theme.accent).bold()),
        Span::new(format!(" v{VERSION}"), Style::fg(theme.help)),
    ];

    let total = model.navigation.command_count();
    if total > 0 {
        spans.push(Span::new(
            format!("   {}/{}", model.navigation.command_position(), total),
            Style::fg(theme.help),
        ));
    }

    Line::new(spans)
}

fn render_menu(model: &Model, theme: &Theme) -> Vec<Line> {
    let mut lines = vec![title_line(model, theme), Line::blank()];

    if model.navigation.command_count() == 0 {
        lines.push(Line::styled("No commands configured.", Style::fg(theme.warning)));
    }

    let visible = model
        .navigation
        .flat_index()
        .iter()
        .enumerate()
        .skip(model.viewport.offset)
        .take(model.menu_list_height());

    for (index, entry) in visible {
        let selected = index == model.navigation.cursor();
        match *entry {
            FlatEntry::Category { category } => {
                if let Some(category) = model.catalog.category(category) {
                    lines.push(Line::styled(
                        category.to_string(),
                        Style::fg(theme.category).bold(),
                    ));
                }
            }
            FlatEntry::Command { category, command } => {
                if let Some(command) = model.catalog.command(category, command) {
                    lines.push(command_row(command, selected, theme));
                }
            }
        }
    }

    lines.push(Line::blank());
    if let Some(command) = model.selected_command() {
        lines.extend(command_details(command, theme));
    }

    if let Some(result) = &model.last_result {
        lines.push(status_line(result, theme));
    }

    lines.push(Line::styled(
        "↑/k up • ↓/j down • enter select • ? more • q quit",
        Style::fg(theme.help),
    ));
    if model.show_help {
        lines.extend(expanded_help(theme));
    }

    lines
}

fn command_row(command: &Command, selected: bool, theme: &Theme) -> Line {
    let (marker, style) = if selected {
        (
            "  ▸ ",
            Style::fg(theme.accent).on(theme.selected_background).bold(),
        )
    } else {
        ("    ", Style::fg(theme.item))
    };

    let mut spans = vec![Span::new(marker, style), Span::new(command.title.clone(), style)];
    if command.destructive {
        let warning = Style {
            fg: Some(theme.warning),
            ..style
        };
        spans.push(Span::new(" ⚠", warning));
    }

    Line {
        spans,
        fill: selected.then_some(theme.selected_background),
    }
}

fn command_details(command: &Command, theme: &Theme) -> Vec<Line> {
    let script = std::iter::once(command.script_name().unwrap_or_default().to_string())
        .chain(command.args.iter().cloned())
        .join(" ");

    let mut lines = vec![
        Line::styled(format!("  {}", command.description), Style::fg(theme.description)),
        Line::styled(format!("  Script: {script}"), Style::fg(theme.script)),
    ];
    if command.destructive {
        lines.push(Line::styled(
            "  ⚠ DESTRUCTIVE: asks for confirmation before running",
            Style::fg(theme.warning).bold(),
        ));
    }
    lines
}

fn status_line(result: &DispatchResult, theme: &Theme) -> Line {
    match result {
        Ok(text) => Line::styled(
            format!("Last: {}", text.lines().next().unwrap_or_default()),
            Style::fg(theme.success),
        ),
        Err(text) => Line::styled(
            format!("Last: ✗ {}", text.lines().next().unwrap_or_default()),
            Style::fg(theme.error),
        ),
    }
}

fn expanded_help(theme: &Theme) -> Vec<Line> {
    [
        ("↑/k", "Move up"),
        ("↓/j", "Move down"),
        ("g/Home", "First item"),
        ("G/End", "Last item"),
        ("enter", "Run the selected command"),
        ("?", "Toggle this help"),
        ("q/esc", "Quit"),
        ("ctrl+c", "Quit from anywhere"),
    ]
    .iter()
    .map(|(key, action)| Line::styled(format!("  {key:<9}{action}"), Style::fg(theme.help)))
    .collect()
}

fn render_form(model: &Model, form: &InputState, theme: &Theme) -> Vec<Line> {
    let mut lines = Vec::new();
    if let Some(command) = model.selected_command() {
        lines.push(Line::styled(
            command.to_string(),
            Style::fg(theme.accent).bold(),
        ));
        lines.push(Line::styled(
            command.description.clone(),
            Style::fg(theme.description),
        ));
    }
    lines.push(Line::blank());

    let missing = form.missing_required();
    for (index, (field, value)) in form.fields().iter().zip(form.values()).enumerate() {
        let active = index == form.active();

        let mut label = vec![Span::new(field.label.clone(), Style::fg(theme.item).bold())];
        if field.required {
            label.push(Span::new(" *", Style::fg(theme.error)));
        } else {
            label.push(Span::new(" (optional)", Style::fg(theme.help)));
        }
        lines.push(Line::new(label));

        let mut input = vec![Span::new(
            if active { "> " } else { "  " },
            Style::fg(theme.accent),
        )];
        if active {
            input.extend(value_with_cursor(value, form.cursor(), theme));
        } else {
            input.push(Span::new(value.clone(), Style::fg(theme.item)));
        }
        if value.is_empty() {
            input.push(Span::new(field.placeholder.clone(), Style::fg(theme.help)));
        }
        lines.push(Line::new(input));

        if form.attempted() && missing.contains(&index) {
            lines.push(Line::styled(
                format!("  ✗ {} is required", field.label),
                Style::fg(theme.error),
            ));
        }
    }

    lines.push(Line::blank());
    lines.push(Line::styled(
        "Tab/Shift+Tab: switch field • Enter: next/submit • Esc: cancel",
        Style::fg(theme.help),
    ));
    lines
}

fn value_with_cursor(value: &str, cursor: usize, theme: &Theme) -> Vec<Span> {
    let before: String = value.chars().take(cursor).collect();
    let at = value.chars().nth(cursor).unwrap_or(' ');
    let after: String = value.chars().skip(cursor + 1).collect();

    vec![
        Span::new(before, Style::fg(theme.item)),
        Span::new(at.to_string(), Style::fg(theme.item).reverse()),
        Span::new(after, Style::fg(theme.item)),
    ]
}

fn render_confirm(model: &Model, args: &[String], theme: &Theme) -> Vec<Line> {
    let mut lines = vec![
        Line::styled("⚠ DESTRUCTIVE OPERATION", Style::fg(theme.warning).bold()),
        Line::blank(),
    ];

    if let Some(command) = model.selected_command() {
        lines.push(Line::new(vec![
            Span::plain("You are about to run: "),
            Span::new(command.title.clone(), Style::fg(theme.accent).bold()),
        ]));
        lines.push(Line::styled(
            format!("Script: {}", command.script.display()),
            Style::fg(theme.script),
        ));
    }
    if !args.is_empty() {
        lines.push(Line::styled(
            format!("Arguments: {}", args.join(" ")),
            Style::fg(theme.script),
        ));
    }

    lines.push(Line::blank());
    lines.push(Line::new(vec![
        Span::plain("Press "),
        Span::new("Y", Style::fg(theme.warning).bold()),
        Span::plain(" to confirm, any other key to cancel"),
    ]));
    lines
}

fn render_executing(
    model: &Model,
    outcome: Option<&DispatchResult>,
    theme: &Theme,
) -> Vec<Line> {
    let title = model
        .selected_command()
        .map(|command| command.title.clone())
        .unwrap_or_default();
    let mut lines = vec![
        Line::styled(format!("Launching {title}"), Style::fg(theme.accent).bold()),
        Line::blank(),
    ];

    match outcome {
        None => lines.push(Line::styled(
            "Opening a new terminal window...",
            Style::fg(theme.help),
        )),
        Some(Ok(output)) => {
            push_output(&mut lines, model, output, Style::fg(theme.success), theme);
        }
        Some(Err(error)) => {
            lines.push(Line::styled("✗ Error", Style::fg(theme.error).bold()));
            push_output(&mut lines, model, error, Style::fg(theme.error), theme);
        }
    }

    lines.push(Line::blank());
    lines.push(Line::styled("Enter/Esc: back to menu", Style::fg(theme.help)));
    lines
}

/// Rows below the output: a blank line and the key hint.
const EXECUTING_FOOTER_ROWS: usize = 2;

/// Appends the end of `text`, keeping at most [`MAX_OUTPUT_LINES`] lines and
/// leaving room for the footer on screen. A note marks cut output.
fn push_output(lines: &mut Vec<Line>, model: &Model, text: &str, style: Style, theme: &Theme) {
    let output: Vec<&str> = text.lines().collect();
    let available = usize::from(model.viewport.height)
        .saturating_sub(lines.len() + EXECUTING_FOOTER_ROWS);

    let keep = if output.len() <= available.min(MAX_OUTPUT_LINES) {
        output.len()
    } else {
        let keep = MAX_OUTPUT_LINES.min(available.saturating_sub(1)).max(1);
        lines.push(Line::styled(
            format!("(Showing last {keep} lines)"),
            Style::fg(theme.help),
        ));
        keep
    };

    lines.extend(
        output[output.len() - keep..]
            .iter()
            .map(|line| Line::styled(*line, style)),
    );
}
