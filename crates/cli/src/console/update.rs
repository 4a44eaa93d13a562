//! The console state machine.
//!
//! [`update`] applies one message to the model and returns the effect the
//! runtime should perform. It does no I/O.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info};
use opsdeck_core::arguments::build_args_from_input;
use opsdeck_core::dispatch::LaunchRequest;
use opsdeck_core::form::{InputState, SubmitOutcome};
use opsdeck_core::navigation::Jump;

use super::model::Model;
use super::types::{DispatchResult, Effect, Message, Mode};

/// The only key that confirms a destructive command.
pub const CONFIRM_KEY: char = 'Y';

pub fn update(model: &mut Model, message: Message) -> Effect {
    if model.is_quitting() {
        return Effect::None;
    }

    match message {
        Message::Key(key) => handle_key(model, key),
        Message::Resize { cols, rows } => {
            model.viewport.width = cols;
            model.viewport.height = rows;
            model.scroll_to_cursor();
            Effect::None
        }
        Message::Dispatched { ticket, result } => {
            handle_dispatched(model, ticket, result);
            Effect::None
        }
    }
}

fn handle_key(model: &mut Model, key: KeyEvent) -> Effect {
    if key.kind == KeyEventKind::Release {
        return Effect::None;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return quit(model);
    }

    // Taken out so the handlers can own the sub-state.
    match std::mem::replace(&mut model.mode, Mode::Menu) {
        Mode::Menu => handle_menu_key(model, key),
        Mode::Input(form) => handle_input_key(model, form, key),
        Mode::Confirming { args } => handle_confirm_key(model, args, key),
        executing @ Mode::Executing { .. } => handle_executing_key(model, executing, key),
        Mode::Quitting => {
            model.mode = Mode::Quitting;
            Effect::None
        }
    }
}

fn handle_menu_key(model: &mut Model, key: KeyEvent) -> Effect {
    match key.code {
        KeyCode::Char('q') => return quit(model),
        KeyCode::Esc if model.show_help => model.show_help = false,
        KeyCode::Esc => return quit(model),
        KeyCode::Up | KeyCode::Char('k') => model.navigation.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => model.navigation.move_cursor(1),
        KeyCode::Home | KeyCode::Char('g') => model.navigation.jump_to(Jump::First),
        KeyCode::End | KeyCode::Char('G') => model.navigation.jump_to(Jump::Last),
        KeyCode::Char('?') => model.show_help = !model.show_help,
        KeyCode::Enter => return activate(model),
        _ => {}
    }

    model.scroll_to_cursor();
    Effect::None
}

fn activate(model: &mut Model) -> Effect {
    let Some(command) = model.selected_command() else {
        return Effect::None;
    };

    if command.has_prompts() {
        model.mode = Mode::Input(InputState::new(&command.prompts));
    } else if command.destructive {
        model.mode = Mode::Confirming {
            args: command.args.clone(),
        };
    } else {
        let args = command.args.clone();
        return start_dispatch(model, args);
    }

    debug!("Entered {} mode", model.mode.name());
    Effect::None
}

fn handle_input_key(model: &mut Model, mut form: InputState, key: KeyEvent) -> Effect {
    match key.code {
        KeyCode::Esc => {
            debug!("Input cancelled");
            return Effect::None;
        }
        KeyCode::Enter => match form.submit() {
            SubmitOutcome::Advanced | SubmitOutcome::Rejected => {}
            SubmitOutcome::Accepted => return submit_form(model, &form),
        },
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.previous_field(),
        KeyCode::Left => form.move_left(),
        KeyCode::Right => form.move_right(),
        KeyCode::Home => form.home(),
        KeyCode::End => form.end(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Delete => form.delete(),
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            form.insert_char(c);
        }
        _ => {}
    }

    model.mode = Mode::Input(form);
    Effect::None
}

fn submit_form(model: &mut Model, form: &InputState) -> Effect {
    let Some(command) = model.selected_command() else {
        return Effect::None;
    };

    let args = build_args_from_input(command, form);
    if command.destructive {
        model.mode = Mode::Confirming { args };
        Effect::None
    } else {
        start_dispatch(model, args)
    }
}

fn handle_confirm_key(model: &mut Model, args: Vec<String>, key: KeyEvent) -> Effect {
    if key.code == KeyCode::Char(CONFIRM_KEY) {
        return start_dispatch(model, args);
    }

    debug!("Confirmation cancelled");
    Effect::None
}

fn handle_executing_key(model: &mut Model, executing: Mode, key: KeyEvent) -> Effect {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {}
        _ => model.mode = executing,
    }
    Effect::None
}

fn handle_dispatched(model: &mut Model, ticket: u64, result: DispatchResult) {
    match &mut model.mode {
        Mode::Executing {
            ticket: current,
            outcome,
        } if *current == ticket => *outcome = Some(result),
        _ => {
            info!("Result for dispatch #{ticket} arrived after its view was closed");
            model.last_result = Some(result);
        }
    }
}

fn start_dispatch(model: &mut Model, args: Vec<String>) -> Effect {
    let Some(command) = model.selected_command() else {
        return Effect::None;
    };

    let request = LaunchRequest::for_command(command, args);
    let ticket = model.issue_ticket();
    model.mode = Mode::Executing {
        ticket,
        outcome: None,
    };
    model.last_result = None;

    Effect::Dispatch { ticket, request }
}

fn quit(model: &mut Model) -> Effect {
    model.mode = Mode::Quitting;
    Effect::Quit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use opsdeck_core::catalog::{Catalog, Category, Command, InputField};

    fn make_key(code: KeyCode) -> Message {
        Message::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn make_key_ctrl(code: KeyCode) -> Message {
        Message::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn type_text(model: &mut Model, text: &str) {
        for c in text.chars() {
            update(model, make_key(KeyCode::Char(c)));
        }
    }

    fn test_model() -> Model {
        Model::new(
            Catalog::new(vec![
                Category::new(
                    "Ops",
                    "",
                    vec![
                        Command::new("Backup", "", "/srv/scripts/backup.sh").with_args(&["--all"]),
                        Command::new("Restore", "", "/srv/scripts/restore.sh")
                            .with_prompts(vec![
                                InputField::new("Bucket", "my-bucket", true),
                                InputField::new("Snapshot", "snap", false),
                            ])
                            .destructive(),
                    ],
                ),
                Category::new(
                    "Danger",
                    "",
                    vec![
                        Command::new("Destroy", "", "/srv/scripts/destroy.sh").destructive(),
                        Command::new("Search", "", "/srv/scripts/search.sh")
                            .with_prompts(vec![InputField::new("Term", "", true)]),
                    ],
                ),
            ]),
            (80, 40),
        )
    }

    #[test]
    fn test_plain_command_dispatches_immediately() {
        let mut model = test_model();

        let effect = update(&mut model, make_key(KeyCode::Enter));

        match effect {
            Effect::Dispatch { ticket, request } => {
                assert_eq!(request.args, vec!["--all"]);
                assert_eq!(model.mode, Mode::Executing { ticket, outcome: None });
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn test_destructive_without_fields_confirms_with_y() {
        let mut model = test_model();
        update(&mut model, make_key(KeyCode::Char('G')));
        update(&mut model, make_key(KeyCode::Char('k')));
        assert_eq!(model.selected_command().unwrap().title, "Destroy");

        assert_eq!(update(&mut model, make_key(KeyCode::Enter)), Effect::None);
        assert_eq!(model.mode, Mode::Confirming { args: vec![] });

        let effect = update(&mut model, make_key(KeyCode::Char('Y')));
        assert!(matches!(effect, Effect::Dispatch { .. }));
    }

    #[test]
    fn test_confirmation_cancelled_by_any_other_key() {
        for code in [KeyCode::Char('y'), KeyCode::Char('n'), KeyCode::Esc, KeyCode::Enter] {
            let mut model = test_model();
            update(&mut model, make_key(KeyCode::Char('G')));
            update(&mut model, make_key(KeyCode::Up));
            update(&mut model, make_key(KeyCode::Enter));

            assert_eq!(update(&mut model, make_key(code)), Effect::None);
            assert_eq!(model.mode, Mode::Menu);
        }
    }

    #[test]
    fn test_form_then_confirm_for_destructive_command() {
        let mut model = test_model();
        update(&mut model, make_key(KeyCode::Down));
        update(&mut model, make_key(KeyCode::Enter));
        assert!(matches!(model.mode, Mode::Input(_)));

        type_text(&mut model, "b1");
        update(&mut model, make_key(KeyCode::Enter));
        assert_eq!(update(&mut model, make_key(KeyCode::Enter)), Effect::None);

        assert_eq!(
            model.mode,
            Mode::Confirming {
                args: vec!["b1".to_string(), "--latest-snapshot".to_string()]
            }
        );
    }

    #[test]
    fn test_form_rejects_missing_required_then_dispatches() {
        let mut model = test_model();
        update(&mut model, make_key(KeyCode::End));
        update(&mut model, make_key(KeyCode::Enter));

        assert_eq!(update(&mut model, make_key(KeyCode::Enter)), Effect::None);
        match &model.mode {
            Mode::Input(form) => assert!(form.attempted()),
            other => panic!("unexpected mode: {other:?}"),
        }

        type_text(&mut model, "needle");
        match update(&mut model, make_key(KeyCode::Enter)) {
            Effect::Dispatch { request, .. } => assert_eq!(request.args, vec!["needle"]),
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn test_form_escape_cancels_without_quitting() {
        let mut model = test_model();
        update(&mut model, make_key(KeyCode::End));
        update(&mut model, make_key(KeyCode::Enter));
        type_text(&mut model, "q");

        assert_eq!(update(&mut model, make_key(KeyCode::Esc)), Effect::None);
        assert_eq!(model.mode, Mode::Menu);
    }

    #[test]
    fn test_q_is_typed_inside_form() {
        let mut model = test_model();
        update(&mut model, make_key(KeyCode::End));
        update(&mut model, make_key(KeyCode::Enter));
        type_text(&mut model, "qj");

        match &model.mode {
            Mode::Input(form) => assert_eq!(form.values()[0], "qj"),
            other => panic!("unexpected mode: {other:?}"),
        }
    }

    #[test]
    fn test_ctrl_c_quits_from_any_mode() {
        let mut model = test_model();
        update(&mut model, make_key(KeyCode::End));
        update(&mut model, make_key(KeyCode::Enter));

        assert_eq!(
            update(&mut model, make_key_ctrl(KeyCode::Char('c'))),
            Effect::Quit
        );
        assert!(model.is_quitting());
        assert_eq!(update(&mut model, make_key(KeyCode::Enter)), Effect::None);
    }

    #[test]
    fn test_escape_closes_help_before_quitting() {
        let mut model = test_model();
        update(&mut model, make_key(KeyCode::Char('?')));
        assert!(model.show_help);

        assert_eq!(update(&mut model, make_key(KeyCode::Esc)), Effect::None);
        assert!(!model.show_help);
        assert_eq!(update(&mut model, make_key(KeyCode::Esc)), Effect::Quit);
    }

    #[test]
    fn test_result_for_current_ticket_is_shown() {
        let mut model = test_model();
        let Effect::Dispatch { ticket, .. } = update(&mut model, make_key(KeyCode::Enter)) else {
            panic!("expected a dispatch");
        };

        update(
            &mut model,
            Message::Dispatched {
                ticket,
                result: Ok("opened".to_string()),
            },
        );

        assert_eq!(
            model.mode,
            Mode::Executing {
                ticket,
                outcome: Some(Ok("opened".to_string()))
            }
        );
        update(&mut model, make_key(KeyCode::Char('x')));
        assert!(matches!(model.mode, Mode::Executing { .. }));
        update(&mut model, make_key(KeyCode::Enter));
        assert_eq!(model.mode, Mode::Menu);
    }

    #[test]
    fn test_dismiss_before_result_keeps_late_result() {
        let mut model = test_model();
        let Effect::Dispatch { ticket, .. } = update(&mut model, make_key(KeyCode::Enter)) else {
            panic!("expected a dispatch");
        };

        update(&mut model, make_key(KeyCode::Esc));
        assert_eq!(model.mode, Mode::Menu);

        update(
            &mut model,
            Message::Dispatched {
                ticket,
                result: Err("boom".to_string()),
            },
        );
        assert_eq!(model.mode, Mode::Menu);
        assert_eq!(model.last_result, Some(Err("boom".to_string())));
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut model = test_model();
        let release = Message::Key(KeyEvent {
            code: KeyCode::Down,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        update(&mut model, release);
        assert_eq!(model.navigation.cursor(), 1);
    }
}
