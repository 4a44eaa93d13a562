//! Builds the final argument vector from a command and its completed form.

use crate::catalog::{Command, InputField};
use crate::form::InputState;

/// Script that only falls back to its newest snapshot when told so.
pub const RESTORE_SCRIPT: &str = "restore.sh";
pub const LATEST_SNAPSHOT_FLAG: &str = "--latest-snapshot";

/// Static arguments followed by one segment per form field, in field order.
///
/// Empty values are omitted, except an empty snapshot field on
/// `restore.sh`, which becomes `--latest-snapshot`.
pub fn build_args_from_input(command: &Command, input: &InputState) -> Vec<String> {
    let mut args = command.args.clone();
    let is_restore = command.script_name() == Some(RESTORE_SCRIPT);

    for (field, value) in input.fields().iter().zip(input.values()) {
        if value.is_empty() {
            if is_restore && is_snapshot_field(field) {
                args.push(LATEST_SNAPSHOT_FLAG.to_string());
            }
            continue;
        }

        if let Some(flag) = &field.flag {
            args.push(format!("--{flag}"));
        }
        args.push(value.clone());
    }

    args
}

fn is_snapshot_field(field: &InputField) -> bool {
    field.label.to_lowercase().contains("snapshot")
}
