//! macOS: hand a shell command to Terminal.app through `osascript`.

use itertools::Itertools;
use log::debug;

use super::host::Host;
use super::launcher::Launcher;
use super::paths::{applescript_escape, posix_quote};
use super::LaunchRequest;
use crate::error::Result;

pub const PAUSE_PROMPT: &str = "Press any key to close this window...";

#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalAppLauncher;

impl Launcher for TerminalAppLauncher {
    fn name(&self) -> &str {
        "Terminal"
    }

    fn launch(&self, request: &LaunchRequest, host: &dyn Host) -> Result<()> {
        let command = shell_command(request);
        debug!("Terminal command: {command}");

        host.run("osascript", &["-e".to_string(), apple_script(&command)])
    }
}

/// `cd` into the working directory, run the script, then wait for a key.
pub fn shell_command(request: &LaunchRequest) -> String {
    let invocation = std::iter::once(posix_quote(&request.script.to_string_lossy()))
        .chain(request.args.iter().map(|arg| posix_quote(arg)))
        .join(" ");

    format!(
        "cd {} && {}; echo ''; echo '{}'; read -n 1",
        posix_quote(&request.working_dir.to_string_lossy()),
        invocation,
        PAUSE_PROMPT
    )
}

pub fn apple_script(shell_command: &str) -> String {
    format!(
        "tell application \"Terminal\"\n    activate\n    do script \"{}\"\nend tell",
        applescript_escape(shell_command)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::host::RecordingHost;
    use crate::error::Error;

    #[test]
    fn test_shell_command_quotes_every_part() {
        let request = LaunchRequest::new(
            "/Users/ops/my project/scripts/restore.sh",
            vec!["my-bucket".to_string(), "--latest-snapshot".to_string()],
        );

        assert_eq!(
            shell_command(&request),
            "cd '/Users/ops/my project/scripts' && \
             '/Users/ops/my project/scripts/restore.sh' 'my-bucket' '--latest-snapshot'; \
             echo ''; echo 'Press any key to close this window...'; read -n 1"
        );
    }

    #[test]
    fn test_shell_command_escapes_single_quotes() {
        let request = LaunchRequest::new("/tmp/scripts/search.sh", vec!["it's".to_string()]);
        assert!(shell_command(&request).contains(r"'/tmp/scripts/search.sh' 'it'\''s';"));
    }

    #[test]
    fn test_shell_command_without_args() {
        let request = LaunchRequest::new("/tmp/scripts/backup.sh", vec![]);
        assert!(shell_command(&request).starts_with("cd '/tmp/scripts' && '/tmp/scripts/backup.sh'; echo"));
    }

    #[test]
    fn test_apple_script_escapes_quotes() {
        let script = apple_script(r#"echo "hi""#);
        assert!(script.contains(r#"do script "echo \"hi\"""#));
        assert!(script.contains("activate"));
    }

    #[test]
    fn test_launch_runs_osascript() {
        let host = RecordingHost::new();
        let request = LaunchRequest::new("/tmp/scripts/backup.sh", vec![]);

        TerminalAppLauncher.launch(&request, &host).unwrap();

        let invocations = host.invocations();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].program, "osascript");
        assert_eq!(invocations[0].args[0], "-e");
        assert!(invocations[0].args[1].contains("'/tmp/scripts/backup.sh'"));
    }

    #[test]
    fn test_launch_reports_osascript_failure() {
        let host = RecordingHost::new().failing_runs("execution error: Not authorized");
        let request = LaunchRequest::new("/tmp/scripts/backup.sh", vec![]);

        let result = TerminalAppLauncher.launch(&request, &host);
        match result {
            Err(Error::Spawn { program, message }) => {
                assert_eq!(program, "osascript");
                assert!(message.contains("Not authorized"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
