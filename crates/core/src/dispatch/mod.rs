//! Launching a confirmed command in a new terminal window.
//!
//! [`Dispatcher::dispatch`] checks that the script exists, makes it
//! executable on a best-effort basis, and hands it to the platform
//! [`Launcher`]. It returns as soon as the terminal has been started and
//! never learns how the script itself fares.

pub mod discovery;
pub mod host;
pub mod launcher;
pub mod paths;
pub mod powershell;
pub mod terminal_app;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use itertools::Itertools;
use log::{debug, info, warn};

use crate::catalog::Command;
use crate::config::PROJECT_ROOT_ENV;
use crate::error::{Error, Result};

pub use host::{Host, Invocation, RecordingHost, SystemHost};
pub use launcher::{current_launcher, launcher_for, Launcher};

/// Everything that crosses into the launched script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub script: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl LaunchRequest {
    /// The working directory is the script's parent.
    pub fn new(script: impl Into<PathBuf>, args: Vec<String>) -> Self {
        let script = script.into();
        let working_dir = script
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            script,
            args,
            working_dir,
        }
    }

    pub fn for_command(command: &Command, args: Vec<String>) -> Self {
        Self {
            script: command.script.clone(),
            args,
            working_dir: command.working_dir(),
        }
    }
}

enum HostMode {
    Live(Arc<dyn Host>),
    /// A fresh [`RecordingHost`] per dispatch; nothing is launched.
    DryRun,
}

pub struct Dispatcher {
    launcher: Box<dyn Launcher>,
    host: HostMode,
    project_root: Option<PathBuf>,
}

impl Dispatcher {
    pub fn new(launcher: Box<dyn Launcher>, host: Arc<dyn Host>) -> Self {
        Self {
            launcher,
            host: HostMode::Live(host),
            project_root: None,
        }
    }

    pub fn dry_run(launcher: Box<dyn Launcher>) -> Self {
        Self {
            launcher,
            host: HostMode::DryRun,
            project_root: None,
        }
    }

    /// Shown in the remediation text when a script is missing.
    #[must_use]
    pub fn with_project_root(mut self, project_root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(project_root.into());
        self
    }

    pub fn launcher_name(&self) -> &str {
        self.launcher.name()
    }

    /// Launches `request` and returns a summary for the executing view.
    ///
    /// # Errors
    ///
    /// Returns an error if the script does not exist, the platform is not
    /// supported, or the terminal could not be started.
    pub fn dispatch(&self, request: &LaunchRequest) -> Result<String> {
        info!(
            "Dispatching `{}` {:?} via {}",
            request.script.display(),
            request.args,
            self.launcher.name()
        );

        match &self.host {
            HostMode::Live(host) => {
                self.launch_with(request, host.as_ref())?;
                Ok(success_summary(request))
            }
            HostMode::DryRun => {
                let host = RecordingHost::dry_run();
                self.launch_with(request, &host)?;
                Ok(dry_run_summary(request, &host))
            }
        }
    }

    fn launch_with(&self, request: &LaunchRequest, host: &dyn Host) -> Result<()> {
        if !host.exists(&request.script) {
            warn!("Script not found: `{}`", request.script.display());
            return Err(Error::ScriptNotFound {
                path: request.script.display().to_string(),
                remediation: remediation(self.project_root.as_deref()),
            });
        }

        if let Err(e) = host.ensure_executable(&request.script) {
            debug!("Could not mark `{}` executable: {e}", request.script.display());
        }

        self.launcher
            .launch(request, host)
            .inspect_err(|e| warn!("Launch failed: {e}"))
    }
}

pub fn success_summary(request: &LaunchRequest) -> String {
    format!(
        "✅ Command opened in new terminal window\n\nScript: {}\nWorking directory: {}\n\nCheck the terminal window for output.",
        request.script.display(),
        request.working_dir.display()
    )
}

fn dry_run_summary(request: &LaunchRequest, host: &RecordingHost) -> String {
    let mut lines = vec![
        "Dry run: nothing was launched".to_string(),
        String::new(),
        format!("Script: {}", request.script.display()),
        format!("Working directory: {}", request.working_dir.display()),
        format!("Arguments: {}", request.args.join(" ")),
    ];

    for invocation in host.invocations() {
        lines.push(String::new());
        lines.push(format!(
            "Would run: {} {}",
            invocation.program,
            invocation.args.iter().map(|arg| format!("{arg:?}")).join(" ")
        ));
    }

    for (path, contents) in host.scripts() {
        lines.push(String::new());
        lines.push(format!("Would write {}:", path.display()));
        let text = String::from_utf8_lossy(&contents);
        lines.extend(
            text.trim_start_matches('\u{feff}')
                .lines()
                .map(ToString::to_string),
        );
    }

    lines.join("\n")
}

/// Steps shown with a missing-script error.
pub fn remediation(project_root: Option<&Path>) -> String {
    let mut lines = Vec::new();
    if let Some(root) = project_root {
        lines.push(format!("Project root: {}", root.display()));
        lines.push(String::new());
    }
    lines.push("Possible solutions:".to_string());
    lines.push(format!(
        "  1. If the project moved, point {PROJECT_ROOT_ENV} at its new location:"
    ));
    lines.push(format!("     export {PROJECT_ROOT_ENV}=/path/to/project"));
    lines.push("  2. Start the console with --project-root /path/to/project".to_string());
    lines.push("  3. Check the script path in your catalog file".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::terminal_app::TerminalAppLauncher;

    fn create_test_dispatcher(host: Arc<RecordingHost>) -> Dispatcher {
        Dispatcher::new(Box::new(TerminalAppLauncher), host).with_project_root("/srv/project")
    }

    #[test]
    fn test_launch_request_working_dir_is_parent() {
        let request = LaunchRequest::new("/srv/project/scripts/backup.sh", vec![]);
        assert_eq!(request.working_dir, PathBuf::from("/srv/project/scripts"));
    }

    #[test]
    fn test_missing_script_spawns_nothing() {
        let host = Arc::new(RecordingHost::new());
        let dispatcher = create_test_dispatcher(host.clone());

        let result =
            dispatcher.dispatch(&LaunchRequest::new("/srv/project/scripts/gone.sh", vec![]));

        match result {
            Err(Error::ScriptNotFound { path, remediation }) => {
                assert_eq!(path, "/srv/project/scripts/gone.sh");
                assert!(remediation.contains("/srv/project"));
                assert!(remediation.contains(PROJECT_ROOT_ENV));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(host.invocations().is_empty());
    }

    #[test]
    fn test_missing_script_error_names_path() {
        let host = Arc::new(RecordingHost::new());
        let error = create_test_dispatcher(host)
            .dispatch(&LaunchRequest::new("/x/scripts/gone.sh", vec![]))
            .unwrap_err();
        assert!(error.to_string().starts_with("Script not found: /x/scripts/gone.sh"));
    }

    #[test]
    fn test_success_summary() {
        let host = Arc::new(RecordingHost::new().with_file("/srv/project/scripts/backup.sh"));
        let dispatcher = create_test_dispatcher(host.clone());

        let summary = dispatcher
            .dispatch(&LaunchRequest::new("/srv/project/scripts/backup.sh", vec![]))
            .unwrap();

        assert!(summary.starts_with("✅ Command opened in new terminal window"));
        assert!(summary.contains("Script: /srv/project/scripts/backup.sh"));
        assert!(summary.contains("Working directory: /srv/project/scripts"));
        assert_eq!(host.invocations().len(), 1);
    }

    #[test]
    fn test_unsupported_platform_after_existence_check() {
        let host = Arc::new(RecordingHost::new().with_file("/srv/project/scripts/backup.sh"));
        let dispatcher = Dispatcher::new(launcher_for("haiku"), host.clone());

        let error = dispatcher
            .dispatch(&LaunchRequest::new("/srv/project/scripts/backup.sh", vec![]))
            .unwrap_err();

        assert!(matches!(error, Error::UnsupportedPlatform(ref os) if os == "haiku"));
        assert!(host.invocations().is_empty());
    }

    #[test]
    fn test_spawn_failure_is_returned() {
        let host = Arc::new(
            RecordingHost::new()
                .with_file("/srv/project/scripts/backup.sh")
                .failing_runs("no Terminal"),
        );
        let error = create_test_dispatcher(host)
            .dispatch(&LaunchRequest::new("/srv/project/scripts/backup.sh", vec![]))
            .unwrap_err();
        assert!(matches!(error, Error::Spawn { .. }));
    }

    #[test]
    fn test_dry_run_describes_launch() {
        let script = tempfile::Builder::new()
            .suffix(".sh")
            .tempfile()
            .unwrap();
        let request = LaunchRequest::new(script.path(), vec!["--health".to_string()]);
        let dispatcher = Dispatcher::dry_run(Box::new(TerminalAppLauncher));

        let summary = dispatcher.dispatch(&request).unwrap();

        assert!(summary.starts_with("Dry run: nothing was launched"));
        assert!(summary.contains("Arguments: --health"));
        assert!(summary.contains("Would run: osascript \"-e\""));
    }

    #[test]
    fn test_dry_run_still_checks_existence() {
        let dispatcher = Dispatcher::dry_run(Box::new(TerminalAppLauncher));
        let result = dispatcher.dispatch(&LaunchRequest::new(
            "/definitely/not/here/opsdeck-missing.sh",
            vec![],
        ));
        assert!(matches!(result, Err(Error::ScriptNotFound { .. })));
    }
}
