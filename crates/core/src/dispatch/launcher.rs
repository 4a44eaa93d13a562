use super::host::Host;
use super::powershell::PowerShellLauncher;
use super::terminal_app::TerminalAppLauncher;
use super::LaunchRequest;
use crate::error::{Error, Result};

/// Opens a request's script in a new terminal session on one host platform.
///
/// Implementations return once the session has been handed off; they never
/// wait for the script itself.
pub trait Launcher: Send + Sync {
    fn name(&self) -> &str;

    /// # Errors
    ///
    /// Returns an error if the terminal could not be started.
    fn launch(&self, request: &LaunchRequest, host: &dyn Host) -> Result<()>;
}

/// Picks the launcher for an OS name as reported by `std::env::consts::OS`.
pub fn launcher_for(os: &str) -> Box<dyn Launcher> {
    match os {
        "macos" => Box::new(TerminalAppLauncher),
        "windows" => Box::new(PowerShellLauncher),
        other => Box::new(UnsupportedLauncher::new(other)),
    }
}

pub fn current_launcher() -> Box<dyn Launcher> {
    launcher_for(std::env::consts::OS)
}

#[derive(Debug, Clone)]
pub struct UnsupportedLauncher {
    os: String,
}

impl UnsupportedLauncher {
    pub fn new(os: &str) -> Self {
        Self { os: os.to_string() }
    }
}

impl Launcher for UnsupportedLauncher {
    fn name(&self) -> &str {
        &self.os
    }

    fn launch(&self, _request: &LaunchRequest, _host: &dyn Host) -> Result<()> {
        Err(Error::UnsupportedPlatform(self.os.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::host::RecordingHost;

    #[test]
    fn test_launcher_for_known_platforms() {
        assert_eq!(launcher_for("macos").name(), "Terminal");
        assert_eq!(launcher_for("windows").name(), "PowerShell");
        assert_eq!(launcher_for("linux").name(), "linux");
    }

    #[test]
    fn test_unsupported_launcher_spawns_nothing() {
        let host = RecordingHost::new();
        let request = LaunchRequest::new("/tmp/scripts/a.sh", vec![]);

        let result = launcher_for("freebsd").launch(&request, &host);

        match result {
            Err(Error::UnsupportedPlatform(os)) => assert_eq!(os, "freebsd"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(host.invocations().is_empty());
        assert!(host.scripts().is_empty());
    }
}
