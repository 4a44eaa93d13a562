//! The Windows bash discovery chain.
//!
//! Candidates are tried in [`Interpreter::CHAIN`] order and the first hit
//! wins. Each hit fixes a [`PathPair`]: the native directory PowerShell
//! changes into, and the script/directory forms used inside the interpreter.
//! The generated PowerShell script runs the same chain in the new window;
//! the Rust side only predicts the outcome for logging.

use std::path::PathBuf;

use super::host::Host;
use super::paths::{powershell_escape, to_posix_drive_path};
use super::LaunchRequest;

/// A well-known Git Bash location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPath {
    Fixed(&'static str),
    /// `rest` below the directory named by an environment variable.
    UnderEnv {
        var: &'static str,
        rest: &'static str,
    },
}

pub const GIT_BASH_PATHS: [InstallPath; 3] = [
    InstallPath::Fixed(r"C:\Program Files\Git\bin\bash.exe"),
    InstallPath::Fixed(r"C:\Program Files (x86)\Git\bin\bash.exe"),
    InstallPath::UnderEnv {
        var: "LOCALAPPDATA",
        rest: r"Programs\Git\bin\bash.exe",
    },
];

impl InstallPath {
    pub fn resolve(&self, host: &dyn Host) -> Option<PathBuf> {
        match self {
            InstallPath::Fixed(path) => Some(PathBuf::from(path)),
            InstallPath::UnderEnv { var, rest } => host
                .env_var(var)
                .map(|base| PathBuf::from(format!(r"{}\{rest}", base.trim_end_matches('\\')))),
        }
    }

    /// The path as a PowerShell string expression.
    pub fn powershell_literal(&self) -> String {
        match self {
            InstallPath::Fixed(path) => format!("'{}'", powershell_escape(path)),
            InstallPath::UnderEnv { var, rest } => format!("\"$env:{var}\\{rest}\""),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpreter {
    GitBash,
    Wsl,
    SystemBash,
}

impl Interpreter {
    pub const CHAIN: [Interpreter; 3] = [
        Interpreter::GitBash,
        Interpreter::Wsl,
        Interpreter::SystemBash,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Interpreter::GitBash => "Git Bash",
            Interpreter::Wsl => "WSL",
            Interpreter::SystemBash => "bash on PATH",
        }
    }

    fn locate(self, host: &dyn Host, request: &LaunchRequest) -> Option<Discovery> {
        match self {
            Interpreter::GitBash => GIT_BASH_PATHS
                .iter()
                .filter_map(|candidate| candidate.resolve(host))
                .find(|path| host.exists(path))
                .map(|path| Discovery {
                    interpreter: self,
                    program: path.to_string_lossy().into_owned(),
                    paths: PathPair::posix(request),
                }),
            Interpreter::Wsl => {
                host.find_on_path("wsl")?;
                let native = PathPair::native(request);
                let inner_script = host.wsl_path(&native.inner_script)?;
                let inner_dir = host.wsl_path(&native.inner_dir)?;
                Some(Discovery {
                    interpreter: self,
                    program: "wsl".to_string(),
                    paths: PathPair {
                        outer_dir: native.outer_dir,
                        inner_script,
                        inner_dir,
                    },
                })
            }
            Interpreter::SystemBash => host.find_on_path("bash").map(|path| Discovery {
                interpreter: self,
                program: path.to_string_lossy().into_owned(),
                paths: PathPair::posix(request),
            }),
        }
    }
}

/// Path forms that must not be mixed up once an interpreter is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPair {
    /// Native directory for PowerShell's `Set-Location`.
    pub outer_dir: String,
    pub inner_script: String,
    pub inner_dir: String,
}

impl PathPair {
    /// Native paths on both sides, before any translation.
    pub fn native(request: &LaunchRequest) -> Self {
        let dir = request.working_dir.to_string_lossy().into_owned();
        Self {
            outer_dir: dir.clone(),
            inner_script: request.script.to_string_lossy().into_owned(),
            inner_dir: dir,
        }
    }

    /// Drive-letter POSIX forms for Git Bash and MSYS-style bash.
    pub fn posix(request: &LaunchRequest) -> Self {
        let native = Self::native(request);
        Self {
            inner_script: to_posix_drive_path(&native.inner_script),
            inner_dir: to_posix_drive_path(&native.inner_dir),
            outer_dir: native.outer_dir,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub interpreter: Interpreter,
    pub program: String,
    pub paths: PathPair,
}

/// Runs the chain against `host`, returning the first interpreter found.
pub fn discover(host: &dyn Host, request: &LaunchRequest) -> Option<Discovery> {
    Interpreter::CHAIN
        .iter()
        .find_map(|interpreter| interpreter.locate(host, request))
}
