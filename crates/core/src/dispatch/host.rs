//! Side effects of a dispatch, behind a trait so launchers can be exercised
//! without touching the real filesystem or spawning processes.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command as ProcessCommand;
use std::sync::Mutex;

use log::debug;

use crate::error::{Error, Result};

pub trait Host: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    /// Best-effort `chmod 755`; callers ignore failures.
    fn ensure_executable(&self, path: &Path) -> std::io::Result<()>;

    /// Writes `contents` to a uniquely named temporary file that is left in
    /// place for the launched process to read.
    fn persist_script(&self, prefix: &str, suffix: &str, contents: &[u8])
        -> std::io::Result<PathBuf>;

    /// Runs `program` to completion. A non-zero exit is a spawn error.
    fn run(&self, program: &str, args: &[String]) -> Result<()>;

    fn find_on_path(&self, program: &str) -> Option<PathBuf>;

    /// Translates a native path with `wsl wslpath -a`.
    fn wsl_path(&self, native: &str) -> Option<String>;

    fn env_var(&self, key: &str) -> Option<String>;
}

/// The real host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl Host for SystemHost {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    #[cfg(unix)]
    fn ensure_executable(&self, path: &Path) -> std::io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
    }

    #[cfg(not(unix))]
    fn ensure_executable(&self, _path: &Path) -> std::io::Result<()> {
        Ok(())
    }

    fn persist_script(
        &self,
        prefix: &str,
        suffix: &str,
        contents: &[u8],
    ) -> std::io::Result<PathBuf> {
        let mut file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile()?;
        file.write_all(contents)?;
        file.flush()?;

        let (_, path) = file.keep().map_err(|e| e.error)?;
        debug!("Persisted generated script at `{}`", path.display());
        Ok(path)
    }

    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        let output = ProcessCommand::new(program)
            .args(args)
            .output()
            .map_err(|e| Error::spawn_error(program, e.to_string()))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            Err(Error::spawn_error(program, output.status.to_string()))
        } else {
            Err(Error::spawn_error(program, stderr))
        }
    }

    fn find_on_path(&self, program: &str) -> Option<PathBuf> {
        let extensions: &[&str] = if cfg!(windows) {
            &["", ".exe", ".cmd", ".bat"]
        } else {
            &[""]
        };

        let path_var = std::env::var_os("PATH")?;
        std::env::split_paths(&path_var)
            .flat_map(|dir| {
                extensions
                    .iter()
                    .map(move |ext| dir.join(format!("{program}{ext}")))
            })
            .find(|candidate| candidate.is_file())
    }

    fn wsl_path(&self, native: &str) -> Option<String> {
        let output = ProcessCommand::new("wsl")
            .args(["wslpath", "-a", native])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }

        let translated = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!translated.is_empty()).then_some(translated)
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A process invocation captured by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug)]
enum Existence {
    Filesystem,
    Listed(HashSet<PathBuf>),
}

/// Records every side effect instead of performing it.
///
/// Backs `--dry-run`, where existence and `PATH` checks still look at the
/// real system, and tests, where everything is configured up front.
#[derive(Debug)]
pub struct RecordingHost {
    existence: Existence,
    on_path: HashMap<String, PathBuf>,
    wsl_paths: HashMap<String, String>,
    environment: HashMap<String, String>,
    run_failure: Option<String>,
    invocations: Mutex<Vec<Invocation>>,
    scripts: Mutex<Vec<(PathBuf, Vec<u8>)>>,
}

impl RecordingHost {
    /// Nothing exists until listed with [`RecordingHost::with_file`].
    pub fn new() -> Self {
        Self {
            existence: Existence::Listed(HashSet::new()),
            on_path: HashMap::new(),
            wsl_paths: HashMap::new(),
            environment: HashMap::new(),
            run_failure: None,
            invocations: Mutex::new(Vec::new()),
            scripts: Mutex::new(Vec::new()),
        }
    }

    /// Existence and `PATH` checks consult the real system.
    pub fn dry_run() -> Self {
        Self {
            existence: Existence::Filesystem,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        if let Existence::Listed(files) = &mut self.existence {
            files.insert(path.into());
        }
        self
    }

    #[must_use]
    pub fn with_program(mut self, program: &str, path: impl Into<PathBuf>) -> Self {
        self.on_path.insert(program.to_string(), path.into());
        self
    }

    #[must_use]
    pub fn with_wsl_path(mut self, native: &str, translated: &str) -> Self {
        self.wsl_paths
            .insert(native.to_string(), translated.to_string());
        self
    }

    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.environment.insert(key.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn failing_runs(mut self, message: &str) -> Self {
        self.run_failure = Some(message.to_string());
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .map(|i| i.clone())
            .unwrap_or_default()
    }

    pub fn scripts(&self) -> Vec<(PathBuf, Vec<u8>)> {
        self.scripts.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for RecordingHost {
    fn exists(&self, path: &Path) -> bool {
        match &self.existence {
            Existence::Filesystem => path.exists(),
            Existence::Listed(files) => files.contains(path),
        }
    }

    fn ensure_executable(&self, _path: &Path) -> std::io::Result<()> {
        Ok(())
    }

    fn persist_script(
        &self,
        prefix: &str,
        suffix: &str,
        contents: &[u8],
    ) -> std::io::Result<PathBuf> {
        let mut scripts = self
            .scripts
            .lock()
            .map_err(|_| std::io::Error::other("recording host poisoned"))?;
        let path = std::env::temp_dir().join(format!("{prefix}{}{suffix}", scripts.len()));
        scripts.push((path.clone(), contents.to_vec()));
        Ok(path)
    }

    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        if let Ok(mut invocations) = self.invocations.lock() {
            invocations.push(Invocation {
                program: program.to_string(),
                args: args.to_vec(),
            });
        }

        match &self.run_failure {
            Some(message) => Err(Error::spawn_error(program, message.clone())),
            None => Ok(()),
        }
    }

    fn find_on_path(&self, program: &str) -> Option<PathBuf> {
        if let Some(path) = self.on_path.get(program) {
            return Some(path.clone());
        }
        match self.existence {
            Existence::Filesystem => SystemHost.find_on_path(program),
            Existence::Listed(_) => None,
        }
    }

    fn wsl_path(&self, native: &str) -> Option<String> {
        self.wsl_paths.get(native).cloned()
    }

    fn env_var(&self, key: &str) -> Option<String> {
        if let Some(value) = self.environment.get(key) {
            return Some(value.clone());
        }
        match self.existence {
            Existence::Filesystem => SystemHost.env_var(key),
            Existence::Listed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_host_lists_files() {
        let host = RecordingHost::new().with_file("/tmp/a.sh");
        assert!(host.exists(Path::new("/tmp/a.sh")));
        assert!(!host.exists(Path::new("/tmp/b.sh")));
    }

    #[test]
    fn test_recording_host_records_runs() {
        let host = RecordingHost::new();
        host.run("osascript", &["-e".to_string(), "x".to_string()])
            .unwrap();

        assert_eq!(
            host.invocations(),
            vec![Invocation {
                program: "osascript".to_string(),
                args: vec!["-e".to_string(), "x".to_string()],
            }]
        );
    }

    #[test]
    fn test_recording_host_failing_runs() {
        let host = RecordingHost::new().failing_runs("boom");
        let result = host.run("powershell", &[]);
        assert!(matches!(result, Err(Error::Spawn { .. })));
        assert_eq!(host.invocations().len(), 1);
    }

    #[test]
    fn test_recording_host_persists_in_memory() {
        let host = RecordingHost::new();
        let first = host.persist_script("p-", ".ps1", b"one").unwrap();
        let second = host.persist_script("p-", ".ps1", b"two").unwrap();

        assert_ne!(first, second);
        assert!(!first.exists());
        assert_eq!(host.scripts()[1].1, b"two".to_vec());
    }

    #[test]
    fn test_system_host_persist_script_keeps_file() {
        let path = SystemHost
            .persist_script("opsdeck-test-", ".ps1", b"Write-Host 'hi'")
            .unwrap();

        assert!(path.exists());
        assert!(path.to_string_lossy().ends_with(".ps1"));
        assert_eq!(std::fs::read(&path).unwrap(), b"Write-Host 'hi'".to_vec());
        std::fs::remove_file(path).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_system_host_ensure_executable() {
        use std::os::unix::fs::PermissionsExt;

        let file = tempfile::NamedTempFile::new().unwrap();
        SystemHost.ensure_executable(file.path()).unwrap();
        let mode = std::fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
