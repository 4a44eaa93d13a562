//! Windows: generate a PowerShell script that finds bash and runs the
//! target script, then open it in a new, non-closing PowerShell window.
//!
//! The generated file uses CRLF line endings and starts with a UTF-8 BOM so
//! Windows PowerShell reads non-ASCII paths correctly. It is never deleted;
//! the new window may still be reading it when `launch` returns.

use std::path::Path;

use itertools::Itertools;
use log::{info, warn};

use super::discovery::{discover, PathPair, GIT_BASH_PATHS};
use super::host::Host;
use super::launcher::Launcher;
use super::paths::powershell_escape;
use super::LaunchRequest;
use crate::error::{Error, Result};

pub const SCRIPT_PREFIX: &str = "opsdeck-console-";
pub const SCRIPT_SUFFIX: &str = ".ps1";
pub const WINDOW_TITLE: &str = "OpsDeck Console - Script Execution";

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, Default, Clone, Copy)]
pub struct PowerShellLauncher;

impl Launcher for PowerShellLauncher {
    fn name(&self) -> &str {
        "PowerShell"
    }

    fn launch(&self, request: &LaunchRequest, host: &dyn Host) -> Result<()> {
        match discover(host, request) {
            Some(found) => info!(
                "Expecting {} at `{}` to run `{}`",
                found.interpreter.label(),
                found.program,
                found.paths.inner_script
            ),
            None => warn!("No bash found up front; the new window will report it"),
        }

        let script = generate_script(request);
        let path = host
            .persist_script(SCRIPT_PREFIX, SCRIPT_SUFFIX, &encode_script(&script))
            .map_err(Error::TempScript)?;
        info!("Wrote launcher script `{}`", path.display());

        host.run("powershell", &start_process_args(&path))
    }
}

pub fn encode_script(script: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + script.len());
    bytes.extend_from_slice(&UTF8_BOM);
    bytes.extend_from_slice(script.as_bytes());
    bytes
}

/// Arguments for the outer `powershell` call that starts the new window.
pub fn start_process_args(script_path: &Path) -> Vec<String> {
    vec![
        "-Command".to_string(),
        format!(
            "Start-Process powershell -ArgumentList '-NoExit', '-ExecutionPolicy', 'Bypass', '-File', '\"{}\"'",
            powershell_escape(&script_path.to_string_lossy())
        ),
    ]
}

#[derive(Debug, Default)]
struct ScriptWriter {
    text: String,
}

impl ScriptWriter {
    fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        for _ in 0..depth {
            self.text.push_str("    ");
        }
        self.text.push_str(text.as_ref());
        self.text.push_str("\r\n");
    }

    fn blank(&mut self) {
        self.text.push_str("\r\n");
    }

    fn finish(self) -> String {
        self.text
    }
}

fn quoted(value: &str) -> String {
    format!("'{}'", powershell_escape(value))
}

/// Builds the PowerShell source for `request`.
pub fn generate_script(request: &LaunchRequest) -> String {
    let native = PathPair::native(request);
    let posix = PathPair::posix(request);
    let mut out = ScriptWriter::default();

    out.line(0, "$ErrorActionPreference = 'Continue'");
    out.line(0, format!("$Host.UI.RawUI.WindowTitle = {}", quoted(WINDOW_TITLE)));
    out.line(0, format!("Write-Host {} -ForegroundColor Cyan", quoted(WINDOW_TITLE)));
    out.line(0, "Write-Host '========================================' -ForegroundColor Cyan");
    out.line(0, "Write-Host ''");
    out.blank();
    out.line(0, "try {");
    out.line(1, format!("$scriptArgs = {}", quoted(&request.args.join(" "))));
    out.line(1, format!("$nativeScriptPath = {}", quoted(&native.inner_script)));
    out.line(1, format!("$nativeWorkingDir = {}", quoted(&native.outer_dir)));
    out.line(1, "$bashCmd = $null");
    out.line(1, "$finalScriptPath = $null");
    out.line(1, "$finalWorkingDir = $null");
    out.line(1, "$finalWorkingDirPS = $null");
    out.blank();
    out.line(1, "Write-Host 'Looking for bash...' -ForegroundColor Cyan");
    write_git_bash_attempt(&mut out, &posix);
    write_wsl_attempt(&mut out);
    write_path_bash_attempt(&mut out, &posix);
    out.blank();
    out.line(1, "Write-Host ''");
    out.line(1, "if ($bashCmd) {");
    write_invocation(&mut out);
    out.line(1, "} else {");
    out.line(2, "Write-Host 'bash was not found on this system.' -ForegroundColor Red");
    out.line(2, "Write-Host 'Install one of the following and try again:' -ForegroundColor Yellow");
    out.line(2, "Write-Host '  - Git for Windows: https://git-scm.com/download/win' -ForegroundColor Yellow");
    out.line(2, "Write-Host '  - WSL: run ''wsl --install'' from an elevated prompt' -ForegroundColor Yellow");
    out.line(1, "}");
    out.line(0, "} catch {");
    out.line(1, "Write-Host \"Unexpected error: $_\" -ForegroundColor Red");
    out.line(1, "Write-Host $_.ScriptStackTrace -ForegroundColor Gray");
    out.line(0, "} finally {");
    out.line(1, "Write-Host ''");
    out.line(1, "Write-Host 'Press any key to close this window...' -ForegroundColor Cyan");
    out.line(1, "try {");
    out.line(2, "$null = $Host.UI.RawUI.ReadKey('NoEcho,IncludeKeyDown')");
    out.line(1, "} catch {");
    out.line(2, "Start-Sleep -Seconds 5");
    out.line(1, "}");
    out.line(0, "}");

    out.finish()
}

fn write_git_bash_attempt(out: &mut ScriptWriter, posix: &PathPair) {
    let candidates = GIT_BASH_PATHS
        .iter()
        .map(|path| path.powershell_literal())
        .join(", ");

    out.blank();
    out.line(1, "# Git Bash");
    out.line(1, format!("$gitBashPaths = @({candidates})"));
    out.line(1, "foreach ($path in $gitBashPaths) {");
    out.line(2, "Write-Host \"  Checking: $path\" -ForegroundColor Gray");
    out.line(2, "if (Test-Path $path) {");
    out.line(3, "$bashCmd = $path");
    out.line(3, format!("$finalScriptPath = {}", quoted(&posix.inner_script)));
    out.line(3, format!("$finalWorkingDir = {}", quoted(&posix.inner_dir)));
    out.line(3, "$finalWorkingDirPS = $nativeWorkingDir");
    out.line(3, "Write-Host \"Found Git Bash at: $path\" -ForegroundColor Green");
    out.line(3, "break");
    out.line(2, "}");
    out.line(1, "}");
    out.line(1, "if (-not $bashCmd) {");
    out.line(2, "Write-Host '  Git Bash not found in standard locations' -ForegroundColor Gray");
    out.line(1, "}");
}

fn write_wsl_attempt(out: &mut ScriptWriter) {
    out.blank();
    out.line(1, "# WSL");
    out.line(1, "if (-not $bashCmd) {");
    out.line(2, "Write-Host '  Checking: WSL' -ForegroundColor Gray");
    out.line(2, "if (Get-Command wsl -ErrorAction SilentlyContinue) {");
    out.line(3, "$wslScriptPath = (wsl wslpath -a $nativeScriptPath 2>$null)");
    out.line(3, "$wslWorkingDir = (wsl wslpath -a $nativeWorkingDir 2>$null)");
    out.line(3, "if ($wslScriptPath -and $wslWorkingDir) {");
    out.line(4, "$bashCmd = 'wsl'");
    out.line(4, "$finalScriptPath = $wslScriptPath.Trim()");
    out.line(4, "$finalWorkingDir = $wslWorkingDir.Trim()");
    out.line(4, "$finalWorkingDirPS = $nativeWorkingDir");
    out.line(4, "Write-Host 'Found WSL' -ForegroundColor Green");
    out.line(3, "} else {");
    out.line(4, "Write-Host '  WSL path conversion failed' -ForegroundColor Yellow");
    out.line(3, "}");
    out.line(2, "} else {");
    out.line(3, "Write-Host '  WSL not found' -ForegroundColor Gray");
    out.line(2, "}");
    out.line(1, "}");
}

fn write_path_bash_attempt(out: &mut ScriptWriter, posix: &PathPair) {
    out.blank();
    out.line(1, "# bash on PATH");
    out.line(1, "if (-not $bashCmd) {");
    out.line(2, "Write-Host '  Checking: bash on PATH' -ForegroundColor Gray");
    out.line(2, "$pathBash = Get-Command bash -ErrorAction SilentlyContinue");
    out.line(2, "if ($pathBash) {");
    out.line(3, "$bashCmd = $pathBash.Source");
    out.line(3, format!("$finalScriptPath = {}", quoted(&posix.inner_script)));
    out.line(3, format!("$finalWorkingDir = {}", quoted(&posix.inner_dir)));
    out.line(3, "$finalWorkingDirPS = $nativeWorkingDir");
    out.line(3, "Write-Host \"Found bash at: $bashCmd\" -ForegroundColor Green");
    out.line(2, "} else {");
    out.line(3, "Write-Host '  System bash not found in PATH' -ForegroundColor Gray");
    out.line(2, "}");
    out.line(1, "}");
}

fn write_invocation(out: &mut ScriptWriter) {
    out.line(2, "try {");
    out.line(3, "Set-Location -LiteralPath $finalWorkingDirPS");
    out.line(3, "Write-Host \"Working directory: $finalWorkingDir\" -ForegroundColor Cyan");
    out.line(3, "Write-Host \"Running: $finalScriptPath $scriptArgs\" -ForegroundColor Cyan");
    out.line(3, "Write-Host ''");
    out.line(3, "if ($bashCmd -eq 'wsl') {");
    out.line(
        4,
        r#"wsl bash -c "cd `"$finalWorkingDir`" && bash `"$finalScriptPath`" $scriptArgs""#,
    );
    out.line(3, "} elseif ($scriptArgs) {");
    out.line(4, r"& $bashCmd $finalScriptPath ($scriptArgs -split '\s+')");
    out.line(3, "} else {");
    out.line(4, "& $bashCmd $finalScriptPath");
    out.line(3, "}");
    out.line(3, "if ($LASTEXITCODE -ne 0) {");
    out.line(4, "Write-Host ''");
    out.line(4, "Write-Host \"Script exited with code $LASTEXITCODE\" -ForegroundColor Yellow");
    out.line(3, "}");
    out.line(2, "} catch {");
    out.line(3, "Write-Host ''");
    out.line(3, "Write-Host \"Failed to run script: $_\" -ForegroundColor Red");
    out.line(3, "Write-Host \"  Interpreter: $bashCmd\" -ForegroundColor Yellow");
    out.line(3, "Write-Host \"  Script path: $finalScriptPath\" -ForegroundColor Yellow");
    out.line(3, "Write-Host \"  Working directory: $finalWorkingDir\" -ForegroundColor Yellow");
    out.line(3, "Write-Host \"  Native directory: $finalWorkingDirPS\" -ForegroundColor Yellow");
    out.line(3, "Write-Host \"  Arguments: $scriptArgs\" -ForegroundColor Yellow");
    out.line(2, "}");
}
