//! Quoting and path-form helpers shared by the launchers.

/// Wraps `value` in single quotes for a POSIX shell.
///
/// Embedded single quotes become `'\''`.
pub fn posix_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Escapes `value` for use inside a single-quoted PowerShell string.
pub fn powershell_escape(value: &str) -> String {
    value.replace('\'', "''")
}

/// Escapes `value` for use inside a double-quoted AppleScript string.
pub fn applescript_escape(value: &str) -> String {
    value.replace('\\', r"\\").replace('"', "\\\"")
}

/// `C:\Users\x` becomes `C:/Users/x`.
pub fn forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Rewrites a native Windows path into the drive-letter POSIX form used by
/// Git Bash and MSYS-style shells: `C:\Users\x` becomes `/c/Users/x`.
pub fn to_posix_drive_path(path: &str) -> String {
    let converted = forward_slashes(path);
    let mut chars = converted.chars();

    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => {
            format!("/{}{}", drive.to_ascii_lowercase(), &converted[2..])
        }
        _ => converted,
    }
}
