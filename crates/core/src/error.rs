use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Script not found: {}\n\n{}", .path, .remediation)]
    ScriptNotFound { path: String, remediation: String },

    #[error(
        "Terminal execution is currently only supported on macOS and Windows. Detected OS: {}",
        .0
    )]
    UnsupportedPlatform(String),

    #[error("Failed to launch `{}`: {}", .program, .message)]
    Spawn { program: String, message: String },

    #[error("Failed to write temporary script: {}", .0)]
    TempScript(std::io::Error),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("No categories were found in the catalog. Is `{}` empty?", .path)]
    EmptyCatalog { path: String },

    #[error("Invalid catalog: {} may not be empty", .0)]
    EmptyName(String),

    #[error("Found a non-unique command title in category `{}`: `{}`", .0, .1)]
    NonUniqueCommandTitle(String, String),

    #[error("Found a non-unique field label on command `{}`: `{}`", .0, .1)]
    NonUniqueFieldLabel(String, String),

    #[error("Invalid flag name `{}` on command `{}`: {}", .flag, .command, .reason)]
    InvalidFlag {
        command: String,
        flag: String,
        reason: String,
    },

    #[error("For a color, only one of `rgb`, `ansi` or `name` should be defined.")]
    MultipleColorTypes,

    #[error("Unknown color name: \"{}\"", _0)]
    UnknownColorName(String),

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),
}

impl Error {
    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    pub fn spawn_error(program: &str, message: impl Into<String>) -> Self {
        Self::Spawn {
            program: program.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_flag(command: &str, flag: &str, reason: &str) -> Self {
        Self::InvalidFlag {
            command: command.to_string(),
            flag: flag.to_string(),
            reason: reason.to_string(),
        }
    }
}
