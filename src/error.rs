// src/error.rs
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures local to a builtin. Reported, never fatal to the shell.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("cd: {}: {source}", path.display())]
    ChangeDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cd: {0}")]
    NoDirectory(&'static str),

    #[error("{builtin}: invalid argument: {value}")]
    InvalidArgument { builtin: &'static str, value: String },

    #[error("kill {pid}: {source}")]
    Signal {
        pid: i32,
        #[source]
        source: io::Error,
    },

    #[error("usage: {0}")]
    Usage(String),

    #[error("{0}: not found")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Status a builtin reports after failing with this error.
    pub fn status(&self) -> i32 {
        match self {
            ShellError::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// Problems with `~/.fero.toml`. The shell falls back to default settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ignoring malformed {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failures launching an external command.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("command not found: {0}")]
    NotFound(String),

    /// The file exists but cannot be loaded as a program image.
    #[error("command not found: {program}")]
    NotExecutable { program: String },

    #[error("{}: {source}", path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl ExecError {
    /// Shell status recorded when a command could not be run.
    pub fn status(&self) -> i32 {
        match self {
            ExecError::NotFound(_) => 127,
            ExecError::NotExecutable { .. } => 126,
            ExecError::Redirect { .. } | ExecError::Spawn { .. } => 1,
        }
    }
}
