// src/executor/mod.rs - Runs external programs in the foreground
pub mod builtin;
pub mod redirect;

use std::io;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::PathBuf;
use std::process::{Child, Command as Proc, ExitStatus, Stdio};

use crate::completion::find_executable;
use crate::config::ShellConfig;
use crate::error::ExecError;
use crate::parser::ast::{Command, Stream};

pub struct Executor {
    search_path: Vec<PathBuf>,
}

impl Executor {
    pub fn new(config: &ShellConfig) -> Self {
        Executor { search_path: config.search_path.clone() }
    }

    /// Locate the program image for `name`. Names with a slash are paths.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ExecError> {
        if name.contains('/') {
            return Ok(PathBuf::from(name));
        }
        find_executable(&self.search_path, name)
            .ok_or_else(|| ExecError::NotFound(name.to_string()))
    }

    /// Start the command with its redirections in place.
    pub fn spawn(&self, cmd: &Command) -> Result<Child, ExecError> {
        let Some(name) = cmd.name() else {
            return Err(ExecError::NotFound(String::new()));
        };
        let program = self.resolve(name)?;

        let mut proc = Proc::new(&program);
        proc.arg0(name).args(&cmd.args[1..]);

        for (stream, target) in cmd.redirections() {
            let file = redirect::open_target(target)?;
            match stream {
                Stream::Stdout => proc.stdout(Stdio::from(file)),
                Stream::Stderr => proc.stderr(Stdio::from(file)),
            };
        }

        tracing::debug!(program = %program.display(), args = ?cmd.args, "spawn");
        proc.spawn().map_err(|e| launch_error(name, e))
    }

    /// Run in the foreground and wait. Returns the shell status of the child.
    pub fn run(&self, cmd: &Command) -> Result<i32, ExecError> {
        let mut child = self.spawn(cmd)?;
        let status = child.wait().map_err(|source| ExecError::Spawn {
            program: cmd.args[0].clone(),
            source,
        })?;
        tracing::debug!(pid = child.id(), %status, "child exited");
        Ok(exit_code(status))
    }
}

fn launch_error(program: &str, e: io::Error) -> ExecError {
    if e.raw_os_error() == Some(libc::ENOEXEC) {
        return ExecError::NotExecutable { program: program.to_string() };
    }
    match e.kind() {
        io::ErrorKind::NotFound => ExecError::NotFound(program.to_string()),
        io::ErrorKind::PermissionDenied => ExecError::NotExecutable {
            program: program.to_string(),
        },
        _ => ExecError::Spawn { program: program.to_string(), source: e },
    }
}

/// Exit code, or 128 + signal number for a child killed by a signal.
pub fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}
