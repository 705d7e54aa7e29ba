// src/executor/builtin/mod.rs
mod core;
mod signal;

use std::io::Write;
use std::path::PathBuf;

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::executor::redirect::RedirectGuard;
use crate::parser::ast::Command;

/// Commands implemented inside the shell process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Cd,
    Clear,
    Pwd,
    Type,
    Kill,
    Echo,
}

impl Builtin {
    /// Every name that resolves to a builtin.
    pub const NAMES: &'static [&'static str] =
        &["exit", "cd", "c", "clear", "pwd", "type", "which", "kill", "echo"];

    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "exit"           => Some(Builtin::Exit),
            "cd"             => Some(Builtin::Cd),
            "c" | "clear"    => Some(Builtin::Clear),
            "pwd"            => Some(Builtin::Pwd),
            "type" | "which" => Some(Builtin::Type),
            "kill"           => Some(Builtin::Kill),
            "echo"           => Some(Builtin::Echo),
            _                => None,
        }
    }
}

/// What happened when a command was offered to the builtins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Ran in-process with this status
    Handled(i32),
    /// `exit` was requested with this code
    Exit(i32),
    /// Not a builtin; the command was not touched
    NotRecognized,
}

pub struct Dispatcher {
    home: PathBuf,
    search_path: Vec<PathBuf>,
    prev_dir: Option<PathBuf>,
}

impl Dispatcher {
    pub fn new(config: &ShellConfig) -> Self {
        Dispatcher {
            home: config.home.clone(),
            search_path: config.search_path.clone(),
            prev_dir: None,
        }
    }

    /// Run `cmd` if it names a builtin. Redirections are applied to this
    /// process for the duration of the builtin and reverted afterwards.
    pub fn try_builtin(
        &mut self,
        cmd: &Command,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Dispatch {
        let Some(builtin) = cmd.name().and_then(Builtin::lookup) else {
            return Dispatch::NotRecognized;
        };
        tracing::debug!(?builtin, args = ?cmd.args, "builtin");

        let guard = RedirectGuard::apply(&cmd.redirections(), &mut *err);
        let result = self.run(builtin, &cmd.args, out, err);

        let dispatch = match result {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("{e}");
                let _ = writeln!(err, "{e}");
                Dispatch::Handled(e.status())
            }
        };
        let _ = out.flush();
        let _ = err.flush();
        drop(guard);

        dispatch
    }

    fn run(
        &mut self,
        builtin: Builtin,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<Dispatch, ShellError> {
        let status = match builtin {
            Builtin::Exit  => return Ok(Dispatch::Exit(core::builtin_exit(args, err))),
            Builtin::Cd    => core::builtin_cd(self, args, out)?,
            Builtin::Clear => core::builtin_clear(out)?,
            Builtin::Pwd   => core::builtin_pwd(out)?,
            Builtin::Type  => core::builtin_type(&self.search_path, args, out, err)?,
            Builtin::Kill  => signal::builtin_kill(args)?,
            Builtin::Echo  => core::builtin_echo(args, out)?,
        };
        Ok(Dispatch::Handled(status))
    }
}
