// src/shell.rs
use std::io::{self, Write};

use anyhow::Result;
use nu_ansi_term::Color;

use crate::config::ShellConfig;
use crate::executor::builtin::{Dispatch, Dispatcher};
use crate::executor::Executor;
use crate::parser::ast::Command;

/// What the session loop should do after a line has been evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

pub struct Shell {
    pub config: ShellConfig,
    pub last_exit_code: i32,
    dispatcher: Dispatcher,
    executor: Executor,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Self {
        Shell {
            dispatcher: Dispatcher::new(&config),
            executor: Executor::new(&config),
            config,
            last_exit_code: 0,
        }
    }

    /// Parse and run one line against the real standard streams.
    pub fn eval(&mut self, input: &str) -> Result<Flow> {
        let stdout = io::stdout();
        let stderr = io::stderr();
        self.eval_with(input, &mut stdout.lock(), &mut stderr.lock())
    }

    pub fn eval_with(
        &mut self,
        input: &str,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<Flow> {
        let cmd = crate::parser::parse(input);
        if cmd.is_empty() {
            return Ok(Flow::Continue);
        }
        self.execute(&cmd, out, err)
    }

    fn execute(&mut self, cmd: &Command, out: &mut dyn Write, err: &mut dyn Write) -> Result<Flow> {
        match self.dispatcher.try_builtin(cmd, out, err) {
            Dispatch::Handled(code) => self.last_exit_code = code,
            Dispatch::Exit(code) => return Ok(Flow::Exit(code)),
            Dispatch::NotRecognized => {
                out.flush()?;
                self.last_exit_code = match self.executor.run(cmd) {
                    Ok(code) => code,
                    Err(e) => {
                        tracing::warn!("{e}");
                        writeln!(err, "{}", Color::Red.paint(format!("fero: {e}")))?;
                        e.status()
                    }
                };
            }
        }
        Ok(Flow::Continue)
    }

    /// Line printed above the prompt: the working directory.
    pub fn header(&self) -> Option<String> {
        if !self.config.settings.show_cwd {
            return None;
        }
        let cwd = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "?".to_string());
        Some(Color::Cyan.paint(cwd).to_string())
    }

    /// Prompt in front of the edit buffer, red after a failed command.
    pub fn build_prompt(&self) -> String {
        let color = if self.last_exit_code == 0 { Color::Green } else { Color::Red };
        color.paint(self.config.settings.prompt.as_str()).to_string()
    }
}
