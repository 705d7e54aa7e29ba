// src/parser/ast.rs
use std::path::PathBuf;

/// One parsed input line: the argument vector plus where its output goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub args: Vec<String>,
    pub stdout: Option<Redirect>,
    pub stderr: Option<Redirect>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub path: PathBuf,
    pub mode: RedirectMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Truncate,
    Append,
}

/// Standard stream a redirection replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    pub fn fd(self) -> i32 {
        match self {
            Stream::Stdout => libc::STDOUT_FILENO,
            Stream::Stderr => libc::STDERR_FILENO,
        }
    }
}

impl Command {
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Stream substitutions to apply before running, stdout first.
    pub fn redirections(&self) -> Vec<(Stream, &Redirect)> {
        let mut list = Vec::with_capacity(2);
        if let Some(r) = &self.stdout {
            list.push((Stream::Stdout, r));
        }
        if let Some(r) = &self.stderr {
            list.push((Stream::Stderr, r));
        }
        list
    }
}
