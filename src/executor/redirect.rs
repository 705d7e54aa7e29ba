// src/executor/redirect.rs
//
// Redirection targets are opened the same way for both execution paths.
// External commands get the opened file as their Stdio; builtins run in
// this process, so their descriptors are swapped and swapped back.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;

use crate::error::ExecError;
use crate::parser::ast::{Redirect, RedirectMode, Stream};

/// Open a redirection target, creating it if needed.
pub fn open_target(redirect: &Redirect) -> Result<File, ExecError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).mode(0o644);
    match redirect.mode {
        RedirectMode::Append => options.append(true),
        RedirectMode::Truncate => options.truncate(true),
    };
    options.open(&redirect.path).map_err(|source| ExecError::Redirect {
        path: redirect.path.clone(),
        source,
    })
}

fn flush(stream: Stream) {
    let _ = match stream {
        Stream::Stdout => io::stdout().flush(),
        Stream::Stderr => io::stderr().flush(),
    };
}

/// A descriptor saved before redirection, put back on drop.
struct Saved {
    stream: Stream,
    fd: i32,
}

/// Applies redirections to this process for the lifetime of the guard.
/// Targets that cannot be opened are reported and left unredirected.
pub struct RedirectGuard {
    saved: Vec<Saved>,
}

impl RedirectGuard {
    pub fn apply<W: Write + ?Sized>(redirections: &[(Stream, &Redirect)], err: &mut W) -> Self {
        let mut guard = RedirectGuard { saved: Vec::new() };

        for &(stream, redirect) in redirections {
            let file = match open_target(redirect) {
                Ok(f) => f,
                Err(e) => {
                    tracing::warn!("builtin redirect failed: {e}");
                    let _ = writeln!(err, "fero: {e}");
                    continue;
                }
            };
            match redirect_fd(stream, &file) {
                Ok(fd) => guard.saved.push(Saved { stream, fd }),
                Err(e) => {
                    let _ = writeln!(err, "fero: {}: {e}", redirect.path.display());
                }
            }
        }

        guard
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        !self.saved.is_empty()
    }
}

// dup the current descriptor, then point the stream at `file`
fn redirect_fd(stream: Stream, file: &File) -> io::Result<i32> {
    flush(stream);
    let target = stream.fd();
    unsafe {
        let saved = libc::dup(target);
        if saved < 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::dup2(file.as_raw_fd(), target) < 0 {
            let e = io::Error::last_os_error();
            libc::close(saved);
            return Err(e);
        }
        Ok(saved)
    }
}

impl Drop for RedirectGuard {
    fn drop(&mut self) {
        // restore in reverse so a stream redirected twice ends up original
        for saved in self.saved.drain(..).rev() {
            flush(saved.stream);
            unsafe {
                libc::dup2(saved.fd, saved.stream.fd());
                libc::close(saved.fd);
            }
        }
    }
}
