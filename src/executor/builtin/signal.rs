// src/executor/builtin/signal.rs
use crate::error::ShellError;

fn parse_int(value: &str) -> Result<i32, ShellError> {
    value.parse().map_err(|_| ShellError::InvalidArgument {
        builtin: "kill",
        value: value.to_string(),
    })
}

/// `kill <pid> [signal]`, SIGTERM unless a signal number is given.
pub fn builtin_kill(args: &[String]) -> Result<i32, ShellError> {
    let Some(pid) = args.get(1) else {
        return Err(ShellError::Usage("kill <pid> [signal]".to_string()));
    };
    let pid = parse_int(pid)?;
    let signal = match args.get(2) {
        Some(s) => parse_int(s)?,
        None => libc::SIGTERM,
    };

    tracing::debug!(pid, signal, "sending signal");
    if unsafe { libc::kill(pid, signal) } != 0 {
        return Err(ShellError::Signal { pid, source: std::io::Error::last_os_error() });
    }
    Ok(0)
}
