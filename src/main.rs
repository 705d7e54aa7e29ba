// src/main.rs
mod completion;
mod config;
mod error;
mod executor;
mod parser;
mod readline;
mod shell;
#[cfg(test)]
mod test_util;

use std::io::Write;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use completion::CompletionIndex;
use config::{Settings, ShellConfig};
use readline::{ReadlineError, ShellReadline};
use shell::{Flow, Shell};

/// Log to a file so diagnostics never land on the interactive terminal.
fn init_logging(settings: &Settings) {
    let Some(path) = settings.log_path() else { return };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env("FERO_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> Result<()> {
    let (settings, settings_error) = match Settings::load() {
        Ok(s) => (s, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    init_logging(&settings);
    if let Some(e) = settings_error {
        tracing::warn!("{e}");
        eprintln!("fero: {e}");
    }

    let config = ShellConfig::from_env(settings);
    tracing::info!(search_path = ?config.search_path, home = %config.home.display(), "fero starting");

    let mut readline = ShellReadline::new(CompletionIndex::new(config.search_path.clone()));
    let mut shell = Shell::new(config);

    if readline.is_interactive() && shell.config.settings.clear_on_start {
        print!("\x1b[2J\x1b[H");
    }

    loop {
        if readline.is_interactive() {
            if let Some(header) = shell.header() {
                println!("{header}");
            }
        }
        std::io::stdout().flush()?;

        let prompt = if readline.is_interactive() { shell.build_prompt() } else { String::new() };
        match readline.readline(&prompt) {
            Ok(line) => match shell.eval(&line)? {
                Flow::Continue => {}
                Flow::Exit(code) => std::process::exit(code),
            },

            // ── Ctrl+C ────────────────────────────────────────────
            // Abandon the line and show a fresh prompt
            Err(ReadlineError::Interrupted) => {
                shell.last_exit_code = 130;
            }

            // ── Ctrl+D ────────────────────────────────────────────
            Err(ReadlineError::Eof) => {
                std::process::exit(shell.last_exit_code);
            }

            Err(ReadlineError::Other(e)) => {
                tracing::error!("readline: {e}");
                return Err(anyhow::anyhow!("terminal error: {e}"));
            }
        }
    }
}
