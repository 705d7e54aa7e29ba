// src/readline/mod.rs
// Raw-mode line editor with cursor movement and tab completion

use std::collections::BTreeSet;
use std::io::{self, BufRead, IsTerminal, Read, Write};

use crate::completion::longest_common_prefix;

const ESC: u8 = 0x1b;

/// Source of completion candidates for the text typed so far.
pub trait Completer {
    fn complete(&self, prefix: &str) -> BTreeSet<String>;
}

#[derive(Debug)]
pub enum ReadlineError {
    /// Ctrl+C abandoned the current line
    Interrupted,
    /// Ctrl+D on an empty line, or input closed
    Eof,
    Other(io::Error),
}

impl From<io::Error> for ReadlineError {
    fn from(e: io::Error) -> Self {
        ReadlineError::Other(e)
    }
}

impl std::fmt::Display for ReadlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadlineError::Interrupted => write!(f, "interrupted"),
            ReadlineError::Eof => write!(f, "end of input"),
            ReadlineError::Other(e) => write!(f, "{e}"),
        }
    }
}

// ── Raw mode ──────────────────────────────────────────────────────────────────

/// Keeps the terminal in raw mode for as long as it lives.
pub struct RawModeGuard(());

impl RawModeGuard {
    pub fn acquire() -> io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        Ok(RawModeGuard(()))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = crossterm::terminal::disable_raw_mode() {
            tracing::warn!("failed to restore terminal mode: {e}");
        }
    }
}

// ── Keys ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Left,
    Right,
    Tab,
    Enter,
    Interrupt,
    EndOfFile,
    Ignored,
}

fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Read one keystroke. `None` means the input stream is closed.
pub fn read_key<R: Read>(input: &mut R) -> io::Result<Option<Key>> {
    let Some(byte) = read_byte(input)? else { return Ok(None) };

    let key = match byte {
        b'\r' | b'\n'    => Key::Enter,
        b'\t'            => Key::Tab,
        0x7f | 0x08      => Key::Backspace,
        0x03             => Key::Interrupt,
        0x04             => Key::EndOfFile,
        ESC              => read_escape(input)?,
        0x20..=0x7e      => Key::Char(byte as char),
        _                => Key::Ignored,
    };
    Ok(Some(key))
}

// Called after ESC. Only CSI arrows mean anything; everything else is swallowed.
fn read_escape<R: Read>(input: &mut R) -> io::Result<Key> {
    if read_byte(input)? != Some(b'[') {
        return Ok(Key::Ignored);
    }
    match read_byte(input)? {
        Some(b'C') => Ok(Key::Right),
        Some(b'D') => Ok(Key::Left),
        Some(b) if b.is_ascii_digit() => {
            // ESC [ 3 ~ and friends
            while let Some(b) = read_byte(input)? {
                if !(b.is_ascii_digit() || b == b';') {
                    break;
                }
            }
            Ok(Key::Ignored)
        }
        _ => Ok(Key::Ignored),
    }
}

// ── Editor ────────────────────────────────────────────────────────────────────

/// Result of feeding one key to the editor.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Submit(String),
    Cancel,
    Eof,
}

/// Edit buffer, cursor and the rendering rules for one prompt.
pub struct Editor<'a, C: Completer + ?Sized> {
    prompt: &'a str,
    prompt_width: usize,
    buffer: String,
    // chars, not bytes
    cursor: usize,
    completer: &'a C,
}

impl<'a, C: Completer + ?Sized> Editor<'a, C> {
    pub fn new(prompt: &'a str, completer: &'a C) -> Self {
        Editor {
            prompt,
            prompt_width: strip_ansi_len(prompt),
            buffer: String::new(),
            cursor: 0,
            completer,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle<W: Write>(&mut self, key: Key, out: &mut W) -> io::Result<Step> {
        match key {
            Key::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
                self.refresh(out)?;
            }
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                    self.refresh(out)?;
                }
            }
            Key::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    write!(out, "\x1b[D")?;
                }
            }
            Key::Right => {
                if self.cursor < self.char_len() {
                    self.cursor += 1;
                    write!(out, "\x1b[C")?;
                }
            }
            Key::Tab => self.complete(out)?,
            Key::Enter => {
                write!(out, "\r\n")?;
                out.flush()?;
                self.cursor = 0;
                return Ok(Step::Submit(std::mem::take(&mut self.buffer)));
            }
            Key::Interrupt => {
                write!(out, "^C\r\n")?;
                out.flush()?;
                return Ok(Step::Cancel);
            }
            Key::EndOfFile if self.buffer.is_empty() => {
                write!(out, "\r\n")?;
                out.flush()?;
                return Ok(Step::Eof);
            }
            Key::EndOfFile | Key::Ignored => {}
        }
        out.flush()?;
        Ok(Step::Continue)
    }

    /// Tab once narrows to the common prefix; when nothing narrows, list candidates.
    fn complete<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let matches = self.completer.complete(&self.buffer);
        match matches.len() {
            0 => {}
            1 => {
                if let Some(only) = matches.first() {
                    self.replace(format!("{only} "), out)?;
                }
            }
            _ => {
                let prefix = longest_common_prefix(&matches);
                if prefix.len() > self.buffer.len() {
                    self.replace(prefix, out)?;
                } else {
                    let listing: Vec<&str> = matches.iter().map(String::as_str).collect();
                    write!(out, "\r\n{}\r\n", listing.join(" "))?;
                    self.refresh(out)?;
                }
            }
        }
        Ok(())
    }

    fn replace<W: Write>(&mut self, text: String, out: &mut W) -> io::Result<()> {
        self.buffer = text;
        self.cursor = self.char_len();
        self.refresh(out)
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    // `cursor` counts chars; String edits need the byte position
    fn byte_offset(&self, index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(index)
            .map_or(self.buffer.len(), |(i, _)| i)
    }

    /// Repaint prompt and buffer, clear any stale tail, park the cursor.
    fn refresh<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "\r{}{}\x1b[K", self.prompt, self.buffer)?;
        let back = self.char_len() - self.cursor;
        if back > 0 {
            write!(out, "\x1b[{back}D")?;
        }
        Ok(())
    }

    /// Column (0-based) the terminal cursor should sit on.
    #[cfg(test)]
    pub fn column(&self) -> usize {
        self.prompt_width + self.cursor
    }
}

/// Drive an editor over raw input until a line is submitted.
pub fn read_line_with<R, W, C>(
    prompt: &str,
    input: &mut R,
    out: &mut W,
    completer: &C,
) -> Result<String, ReadlineError>
where
    R: Read,
    W: Write,
    C: Completer + ?Sized,
{
    let mut editor = Editor::new(prompt, completer);
    write!(out, "{prompt}")?;
    out.flush()?;

    loop {
        let Some(key) = read_key(input)? else {
            if editor.buffer().is_empty() {
                return Err(ReadlineError::Eof);
            }
            // Input closed mid-line: submit what we have
            write!(out, "\r\n")?;
            return Ok(editor.buffer().to_string());
        };
        match editor.handle(key, out)? {
            Step::Continue => {}
            Step::Submit(line) => return Ok(line),
            Step::Cancel => return Err(ReadlineError::Interrupted),
            Step::Eof => return Err(ReadlineError::Eof),
        }
    }
}

// ── Main readline struct ──────────────────────────────────────────────────────

pub struct ShellReadline<C: Completer> {
    completer: C,
    interactive: bool,
}

impl<C: Completer> ShellReadline<C> {
    pub fn new(completer: C) -> Self {
        let interactive = io::stdin().is_terminal();
        ShellReadline { completer, interactive }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        if !self.interactive {
            return self.read_plain();
        }

        // Raw mode lives exactly as long as this read
        let _raw = RawModeGuard::acquire()?;
        let stdin = io::stdin();
        let stdout = io::stdout();
        read_line_with(prompt, &mut stdin.lock(), &mut stdout.lock(), &self.completer)
    }

    // Piped input: no editing, one line at a time
    fn read_plain(&mut self) -> Result<String, ReadlineError> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(ReadlineError::Eof);
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Visible width of a string once ANSI escape sequences are removed.
pub fn strip_ansi_len(s: &str) -> usize {
    let mut len = 0;
    let mut in_escape = false;
    for ch in s.chars() {
        if ch == '\x1b' { in_escape = true; }
        else if in_escape && ch.is_ascii_alphabetic() { in_escape = false; }
        else if !in_escape { len += 1; }
    }
    len
}
