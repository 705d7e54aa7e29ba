// src/completion/mod.rs
// Tab completion engine - completes command names from the search path

use std::collections::BTreeSet;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use crate::readline::Completer;

/// Executable names found on a fixed search path.
/// Directory contents are read fresh on every request.
#[derive(Debug, Clone, Default)]
pub struct CompletionIndex {
    search_path: Vec<PathBuf>,
}

impl CompletionIndex {
    pub fn new(search_path: Vec<PathBuf>) -> Self {
        CompletionIndex { search_path }
    }

    /// Every executable entry on the search path whose name starts with `prefix`.
    pub fn find_matches(&self, prefix: &str) -> BTreeSet<String> {
        let mut matches = BTreeSet::new();

        for dir in &self.search_path {
            let Ok(entries) = std::fs::read_dir(dir) else { continue };
            for entry in entries.flatten() {
                let name = entry.file_name();
                if !name.as_bytes().starts_with(prefix.as_bytes()) {
                    continue;
                }
                let path = entry.path();
                if path.is_file() && is_executable(&path) {
                    matches.insert(name.to_string_lossy().into_owned());
                }
            }
        }

        tracing::debug!(prefix, count = matches.len(), "completion lookup");
        matches
    }
}

impl Completer for CompletionIndex {
    fn complete(&self, prefix: &str) -> BTreeSet<String> {
        self.find_matches(prefix)
    }
}

/// Search `search_path` in order for an executable file called `name`.
pub fn find_executable(search_path: &[PathBuf], name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    search_path
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

/// True when the current user may execute `path`.
pub fn is_executable(path: &Path) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}

/// Longest string that every candidate starts with.
pub fn longest_common_prefix<I, S>(candidates: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = candidates.into_iter();
    let Some(first) = iter.next() else { return String::new() };
    let mut prefix = first.as_ref().to_string();

    for candidate in iter {
        let len: usize = prefix
            .chars()
            .zip(candidate.as_ref().chars())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.len_utf8())
            .sum();
        prefix.truncate(len);
        if prefix.is_empty() {
            break;
        }
    }

    prefix
}
