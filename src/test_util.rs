// src/test_util.rs
// Shared helpers for tests that touch process-wide state.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

static PROCESS_LOCK: Mutex<()> = Mutex::new(());

/// Serialises tests that swap the process's standard descriptors.
pub fn lock_process() -> MutexGuard<'static, ()> {
    PROCESS_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Holds the working-directory lock and puts the directory back on drop.
pub struct CwdGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

pub fn lock_cwd() -> CwdGuard {
    let lock = lock_process();
    let original = std::env::current_dir().unwrap();
    CwdGuard { original, _lock: lock }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}
