//! Environment isolation for unit tests that read `LLMCOST_*` variables

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Exclusive access to the process environment for one test
///
/// Holds a process-wide lock for its lifetime and puts back every variable it
/// touched when dropped.
pub struct EnvScope {
    saved: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvScope {
    pub fn lock() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Self {
            saved: Vec::new(),
            _lock: lock,
        }
    }

    pub fn set(&mut self, key: &'static str, value: &str) {
        self.saved.push((key, env::var_os(key)));
        // SAFETY: ENV_LOCK serializes every test that touches the environment
        unsafe { env::set_var(key, value) };
    }

    pub fn remove(&mut self, key: &'static str) {
        self.saved.push((key, env::var_os(key)));
        // SAFETY: see `set`
        unsafe { env::remove_var(key) };
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        while let Some((key, original)) = self.saved.pop() {
            // SAFETY: the lock is still held until `_lock` drops after this
            unsafe {
                match original {
                    Some(value) => env::set_var(key, value),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
