//! Scoped process environment overrides.

use std::ffi::{OsStr, OsString};

use tracing::debug;

/// Overrides process environment variables and restores the previous values
/// when dropped, including on early returns and error propagation.
///
/// devbox is single-threaded, so mutating the process environment while the
/// guard is alive cannot race with other readers.
#[derive(Debug, Default)]
pub struct EnvGuard {
    saved: Vec<(OsString, Option<OsString>)>,
}

impl EnvGuard {
    /// Create a guard that has not overridden anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, remembering the value it had before.
    #[allow(unsafe_code)]
    #[must_use]
    pub fn set(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        let key = key.as_ref().to_os_string();
        let previous = std::env::var_os(&key);
        debug!(key = %key.to_string_lossy(), "Overriding environment variable");
        // SAFETY: single-threaded; restored in Drop.
        unsafe {
            std::env::set_var(&key, value);
        }
        self.saved.push((key, previous));
        self
    }
}

#[allow(unsafe_code)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        // Restore in reverse so a key set twice ends up at its original value.
        while let Some((key, previous)) = self.saved.pop() {
            match previous {
                Some(value) => unsafe {
                    std::env::set_var(&key, value);
                },
                None => unsafe {
                    std::env::remove_var(&key);
                },
            }
        }
    }
}
