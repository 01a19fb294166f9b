//! Helpers shared by unit tests.

use std::env;

/// RAII helper for temporarily setting environment variables
pub(crate) struct ScopedEnv {
    key: String,
    original: Option<String>,
}

impl ScopedEnv {
    pub(crate) fn set(key: &str, value: &str) -> Self {
        let original = env::var(key).ok();
        // SAFETY: only used in serial tests where no other threads
        // are accessing the environment concurrently
        unsafe {
            env::set_var(key, value);
        }
        Self {
            key: key.to_string(),
            original,
        }
    }

    pub(crate) fn remove(key: &str) -> Self {
        let original = env::var(key).ok();
        // SAFETY: only used in serial tests where no other threads
        // are accessing the environment concurrently
        unsafe {
            env::remove_var(key);
        }
        Self {
            key: key.to_string(),
            original,
        }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        // SAFETY: only used in serial tests where no other threads
        // are accessing the environment concurrently
        unsafe {
            match &self.original {
                Some(val) => env::set_var(&self.key, val),
                None => env::remove_var(&self.key),
            }
        }
    }
}
