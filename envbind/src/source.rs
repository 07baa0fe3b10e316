//! Environment value providers

use std::collections::HashMap;
use std::env;
use std::hash::BuildHasher;

/// Key/value store consulted for every resolved key.
pub trait Source {
    /// Look up the value stored under `key`.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Source for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                tracing::debug!(key, "ignoring non-unicode environment value");
                None
            }
        }
    }
}

impl<S: BuildHasher> Source for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<T: Source + ?Sized> Source for &T {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}
