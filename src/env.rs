//! Environment variable abstraction for testability.
//!
//! Resolvers read the configuration search path through [`Env`] rather than
//! [`std::env`] directly. Production code uses [`Env::real()`]; tests use
//! [`Env::mock()`] so they never have to mutate the process environment.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable reader.
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, OsString>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<OsString>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up a variable without requiring it to be valid Unicode.
    pub fn var_os(&self, name: &str) -> Option<OsString> {
        match &self.overrides {
            Some(map) => map.get(name).cloned(),
            None => std::env::var_os(name),
        }
    }

    /// Read a platform path list (`:`-separated on Unix, `;` on Windows).
    ///
    /// Empty segments are dropped. A missing variable yields an empty list.
    pub fn paths(&self, name: &str) -> Vec<PathBuf> {
        match self.var_os(name) {
            Some(value) => std::env::split_paths(&value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            None => Vec::new(),
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}
