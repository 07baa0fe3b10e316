//! Loading `KEY=value` files into the process environment
//!
//! Variables that are already set are never overridden, so the first file
//! (or the real environment) that defines a key wins.

use std::path::{Path, PathBuf};

use crate::error::Error;

/// File used when no paths are given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Env-file loader.
#[derive(Debug, Clone)]
pub struct Loader {
    ignore_missing_file: bool,
}

impl Default for Loader {
    fn default() -> Self {
        Self {
            ignore_missing_file: true,
        }
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat files that do not exist as empty instead of failing.
    pub fn ignore_missing_file(mut self, ignore: bool) -> Self {
        self.ignore_missing_file = ignore;
        self
    }

    /// Load each file in order; an empty list loads [`DEFAULT_ENV_FILE`].
    pub fn load<P: AsRef<Path>>(&self, paths: &[P]) -> Result<(), Error> {
        if paths.is_empty() {
            return self.load_file(Path::new(DEFAULT_ENV_FILE));
        }
        for path in paths {
            self.load_file(path.as_ref())?;
        }
        Ok(())
    }

    /// Like [`Loader::load`], panicking on failure.
    pub fn must_load<P: AsRef<Path>>(&self, paths: &[P]) {
        if let Err(err) = self.load(paths) {
            panic!("{err}");
        }
    }

    fn load_file(&self, path: &Path) -> Result<(), Error> {
        match dotenvy::from_path(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "loaded environment file");
                Ok(())
            }
            Err(err) if self.ignore_missing_file && err.not_found() => {
                tracing::debug!(path = %path.display(), "environment file not found, ignoring");
                Ok(())
            }
            Err(source) => Err(Error::Load {
                path: PathBuf::from(path),
                source,
            }),
        }
    }
}

/// Load env files with the default [`Loader`].
pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<(), Error> {
    Loader::default().load(paths)
}

/// Load env files with the default [`Loader`], panicking on failure.
pub fn must_load<P: AsRef<Path>>(paths: &[P]) {
    Loader::default().must_load(paths)
}
