//! Field descriptors
//!
//! A [`Field`] is what the derive macro emits for every struct field: the
//! field's identifier plus its annotations, a list of `key -> value` pairs.
//! The main tag lives under the walker's annotation key (`env` by default);
//! time fields additionally read `time_format`, `time_utc` and
//! `time_location`.

use std::fmt;

use crate::error::Error;

/// Identifier and annotations of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    ident: &'a str,
    annotations: &'a [(&'a str, &'a str)],
}

impl<'a> Field<'a> {
    pub const fn new(ident: &'a str, annotations: &'a [(&'a str, &'a str)]) -> Self {
        Self { ident, annotations }
    }

    /// Field identifier, used to infer a key when the tag has no name.
    pub fn ident(&self) -> &'a str {
        self.ident
    }

    /// First annotation stored under `key`.
    pub fn annotation(&self, key: &str) -> Option<&'a str> {
        self.annotations
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    pub fn annotations(&self) -> Annotations<'a> {
        Annotations(self.annotations)
    }
}

/// Display adapter rendering annotations as `key:"value"` pairs.
#[derive(Debug, Clone, Copy)]
pub struct Annotations<'a>(&'a [(&'a str, &'a str)]);

impl fmt::Display for Annotations<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}:{value:?}")?;
        }
        Ok(())
    }
}

/// Split a `key=value` annotation.
pub(crate) fn split_annotation(part: &str) -> Result<(&str, &str), Error> {
    part.split_once('=').ok_or_else(|| Error::InvalidAnnotation {
        part: part.to_string(),
    })
}
