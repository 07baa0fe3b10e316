//! Tag descriptor parsing
//!
//! A tag is the per-field annotation string, e.g. `"PORT,default=8080,required"`:
//!
//! ```text
//! tag  := [name] ("," part)*
//! part := "required" | "require" | "req"
//!       | "skip_on_no_value" | "snv"
//!       | "default=" value
//!       | ("separator" | "sep") "=" value
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Separator used to split a default value for sequences and arrays.
pub const DEFAULT_VALUE_SEPARATOR: &str = " ";

/// Parsed tag descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Explicit key segment, empty when the key should be inferred.
    pub name: String,
    /// Value used when the environment has none.
    pub default: Option<String>,
    /// Fail when neither the environment nor a default supplies a value.
    pub required: bool,
    /// Leave the field untouched when neither the environment nor a default
    /// supplies a value.
    pub skip_on_no_value: bool,
    /// Separator for splitting `default` into sequence elements.
    pub default_separator: String,
}

impl Default for Tag {
    fn default() -> Self {
        Self {
            name: String::new(),
            default: None,
            required: false,
            skip_on_no_value: false,
            default_separator: DEFAULT_VALUE_SEPARATOR.to_string(),
        }
    }
}

impl Tag {
    /// Parse a tag string.
    ///
    /// Unknown bare words are ignored; unknown `key=value` parts are an
    /// [`Error::UnknownTagPart`].
    pub fn parse(s: &str) -> Result<Self, Error> {
        let mut tag = Self::default();
        if s.is_empty() {
            return Ok(tag);
        }

        let mut parts = s.split(',');
        tag.name = parts.next().unwrap_or_default().to_string();

        for part in parts {
            match part {
                "required" | "require" | "req" => tag.required = true,
                "skip_on_no_value" | "snv" => tag.skip_on_no_value = true,
                _ => {
                    let Some((key, value)) = part.split_once('=') else {
                        continue;
                    };
                    match key {
                        "default" => {
                            tag.default = (!value.is_empty()).then(|| value.to_string());
                        }
                        "separator" | "sep" => tag.default_separator = value.to_string(),
                        _ => {
                            return Err(Error::UnknownTagPart {
                                part: key.to_string(),
                                name: tag.name,
                                tag: s.to_string(),
                            })
                        }
                    }
                }
            }
        }

        Ok(tag)
    }

    /// Encode the descriptor back into tag syntax.
    pub fn encode(&self) -> String {
        let mut parts = vec![self.name.clone()];
        if self.required {
            parts.push("required".to_string());
        }
        if self.skip_on_no_value {
            parts.push("skip_on_no_value".to_string());
        }
        if let Some(default) = &self.default {
            parts.push(format!("default={default}"));
        }
        parts.push(format!("separator={}", self.default_separator));
        parts.join(",")
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
