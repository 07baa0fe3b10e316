//! Error types for binding environment variables

use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

/// Errors that can occur while binding environment variables into a value.
///
/// The first error met during the walk aborts the whole bind, so at most one
/// of these is ever reported for a call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The destination has no conversion rule.
    ///
    /// Occurs for sequences nested directly inside sequences or arrays
    /// (e.g. `Vec<Vec<String>>`), which cannot be split twice.
    #[error("unsupported type: {type_name}")]
    UnsupportedType {
        /// Fully qualified name of the destination type
        type_name: &'static str,
    },

    /// A `required` field has no environment value and no default.
    #[error("required field: {key}")]
    RequiredField {
        /// Fully resolved environment key, prefix included
        key: String,
    },

    /// Failed to convert the resolved string into the destination type.
    #[error("field {key:?} ({type_name}): {source}")]
    Bind {
        /// Fully resolved environment key
        key: String,
        /// Fully qualified name of the destination type
        type_name: &'static str,
        /// Underlying conversion failure
        #[source]
        source: ConvertError,
    },

    /// A tag contained a `key=value` part with an unknown key.
    #[error("unknown tag part {part:?} in tag {name:?} with value {tag:?}")]
    UnknownTagPart {
        /// The unrecognized key
        part: String,
        /// Name part of the tag being parsed
        name: String,
        /// The complete tag string
        tag: String,
    },

    /// An annotation passed to [`bind_value`](crate::bind_value) was not
    /// of the form `key=value`.
    #[error("invalid annotation {part:?}, expected key=value")]
    InvalidAnnotation {
        /// The offending annotation
        part: String,
    },

    /// Error returned by a custom unmarshal hook, passed through unchanged.
    ///
    /// Hooks are [`UnmarshalString`](crate::UnmarshalString) and
    /// [`UnmarshalText`](crate::UnmarshalText) implementations, including
    /// [`Json`](crate::Json). The hook's own error type can be recovered
    /// with `downcast_ref`.
    #[error(transparent)]
    Custom(#[from] anyhow::Error),

    /// Failed to load an environment file.
    #[error("failed to load environment file '{}': {source}", path.display())]
    Load {
        /// Path of the file that failed to load
        path: PathBuf,
        /// Underlying loader error
        source: dotenvy::Error,
    },
}

impl Error {
    pub(crate) fn bind(key: &str, type_name: &'static str, source: impl Into<ConvertError>) -> Self {
        Self::Bind {
            key: key.to_string(),
            type_name,
            source: source.into(),
        }
    }
}

/// Low-level conversion failures, wrapped by [`Error::Bind`].
///
/// Each variant names the leaf conversion that failed. The environment key
/// and destination type live on the enclosing [`Error::Bind`].
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Integer parsing failed, including out-of-range values such as `256`
    /// for a `u8`.
    #[error(transparent)]
    Int(#[from] ParseIntError),

    /// Floating point parsing failed.
    #[error(transparent)]
    Float(#[from] ParseFloatError),

    /// The string is not one of the accepted boolean spellings.
    #[error("invalid boolean {0:?}")]
    Bool(String),

    /// The string is not a duration literal (`1h30m`, `250ms`).
    ///
    /// Also raised for an empty string.
    #[error(transparent)]
    Duration(#[from] humantime::DurationError),

    /// The string does not match the field's `time_format`.
    #[error(transparent)]
    Time(#[from] chrono::ParseError),

    /// Epoch value outside the range `chrono` can represent.
    #[error("timestamp {0} is out of range")]
    Timestamp(i64),

    /// The `time_location` annotation names no known IANA time zone.
    #[error("unknown time zone {name:?}: {message}")]
    Location {
        /// Zone name as written in the annotation
        name: String,
        /// Reason reported by the zone database
        message: String,
    },

    /// Local time skipped by a zone transition.
    #[error("local time {0} does not exist in the selected time zone")]
    LocalTime(String),

    /// A fixed-length array received the wrong number of values.
    #[error("{values:?} is not a valid length for {type_name}")]
    Length {
        /// Values produced by splitting the resolved string
        values: Vec<String>,
        /// Fully qualified name of the array type
        type_name: &'static str,
    },
}
