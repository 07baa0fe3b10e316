//! Bind environment variables into typed configuration structs
//!
//! `envbind` walks a struct field by field, derives an environment key for
//! each one from a small per-field tag, and converts the value it finds into
//! the field's type.
//!
//! # Features
//!
//! - **Declarative**: `#[derive(Bind)]` with one `#[env("...")]` tag per field
//! - **Inferred keys**: untagged fields use their identifier in upper snake case
//! - **Nesting**: nested structs extend the key prefix (`DB_HOST`, `API_CORS_ORIGINS`)
//! - **Defaults and requiredness**: `default=...`, `required`, `skip_on_no_value`
//! - **Collections**: `Vec<T>` and `[T; N]` split on a separator
//! - **Rich values**: `Option<T>`, `Box<T>`, durations, `chrono` times, JSON,
//!   and custom unmarshal hooks
//!
//! # Example
//!
//! ```rust
//! use envbind::{Bind, FromEnv};
//!
//! #[derive(Debug, Default, Bind)]
//! struct Config {
//!     #[env("HOST,default=localhost")]
//!     pub host: String,
//!
//!     #[env(",required")]
//!     pub port: u16,
//!
//!     // Reads DB_URL, DB_POOL_SIZE
//!     #[env("DB")]
//!     pub db: Database,
//! }
//!
//! #[derive(Debug, Default, Bind)]
//! struct Database {
//!     pub url: String,
//!
//!     #[env(",default=10")]
//!     pub pool_size: u32,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! #     std::env::set_var("PORT", "8080");
//! #     std::env::set_var("DB_URL", "postgres://localhost/db");
//! #     let config = Config::from_env()?;
//! #     assert_eq!(config.host, "localhost");
//! #     assert_eq!(config.port, 8080);
//! #     assert_eq!(config.db.pool_size, 10);
//! #     Ok(())
//! # }
//! ```
//!
//! # Tags
//!
//! ```text
//! tag  := [name] ("," part)*
//! part := "required" | "require" | "req"
//!       | "skip_on_no_value" | "snv"
//!       | "default=" value
//!       | ("separator" | "sep") "=" value
//! ```
//!
//! The key of a field is `prefix + "_" + name`. When the name is empty it is
//! inferred from the field identifier (`allowed_origins` -> `ALLOWED_ORIGINS`).
//! A tag of `"-"` skips the field.
//!
//! When the key is not set the default is used. Without a default, `required`
//! fields fail, `skip_on_no_value` fields are left untouched, and every other
//! field is converted from the empty string, which yields the zero value for
//! numbers and booleans.
//!
//! ## Sequences
//!
//! `Vec<T>` and `[T; N]` split environment values on `,` and default values
//! on the tag's separator (a space unless `sep=` says otherwise).
//!
//! ```rust
//! let hosts: Vec<String> = envbind::get("MY_HOSTS,default=a.local|b.local,sep=|", &[])?;
//! assert_eq!(hosts, ["a.local", "b.local"]);
//! # Ok::<(), envbind::Error>(())
//! ```
//!
//! ## Time values
//!
//! Time fields read extra annotations next to the tag:
//!
//! ```rust
//! # use envbind::Bind;
//! #[derive(Default, Bind)]
//! struct Schedule {
//!     #[env("DEADLINE,default=23:59:59 2020-12-31", time_format = "%H:%M:%S %Y-%m-%d", time_utc = true)]
//!     pub deadline: chrono::DateTime<chrono::Utc>,
//!
//!     #[env(time_format = "unix")]
//!     pub started_at: chrono::DateTime<chrono::Utc>,
//!
//!     #[env(time_location = "Europe/Oslo")]
//!     pub maintenance: Option<chrono::DateTime<chrono::FixedOffset>>,
//! }
//! ```
//!
//! `time_format` accepts a `chrono` strftime pattern or one of `rfc3339`
//! (default), `rfc2822`, `unix` and `unixnano`.

mod convert;
mod error;
mod field;
mod format;
mod json;
mod load;
mod params;
mod source;
mod tag;
mod target;
mod walker;

pub use convert::{parse_bool, DEFAULT_TIME_FORMAT};
pub use envbind_derive::Bind;
pub use error::{ConvertError, Error};
pub use field::{Annotations, Field};
pub use format::format_key;
pub use json::Json;
pub use load::{load, must_load, Loader, DEFAULT_ENV_FILE};
pub use params::Params;
pub use source::{ProcessEnv, Source};
pub use tag::{Tag, DEFAULT_VALUE_SEPARATOR};
pub use target::{
    Bind, Fields, Number, Pointer, Sequence, Slot, Target, Timestamp, UnmarshalString,
    UnmarshalText,
};
pub use walker::{Outcome, Walker};

/// Root field of a bind: no identifier, no annotations.
const ROOT: Field<'static> = Field::new("", &[]);

/// Bind `value` from the process environment.
pub fn set_value<T: Bind + ?Sized>(value: &mut T, params: &Params) -> Result<(), Error> {
    set_value_from(value, params, &ProcessEnv)
}

/// Bind `value` from `source`.
pub fn set_value_from<T: Bind + ?Sized>(
    value: &mut T,
    params: &Params,
    source: &dyn Source,
) -> Result<(), Error> {
    Walker::new(params, source).field(value, &ROOT)?;
    Ok(())
}

/// Create a `T` and bind it from the process environment with default
/// parameters.
pub fn bind<T: Bind + Default>() -> Result<T, Error> {
    bind_with(&Params::default())
}

/// Create a `T` and bind it from the process environment.
pub fn bind_with<T: Bind + Default>(params: &Params) -> Result<T, Error> {
    bind_from(params, &ProcessEnv)
}

/// Create a `T` and bind it from `source`.
pub fn bind_from<T: Bind + Default>(params: &Params, source: &dyn Source) -> Result<T, Error> {
    let mut value = T::default();
    set_value_from(&mut value, params, source)?;
    Ok(value)
}

/// Like [`bind`], panicking on failure.
pub fn must_bind<T: Bind + Default>() -> T {
    bind().unwrap_or_else(|err| panic!("{err}"))
}

/// Like [`bind_with`], panicking on failure.
pub fn must_bind_with<T: Bind + Default>(params: &Params) -> T {
    bind_with(params).unwrap_or_else(|err| panic!("{err}"))
}

/// Bind a single value from the process environment.
///
/// `tag` is a field tag such as `"PORT,default=8080"`; `annotations` are extra
/// `key=value` annotations such as `"time_format=unix"`.
pub fn bind_value<T: Bind + ?Sized>(value: &mut T, tag: &str, annotations: &[&str]) -> Result<(), Error> {
    bind_value_from(value, tag, annotations, &ProcessEnv)
}

/// Bind a single value from `source`.
pub fn bind_value_from<T: Bind + ?Sized>(
    value: &mut T,
    tag: &str,
    annotations: &[&str],
    source: &dyn Source,
) -> Result<(), Error> {
    let mut pairs = annotations
        .iter()
        .map(|part| field::split_annotation(part))
        .collect::<Result<Vec<_>, _>>()?;
    pairs.push(("env", tag));

    let params = Params::default();
    Walker::new(&params, source).field(value, &Field::new("", &pairs))?;
    Ok(())
}

/// Create a `T` and bind it as a single value.
pub fn get<T: Bind + Default>(tag: &str, annotations: &[&str]) -> Result<T, Error> {
    let mut value = T::default();
    bind_value(&mut value, tag, annotations)?;
    Ok(value)
}

/// Like [`get`], panicking on failure.
pub fn must_get<T: Bind + Default>(tag: &str, annotations: &[&str]) -> T {
    get(tag, annotations).unwrap_or_else(|err| panic!("{err}"))
}

/// Shorthand for `must_get::<String>(tag, &[])`.
pub fn get_string(tag: &str) -> String {
    must_get(tag, &[])
}

/// Loading entry points for derived configuration structs.
pub trait FromEnv: Sized {
    /// Load from the process environment with default parameters.
    ///
    /// # Errors
    ///
    /// - Required environment variables are not set
    /// - Environment variable values cannot be converted into field types
    /// - A field tag is malformed
    fn from_env() -> Result<Self, Error>;

    /// Load from the process environment with `params`.
    fn from_env_with(params: &Params) -> Result<Self, Error>;
}

impl<T: Fields + Bind + Default> FromEnv for T {
    fn from_env() -> Result<Self, Error> {
        bind()
    }

    fn from_env_with(params: &Params) -> Result<Self, Error> {
        bind_with(params)
    }
}
