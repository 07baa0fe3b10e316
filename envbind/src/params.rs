//! Binding parameters

/// Parameters threaded through a bind call.
///
/// Start from [`Params::default`] and override with the `with_*` builders;
/// later calls override earlier ones.
///
/// ```
/// let params = envbind::Params::default()
///     .with_prefix("APP")
///     .with_array_separator(";");
/// assert_eq!(params.separator, "_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    /// Key prefix for top-level fields.
    pub prefix: String,
    /// Joins prefix and key segments.
    pub separator: String,
    /// Annotation key holding each field's tag.
    pub annotation_key: String,
    /// Splits environment values for sequences and arrays.
    pub array_separator: String,
    /// Derive a key from the field identifier when the tag has no name.
    pub auto_format: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            separator: "_".to_string(),
            annotation_key: "env".to_string(),
            array_separator: ",".to_string(),
            auto_format: true,
        }
    }
}

impl Params {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_annotation_key(mut self, key: impl Into<String>) -> Self {
        self.annotation_key = key.into();
        self
    }

    pub fn with_array_separator(mut self, separator: impl Into<String>) -> Self {
        self.array_separator = separator.into();
        self
    }

    pub fn with_auto_format(mut self, auto_format: bool) -> Self {
        self.auto_format = auto_format;
        self
    }

    /// Join `prefix` and `name` with the configured separator.
    pub(crate) fn join(&self, prefix: &str, name: &str) -> String {
        match (prefix.is_empty(), name.is_empty()) {
            (_, true) => prefix.to_string(),
            (true, false) => name.to_string(),
            (false, false) => format!("{prefix}{}{name}", self.separator),
        }
    }
}
