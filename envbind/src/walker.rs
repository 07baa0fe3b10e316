//! Recursive binding engine

use crate::convert;
use crate::error::{ConvertError, Error};
use crate::field::Field;
use crate::format::format_key;
use crate::params::Params;
use crate::source::Source;
use crate::tag::Tag;
use crate::target::{Bind, Slot, Target};

/// Result of binding a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A value was resolved and converted.
    Bound,
    /// The field was left untouched (`-` tag or `skip_on_no_value`).
    Skipped,
}

/// Walks a destination value, binding each field from a [`Source`].
///
/// A walker is scoped to one structure level; nested structures get their
/// own walker whose prefix is the parent field's resolved key.
pub struct Walker<'a> {
    params: &'a Params,
    source: &'a dyn Source,
    prefix: String,
}

/// Resolved string and where it came from.
#[derive(Debug, Clone, Copy)]
struct Resolved<'v> {
    text: &'v str,
    from_default: bool,
}

/// Per-field state shared by the dispatch and conversion steps.
struct FieldCx<'c> {
    field: &'c Field<'c>,
    tag: &'c Tag,
    key: &'c str,
}

impl<'a> Walker<'a> {
    pub fn new(params: &'a Params, source: &'a dyn Source) -> Self {
        Self {
            params,
            source,
            prefix: params.prefix.clone(),
        }
    }

    /// Key prefix of the current structure level.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn nested(&self, prefix: &str) -> Self {
        Self {
            params: self.params,
            source: self.source,
            prefix: prefix.to_string(),
        }
    }

    /// Bind `value` as the field described by `field`.
    pub fn field<T: Bind + ?Sized>(&self, value: &mut T, field: &Field<'_>) -> Result<Outcome, Error> {
        self.resolve(Slot::of(value), field)
    }

    fn resolve(&self, slot: Slot<'_>, field: &Field<'_>) -> Result<Outcome, Error> {
        let annotation = field.annotation(&self.params.annotation_key);
        if annotation == Some("-") {
            return Ok(Outcome::Skipped);
        }

        let mut tag = Tag::parse(annotation.unwrap_or_default())?;
        if tag.name.is_empty() {
            if self.params.auto_format {
                tag.name = format_key(field.ident());
            } else if annotation.is_none_or(str::is_empty) {
                tag.name = field.ident().to_string();
            }
        }
        tracing::trace!(field = field.ident(), annotations = %field.annotations(), %tag, "parsed tag");

        let key = self.params.join(&self.prefix, &tag.name);
        let found = if key.is_empty() {
            None
        } else {
            self.source.lookup(&key)
        };

        let value = match (&found, &tag.default) {
            (Some(value), _) => Resolved {
                text: value,
                from_default: false,
            },
            (None, Some(default)) => {
                tracing::debug!(%key, %default, "environment key not found, using default");
                Resolved {
                    text: default,
                    from_default: true,
                }
            }
            (None, None) if tag.required => return Err(Error::RequiredField { key }),
            (None, None) if tag.skip_on_no_value => {
                tracing::debug!(%key, "environment key not found, skipping");
                return Ok(Outcome::Skipped);
            }
            (None, None) => {
                tracing::debug!(%key, "environment key not found");
                Resolved {
                    text: "",
                    from_default: false,
                }
            }
        };

        let cx = FieldCx {
            field,
            tag: &tag,
            key: &key,
        };
        self.dispatch(slot, &cx, value)?;
        Ok(Outcome::Bound)
    }

    /// Split for sequences and arrays, convert anything else directly.
    fn dispatch(&self, slot: Slot<'_>, cx: &FieldCx<'_>, value: Resolved<'_>) -> Result<(), Error> {
        let Slot { type_name, target } = slot;
        match target {
            Target::Sequence(seq) => {
                let parts = self.split(cx, value);
                seq.fill(&parts, &mut |slot, part| self.convert(slot, cx, value.with_text(part)))
            }
            Target::Array(seq) => {
                let parts = self.split(cx, value);
                if parts.len() != seq.len() {
                    let source = ConvertError::Length {
                        values: parts.iter().map(|p| p.to_string()).collect(),
                        type_name,
                    };
                    return Err(Error::bind(cx.key, type_name, source));
                }
                seq.fill(&parts, &mut |slot, part| self.convert(slot, cx, value.with_text(part)))
            }
            target => self.convert(Slot { type_name, target }, cx, value),
        }
    }

    fn split<'v>(&self, cx: &FieldCx<'_>, value: Resolved<'v>) -> Vec<&'v str> {
        let separator = if value.from_default {
            &cx.tag.default_separator
        } else {
            &self.params.array_separator
        };
        if separator.is_empty() {
            // One element per character.
            return value.text.split_inclusive(|_: char| true).collect();
        }
        value.text.split(separator.as_str()).collect()
    }

    /// Type-directed conversion of a single string.
    fn convert(&self, slot: Slot<'_>, cx: &FieldCx<'_>, value: Resolved<'_>) -> Result<(), Error> {
        let Slot { type_name, target } = slot;
        let raw = value.text;
        let wrap = |source: ConvertError| Error::bind(cx.key, type_name, source);

        match target {
            Target::UnmarshalString(t) => t.unmarshal_string(raw).map_err(Error::Custom),
            Target::UnmarshalText(t) => t.unmarshal_text(raw.as_bytes()).map_err(Error::Custom),
            Target::Struct(fields) => fields.bind_fields(&self.nested(cx.key)),
            Target::Time(t) => {
                match convert::parse_time(raw, cx.field).map_err(wrap)? {
                    Some(time) => t.set_time(time),
                    None => t.set_zero(),
                }
                Ok(())
            }
            Target::Duration(d) => {
                *d = convert::parse_duration(raw).map_err(wrap)?;
                Ok(())
            }
            Target::Int(n) | Target::Uint(n) | Target::Float(n) => {
                if raw.is_empty() {
                    n.set_zero();
                    Ok(())
                } else {
                    n.parse_into(raw).map_err(wrap)
                }
            }
            Target::Bool(b) => {
                *b = !raw.is_empty() && convert::parse_bool(raw).map_err(wrap)?;
                Ok(())
            }
            Target::Str(s) => {
                raw.clone_into(s);
                Ok(())
            }
            Target::Pointer(p) => self.dispatch(p.pointee(), cx, value),
            Target::Sequence(_) | Target::Array(_) => Err(Error::UnsupportedType { type_name }),
        }
    }
}

impl Resolved<'_> {
    fn with_text<'t>(self, text: &'t str) -> Resolved<'t> {
        Resolved {
            text,
            from_default: self.from_default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Fields;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn bind<T: Bind + ?Sized>(value: &mut T, params: &Params, env: &HashMap<String, String>) -> Result<(), Error> {
        Walker::new(params, env).field(value, &Field::new("", &[]))?;
        Ok(())
    }

    #[derive(Debug, Default)]
    struct Account {
        test: String,
        port: u16,
        user_id: String,
    }

    impl Fields for Account {
        fn bind_fields(&mut self, walker: &Walker<'_>) -> Result<(), Error> {
            walker.field(&mut self.test, &Field::new("test", &[("env", "TEST")]))?;
            walker.field(&mut self.port, &Field::new("port", &[]))?;
            walker.field(&mut self.user_id, &Field::new("user_id", &[("env", ",required")]))?;
            Ok(())
        }
    }

    impl Bind for Account {
        fn target(&mut self) -> Target<'_> {
            Target::Struct(self)
        }
    }

    #[test]
    fn test_bind_struct() {
        let env = source(&[("TEST", "hello"), ("PORT", "8080"), ("USER_ID", "u-1")]);
        let mut account = Account::default();
        bind(&mut account, &Params::default(), &env).unwrap();

        assert_eq!(account.test, "hello");
        assert_eq!(account.port, 8080);
        assert_eq!(account.user_id, "u-1");
    }

    #[test]
    fn test_required_field_with_prefix() {
        let env = source(&[("APP_TEST", "hello")]);
        let mut account = Account::default();
        let err = bind(&mut account, &Params::default().with_prefix("APP"), &env).unwrap_err();

        assert!(matches!(&err, Error::RequiredField { key } if key == "APP_USER_ID"));
        // Fields before the failing one are already bound.
        assert_eq!(account.test, "hello");
    }

    #[test]
    fn test_missing_number_is_zero() {
        let env = source(&[("PORT", ""), ("USER_ID", "u-1")]);
        let mut account = Account {
            port: 42,
            ..Default::default()
        };
        bind(&mut account, &Params::default(), &env).unwrap();
        assert_eq!(account.port, 0);
    }

    #[test]
    fn test_convert_error_carries_key_and_type() {
        let env = source(&[("PORT", "eighty"), ("USER_ID", "u-1")]);
        let err = bind(&mut Account::default(), &Params::default(), &env).unwrap_err();

        match err {
            Error::Bind { key, type_name, source } => {
                assert_eq!(key, "PORT");
                assert_eq!(type_name, "u16");
                assert!(matches!(source, ConvertError::Int(_)));
            }
            other => panic!("expected Bind error, got {other:?}"),
        }
    }

    #[test]
    fn test_slice_default_with_separator() {
        let mut greetings: Vec<String> = Vec::new();
        let field = Field::new("", &[("env", "GREETINGS,default=hello world|welcome home,sep=|")]);
        let env = source(&[]);
        let params = Params::default();
        Walker::new(&params, &env).field(&mut greetings, &field).unwrap();
        assert_eq!(greetings, ["hello world", "welcome home"]);

        let env = source(&[("GREETINGS", "hi|there,bye")]);
        Walker::new(&params, &env).field(&mut greetings, &field).unwrap();
        assert_eq!(greetings, ["hi|there", "bye"]);
    }

    #[test]
    fn test_empty_value_splits_into_one_element() {
        let mut ports: Vec<u16> = vec![1, 2];
        let params = Params::default();
        let env = source(&[]);
        Walker::new(&params, &env)
            .field(&mut ports, &Field::new("ports", &[]))
            .unwrap();
        assert_eq!(ports, [0]);
    }

    #[test]
    fn test_pointer_allocation() {
        let params = Params::default();
        let env = source(&[("LIMIT", "5")]);
        let walker = Walker::new(&params, &env);

        let mut limit: Option<u32> = None;
        walker.field(&mut limit, &Field::new("limit", &[])).unwrap();
        assert_eq!(limit, Some(5));

        // Pointers are allocated even when the key is absent.
        let mut missing: Option<u32> = None;
        walker.field(&mut missing, &Field::new("missing", &[])).unwrap();
        assert_eq!(missing, Some(0));

        // ...unless the field asks to be skipped.
        let mut skipped: Option<u32> = None;
        let outcome = walker
            .field(&mut skipped, &Field::new("missing", &[("env", ",snv")]))
            .unwrap();
        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(skipped, None);
    }

    #[test]
    fn test_pointer_to_sequence() {
        let params = Params::default();
        let env = source(&[("HOSTS", "a,b")]);
        let mut hosts: Option<Box<Vec<String>>> = None;
        Walker::new(&params, &env)
            .field(&mut hosts, &Field::new("hosts", &[]))
            .unwrap();
        assert_eq!(hosts.map(|h| *h), Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_array_length_mismatch() {
        let params = Params::default();
        let env = source(&[("PAIR", "1,2,3")]);
        let mut pair = [7u8; 2];
        let err = Walker::new(&params, &env)
            .field(&mut pair, &Field::new("pair", &[]))
            .unwrap_err();

        match err {
            Error::Bind { key, source: ConvertError::Length { values, .. }, .. } => {
                assert_eq!(key, "PAIR");
                assert_eq!(values, ["1", "2", "3"]);
            }
            other => panic!("expected Length error, got {other:?}"),
        }
        assert_eq!(pair, [7, 7]);
    }

    #[test]
    fn test_array_fill() {
        let params = Params::default();
        let env = source(&[("PAIR", "1,2")]);
        let mut pair = [0u8; 2];
        Walker::new(&params, &env)
            .field(&mut pair, &Field::new("pair", &[]))
            .unwrap();
        assert_eq!(pair, [1, 2]);
    }

    #[test]
    fn test_nested_sequence_unsupported() {
        let params = Params::default();
        let env = source(&[("MATRIX", "1,2")]);
        let mut matrix: Vec<Vec<u8>> = Vec::new();
        let err = Walker::new(&params, &env)
            .field(&mut matrix, &Field::new("matrix", &[]))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { type_name } if type_name.contains("Vec<u8>")));
    }

    #[derive(Debug, Default)]
    struct Cors {
        origins: Vec<String>,
    }

    impl Fields for Cors {
        fn bind_fields(&mut self, walker: &Walker<'_>) -> Result<(), Error> {
            walker.field(&mut self.origins, &Field::new("origins", &[]))?;
            Ok(())
        }
    }

    impl Bind for Cors {
        fn target(&mut self) -> Target<'_> {
            Target::Struct(self)
        }
    }

    #[derive(Debug, Default)]
    struct Api {
        cors: Cors,
        debug: Cors,
        name: String,
        cache: String,
    }

    impl Fields for Api {
        fn bind_fields(&mut self, walker: &Walker<'_>) -> Result<(), Error> {
            walker.field(&mut self.cors, &Field::new("cors", &[]))?;
            walker.field(&mut self.debug, &Field::new("debug", &[("env", "DBG")]))?;
            walker.field(&mut self.name, &Field::new("name", &[]))?;
            walker.field(&mut self.cache, &Field::new("cache", &[("env", "-")]))?;
            Ok(())
        }
    }

    impl Bind for Api {
        fn target(&mut self) -> Target<'_> {
            Target::Struct(self)
        }
    }

    #[test]
    fn test_nested_prefix() {
        let env = source(&[
            ("API_CORS_ORIGINS", "a.com,b.com"),
            ("API_DBG_ORIGINS", "c.com"),
            ("API_NAME", "gateway"),
            ("API_CACHE", "ignored"),
        ]);
        let mut api = Api {
            cache: "preset".to_string(),
            ..Default::default()
        };
        bind(&mut api, &Params::default().with_prefix("API"), &env).unwrap();

        assert_eq!(api.cors.origins, ["a.com", "b.com"]);
        assert_eq!(api.debug.origins, ["c.com"]);
        // Siblings after a nested struct keep the parent's prefix.
        assert_eq!(api.name, "gateway");
        assert_eq!(api.cache, "preset");
    }

    #[test]
    fn test_auto_format_off() {
        let env = source(&[("user_id", "raw"), ("USER_ID", "formatted")]);
        let params = Params::default().with_auto_format(false);
        let walker = Walker::new(&params, &env);

        let mut user_id = String::new();
        walker.field(&mut user_id, &Field::new("user_id", &[])).unwrap();
        assert_eq!(user_id, "raw");

        // An explicit tag without a name yields no key of its own.
        let mut other = String::from("x");
        walker
            .field(&mut other, &Field::new("user_id", &[("env", ",default=d")]))
            .unwrap();
        assert_eq!(other, "d");
    }

    #[test]
    fn test_auto_format_off_empty_tag_uses_identifier() {
        let env = source(&[("user_id", "raw")]);
        let params = Params::default().with_auto_format(false);
        let mut user_id = String::new();
        Walker::new(&params, &env)
            .field(&mut user_id, &Field::new("user_id", &[("env", "")]))
            .unwrap();
        assert_eq!(user_id, "raw");
    }

    #[test]
    fn test_empty_separator_splits_characters() {
        let params = Params::default();
        let env = source(&[]);
        let mut digits: Vec<u8> = Vec::new();
        Walker::new(&params, &env)
            .field(&mut digits, &Field::new("", &[("env", "DIGITS,default=123,sep=")]))
            .unwrap();
        assert_eq!(digits, [1, 2, 3]);

        let params = Params::default().with_array_separator("");
        let env = source(&[("LETTERS", "aé")]);
        let mut letters: Vec<String> = Vec::new();
        Walker::new(&params, &env)
            .field(&mut letters, &Field::new("letters", &[]))
            .unwrap();
        assert_eq!(letters, ["a", "é"]);
    }

    #[derive(Debug, Default)]
    struct Db {
        hosts: Vec<String>,
    }

    impl Fields for Db {
        fn bind_fields(&mut self, walker: &Walker<'_>) -> Result<(), Error> {
            walker.field(&mut self.hosts, &Field::new("hosts", &[]))?;
            Ok(())
        }
    }

    impl Bind for Db {
        fn target(&mut self) -> Target<'_> {
            Target::Struct(self)
        }
    }

    #[derive(Debug, Default)]
    struct Service {
        db: Db,
        tags: Vec<String>,
    }

    impl Fields for Service {
        fn bind_fields(&mut self, walker: &Walker<'_>) -> Result<(), Error> {
            walker.field(&mut self.db, &Field::new("db", &[]))?;
            walker.field(&mut self.tags, &Field::new("tags", &[("env", ",default=x y")]))?;
            Ok(())
        }
    }

    impl Bind for Service {
        fn target(&mut self) -> Target<'_> {
            Target::Struct(self)
        }
    }

    #[test]
    fn test_separator_overrides() {
        let env = source(&[("APP__DB__HOSTS", "a;b"), ("APP_DB_HOSTS", "wrong")]);
        let params = Params::default()
            .with_prefix("APP")
            .with_separator("__")
            .with_array_separator(";");
        let mut service = Service::default();
        bind(&mut service, &params, &env).unwrap();

        assert_eq!(service.db.hosts, ["a", "b"]);
        // Defaults still split on the tag's own separator.
        assert_eq!(service.tags, ["x", "y"]);
    }

    #[test]
    fn test_annotation_key_override() {
        let env = source(&[("HTTP_PORT", "80"), ("PORT", "8080")]);
        let params = Params::default().with_annotation_key("conf");
        let mut port = 0u16;
        Walker::new(&params, &env)
            .field(&mut port, &Field::new("port", &[("env", "PORT"), ("conf", "HTTP_PORT")]))
            .unwrap();
        assert_eq!(port, 80);
    }

    #[test]
    fn test_unknown_tag_part() {
        let params = Params::default();
        let env = source(&[]);
        let mut value = String::new();
        let err = Walker::new(&params, &env)
            .field(&mut value, &Field::new("value", &[("env", "VALUE,deafult=x")]))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownTagPart { part, .. } if part == "deafult"));
    }

    #[test]
    fn test_skip_leaves_value_untouched() {
        let params = Params::default();
        let env = source(&[]);
        let mut value = String::from("preset");
        let outcome = Walker::new(&params, &env)
            .field(&mut value, &Field::new("value", &[("env", ",skip_on_no_value")]))
            .unwrap();
        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(value, "preset");
    }

    #[test]
    fn test_empty_key_is_not_looked_up() {
        let params = Params::default();
        let env = source(&[("", "surprise")]);
        let mut value = String::new();
        Walker::new(&params, &env)
            .field(&mut value, &Field::new("", &[]))
            .unwrap();
        assert_eq!(value, "");
    }

    #[test]
    fn test_bool_and_duration() {
        let params = Params::default();
        let env = source(&[("DEBUG", "yes"), ("TIMEOUT", "1m 30s")]);
        let walker = Walker::new(&params, &env);

        let mut debug = false;
        walker.field(&mut debug, &Field::new("debug", &[])).unwrap();
        assert!(debug);

        let mut timeout = std::time::Duration::ZERO;
        walker.field(&mut timeout, &Field::new("timeout", &[])).unwrap();
        assert_eq!(timeout, std::time::Duration::from_secs(90));

        let mut missing = true;
        walker.field(&mut missing, &Field::new("verbose", &[])).unwrap();
        assert!(!missing);
    }
}
