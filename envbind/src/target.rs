//! Shape classification of bindable values
//!
//! Every bindable type implements [`Bind`], which hands the walker a mutable
//! view of itself tagged with its shape. The walker picks one conversion per
//! [`Target`] variant.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};

use crate::error::{ConvertError, Error};
use crate::walker::Walker;

/// A value that can be populated from environment strings.
///
/// Structs get an implementation from `#[derive(Bind)]`. Custom scalar types
/// implement [`UnmarshalString`] or [`UnmarshalText`] and return the matching
/// variant:
///
/// ```
/// use envbind::{Bind, Target, UnmarshalString};
///
/// #[derive(Debug, Default)]
/// struct Shout(String);
///
/// impl UnmarshalString for Shout {
///     fn unmarshal_string(&mut self, value: &str) -> anyhow::Result<()> {
///         self.0 = format!("{value}!");
///         Ok(())
///     }
/// }
///
/// impl Bind for Shout {
///     fn target(&mut self) -> Target<'_> {
///         Target::UnmarshalString(self)
///     }
/// }
/// ```
pub trait Bind {
    fn target(&mut self) -> Target<'_>;
}

/// Mutable view of a value, tagged with its shape.
///
/// Variants are checked in declaration order by the walker, so a type that
/// implements a custom hook is never treated as one of the built-in shapes.
pub enum Target<'a> {
    /// Custom conversion from the resolved string. Errors are returned
    /// unchanged as [`Error::Custom`].
    UnmarshalString(&'a mut dyn UnmarshalString),
    /// Custom conversion from the bytes of the resolved string.
    UnmarshalText(&'a mut dyn UnmarshalText),
    /// Nested structure; its fields are bound with the field's resolved key
    /// as prefix.
    Struct(&'a mut dyn Fields),
    /// Time value read according to the `time_*` annotations. An empty
    /// string sets the Unix epoch.
    Time(&'a mut dyn Timestamp),
    /// Duration literal such as `1h30m`. An empty string is an error.
    Duration(&'a mut Duration),
    /// Signed integer, zero when the string is empty.
    Int(&'a mut dyn Number),
    /// Unsigned integer, zero when the string is empty.
    Uint(&'a mut dyn Number),
    /// Floating point number, zero when the string is empty.
    Float(&'a mut dyn Number),
    /// Boolean, `false` when the string is empty.
    Bool(&'a mut bool),
    /// String, assigned as is.
    Str(&'a mut String),
    /// `Option<T>` or `Box<T>`; the pointee is allocated and bound from the
    /// same string.
    Pointer(&'a mut dyn Pointer),
    /// Variable length sequence, replaced as a whole on success.
    Sequence(&'a mut dyn Sequence),
    /// Fixed length array; the number of values must match its length.
    Array(&'a mut dyn Sequence),
}

/// A [`Target`] together with the name of the type it was taken from.
pub struct Slot<'a> {
    pub type_name: &'static str,
    pub target: Target<'a>,
}

impl<'a> Slot<'a> {
    pub fn of<T: Bind + ?Sized>(value: &'a mut T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            target: value.target(),
        }
    }
}

/// Custom conversion from the resolved string.
pub trait UnmarshalString {
    fn unmarshal_string(&mut self, value: &str) -> anyhow::Result<()>;
}

/// Custom conversion from the bytes of the resolved string.
pub trait UnmarshalText {
    fn unmarshal_text(&mut self, text: &[u8]) -> anyhow::Result<()>;
}

/// Field schema of a struct, generated by `#[derive(Bind)]`.
///
/// Implementations call [`Walker::field`] once per field, in declaration
/// order, and stop at the first error.
pub trait Fields {
    fn bind_fields(&mut self, walker: &Walker<'_>) -> Result<(), Error>;
}

/// Numeric scalar.
pub trait Number {
    fn parse_into(&mut self, text: &str) -> Result<(), ConvertError>;
    fn set_zero(&mut self);
}

/// Time value.
pub trait Timestamp {
    fn set_time(&mut self, time: DateTime<FixedOffset>);
    fn set_zero(&mut self);
}

/// Optional or boxed value whose storage is allocated on demand.
pub trait Pointer {
    /// Pointee, allocated with its default value if absent.
    fn pointee(&mut self) -> Slot<'_>;
}

/// Sequence of bindable elements.
pub trait Sequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Populate from one string per element, converting each with `convert`.
    ///
    /// Variable length sequences are replaced as a whole once every element
    /// converted. Fixed length arrays are filled in place and expect
    /// `parts.len()` to match their length.
    fn fill(
        &mut self,
        parts: &[&str],
        convert: &mut dyn FnMut(Slot<'_>, &str) -> Result<(), Error>,
    ) -> Result<(), Error>;
}

macro_rules! impl_number {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl Number for $ty {
                fn parse_into(&mut self, text: &str) -> Result<(), ConvertError> {
                    *self = text.parse::<$ty>()?;
                    Ok(())
                }

                fn set_zero(&mut self) {
                    *self = <$ty>::default();
                }
            }

            impl Bind for $ty {
                fn target(&mut self) -> Target<'_> {
                    Target::$variant(self)
                }
            }
        )*
    };
}

impl_number!(Int: i8, i16, i32, i64, i128, isize);
impl_number!(Uint: u8, u16, u32, u64, u128, usize);
impl_number!(Float: f32, f64);

impl Bind for bool {
    fn target(&mut self) -> Target<'_> {
        Target::Bool(self)
    }
}

impl Bind for String {
    fn target(&mut self) -> Target<'_> {
        Target::Str(self)
    }
}

impl Bind for Duration {
    fn target(&mut self) -> Target<'_> {
        Target::Duration(self)
    }
}

impl Timestamp for DateTime<FixedOffset> {
    fn set_time(&mut self, time: DateTime<FixedOffset>) {
        *self = time;
    }

    fn set_zero(&mut self) {
        *self = DateTime::<Utc>::UNIX_EPOCH.fixed_offset();
    }
}

impl Timestamp for DateTime<Utc> {
    fn set_time(&mut self, time: DateTime<FixedOffset>) {
        *self = time.with_timezone(&Utc);
    }

    fn set_zero(&mut self) {
        *self = DateTime::<Utc>::UNIX_EPOCH;
    }
}

impl Timestamp for DateTime<Local> {
    fn set_time(&mut self, time: DateTime<FixedOffset>) {
        *self = time.with_timezone(&Local);
    }

    fn set_zero(&mut self) {
        *self = DateTime::<Utc>::UNIX_EPOCH.with_timezone(&Local);
    }
}

impl Timestamp for NaiveDateTime {
    fn set_time(&mut self, time: DateTime<FixedOffset>) {
        *self = time.naive_local();
    }

    fn set_zero(&mut self) {
        *self = DateTime::<Utc>::UNIX_EPOCH.naive_utc();
    }
}

macro_rules! impl_time {
    ($($ty:ty),*) => {
        $(
            impl Bind for $ty {
                fn target(&mut self) -> Target<'_> {
                    Target::Time(self)
                }
            }
        )*
    };
}

impl_time!(
    DateTime<FixedOffset>,
    DateTime<Utc>,
    DateTime<Local>,
    NaiveDateTime
);

impl<T: Bind + Default> Pointer for Option<T> {
    fn pointee(&mut self) -> Slot<'_> {
        Slot::of(self.get_or_insert_with(T::default))
    }
}

impl<T: Bind + Default> Bind for Option<T> {
    fn target(&mut self) -> Target<'_> {
        Target::Pointer(self)
    }
}

impl<T: Bind + ?Sized> Pointer for Box<T> {
    fn pointee(&mut self) -> Slot<'_> {
        Slot::of(&mut **self)
    }
}

impl<T: Bind + ?Sized> Bind for Box<T> {
    fn target(&mut self) -> Target<'_> {
        Target::Pointer(self)
    }
}

impl<T: Bind + Default> Sequence for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn fill(
        &mut self,
        parts: &[&str],
        convert: &mut dyn FnMut(Slot<'_>, &str) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let mut items = Vec::with_capacity(parts.len());
        for part in parts {
            let mut item = T::default();
            convert(Slot::of(&mut item), part)?;
            items.push(item);
        }
        *self = items;
        Ok(())
    }
}

impl<T: Bind + Default> Bind for Vec<T> {
    fn target(&mut self) -> Target<'_> {
        Target::Sequence(self)
    }
}

impl<T: Bind, const N: usize> Sequence for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn fill(
        &mut self,
        parts: &[&str],
        convert: &mut dyn FnMut(Slot<'_>, &str) -> Result<(), Error>,
    ) -> Result<(), Error> {
        for (item, part) in self.iter_mut().zip(parts) {
            convert(Slot::of(item), part)?;
        }
        Ok(())
    }
}

impl<T: Bind, const N: usize> Bind for [T; N] {
    fn target(&mut self) -> Target<'_> {
        Target::Array(self)
    }
}

macro_rules! impl_from_str {
    ($($ty:ty),*) => {
        $(
            impl UnmarshalString for $ty {
                fn unmarshal_string(&mut self, value: &str) -> anyhow::Result<()> {
                    *self = value.parse()?;
                    Ok(())
                }
            }

            impl Bind for $ty {
                fn target(&mut self) -> Target<'_> {
                    Target::UnmarshalString(self)
                }
            }
        )*
    };
}

impl_from_str!(PathBuf, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);
