//! The closed set of value kinds the codec understands.
//!
//! Every Rust type that can be stored in a configuration document maps onto
//! exactly one [`ValueKind`].  Encoding produces a [`Value`] (a tagged union
//! over those kinds); the text codec in [`super::text`] then turns that
//! union into its canonical string with one function per variant.
//!
//! Decoding runs the other way: the caller's target type names its kind via
//! [`DecodeValue::kind`], the text codec parses the string into a [`Value`]
//! of that kind, and [`DecodeValue::from_value`] narrows it to the concrete
//! type (for example, checking that an `i64` fits in an `i16`).
//!
//! Anything outside the closed set goes through the [`Json`] wrapper, which
//! stores the payload as compact JSON text.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ── Kinds ─────────────────────────────────────────────────────────────────────

/// Bit width of an integer kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    /// Number of bits in this width.
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }
}

/// The kind a stored string is decoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A fieldless enumeration identified by its type name.
    Enum(&'static str),
    Text,
    Bool,
    Signed(IntWidth),
    Unsigned(IntWidth),
    Float32,
    Float64,
    Date,
    DateTime,
    Duration,
    /// Structured fallback, identified by the Rust type name.
    Json(&'static str),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Enum(name) => write!(f, "enum {name}"),
            ValueKind::Text => f.write_str("text"),
            ValueKind::Bool => f.write_str("bool"),
            ValueKind::Signed(w) => write!(f, "i{}", w.bits()),
            ValueKind::Unsigned(w) => write!(f, "u{}", w.bits()),
            ValueKind::Float32 => f.write_str("f32"),
            ValueKind::Float64 => f.write_str("f64"),
            ValueKind::Date => f.write_str("date"),
            ValueKind::DateTime => f.write_str("date-time"),
            ValueKind::Duration => f.write_str("duration"),
            ValueKind::Json(name) => write!(f, "json {name}"),
        }
    }
}

// ── Values ────────────────────────────────────────────────────────────────────

/// A typed value on its way to or from text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value; encodes as the empty string.
    Null,
    /// Symbolic enumeration label.
    Enum(String),
    Text(String),
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Float32(f32),
    Float64(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Duration(TimeDelta),
    Json(serde_json::Value),
}

/// Types that can be written into a configuration entry.
pub trait EncodeValue {
    fn to_value(&self) -> Value;
}

/// Types that can be read back out of a configuration entry.
pub trait DecodeValue: Sized {
    /// The kind the stored text is parsed as.
    fn kind() -> ValueKind;

    /// Narrows a parsed value to `Self`.  `None` means the value does not
    /// fit (wrong variant, out of range, unknown label).
    fn from_value(value: Value) -> Option<Self>;
}

impl<T: EncodeValue + ?Sized> EncodeValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

// ── Primitive impls ───────────────────────────────────────────────────────────

macro_rules! signed_value {
    ($($ty:ty => $width:expr),* $(,)?) => {$(
        impl EncodeValue for $ty {
            fn to_value(&self) -> Value {
                Value::Signed(i64::from(*self))
            }
        }

        impl DecodeValue for $ty {
            fn kind() -> ValueKind {
                ValueKind::Signed($width)
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::Signed(n) => <$ty>::try_from(n).ok(),
                    _ => None,
                }
            }
        }
    )*};
}

macro_rules! unsigned_value {
    ($($ty:ty => $width:expr),* $(,)?) => {$(
        impl EncodeValue for $ty {
            fn to_value(&self) -> Value {
                Value::Unsigned(u64::from(*self))
            }
        }

        impl DecodeValue for $ty {
            fn kind() -> ValueKind {
                ValueKind::Unsigned($width)
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::Unsigned(n) => <$ty>::try_from(n).ok(),
                    _ => None,
                }
            }
        }
    )*};
}

signed_value!(i8 => IntWidth::W8, i16 => IntWidth::W16, i32 => IntWidth::W32, i64 => IntWidth::W64);
unsigned_value!(u8 => IntWidth::W8, u16 => IntWidth::W16, u32 => IntWidth::W32, u64 => IntWidth::W64);

/// Implements both codec traits for a type that maps 1:1 onto a variant.
macro_rules! simple_value {
    ($ty:ty, $kind:expr, $variant:ident) => {
        impl EncodeValue for $ty {
            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }
        }

        impl DecodeValue for $ty {
            fn kind() -> ValueKind {
                $kind
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

simple_value!(bool, ValueKind::Bool, Bool);
simple_value!(f32, ValueKind::Float32, Float32);
simple_value!(f64, ValueKind::Float64, Float64);
simple_value!(String, ValueKind::Text, Text);
simple_value!(NaiveDate, ValueKind::Date, Date);
simple_value!(NaiveDateTime, ValueKind::DateTime, DateTime);
simple_value!(TimeDelta, ValueKind::Duration, Duration);

impl EncodeValue for str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl EncodeValue for std::time::Duration {
    fn to_value(&self) -> Value {
        Value::Duration(TimeDelta::from_std(*self).unwrap_or(TimeDelta::MAX))
    }
}

impl DecodeValue for std::time::Duration {
    fn kind() -> ValueKind {
        ValueKind::Duration
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            // Negative spans have no std representation.
            Value::Duration(delta) => delta.to_std().ok(),
            _ => None,
        }
    }
}

impl<T: EncodeValue> EncodeValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: DecodeValue> DecodeValue for Option<T> {
    fn kind() -> ValueKind {
        T::kind()
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

// ── Structured fallback ───────────────────────────────────────────────────────

/// Wraps any serde type so it is stored as compact JSON text.
///
/// ```rust
/// use modcfg_core::codec::{decode, encode, Json};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
/// struct Spawn { x: i32, y: i32 }
///
/// let text = encode(&Json(Spawn { x: 1, y: 2 }));
/// assert_eq!(text, r#"{"x":1,"y":2}"#);
/// let back: Json<Spawn> = decode(&text).unwrap();
/// assert_eq!(back.0, Spawn { x: 1, y: 2 });
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Json<T>(pub T);

impl<T: Serialize> EncodeValue for Json<T> {
    fn to_value(&self) -> Value {
        match serde_json::to_value(&self.0) {
            Ok(json) => Value::Json(json),
            Err(e) => {
                tracing::warn!(
                    "cannot encode {} as JSON, storing empty value: {e}",
                    std::any::type_name::<T>()
                );
                Value::Null
            }
        }
    }
}

impl<T: DeserializeOwned> DecodeValue for Json<T> {
    fn kind() -> ValueKind {
        ValueKind::Json(std::any::type_name::<T>())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Json(json) => serde_json::from_value(json).ok().map(Json),
            _ => None,
        }
    }
}

// ── Enumerations ──────────────────────────────────────────────────────────────

/// Declares a fieldless enum whose values are stored by variant name.
///
/// Decoding matches the name case-insensitively; an unknown name is an
/// `InvalidValueFormat` error.
///
/// ```rust
/// use modcfg_core::config_enum;
/// use modcfg_core::codec::{decode, encode};
///
/// config_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq, Default)]
///     pub enum Difficulty {
///         #[default]
///         Easy,
///         Hard,
///     }
/// }
///
/// assert_eq!(encode(&Difficulty::Hard), "Hard");
/// assert_eq!(decode::<Difficulty>("hard").unwrap(), Difficulty::Hard);
/// assert!(decode::<Difficulty>("Nightmare").is_err());
/// ```
#[macro_export]
macro_rules! config_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// The label this variant is stored under.
            pub fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant) ),+
                }
            }
        }

        impl $crate::codec::EncodeValue for $name {
            fn to_value(&self) -> $crate::codec::Value {
                $crate::codec::Value::Enum(self.label().to_string())
            }
        }

        impl $crate::codec::DecodeValue for $name {
            fn kind() -> $crate::codec::ValueKind {
                $crate::codec::ValueKind::Enum(stringify!($name))
            }

            fn from_value(value: $crate::codec::Value) -> Option<Self> {
                let label = match value {
                    $crate::codec::Value::Enum(label) => label,
                    _ => return None,
                };
                $(
                    if label.eq_ignore_ascii_case(stringify!($variant)) {
                        return Some($name::$variant);
                    }
                )+
                None
            }
        }
    };
}
