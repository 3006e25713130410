//! Value codec: typed values to and from canonical configuration text.
//!
//! The codec is split in two layers:
//!
//! - **`value`** – the closed set of [`ValueKind`]s, the [`Value`] tagged
//!   union, and the [`EncodeValue`] / [`DecodeValue`] traits implemented for
//!   primitives, `chrono` dates and spans, `Option<T>`, enums declared with
//!   [`config_enum!`](crate::config_enum), and the [`Json`] fallback.
//! - **`text`** – one encode/decode function per kind plus the typed
//!   [`encode`] / [`decode`] entry points.
//!
//! Decode failures of any kind surface as
//! [`ConfigError::InvalidValueFormat`](crate::ConfigError::InvalidValueFormat);
//! the codec never substitutes a default.

pub mod duration;
pub mod text;
pub mod value;

pub use text::{decode, deserialize, encode, serialize};
pub use value::{DecodeValue, EncodeValue, IntWidth, Json, Value, ValueKind};
