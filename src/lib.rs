//! # Attribute Wire
//!
//! Typed attribute engine for moving values between structured host objects and a
//! compact binary wire format.
//!
//! A host type declares its attributes (name, value type, required or optional) in a
//! [`Schema`]. The [`Engine`] drives each attribute in order, pairing a field access
//! strategy from the [`FieldAccessFactory`] with the codec registered for the
//! attribute's value type in the [`CodecRegistry`].
//!
//! ## Rules
//! - Serializing an absent required attribute fails; an absent optional one writes nothing
//! - Deserializing an optional attribute whose bytes have not arrived skips it and leaves
//!   the host untouched
//!
//! ## Example
//! ```rust
//! use attribute_wire::{wire_host, Engine, Schema};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Login {
//!     id: Option<i32>,
//!     nickname: Option<String>,
//! }
//!
//! wire_host!(Login { id: i32, nickname: String });
//!
//! let schema = Schema::builder::<Login>()
//!     .required::<i32>("id")
//!     .optional::<String>("nickname")
//!     .build()
//!     .unwrap();
//!
//! let engine = Engine::global();
//! let bytes = engine
//!     .to_bytes(&Login { id: Some(42), nickname: None }, &schema)
//!     .unwrap();
//! assert_eq!(&bytes[..], &[0, 0, 0, 42]);
//!
//! let decoded: Login = engine.from_bytes(bytes, &schema).unwrap();
//! assert_eq!(decoded.id, Some(42));
//! assert_eq!(decoded.nickname, None);
//! ```

pub mod access;
pub mod codec;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

pub use access::{FieldAccessFactory, FieldAccessStrategy, Host, StrategyKind};
pub use codec::{Codec, CodecRegistry, DynCodec};
pub use config::WireConfig;
pub use crate::core::descriptor::{AttributeDescriptor, SerializedSize};
pub use crate::core::engine::{Direction, Engine, Stream};
pub use crate::core::schema::{Schema, SchemaBuilder};
pub use crate::core::stream::{ByteSource, ReaderSource, Sink, Source, WriterSink};
pub use crate::core::value::{HostType, Value, ValueType};
pub use error::{BindingError, CodecError, Result, WireError};
