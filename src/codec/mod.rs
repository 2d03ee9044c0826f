//! # Per-Type Codecs
//!
//! A codec knows how to write one value of its type to a [`Sink`] and read one back from
//! a [`Source`]. Codecs are stateless apart from configured limits and are shared by every
//! engine invocation.
//!
//! ## Layers
//! - [`Codec`]: the typed contract implemented by every concrete codec
//! - [`DynCodec`]: the object-safe form stored in the [`CodecRegistry`]
//! - [`TypedCodec`]: adapter from the first to the second
//!
//! ## Built-in codecs
//! All multi-byte values are big-endian.
//! ```text
//! bool, u8, i8            1 byte
//! u16, i16                2 bytes
//! u32, i32, f32, char     4 bytes
//! u64, i64, f64           8 bytes
//! String                  [len: u16] [utf-8 bytes]
//! Vec<u8>, Bytes          [len: u32] [raw bytes]
//! Ipv4Addr / Ipv6Addr     4 / 16 octets
//! BincodeCodec<T>         [len: u32] [bincode payload]
//! ```
//!
//! ## Size probes
//! [`Codec::serialized_size`] may peek the source but must never consume from it. It is
//! only consulted for optional attributes, to decide whether the bytes have arrived.

pub mod blob;
pub mod net;
pub mod primitives;
pub mod registry;
pub mod serialization;
pub mod string;

pub use blob::{BlobCodec, BytesCodec};
pub use net::{Ipv4Codec, Ipv6Codec};
pub use primitives::{
    BoolCodec, CharCodec, F32Codec, F64Codec, I16Codec, I32Codec, I64Codec, I8Codec, U16Codec,
    U32Codec, U64Codec, U8Codec,
};
pub use registry::CodecRegistry;
pub use serialization::BincodeCodec;
pub use string::StringCodec;

use std::any::Any;
use std::io;

use crate::core::stream::{Sink, Source};
use crate::core::value::{Value, ValueType};
use crate::error::CodecError;

/// Typed encode/decode contract for one value type.
pub trait Codec: Send + Sync + 'static {
    type Value: Any + Clone + Send + Sync;

    fn write(&self, sink: &mut dyn Sink, value: &Self::Value) -> Result<(), CodecError>;

    fn read(&self, source: &mut dyn Source) -> Result<Self::Value, CodecError>;

    /// Bytes the next value would occupy, if it can be told without consuming input.
    fn serialized_size(&self, _source: &mut dyn Source) -> Result<Option<usize>, CodecError> {
        Ok(None)
    }
}

/// Object-safe codec as stored in the registry.
pub trait DynCodec: Send + Sync {
    fn value_type(&self) -> ValueType;

    fn write_value(&self, sink: &mut dyn Sink, value: &Value) -> Result<(), CodecError>;

    fn read_value(&self, source: &mut dyn Source) -> Result<Value, CodecError>;

    fn serialized_size(&self, source: &mut dyn Source) -> Result<Option<usize>, CodecError>;
}

/// Wraps a [`Codec`] as a [`DynCodec`].
#[derive(Debug, Clone, Default)]
pub struct TypedCodec<C>(C);

impl<C: Codec> TypedCodec<C> {
    pub fn new(codec: C) -> Self {
        Self(codec)
    }

    pub fn inner(&self) -> &C {
        &self.0
    }
}

impl<C: Codec> DynCodec for TypedCodec<C> {
    fn value_type(&self) -> ValueType {
        ValueType::of::<C::Value>()
    }

    fn write_value(&self, sink: &mut dyn Sink, value: &Value) -> Result<(), CodecError> {
        let value = value
            .downcast_ref::<C::Value>()
            .ok_or(CodecError::ValueMismatch {
                expected: std::any::type_name::<C::Value>(),
            })?;
        self.0.write(sink, value)
    }

    fn read_value(&self, source: &mut dyn Source) -> Result<Value, CodecError> {
        self.0.read(source).map(Value::new)
    }

    fn serialized_size(&self, source: &mut dyn Source) -> Result<Option<usize>, CodecError> {
        self.0.serialized_size(source)
    }
}

/// Fill `buf` completely, reporting a short stream as [`CodecError::Truncated`].
pub(crate) fn read_exact(
    source: &mut dyn Source,
    buf: &mut [u8],
    type_name: &'static str,
) -> Result<(), CodecError> {
    let needed = buf.len();
    source.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => CodecError::Truncated { type_name, needed },
        _ => CodecError::Io(e),
    })
}

/// Read a big-endian length prefix of `N` bytes.
pub(crate) fn read_prefix<const N: usize>(
    source: &mut dyn Source,
    type_name: &'static str,
) -> Result<usize, CodecError> {
    let mut buf = [0u8; N];
    read_exact(source, &mut buf, type_name)?;
    Ok(prefix_value(&buf))
}

/// Size probe for `[len: N bytes][payload]` encodings.
///
/// When even the prefix is not there yet, the prefix width is reported so the caller
/// sees that more data is needed.
pub(crate) fn peek_prefixed_size<const N: usize>(
    source: &mut dyn Source,
) -> Result<Option<usize>, CodecError> {
    let mut buf = [0u8; N];
    let got = source.peek(&mut buf)?;
    if got < N {
        return Ok(Some(N));
    }
    Ok(Some(N + prefix_value(&buf)))
}

fn prefix_value(buf: &[u8]) -> usize {
    buf.iter().fold(0usize, |acc, b| (acc << 8) | usize::from(*b))
}
