//! # Serde-backed Codec
//!
//! [`BincodeCodec`] lets any `serde` type travel as a single attribute, for composite
//! values that have no dedicated codec. The payload is framed like a blob so the size
//! probe works for optional attributes.
//!
//! ## Wire layout
//! ```text
//! [len: u32 BE] [bincode payload (len bytes)]
//! ```
//!
//! ## Usage
//! ```rust
//! use attribute_wire::codec::{BincodeCodec, CodecRegistry};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Position { x: f32, y: f32 }
//!
//! let registry = CodecRegistry::with_defaults();
//! registry.register(BincodeCodec::<Position>::new()).unwrap();
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{peek_prefixed_size, read_exact, read_prefix, Codec};
use crate::config::DEFAULT_MAX_BLOB_BYTES;
use crate::core::stream::{Sink, Source};
use crate::error::CodecError;

const PREFIX_BYTES: usize = 4;

/// Length-prefixed bincode encoding of `T`.
pub struct BincodeCodec<T> {
    max_len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> BincodeCodec<T> {
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_BLOB_BYTES)
    }

    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            max_len,
            _marker: PhantomData,
        }
    }

    fn check_len(&self, len: usize) -> Result<(), CodecError> {
        if len > self.max_len || u32::try_from(len).is_err() {
            return Err(CodecError::OutOfRange {
                type_name: std::any::type_name::<T>(),
                detail: format!("{len} byte payload exceeds limit of {}", self.max_len),
            });
        }
        Ok(())
    }
}

impl<T> Default for BincodeCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for BincodeCodec<T> {
    fn clone(&self) -> Self {
        Self::with_max_len(self.max_len)
    }
}

impl<T> fmt::Debug for BincodeCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BincodeCodec")
            .field("type", &std::any::type_name::<T>())
            .field("max_len", &self.max_len)
            .finish()
    }
}

impl<T> Codec for BincodeCodec<T>
where
    T: Serialize + DeserializeOwned + Any + Clone + Send + Sync,
{
    type Value = T;

    fn write(&self, sink: &mut dyn Sink, value: &T) -> Result<(), CodecError> {
        let payload = bincode::serialize(value)?;
        self.check_len(payload.len())?;
        let mut frame = Vec::with_capacity(PREFIX_BYTES + payload.len());
        frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        frame.extend_from_slice(&payload);
        sink.write_bytes(&frame)?;
        Ok(())
    }

    fn read(&self, source: &mut dyn Source) -> Result<T, CodecError> {
        let type_name = std::any::type_name::<T>();
        let len = read_prefix::<PREFIX_BYTES>(source, type_name)?;
        self.check_len(len)?;
        let mut payload = vec![0u8; len];
        read_exact(source, &mut payload, type_name)?;
        Ok(bincode::deserialize(&payload)?)
    }

    fn serialized_size(&self, source: &mut dyn Source) -> Result<Option<usize>, CodecError> {
        peek_prefixed_size::<PREFIX_BYTES>(source)
    }
}
