//! UTF-8 string codec: `[len: u16 BE][utf-8 bytes]`.

use super::{peek_prefixed_size, read_exact, read_prefix, Codec};
use crate::config::DEFAULT_MAX_STRING_BYTES;
use crate::core::stream::{Sink, Source};
use crate::error::CodecError;

const PREFIX_BYTES: usize = 2;

/// Length-prefixed UTF-8 string.
#[derive(Debug, Clone, Copy)]
pub struct StringCodec {
    max_len: usize,
}

impl StringCodec {
    /// `max_len` is clamped to what the 16-bit prefix can express.
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len: max_len.min(usize::from(u16::MAX)),
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    fn check_len(&self, len: usize) -> Result<(), CodecError> {
        if len > self.max_len {
            return Err(CodecError::OutOfRange {
                type_name: "String",
                detail: format!("{len} bytes exceeds limit of {}", self.max_len),
            });
        }
        Ok(())
    }
}

impl Default for StringCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STRING_BYTES)
    }
}

impl Codec for StringCodec {
    type Value = String;

    fn write(&self, sink: &mut dyn Sink, value: &String) -> Result<(), CodecError> {
        let bytes = value.as_bytes();
        self.check_len(bytes.len())?;

        // Single write so a failing sink never sees a bare prefix.
        let mut frame = Vec::with_capacity(PREFIX_BYTES + bytes.len());
        frame.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        frame.extend_from_slice(bytes);
        sink.write_bytes(&frame)?;
        Ok(())
    }

    fn read(&self, source: &mut dyn Source) -> Result<String, CodecError> {
        let len = read_prefix::<PREFIX_BYTES>(source, "String")?;
        self.check_len(len)?;
        let mut bytes = vec![0u8; len];
        read_exact(source, &mut bytes, "String")?;
        Ok(String::from_utf8(bytes)?)
    }

    fn serialized_size(&self, source: &mut dyn Source) -> Result<Option<usize>, CodecError> {
        peek_prefixed_size::<PREFIX_BYTES>(source)
    }
}
