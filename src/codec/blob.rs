//! Raw byte payload codecs: `[len: u32 BE][bytes]`.

use bytes::Bytes;

use super::{peek_prefixed_size, read_exact, read_prefix, Codec};
use crate::config::DEFAULT_MAX_BLOB_BYTES;
use crate::core::stream::{Sink, Source};
use crate::error::CodecError;

const PREFIX_BYTES: usize = 4;

fn check_len(len: usize, max_len: usize, type_name: &'static str) -> Result<(), CodecError> {
    if len > max_len || u32::try_from(len).is_err() {
        return Err(CodecError::OutOfRange {
            type_name,
            detail: format!("{len} bytes exceeds limit of {max_len}"),
        });
    }
    Ok(())
}

fn write_blob(
    sink: &mut dyn Sink,
    payload: &[u8],
    max_len: usize,
    type_name: &'static str,
) -> Result<(), CodecError> {
    check_len(payload.len(), max_len, type_name)?;
    let mut frame = Vec::with_capacity(PREFIX_BYTES + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);
    sink.write_bytes(&frame)?;
    Ok(())
}

fn read_blob(
    source: &mut dyn Source,
    max_len: usize,
    type_name: &'static str,
) -> Result<Vec<u8>, CodecError> {
    let len = read_prefix::<PREFIX_BYTES>(source, type_name)?;
    // Length is checked before allocating.
    check_len(len, max_len, type_name)?;
    let mut payload = vec![0u8; len];
    read_exact(source, &mut payload, type_name)?;
    Ok(payload)
}

/// Length-prefixed `Vec<u8>`.
#[derive(Debug, Clone, Copy)]
pub struct BlobCodec {
    max_len: usize,
}

impl BlobCodec {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl Default for BlobCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BLOB_BYTES)
    }
}

impl Codec for BlobCodec {
    type Value = Vec<u8>;

    fn write(&self, sink: &mut dyn Sink, value: &Vec<u8>) -> Result<(), CodecError> {
        write_blob(sink, value, self.max_len, "Vec<u8>")
    }

    fn read(&self, source: &mut dyn Source) -> Result<Vec<u8>, CodecError> {
        read_blob(source, self.max_len, "Vec<u8>")
    }

    fn serialized_size(&self, source: &mut dyn Source) -> Result<Option<usize>, CodecError> {
        peek_prefixed_size::<PREFIX_BYTES>(source)
    }
}

/// Length-prefixed [`Bytes`], same layout as [`BlobCodec`].
#[derive(Debug, Clone, Copy)]
pub struct BytesCodec {
    max_len: usize,
}

impl BytesCodec {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl Default for BytesCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BLOB_BYTES)
    }
}

impl Codec for BytesCodec {
    type Value = Bytes;

    fn write(&self, sink: &mut dyn Sink, value: &Bytes) -> Result<(), CodecError> {
        write_blob(sink, value, self.max_len, "Bytes")
    }

    fn read(&self, source: &mut dyn Source) -> Result<Bytes, CodecError> {
        read_blob(source, self.max_len, "Bytes").map(Bytes::from)
    }

    fn serialized_size(&self, source: &mut dyn Source) -> Result<Option<usize>, CodecError> {
        peek_prefixed_size::<PREFIX_BYTES>(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stream::ByteSource;

    #[test]
    fn test_blob_layout() {
        let mut sink = Vec::new();
        BlobCodec::default().write(&mut sink, &vec![7, 8, 9]).unwrap();
        assert_eq!(sink, vec![0, 0, 0, 3, 7, 8, 9]);
    }

    #[test]
    fn test_bytes_and_blob_share_layout() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        BlobCodec::default().write(&mut a, &b"xyz".to_vec()).unwrap();
        BytesCodec::default()
            .write(&mut b, &Bytes::from_static(b"xyz"))
            .unwrap();
        assert_eq!(a, b);

        let mut source = ByteSource::new(a);
        assert_eq!(
            BytesCodec::default().read(&mut source).unwrap(),
            Bytes::from_static(b"xyz")
        );
    }

    #[test]
    fn test_oversized_prefix_rejected_before_alloc() {
        let mut source = ByteSource::from_static(&[0xFF, 0xFF, 0xFF, 0xFF]);
        let err = BlobCodec::new(1024).read(&mut source).unwrap_err();
        assert!(matches!(err, CodecError::OutOfRange { .. }));
    }

    #[test]
    fn test_size_probe() {
        let mut source = ByteSource::from_static(&[0, 0, 0, 10, 1]);
        assert_eq!(
            BlobCodec::default().serialized_size(&mut source).unwrap(),
            Some(14)
        );
        let mut short = ByteSource::from_static(&[0, 0]);
        assert_eq!(
            BlobCodec::default().serialized_size(&mut short).unwrap(),
            Some(4)
        );
    }
}
