//! Fixed-width scalar codecs.

use super::{read_exact, Codec};
use crate::core::stream::{Sink, Source};
use crate::error::CodecError;

macro_rules! fixed_width_codec {
    ($(#[$doc:meta])* $name:ident => $ty:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Codec for $name {
            type Value = $ty;

            fn write(&self, sink: &mut dyn Sink, value: &$ty) -> Result<(), CodecError> {
                sink.write_bytes(&value.to_be_bytes())?;
                Ok(())
            }

            fn read(&self, source: &mut dyn Source) -> Result<$ty, CodecError> {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                read_exact(source, &mut buf, stringify!($ty))?;
                Ok(<$ty>::from_be_bytes(buf))
            }

            fn serialized_size(&self, _source: &mut dyn Source) -> Result<Option<usize>, CodecError> {
                Ok(Some(std::mem::size_of::<$ty>()))
            }
        }
    };
}

fixed_width_codec!(
    /// Unsigned byte.
    U8Codec => u8
);
fixed_width_codec!(
    /// Signed byte.
    I8Codec => i8
);
fixed_width_codec!(U16Codec => u16);
fixed_width_codec!(I16Codec => i16);
fixed_width_codec!(U32Codec => u32);
fixed_width_codec!(
    /// Big-endian two's complement, 4 bytes.
    I32Codec => i32
);
fixed_width_codec!(U64Codec => u64);
fixed_width_codec!(I64Codec => i64);
fixed_width_codec!(
    /// IEEE-754 single precision bits, big-endian.
    F32Codec => f32
);
fixed_width_codec!(
    /// IEEE-754 double precision bits, big-endian.
    F64Codec => f64
);

/// Boolean as a single `0x00` / `0x01` byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

impl Codec for BoolCodec {
    type Value = bool;

    fn write(&self, sink: &mut dyn Sink, value: &bool) -> Result<(), CodecError> {
        sink.write_bytes(&[u8::from(*value)])?;
        Ok(())
    }

    fn read(&self, source: &mut dyn Source) -> Result<bool, CodecError> {
        let mut buf = [0u8; 1];
        read_exact(source, &mut buf, "bool")?;
        match buf[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::Malformed {
                type_name: "bool",
                detail: format!("expected 0 or 1, got {other:#04x}"),
            }),
        }
    }

    fn serialized_size(&self, _source: &mut dyn Source) -> Result<Option<usize>, CodecError> {
        Ok(Some(1))
    }
}

/// Unicode scalar value as a big-endian `u32`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCodec;

impl Codec for CharCodec {
    type Value = char;

    fn write(&self, sink: &mut dyn Sink, value: &char) -> Result<(), CodecError> {
        sink.write_bytes(&u32::from(*value).to_be_bytes())?;
        Ok(())
    }

    fn read(&self, source: &mut dyn Source) -> Result<char, CodecError> {
        let mut buf = [0u8; 4];
        read_exact(source, &mut buf, "char")?;
        let scalar = u32::from_be_bytes(buf);
        char::from_u32(scalar).ok_or_else(|| CodecError::OutOfRange {
            type_name: "char",
            detail: format!("{scalar:#x} is not a unicode scalar value"),
        })
    }

    fn serialized_size(&self, _source: &mut dyn Source) -> Result<Option<usize>, CodecError> {
        Ok(Some(4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stream::ByteSource;

    #[test]
    fn test_i32_is_big_endian() {
        let mut sink = Vec::new();
        I32Codec.write(&mut sink, &42).unwrap();
        assert_eq!(sink, vec![0, 0, 0, 42]);

        let mut source = ByteSource::new(sink);
        assert_eq!(I32Codec.read(&mut source).unwrap(), 42);
    }

    #[test]
    fn test_negative_and_float_values() {
        let mut sink = Vec::new();
        I16Codec.write(&mut sink, &-2).unwrap();
        F64Codec.write(&mut sink, &-1.5).unwrap();
        assert_eq!(&sink[..2], &[0xFF, 0xFE]);

        let mut source = ByteSource::new(sink);
        assert_eq!(I16Codec.read(&mut source).unwrap(), -2);
        assert_eq!(F64Codec.read(&mut source).unwrap(), -1.5);
    }

    #[test]
    fn test_truncated_u64() {
        let mut source = ByteSource::from_static(&[1, 2, 3]);
        let err = U64Codec.read(&mut source).unwrap_err();
        assert!(matches!(err, CodecError::Truncated { needed: 8, .. }));
    }

    #[test]
    fn test_fixed_sizes() {
        let mut source = ByteSource::default();
        assert_eq!(U8Codec.serialized_size(&mut source).unwrap(), Some(1));
        assert_eq!(U16Codec.serialized_size(&mut source).unwrap(), Some(2));
        assert_eq!(F32Codec.serialized_size(&mut source).unwrap(), Some(4));
        assert_eq!(I64Codec.serialized_size(&mut source).unwrap(), Some(8));
        assert_eq!(BoolCodec.serialized_size(&mut source).unwrap(), Some(1));
    }

    #[test]
    fn test_bool_rejects_other_bytes() {
        let mut source = ByteSource::from_static(&[2]);
        let err = BoolCodec.read(&mut source).unwrap_err();
        assert!(matches!(err, CodecError::Malformed { type_name: "bool", .. }));
    }

    #[test]
    fn test_char_rejects_surrogate() {
        let mut source = ByteSource::new(0xD800u32.to_be_bytes().to_vec());
        let err = CharCodec.read(&mut source).unwrap_err();
        assert!(matches!(err, CodecError::OutOfRange { type_name: "char", .. }));
    }
}
