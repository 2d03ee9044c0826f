//! # Attribute Descriptor
//!
//! Immutable metadata for one schema field: its name, declared value type, owning host
//! type, optionality, and how to compute the bytes it would occupy on the wire.
//!
//! Descriptors are built once when a schema is declared and shared read-only by every
//! engine invocation over any instance of the host type.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use crate::access::Host;
use crate::codec::DynCodec;
use crate::core::stream::Source;
use crate::core::value::{HostType, ValueType};
use crate::error::CodecError;

/// Custom size probe. May peek the source, must not consume from it.
pub type SizeFn = fn(&mut dyn Source) -> Result<usize, CodecError>;

/// How an attribute's serialized size is determined.
#[derive(Clone, Copy, Default)]
pub enum SerializedSize {
    /// Ask the attribute's codec. Codecs that cannot tell count as needing nothing.
    #[default]
    Codec,
    /// Always this many bytes.
    Fixed(usize),
    /// Computed by a custom probe.
    Probe(SizeFn),
}

impl fmt::Debug for SerializedSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializedSize::Codec => f.write_str("Codec"),
            SerializedSize::Fixed(bytes) => f.debug_tuple("Fixed").field(bytes).finish(),
            SerializedSize::Probe(_) => f.write_str("Probe(..)"),
        }
    }
}

/// Metadata for one attribute of a host type.
#[derive(Debug, Clone)]
pub struct AttributeDescriptor {
    name: Cow<'static, str>,
    value_type: ValueType,
    host: HostType,
    optional: bool,
    size: SerializedSize,
}

impl AttributeDescriptor {
    pub fn new<H, T>(name: impl Into<Cow<'static, str>>, optional: bool) -> Self
    where
        H: Host,
        T: Any + Clone + Send + Sync,
    {
        Self {
            name: name.into(),
            value_type: ValueType::of::<T>(),
            host: HostType::of::<H>(),
            optional,
            size: SerializedSize::Codec,
        }
    }

    pub fn required<H, T>(name: impl Into<Cow<'static, str>>) -> Self
    where
        H: Host,
        T: Any + Clone + Send + Sync,
    {
        Self::new::<H, T>(name, false)
    }

    pub fn optional<H, T>(name: impl Into<Cow<'static, str>>) -> Self
    where
        H: Host,
        T: Any + Clone + Send + Sync,
    {
        Self::new::<H, T>(name, true)
    }

    /// Override how the serialized size is computed.
    pub fn with_size(mut self, size: SerializedSize) -> Self {
        self.size = size;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_cow(&self) -> &Cow<'static, str> {
        &self.name
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn host(&self) -> &HostType {
        &self.host
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn size_rule(&self) -> SerializedSize {
        self.size
    }

    /// Bytes this attribute would consume if read from `source` now.
    pub fn serialized_size(
        &self,
        source: &mut dyn Source,
        codec: &dyn DynCodec,
    ) -> Result<usize, CodecError> {
        match self.size {
            SerializedSize::Fixed(bytes) => Ok(bytes),
            SerializedSize::Probe(probe) => probe(source),
            SerializedSize::Codec => Ok(codec.serialized_size(source)?.unwrap_or(0)),
        }
    }
}

impl fmt::Display for AttributeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}: {}",
            self.host.short_name(),
            self.name,
            self.value_type
        )?;
        if self.optional {
            f.write_str(" (optional)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{I32Codec, StringCodec, TypedCodec};
    use crate::core::stream::ByteSource;

    #[derive(Debug, Default)]
    struct Packet {
        id: Option<i32>,
        note: Option<String>,
    }

    crate::wire_host!(Packet { id: i32, note: String });

    #[test]
    fn test_display() {
        let attr = AttributeDescriptor::optional::<Packet, String>("note");
        let text = attr.to_string();
        assert!(text.starts_with("Packet.note: "));
        assert!(text.ends_with("(optional)"));

        let attr = AttributeDescriptor::required::<Packet, i32>("id");
        assert_eq!(attr.to_string(), "Packet.id: i32");
    }

    #[test]
    fn test_size_rules() {
        let mut source = ByteSource::from_static(&[0, 4]);
        let strings = TypedCodec::new(StringCodec::default());
        let ints = TypedCodec::new(I32Codec);

        let attr = AttributeDescriptor::optional::<Packet, String>("note");
        assert_eq!(attr.serialized_size(&mut source, &strings).unwrap(), 6);

        let attr = attr.with_size(SerializedSize::Fixed(3));
        assert_eq!(attr.serialized_size(&mut source, &strings).unwrap(), 3);

        fn whole_buffer(source: &mut dyn Source) -> Result<usize, CodecError> {
            Ok(source.available_bytes().unwrap_or(0) + 1)
        }
        let attr = AttributeDescriptor::optional::<Packet, i32>("id")
            .with_size(SerializedSize::Probe(whole_buffer));
        assert_eq!(attr.serialized_size(&mut source, &ints).unwrap(), 3);
        assert_eq!(source.remaining(), 2);
    }
}
