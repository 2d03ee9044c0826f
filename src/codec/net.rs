//! IP address codecs as raw network-order octets.

use std::net::{Ipv4Addr, Ipv6Addr};

use super::{read_exact, Codec};
use crate::core::stream::{Sink, Source};
use crate::error::CodecError;

#[derive(Debug, Clone, Copy, Default)]
pub struct Ipv4Codec;

impl Codec for Ipv4Codec {
    type Value = Ipv4Addr;

    fn write(&self, sink: &mut dyn Sink, value: &Ipv4Addr) -> Result<(), CodecError> {
        sink.write_bytes(&value.octets())?;
        Ok(())
    }

    fn read(&self, source: &mut dyn Source) -> Result<Ipv4Addr, CodecError> {
        let mut octets = [0u8; 4];
        read_exact(source, &mut octets, "Ipv4Addr")?;
        Ok(Ipv4Addr::from(octets))
    }

    fn serialized_size(&self, _source: &mut dyn Source) -> Result<Option<usize>, CodecError> {
        Ok(Some(4))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ipv6Codec;

impl Codec for Ipv6Codec {
    type Value = Ipv6Addr;

    fn write(&self, sink: &mut dyn Sink, value: &Ipv6Addr) -> Result<(), CodecError> {
        sink.write_bytes(&value.octets())?;
        Ok(())
    }

    fn read(&self, source: &mut dyn Source) -> Result<Ipv6Addr, CodecError> {
        let mut octets = [0u8; 16];
        read_exact(source, &mut octets, "Ipv6Addr")?;
        Ok(Ipv6Addr::from(octets))
    }

    fn serialized_size(&self, _source: &mut dyn Source) -> Result<Option<usize>, CodecError> {
        Ok(Some(16))
    }
}
