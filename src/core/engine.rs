//! # Attribute Engine
//!
//! Drives one attribute at a time between a host object and a byte stream, combining the
//! attribute's field access strategy with the codec registered for its declared type.
//!
//! ## Serialize (`Direction::Set`)
//! 1. Read the value from the host.
//! 2. Absent and required: fail with `RequiredAttributeMissing`, nothing written.
//!    Absent and optional: nothing written, success.
//! 3. Otherwise encode it with the codec.
//!
//! ## Deserialize (`Direction::Get`)
//! 1. Optional attributes only: the source must report its available bytes. If fewer are
//!    available than the attribute needs, the attribute is skipped and the host is left
//!    untouched. This is how a packet that stops before its trailing optional
//!    attributes stays decodable.
//! 2. Decode the value with the codec.
//! 3. Write it into the host.
//!
//! The availability check runs before the codec is invoked, so codecs only ever see
//! "enough bytes" or "corrupt bytes", never "not arrived yet".
//!
//! Calls are independent: no state is kept between attributes. Callers drive the
//! attributes of a host in schema order, or use [`Engine::serialize_all`] /
//! [`Engine::deserialize_all`].

use bytes::{Bytes, BytesMut};
use std::sync::Arc;
use tracing::{debug, instrument, trace};

use crate::access::{FieldAccessFactory, Host, StrategyKind};
use crate::codec::CodecRegistry;
use crate::config::WireConfig;
use crate::core::descriptor::AttributeDescriptor;
use crate::core::schema::Schema;
use crate::core::stream::{ByteSource, Sink, Source};
use crate::error::constants::{ERR_GET_NEEDS_SOURCE, ERR_SET_NEEDS_SINK};
use crate::error::{Result, WireError};
use crate::utils::metrics::{global_metrics, Timer};

/// Direction of one attribute operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Host to wire.
    Set,
    /// Wire to host.
    Get,
}

/// Stream handed to [`Engine::run`].
pub enum Stream<'a> {
    Sink(&'a mut dyn Sink),
    Source(&'a mut dyn Source),
}

/// Attribute engine. Cheap to clone; clones share the registry and the strategy cache.
#[derive(Debug, Clone)]
pub struct Engine {
    codecs: Arc<CodecRegistry>,
    accessors: Arc<FieldAccessFactory>,
    strategy: StrategyKind,
}

impl Default for Engine {
    fn default() -> Self {
        Self::global()
    }
}

impl Engine {
    pub fn new(
        codecs: Arc<CodecRegistry>,
        accessors: Arc<FieldAccessFactory>,
        strategy: StrategyKind,
    ) -> Self {
        Self {
            codecs,
            accessors,
            strategy,
        }
    }

    /// Engine over the process-wide registry and strategy cache.
    pub fn global() -> Self {
        Self::new(
            CodecRegistry::global(),
            FieldAccessFactory::global(),
            StrategyKind::default(),
        )
    }

    /// Engine with a registry built from the configured codec limits.
    pub fn from_config(config: &WireConfig) -> Self {
        Self::new(
            Arc::new(CodecRegistry::from_config(&config.codec)),
            FieldAccessFactory::global(),
            config.engine.strategy,
        )
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn codecs(&self) -> &Arc<CodecRegistry> {
        &self.codecs
    }

    pub fn accessors(&self) -> &Arc<FieldAccessFactory> {
        &self.accessors
    }

    /// Direction-tagged entry point.
    pub fn run(
        &self,
        direction: Direction,
        stream: Stream<'_>,
        host: &mut dyn Host,
        attribute: &AttributeDescriptor,
    ) -> Result<()> {
        match (direction, stream) {
            (Direction::Set, Stream::Sink(sink)) => self.serialize(sink, host, attribute),
            (Direction::Get, Stream::Source(source)) => self.deserialize(source, host, attribute),
            (Direction::Set, Stream::Source(_)) => {
                Err(WireError::StreamDirectionMismatch(ERR_SET_NEEDS_SINK))
            }
            (Direction::Get, Stream::Sink(_)) => {
                Err(WireError::StreamDirectionMismatch(ERR_GET_NEEDS_SOURCE))
            }
        }
    }

    /// Write one attribute of `host` to `sink`.
    pub fn serialize(
        &self,
        sink: &mut dyn Sink,
        host: &dyn Host,
        attribute: &AttributeDescriptor,
    ) -> Result<()> {
        let metrics = global_metrics();
        let codec = self.codecs.lookup(attribute.value_type())?;
        let accessor = self.accessors.resolve(self.strategy, attribute)?;

        let value = accessor.read(host, attribute).map_err(|e| {
            metrics.binding_error();
            e
        })?;

        let Some(value) = value else {
            if !attribute.is_optional() {
                metrics.required_missing();
                return Err(WireError::RequiredAttributeMissing {
                    attribute: attribute.to_string(),
                });
            }
            trace!(attribute = %attribute, "Absent optional attribute, nothing written");
            metrics.absent_skip();
            return Ok(());
        };

        codec.write_value(sink, &value).map_err(|e| {
            metrics.codec_error();
            e
        })?;
        metrics.attribute_written();
        trace!(attribute = %attribute, "Attribute written");
        Ok(())
    }

    /// Read one attribute from `source` into `host`.
    pub fn deserialize(
        &self,
        source: &mut dyn Source,
        host: &mut dyn Host,
        attribute: &AttributeDescriptor,
    ) -> Result<()> {
        let metrics = global_metrics();
        let codec = self.codecs.lookup(attribute.value_type())?;
        let accessor = self.accessors.resolve(self.strategy, attribute)?;

        if attribute.is_optional() {
            let available = source.available_bytes().ok_or_else(|| {
                WireError::UnsupportedSourceForOptionalAttribute {
                    attribute: attribute.to_string(),
                }
            })?;
            let needed = attribute
                .serialized_size(source, codec.as_ref())
                .map_err(|e| {
                    metrics.codec_error();
                    e
                })?;
            if available < needed {
                debug!(
                    attribute = %attribute,
                    available,
                    needed,
                    "Optional attribute not in buffer, skipped"
                );
                metrics.short_read_skip();
                return Ok(());
            }
        }

        let value = codec.read_value(source).map_err(|e| {
            metrics.codec_error();
            e
        })?;
        accessor.write(value, host, attribute).map_err(|e| {
            metrics.binding_error();
            e
        })?;
        metrics.attribute_read();
        trace!(attribute = %attribute, "Attribute read");
        Ok(())
    }

    /// Serialize every attribute of `schema` in declared order.
    #[instrument(skip_all, fields(host = schema.host().short_name(), attributes = schema.len()))]
    pub fn serialize_all(&self, sink: &mut dyn Sink, host: &dyn Host, schema: &Schema) -> Result<()> {
        for attribute in schema.iter() {
            self.serialize(sink, host, attribute)?;
        }
        Ok(())
    }

    /// Deserialize every attribute of `schema` in declared order.
    #[instrument(skip_all, fields(host = schema.host().short_name(), attributes = schema.len()))]
    pub fn deserialize_all(
        &self,
        source: &mut dyn Source,
        host: &mut dyn Host,
        schema: &Schema,
    ) -> Result<()> {
        for attribute in schema.iter() {
            self.deserialize(source, host, attribute)?;
        }
        Ok(())
    }

    /// Encode `host` into a fresh buffer.
    pub fn to_bytes(&self, host: &dyn Host, schema: &Schema) -> Result<Bytes> {
        let _timer = Timer::start("to_bytes");
        let mut buf = BytesMut::new();
        self.serialize_all(&mut buf, host, schema)?;
        Ok(buf.freeze())
    }

    /// Decode a default-initialized `H` from `bytes`.
    pub fn from_bytes<H: Host + Default>(&self, bytes: impl Into<Bytes>, schema: &Schema) -> Result<H> {
        let _timer = Timer::start("from_bytes");
        let mut source = ByteSource::new(bytes);
        let mut host = H::default();
        self.deserialize_all(&mut source, &mut host, schema)?;
        Ok(host)
    }

    /// Check that every attribute of `schema` has a codec and binds to a field of `H`.
    ///
    /// Runs a read against a default `H` through the configured strategy, so binding
    /// mistakes surface at setup time instead of on the first packet.
    pub fn validate<H: Host + Default>(&self, schema: &Schema) -> Result<()> {
        let probe = H::default();
        for attribute in schema.iter() {
            self.codecs.lookup(attribute.value_type())?;
            let accessor = self.accessors.resolve(self.strategy, attribute)?;
            accessor.read(&probe, attribute)?;
        }
        debug!(
            host = schema.host().short_name(),
            strategy = %self.strategy,
            "Schema validated"
        );
        Ok(())
    }
}
