//! # Schema
//!
//! The ordered attribute list of one host type. Order matters: wire layout and the
//! optional short-read rule are positional, so attributes are always driven in the order
//! they were declared.
//!
//! ```rust
//! use attribute_wire::{wire_host, Schema};
//!
//! #[derive(Debug, Default)]
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
//! assert_eq!(schema.len(), 2);
//! ```

use std::any::Any;
use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::access::Host;
use crate::core::descriptor::{AttributeDescriptor, SerializedSize};
use crate::core::value::HostType;
use crate::error::{BindingError, Result, WireError};

/// Ordered, name-unique attributes of one host type.
#[derive(Debug, Clone)]
pub struct Schema {
    host: HostType,
    attributes: Vec<Arc<AttributeDescriptor>>,
}

impl Schema {
    pub fn builder<H: Host>() -> SchemaBuilder<H> {
        SchemaBuilder {
            attributes: Vec::new(),
            _host: PhantomData,
        }
    }

    pub fn host(&self) -> &HostType {
        &self.host
    }

    pub fn attributes(&self) -> &[Arc<AttributeDescriptor>] {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&Arc<AttributeDescriptor>> {
        self.attributes.iter().find(|attr| attr.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.attributes.iter().map(|attr| attr.as_ref())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Collects attribute declarations for host type `H`.
pub struct SchemaBuilder<H> {
    attributes: Vec<AttributeDescriptor>,
    _host: PhantomData<fn() -> H>,
}

impl<H: Host> SchemaBuilder<H> {
    pub fn required<T>(self, name: impl Into<Cow<'static, str>>) -> Self
    where
        T: Any + Clone + Send + Sync,
    {
        self.attribute(AttributeDescriptor::required::<H, T>(name))
    }

    pub fn optional<T>(self, name: impl Into<Cow<'static, str>>) -> Self
    where
        T: Any + Clone + Send + Sync,
    {
        self.attribute(AttributeDescriptor::optional::<H, T>(name))
    }

    /// Optional attribute whose availability check uses a fixed byte count.
    pub fn optional_sized<T>(self, name: impl Into<Cow<'static, str>>, bytes: usize) -> Self
    where
        T: Any + Clone + Send + Sync,
    {
        self.attribute(
            AttributeDescriptor::optional::<H, T>(name).with_size(SerializedSize::Fixed(bytes)),
        )
    }

    pub fn attribute(mut self, descriptor: AttributeDescriptor) -> Self {
        self.attributes.push(descriptor);
        self
    }

    /// Check names and ownership, then freeze the attribute list.
    pub fn build(self) -> Result<Schema> {
        let host = HostType::of::<H>();

        for (index, attribute) in self.attributes.iter().enumerate() {
            if *attribute.host() != host {
                return Err(BindingError::HostMismatch {
                    expected: host.name(),
                    field: attribute.name().to_string(),
                }
                .into());
            }
            if self.attributes[..index]
                .iter()
                .any(|earlier| earlier.name() == attribute.name())
            {
                return Err(WireError::DuplicateAttribute {
                    host: host.name(),
                    name: attribute.name().to_string(),
                });
            }
        }

        Ok(Schema {
            host,
            attributes: self.attributes.into_iter().map(Arc::new).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Heartbeat {
        seq: Option<u32>,
        load: Option<f32>,
    }

    crate::wire_host!(Heartbeat { seq: u32, load: f32 });

    #[derive(Debug, Default)]
    struct Unrelated {
        seq: Option<u32>,
    }

    crate::wire_host!(Unrelated { seq: u32 });

    #[test]
    fn test_order_preserved() {
        let schema = Schema::builder::<Heartbeat>()
            .required::<u32>("seq")
            .optional_sized::<f32>("load", 4)
            .build()
            .unwrap();

        let names: Vec<_> = schema.iter().map(|a| a.name().to_string()).collect();
        assert_eq!(names, vec!["seq", "load"]);
        assert!(schema.get("load").unwrap().is_optional());
        assert!(matches!(
            schema.get("load").unwrap().size_rule(),
            SerializedSize::Fixed(4)
        ));
        assert_eq!(*schema.host(), HostType::of::<Heartbeat>());
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = Schema::builder::<Heartbeat>()
            .required::<u32>("seq")
            .optional::<u32>("seq")
            .build()
            .unwrap_err();
        assert!(matches!(err, WireError::DuplicateAttribute { .. }));
    }

    #[test]
    fn test_foreign_descriptor_rejected() {
        let err = Schema::builder::<Heartbeat>()
            .attribute(AttributeDescriptor::required::<Unrelated, u32>("seq"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            WireError::Binding(BindingError::HostMismatch { .. })
        ));
    }
}
