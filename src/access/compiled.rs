//! Ahead-of-time field access: accessor functions generated by
//! [`wire_host!`](crate::wire_host) are bound once, when the strategy is built.

use super::{CompiledField, FieldAccessStrategy, FieldWriteError, Host, StrategyKind};
use crate::core::descriptor::AttributeDescriptor;
use crate::core::value::Value;
use crate::error::BindingError;

/// Strategy bound to one generated getter/setter pair.
#[derive(Debug, Clone, Copy)]
pub struct CompiledAccess {
    host: &'static str,
    field: CompiledField,
}

impl CompiledAccess {
    /// Bind the generated accessor for `attribute`.
    ///
    /// Fails when the host type has no generated accessor of that name, or when the
    /// field's type differs from the declared type.
    pub fn bind(attribute: &AttributeDescriptor) -> Result<Self, BindingError> {
        let host = attribute.host();
        let field = host
            .compiled_fields()
            .into_iter()
            .find(|field| field.name == attribute.name())
            .ok_or_else(|| BindingError::UnknownField {
                host: host.name(),
                field: attribute.name().to_string(),
            })?;

        if field.value_type != *attribute.value_type() {
            return Err(BindingError::TypeMismatch {
                host: host.name(),
                field: attribute.name().to_string(),
                expected: attribute.value_type().name(),
            });
        }

        Ok(Self {
            host: host.name(),
            field,
        })
    }

    pub fn field_name(&self) -> &'static str {
        self.field.name
    }

    fn host_mismatch(&self) -> BindingError {
        BindingError::HostMismatch {
            expected: self.host,
            field: self.field.name.to_string(),
        }
    }
}

impl FieldAccessStrategy for CompiledAccess {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Compiled
    }

    fn read(
        &self,
        host: &dyn Host,
        _attribute: &AttributeDescriptor,
    ) -> Result<Option<Value>, BindingError> {
        (self.field.get)(host.as_any()).ok_or_else(|| self.host_mismatch())
    }

    fn write(
        &self,
        value: Value,
        host: &mut dyn Host,
        _attribute: &AttributeDescriptor,
    ) -> Result<(), BindingError> {
        (self.field.set)(host.as_any_mut(), value).map_err(|e| match e {
            FieldWriteError::Host => self.host_mismatch(),
            FieldWriteError::Value => BindingError::TypeMismatch {
                host: self.host,
                field: self.field.name.to_string(),
                expected: self.field.value_type.name(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Frame {
        seq: Option<u64>,
        label: Option<String>,
    }

    crate::wire_host!(Frame { seq: u64, label: String });

    #[derive(Debug, Default)]
    struct Opaque {
        seq: Option<u64>,
    }

    impl Host for Opaque {
        fn field_ref(&self, name: &str) -> Option<&dyn std::any::Any> {
            (name == "seq").then_some(&self.seq as &dyn std::any::Any)
        }

        fn field_mut(&mut self, name: &str) -> Option<&mut dyn std::any::Any> {
            (name == "seq").then_some(&mut self.seq as &mut dyn std::any::Any)
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    }

    #[test]
    fn test_bind_and_access() {
        let attr = AttributeDescriptor::optional::<Frame, String>("label");
        let access = CompiledAccess::bind(&attr).unwrap();
        assert_eq!(access.field_name(), "label");

        let mut frame = Frame::default();
        assert!(access.read(&frame, &attr).unwrap().is_none());
        access
            .write(Value::new("hello".to_string()), &mut frame, &attr)
            .unwrap();
        assert_eq!(frame.label.as_deref(), Some("hello"));
        assert!(frame.seq.is_none());
    }

    #[test]
    fn test_bind_fails_early() {
        let missing = AttributeDescriptor::required::<Frame, u64>("sequence");
        assert!(matches!(
            CompiledAccess::bind(&missing),
            Err(BindingError::UnknownField { .. })
        ));

        let wrong_type = AttributeDescriptor::required::<Frame, u32>("seq");
        assert!(matches!(
            CompiledAccess::bind(&wrong_type),
            Err(BindingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_host_without_generated_accessors() {
        let attr = AttributeDescriptor::required::<Opaque, u64>("seq");
        assert!(matches!(
            CompiledAccess::bind(&attr),
            Err(BindingError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_foreign_host_rejected() {
        let attr = AttributeDescriptor::required::<Frame, u64>("seq");
        let access = CompiledAccess::bind(&attr).unwrap();
        let opaque = Opaque { seq: Some(1) };
        assert!(matches!(
            access.read(&opaque, &attr),
            Err(BindingError::HostMismatch { .. })
        ));
    }
}
