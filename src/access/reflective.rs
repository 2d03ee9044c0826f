//! Late-bound field access: the field is looked up by name on every call.

use super::{FieldAccessStrategy, Host, StrategyKind};
use crate::core::descriptor::AttributeDescriptor;
use crate::core::value::Value;
use crate::error::BindingError;

/// Resolves fields through [`Host::field_ref`] / [`Host::field_mut`] per operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectiveAccess;

impl ReflectiveAccess {
    fn check_host(host: &dyn Host, attribute: &AttributeDescriptor) -> Result<(), BindingError> {
        if host.as_any().type_id() != attribute.host().id() {
            return Err(BindingError::HostMismatch {
                expected: attribute.host().name(),
                field: attribute.name().to_string(),
            });
        }
        Ok(())
    }

    fn unknown_field(attribute: &AttributeDescriptor) -> BindingError {
        BindingError::UnknownField {
            host: attribute.host().name(),
            field: attribute.name().to_string(),
        }
    }

    fn type_mismatch(attribute: &AttributeDescriptor) -> BindingError {
        BindingError::TypeMismatch {
            host: attribute.host().name(),
            field: attribute.name().to_string(),
            expected: attribute.value_type().name(),
        }
    }
}

impl FieldAccessStrategy for ReflectiveAccess {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Reflective
    }

    fn read(
        &self,
        host: &dyn Host,
        attribute: &AttributeDescriptor,
    ) -> Result<Option<Value>, BindingError> {
        Self::check_host(host, attribute)?;
        let slot = host
            .field_ref(attribute.name())
            .ok_or_else(|| Self::unknown_field(attribute))?;
        attribute
            .value_type()
            .load(slot)
            .ok_or_else(|| Self::type_mismatch(attribute))
    }

    fn write(
        &self,
        value: Value,
        host: &mut dyn Host,
        attribute: &AttributeDescriptor,
    ) -> Result<(), BindingError> {
        Self::check_host(host, attribute)?;
        let slot = host
            .field_mut(attribute.name())
            .ok_or_else(|| Self::unknown_field(attribute))?;
        attribute
            .value_type()
            .store(slot, value)
            .map_err(|_| Self::type_mismatch(attribute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptor::AttributeDescriptor;

    #[derive(Debug, Default)]
    struct Sample {
        count: Option<u32>,
    }

    crate::wire_host!(Sample { count: u32 });

    #[derive(Debug, Default)]
    struct Other {
        count: Option<u32>,
    }

    crate::wire_host!(Other { count: u32 });

    #[test]
    fn test_read_write() {
        let attr = AttributeDescriptor::required::<Sample, u32>("count");
        let mut sample = Sample::default();

        assert!(ReflectiveAccess.read(&sample, &attr).unwrap().is_none());
        ReflectiveAccess
            .write(Value::new(12u32), &mut sample, &attr)
            .unwrap();
        assert_eq!(sample.count, Some(12));

        let value = ReflectiveAccess.read(&sample, &attr).unwrap().unwrap();
        assert_eq!(value.downcast::<u32>().ok(), Some(12));
    }

    #[test]
    fn test_unknown_field() {
        let attr = AttributeDescriptor::required::<Sample, u32>("total");
        let err = ReflectiveAccess.read(&Sample::default(), &attr).unwrap_err();
        assert!(matches!(err, BindingError::UnknownField { .. }));
    }

    #[test]
    fn test_declared_type_mismatch() {
        let attr = AttributeDescriptor::required::<Sample, u64>("count");
        let err = ReflectiveAccess.read(&Sample::default(), &attr).unwrap_err();
        assert!(matches!(err, BindingError::TypeMismatch { .. }));

        let mut sample = Sample::default();
        let err = ReflectiveAccess
            .write(Value::new(1u64), &mut sample, &attr)
            .unwrap_err();
        assert!(matches!(err, BindingError::TypeMismatch { .. }));
        assert!(sample.count.is_none());
    }

    #[test]
    fn test_foreign_host() {
        let attr = AttributeDescriptor::required::<Sample, u32>("count");
        let other = Other { count: Some(1) };
        let err = ReflectiveAccess.read(&other, &attr).unwrap_err();
        assert!(matches!(err, BindingError::HostMismatch { .. }));
    }
}
