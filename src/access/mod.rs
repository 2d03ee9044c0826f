//! # Field Access
//!
//! How the engine gets and sets attribute values on a host object without knowing its
//! layout.
//!
//! A host type implements [`Host`], normally through the [`wire_host!`](crate::wire_host)
//! macro. Two interchangeable [`FieldAccessStrategy`] implementations sit on top of it,
//! selected by a [`StrategyKind`] tag:
//!
//! - [`ReflectiveAccess`]: resolves the field by name on every call (late-bound)
//! - [`CompiledAccess`]: binds accessor functions generated ahead of time by the macro,
//!   once, when the strategy is created
//!
//! Both return the same results for the same host state. Strategies are created and
//! cached by the [`FieldAccessFactory`].
//!
//! Attribute fields on the host are `Option<T>`; `None` means the attribute is absent.

pub mod compiled;
pub mod factory;
pub mod reflective;

pub use compiled::CompiledAccess;
pub use factory::FieldAccessFactory;
pub use reflective::ReflectiveAccess;

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::str::FromStr;

use crate::core::descriptor::AttributeDescriptor;
use crate::core::value::{Value, ValueType};
use crate::error::BindingError;

/// A structured value whose attributes the engine reads and writes.
pub trait Host: Any {
    /// The `Option<T>` slot of the named field.
    fn field_ref(&self, name: &str) -> Option<&dyn Any>;

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Any>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Accessors generated ahead of time for [`CompiledAccess`].
    fn compiled_fields() -> Vec<CompiledField>
    where
        Self: Sized,
    {
        Vec::new()
    }
}

/// Why a compiled setter rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWriteError {
    /// The host is not the type the accessor was generated for.
    Host,
    /// The value is not the field's type.
    Value,
}

/// Getter/setter pair generated for one host field.
#[derive(Clone, Copy)]
pub struct CompiledField {
    pub name: &'static str,
    pub value_type: ValueType,
    /// `None` when the host is not the generated-for type.
    pub get: fn(&dyn Any) -> Option<Option<Value>>,
    pub set: fn(&mut dyn Any, Value) -> Result<(), FieldWriteError>,
}

impl fmt::Debug for CompiledField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledField")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .finish()
    }
}

/// Selects a field access strategy implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Late-bound lookup by field name.
    Reflective,
    /// Ahead-of-time generated accessors.
    #[default]
    Compiled,
}

impl StrategyKind {
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Reflective => "reflective",
            StrategyKind::Compiled => "compiled",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reflective" => Ok(StrategyKind::Reflective),
            "compiled" => Ok(StrategyKind::Compiled),
            other => Err(format!("Unknown field access strategy: {other}")),
        }
    }
}

/// Reads and writes one attribute on host objects.
///
/// Implementations hold no per-host state and are shared across threads.
pub trait FieldAccessStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Current value of the attribute; `None` when absent.
    fn read(
        &self,
        host: &dyn Host,
        attribute: &AttributeDescriptor,
    ) -> Result<Option<Value>, BindingError>;

    fn write(
        &self,
        value: Value,
        host: &mut dyn Host,
        attribute: &AttributeDescriptor,
    ) -> Result<(), BindingError>;
}

/// Implements [`Host`] for a struct whose attribute fields are `Option<T>`, and generates
/// the accessor table used by [`CompiledAccess`].
///
/// ```rust
/// use attribute_wire::wire_host;
///
/// #[derive(Debug, Default)]
/// struct Login {
///     id: Option<i32>,
///     nickname: Option<String>,
/// }
///
/// wire_host!(Login { id: i32, nickname: String });
/// ```
#[macro_export]
macro_rules! wire_host {
    ($host:ty { $($field:ident : $ty:ty),+ $(,)? }) => {
        impl $crate::access::Host for $host {
            fn field_ref(&self, name: &str) -> ::core::option::Option<&dyn ::core::any::Any> {
                match name {
                    $(stringify!($field) => ::core::option::Option::Some(
                        &self.$field as &dyn ::core::any::Any
                    ),)+
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(
                &mut self,
                name: &str,
            ) -> ::core::option::Option<&mut dyn ::core::any::Any> {
                match name {
                    $(stringify!($field) => ::core::option::Option::Some(
                        &mut self.$field as &mut dyn ::core::any::Any
                    ),)+
                    _ => ::core::option::Option::None,
                }
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            fn compiled_fields() -> ::std::vec::Vec<$crate::access::CompiledField> {
                ::std::vec![
                    $($crate::access::CompiledField {
                        name: stringify!($field),
                        value_type: $crate::core::value::ValueType::of::<$ty>(),
                        get: |host: &dyn ::core::any::Any| {
                            host.downcast_ref::<$host>().map(|h| {
                                h.$field.clone().map($crate::core::value::Value::new)
                            })
                        },
                        set: |host: &mut dyn ::core::any::Any,
                              value: $crate::core::value::Value|
                              -> ::core::result::Result<(), $crate::access::FieldWriteError> {
                            let h = host
                                .downcast_mut::<$host>()
                                .ok_or($crate::access::FieldWriteError::Host)?;
                            let value = value
                                .downcast::<$ty>()
                                .map_err(|_| $crate::access::FieldWriteError::Value)?;
                            h.$field = ::core::option::Option::Some(value);
                            ::core::result::Result::Ok(())
                        },
                    },)+
                ]
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Probe {
        id: Option<u16>,
        tag: Option<String>,
    }

    crate::wire_host!(Probe { id: u16, tag: String });

    #[test]
    fn test_macro_introspection() {
        let mut probe = Probe {
            id: Some(3),
            tag: None,
        };
        assert!(probe.field_ref("id").is_some());
        assert!(probe.field_ref("missing").is_none());

        let slot = probe.field_mut("tag").expect("tag slot");
        *slot.downcast_mut::<Option<String>>().expect("slot type") = Some("x".into());
        assert_eq!(probe.tag.as_deref(), Some("x"));
        assert_eq!(probe.id, Some(3));
    }

    #[test]
    fn test_macro_compiled_fields() {
        let fields = Probe::compiled_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "id");
        assert_eq!(fields[0].value_type, ValueType::of::<u16>());

        let mut probe = Probe::default();
        (fields[0].set)(&mut probe, Value::new(9u16)).expect("set id");
        let got = (fields[0].get)(&probe).expect("host type").expect("present");
        assert_eq!(got.downcast::<u16>().ok(), Some(9));

        assert_eq!(
            (fields[0].set)(&mut probe, Value::new(9u32)).err(),
            Some(FieldWriteError::Value)
        );
        let mut other = 5u8;
        assert_eq!(
            (fields[0].set)(&mut other, Value::new(9u16)).err(),
            Some(FieldWriteError::Host)
        );
    }

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!(
            "Reflective".parse::<StrategyKind>(),
            Ok(StrategyKind::Reflective)
        );
        assert_eq!("compiled".parse::<StrategyKind>(), Ok(StrategyKind::Compiled));
        assert!("bytecode".parse::<StrategyKind>().is_err());
        assert_eq!(StrategyKind::default(), StrategyKind::Compiled);
    }
}
