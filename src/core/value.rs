//! # Values and Type Identity
//!
//! [`Value`] is the owned, type-erased attribute value that crosses the boundary between
//! field access strategies, the engine and the codecs. Absence is never encoded inside a
//! `Value`; it is carried as `Option<Value>`.
//!
//! [`ValueType`] and [`HostType`] identify the declared type of an attribute and the type
//! that owns it. Both carry monomorphized helper functions so that late-bound code can move
//! values in and out of `Option<T>` field slots without knowing `T`.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::access::{CompiledField, Host};

/// Owned attribute value of any registered type.
pub struct Value(Box<dyn Any + Send + Sync>);

impl Value {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Type id of the contained value.
    pub fn type_id(&self) -> TypeId {
        (*self.0).type_id()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Take the contained value out, or get `self` back if the type differs.
    pub fn downcast<T: Any>(self) -> std::result::Result<T, Value> {
        self.0.downcast::<T>().map(|boxed| *boxed).map_err(Value)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value").finish_non_exhaustive()
    }
}

/// A field slot did not have the expected `Option<T>` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotMismatch;

type LoadFn = fn(&dyn Any) -> Option<Option<Value>>;
type StoreFn = fn(&mut dyn Any, Value) -> std::result::Result<(), SlotMismatch>;

/// Declared value type of an attribute.
///
/// Equality and hashing only consider the underlying [`TypeId`].
#[derive(Clone, Copy)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
    load: LoadFn,
    store: StoreFn,
}

impl ValueType {
    pub fn of<T: Any + Clone + Send + Sync>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            load: load_slot::<T>,
            store: store_slot::<T>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Clone the content of an `Option<T>` slot.
    ///
    /// Returns `None` when the slot is not an `Option<T>` of this type.
    pub fn load(&self, slot: &dyn Any) -> Option<Option<Value>> {
        (self.load)(slot)
    }

    /// Store `value` into an `Option<T>` slot.
    pub fn store(&self, slot: &mut dyn Any, value: Value) -> std::result::Result<(), SlotMismatch> {
        (self.store)(slot, value)
    }
}

fn load_slot<T: Any + Clone + Send + Sync>(slot: &dyn Any) -> Option<Option<Value>> {
    slot.downcast_ref::<Option<T>>()
        .map(|current| current.clone().map(Value::new))
}

fn store_slot<T: Any + Clone + Send + Sync>(
    slot: &mut dyn Any,
    value: Value,
) -> std::result::Result<(), SlotMismatch> {
    let slot = slot.downcast_mut::<Option<T>>().ok_or(SlotMismatch)?;
    let value = value.downcast::<T>().map_err(|_| SlotMismatch)?;
    *slot = Some(value);
    Ok(())
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ValueType {}

impl Hash for ValueType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueType").field(&self.name).finish()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Identity of the type that owns a schema, plus its ahead-of-time accessor table.
#[derive(Clone, Copy)]
pub struct HostType {
    id: TypeId,
    name: &'static str,
    compiled: fn() -> Vec<CompiledField>,
}

impl HostType {
    pub fn of<H: Host>() -> Self {
        Self {
            id: TypeId::of::<H>(),
            name: std::any::type_name::<H>(),
            compiled: <H as Host>::compiled_fields,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Accessors generated for this host type by [`wire_host!`](crate::wire_host).
    pub fn compiled_fields(&self) -> Vec<CompiledField> {
        (self.compiled)()
    }

    /// Short type name without the module path.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for HostType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HostType {}

impl fmt::Debug for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HostType").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_downcast() {
        let value = Value::new(42i32);
        assert!(value.is::<i32>());
        assert_eq!(value.type_id(), TypeId::of::<i32>());
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));

        let back = value.downcast::<String>();
        assert!(back.is_err());
        let value = back.unwrap_err();
        assert_eq!(value.downcast::<i32>().ok(), Some(42));
    }

    #[test]
    fn test_slot_load_and_store() {
        let ty = ValueType::of::<String>();
        let mut slot: Option<String> = None;

        let loaded = ty.load(&slot).expect("slot type matches");
        assert!(loaded.is_none());

        ty.store(&mut slot, Value::new("hi".to_string()))
            .expect("store into matching slot");
        assert_eq!(slot.as_deref(), Some("hi"));

        let loaded = ty.load(&slot).expect("slot type matches").expect("present");
        assert_eq!(loaded.downcast_ref::<String>().map(String::as_str), Some("hi"));
    }

    #[test]
    fn test_slot_mismatch() {
        let ty = ValueType::of::<u16>();
        let mut slot: Option<u32> = None;
        assert!(ty.load(&slot).is_none());
        assert_eq!(ty.store(&mut slot, Value::new(1u16)), Err(SlotMismatch));

        let ty = ValueType::of::<u32>();
        assert_eq!(ty.store(&mut slot, Value::new(1u16)), Err(SlotMismatch));
        assert!(slot.is_none());
    }

    #[test]
    fn test_value_type_identity() {
        assert_eq!(ValueType::of::<i32>(), ValueType::of::<i32>());
        assert_ne!(ValueType::of::<i32>(), ValueType::of::<u32>());
        assert_eq!(ValueType::of::<i32>().name(), "i32");
    }
}
