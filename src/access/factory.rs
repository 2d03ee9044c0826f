//! # Field Access Factory
//!
//! Resolves and caches a [`FieldAccessStrategy`] per (strategy kind, attribute) pair, so
//! repeated operations on the same attribute do not pay the setup cost again.
//!
//! Lookups take a shared lock. On a miss the strategy is built outside the lock and then
//! inserted with `entry().or_insert`, so when several threads race on the same key they
//! all end up with the one instance that made it into the cache. Cached strategies live
//! for the lifetime of the factory.

use once_cell::sync::Lazy;
use std::any::TypeId;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::debug;

use super::{CompiledAccess, FieldAccessStrategy, ReflectiveAccess, StrategyKind};
use crate::core::descriptor::AttributeDescriptor;
use crate::error::constants::{ERR_FACTORY_READ_LOCK, ERR_FACTORY_WRITE_LOCK};
use crate::error::{Result, WireError};
use crate::utils::metrics::global_metrics;

/// Cache key: strategy kind, owning host type, attribute name and declared value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StrategyKey {
    kind: StrategyKind,
    host: TypeId,
    name: Cow<'static, str>,
    value: TypeId,
}

impl StrategyKey {
    fn new(kind: StrategyKind, attribute: &AttributeDescriptor) -> Self {
        Self {
            kind,
            host: attribute.host().id(),
            name: attribute.name_cow().clone(),
            value: attribute.value_type().id(),
        }
    }
}

static GLOBAL_FACTORY: Lazy<Arc<FieldAccessFactory>> =
    Lazy::new(|| Arc::new(FieldAccessFactory::new()));

/// Thread-safe, memoizing source of field access strategies.
pub struct FieldAccessFactory {
    strategies: RwLock<HashMap<StrategyKey, Arc<dyn FieldAccessStrategy>>>,
}

impl Default for FieldAccessFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldAccessFactory {
    pub fn new() -> Self {
        Self {
            strategies: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide factory.
    pub fn global() -> Arc<FieldAccessFactory> {
        Arc::clone(&GLOBAL_FACTORY)
    }

    /// Strategy of `kind` for `attribute`, built on first use.
    pub fn resolve(
        &self,
        kind: StrategyKind,
        attribute: &AttributeDescriptor,
    ) -> Result<Arc<dyn FieldAccessStrategy>> {
        let key = StrategyKey::new(kind, attribute);

        {
            let strategies = self
                .strategies
                .read()
                .map_err(|_| WireError::LockPoisoned(ERR_FACTORY_READ_LOCK))?;
            if let Some(strategy) = strategies.get(&key) {
                global_metrics().strategy_cache_hit();
                return Ok(Arc::clone(strategy));
            }
        }

        let built = build(kind, attribute)?;

        let mut strategies = self
            .strategies
            .write()
            .map_err(|_| WireError::LockPoisoned(ERR_FACTORY_WRITE_LOCK))?;
        let strategy = Arc::clone(strategies.entry(key).or_insert(built));
        global_metrics().strategy_resolved();
        debug!(strategy = %kind, attribute = %attribute, "Field access strategy resolved");
        Ok(strategy)
    }

    /// Resolve every attribute up front so binding errors surface at setup time.
    pub fn validate<'a, I>(&self, kind: StrategyKind, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a AttributeDescriptor>,
    {
        for attribute in attributes {
            self.resolve(kind, attribute)?;
        }
        Ok(())
    }

    /// Number of cached strategies.
    pub fn len(&self) -> usize {
        self.strategies.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for FieldAccessFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessFactory")
            .field("cached", &self.len())
            .finish()
    }
}

fn build(
    kind: StrategyKind,
    attribute: &AttributeDescriptor,
) -> Result<Arc<dyn FieldAccessStrategy>> {
    let strategy: Arc<dyn FieldAccessStrategy> = match kind {
        StrategyKind::Reflective => Arc::new(ReflectiveAccess),
        StrategyKind::Compiled => {
            let access = CompiledAccess::bind(attribute).map_err(|e| {
                global_metrics().binding_error();
                e
            })?;
            Arc::new(access)
        }
    };
    Ok(strategy)
}
