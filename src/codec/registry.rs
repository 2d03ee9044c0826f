//! # Codec Registry
//!
//! Maps a value type to the codec that encodes it. The engine looks the codec up by an
//! attribute's declared type on every operation.
//!
//! At most one codec per type is active: registering a second codec for a type replaces
//! the first, and the replacement is logged. A missing codec is a configuration error
//! surfaced as [`WireError::UnknownCodecForType`], never defaulted.
//!
//! The process-wide instance ([`CodecRegistry::global`]) is filled with the built-in
//! codecs on first access. Registration is internally synchronized, so it is safe to
//! extend the global registry at startup from any thread.

use once_cell::sync::Lazy;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use super::{
    BlobCodec, BoolCodec, BytesCodec, CharCodec, Codec, DynCodec, F32Codec, F64Codec, I16Codec,
    I32Codec, I64Codec, I8Codec, Ipv4Codec, Ipv6Codec, StringCodec, TypedCodec, U16Codec,
    U32Codec, U64Codec, U8Codec,
};
use crate::config::CodecConfig;
use crate::core::value::ValueType;
use crate::error::constants::{ERR_REGISTRY_READ_LOCK, ERR_REGISTRY_WRITE_LOCK};
use crate::error::{Result, WireError};

type CodecMap = HashMap<TypeId, Arc<dyn DynCodec>>;

static GLOBAL_REGISTRY: Lazy<Arc<CodecRegistry>> =
    Lazy::new(|| Arc::new(CodecRegistry::with_defaults()));

/// Thread-safe codec lookup table keyed by value type.
pub struct CodecRegistry {
    codecs: RwLock<CodecMap>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            codecs: RwLock::new(HashMap::new()),
        }
    }

    /// Registry holding every built-in codec with default limits.
    pub fn with_defaults() -> Self {
        Self::from_config(&CodecConfig::default())
    }

    /// Registry holding every built-in codec with the configured limits.
    pub fn from_config(config: &CodecConfig) -> Self {
        let mut codecs = CodecMap::new();
        insert(&mut codecs, BoolCodec);
        insert(&mut codecs, U8Codec);
        insert(&mut codecs, I8Codec);
        insert(&mut codecs, U16Codec);
        insert(&mut codecs, I16Codec);
        insert(&mut codecs, U32Codec);
        insert(&mut codecs, I32Codec);
        insert(&mut codecs, U64Codec);
        insert(&mut codecs, I64Codec);
        insert(&mut codecs, F32Codec);
        insert(&mut codecs, F64Codec);
        insert(&mut codecs, CharCodec);
        insert(&mut codecs, StringCodec::new(config.max_string_bytes));
        insert(&mut codecs, BlobCodec::new(config.max_blob_bytes));
        insert(&mut codecs, BytesCodec::new(config.max_blob_bytes));
        insert(&mut codecs, Ipv4Codec);
        insert(&mut codecs, Ipv6Codec);
        debug!(count = codecs.len(), "Built-in codecs registered");

        Self {
            codecs: RwLock::new(codecs),
        }
    }

    /// The process-wide registry.
    pub fn global() -> Arc<CodecRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Register a typed codec, replacing any codec already bound to its value type.
    pub fn register<C: Codec>(&self, codec: C) -> Result<()> {
        self.register_dyn(Arc::new(TypedCodec::new(codec)))
    }

    /// Register an already type-erased codec.
    pub fn register_dyn(&self, codec: Arc<dyn DynCodec>) -> Result<()> {
        let value_type = codec.value_type();
        let mut codecs = self
            .codecs
            .write()
            .map_err(|_| WireError::LockPoisoned(ERR_REGISTRY_WRITE_LOCK))?;

        if codecs.insert(value_type.id(), codec).is_some() {
            warn!(value_type = value_type.name(), "Replacing registered codec");
        } else {
            debug!(value_type = value_type.name(), "Codec registered");
        }
        Ok(())
    }

    /// Codec for `value_type`.
    pub fn lookup(&self, value_type: &ValueType) -> Result<Arc<dyn DynCodec>> {
        let codecs = self
            .codecs
            .read()
            .map_err(|_| WireError::LockPoisoned(ERR_REGISTRY_READ_LOCK))?;

        codecs
            .get(&value_type.id())
            .cloned()
            .ok_or(WireError::UnknownCodecForType {
                type_name: value_type.name(),
            })
    }

    pub fn contains(&self, value_type: &ValueType) -> bool {
        self.codecs
            .read()
            .map(|codecs| codecs.contains_key(&value_type.id()))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.codecs.read().map(|codecs| codecs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("codecs", &self.len())
            .finish()
    }
}

fn insert<C: Codec>(codecs: &mut CodecMap, codec: C) {
    let codec: Arc<dyn DynCodec> = Arc::new(TypedCodec::new(codec));
    codecs.insert(codec.value_type().id(), codec);
}
