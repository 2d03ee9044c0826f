//! # Error Types
//!
//! Error handling for the attribute engine, its codecs and its field access strategies.
//!
//! Errors are layered the same way the engine is:
//! - **[`CodecError`]**: raised by a per-type codec while encoding or decoding one value
//!   (I/O failures, truncated input, malformed or out-of-range values).
//! - **[`BindingError`]**: raised by a field access strategy when an attribute cannot be
//!   bound to the host object's field.
//! - **[`WireError`]**: the engine-level error returned to callers. It wraps the two
//!   above verbatim and adds the protocol violations only the engine can detect.
//!
//! The engine never recovers locally. Every error is propagated to the caller; the
//! only soft outcome is skipping an optional attribute, which is a success.
//!
//! ## Example Usage
//! ```rust
//! use attribute_wire::error::{CodecError, WireError};
//! use tracing::error;
//!
//! fn report(err: &WireError) {
//!     match err {
//!         WireError::Codec(CodecError::Truncated { .. }) => error!(error = %err, "Short mandatory attribute"),
//!         other => error!(error = %other, "Attribute operation failed"),
//!     }
//! }
//! ```

use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Codec registry lock errors
    pub const ERR_REGISTRY_WRITE_LOCK: &str = "Failed to acquire write lock on codec registry";
    pub const ERR_REGISTRY_READ_LOCK: &str = "Failed to acquire read lock on codec registry";

    /// Field access factory lock errors
    pub const ERR_FACTORY_WRITE_LOCK: &str = "Failed to acquire write lock on field access cache";
    pub const ERR_FACTORY_READ_LOCK: &str = "Failed to acquire read lock on field access cache";

    /// Stream direction errors
    pub const ERR_SET_NEEDS_SINK: &str = "Set (serialize) requires a sink stream";
    pub const ERR_GET_NEEDS_SOURCE: &str = "Get (deserialize) requires a source stream";
}

/// Failure raised by a per-type codec.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Truncated {type_name} value: {needed} bytes required")]
    Truncated {
        type_name: &'static str,
        needed: usize,
    },

    #[error("Invalid UTF-8 in string value: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    #[error("Value out of range for {type_name}: {detail}")]
    OutOfRange {
        type_name: &'static str,
        detail: String,
    },

    #[error("Malformed {type_name} value: {detail}")]
    Malformed {
        type_name: &'static str,
        detail: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Codec for {expected} received a value of another type")]
    ValueMismatch { expected: &'static str },
}

/// Failure to bind an attribute to a field of the host object.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("Host type {host} has no field named '{field}'")]
    UnknownField { host: &'static str, field: String },

    #[error("Field '{field}' on {host} does not hold Option<{expected}>")]
    TypeMismatch {
        host: &'static str,
        field: String,
        expected: &'static str,
    },

    #[error("Attribute '{field}' is declared on {expected}, but the host is a different type")]
    HostMismatch { expected: &'static str, field: String },
}

/// WireError is the primary error type for all engine operations
#[derive(Error, Debug)]
pub enum WireError {
    #[error("Cannot serialize absent value for required attribute {attribute}")]
    RequiredAttributeMissing { attribute: String },

    #[error("Cannot deserialize optional attribute {attribute}: source cannot report available bytes")]
    UnsupportedSourceForOptionalAttribute { attribute: String },

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),

    #[error("No codec registered for type {type_name}")]
    UnknownCodecForType { type_name: &'static str },

    #[error("Stream does not match direction: {0}")]
    StreamDirectionMismatch(&'static str),

    #[error("Duplicate attribute '{name}' in schema for {host}")]
    DuplicateAttribute { host: &'static str, name: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Synchronization primitive poisoned: {0}")]
    LockPoisoned(&'static str),
}

impl WireError {
    /// True for errors that signal a schema or setup mistake rather than bad input data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            WireError::Binding(_)
                | WireError::UnknownCodecForType { .. }
                | WireError::UnsupportedSourceForOptionalAttribute { .. }
                | WireError::StreamDirectionMismatch(_)
                | WireError::DuplicateAttribute { .. }
                | WireError::ConfigError(_)
        )
    }
}

/// Type alias for Results using WireError
pub type Result<T> = std::result::Result<T, WireError>;
