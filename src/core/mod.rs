//! # Core Engine Components
//!
//! The attribute-level read/write protocol and the data it works on.
//!
//! ## Components
//! - **Stream**: byte sinks and sources, including the availability query
//! - **Value**: type-erased attribute values and type identities
//! - **Descriptor**: immutable per-attribute metadata
//! - **Schema**: ordered attributes of one host type
//! - **Engine**: the serialize/deserialize state machine
//!
//! ## Attribute Rules
//! ```text
//!              | value present | value absent
//! required     | encode        | RequiredAttributeMissing
//! optional     | encode        | write nothing
//!
//!              | bytes available     | bytes short
//! required     | decode              | codec Truncated error
//! optional     | decode              | skip, host untouched
//! ```

pub mod descriptor;
pub mod engine;
pub mod schema;
pub mod stream;
pub mod value;
