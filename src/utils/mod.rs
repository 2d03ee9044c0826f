//! # Utility Modules
//!
//! Supporting utilities used throughout the engine.
//!
//! ## Components
//! - **Logging**: `tracing-subscriber` initialization from [`LoggingConfig`](crate::config::LoggingConfig)
//! - **Metrics**: Thread-safe observability counters

pub mod logging;
pub mod metrics;

pub use metrics::{global_metrics, Metrics, MetricsSnapshot};
