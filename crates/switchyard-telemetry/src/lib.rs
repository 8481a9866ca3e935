//! Logging for Switchyard services.
//!
//! Every Switchyard crate emits events through `tracing`. This crate owns
//! the subscriber side: [`init_logging`] installs a global subscriber from a
//! [`LogConfig`], and [`fields`] names the structured fields the server and
//! its middleware attach to events.
//!
//! ```rust,ignore
//! use switchyard_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! ```

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig, LogFormat, LOG_LEVELS};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
