//! Typed configuration for Switchyard services.
//!
//! [`SwitchyardConfig`] has four sections, all optional in a file:
//!
//! - [`ServerSection`]: bind address, shutdown timeout and body size limit
//! - [`HeadersSection`]: default response headers
//! - [`SessionSection`]: session cookie attributes
//! - [`LoggingSection`]: subscriber settings, convertible into a
//!   [`switchyard_telemetry::LogConfig`]
//!
//! [`ConfigLoader`] layers defaults, a TOML or JSON file and environment
//! variables, then validates. Unknown keys in a file are rejected.
//!
//! # Environment overrides
//!
//! With `with_env_prefix("SWITCHYARD")`:
//!
//! - `SWITCHYARD__SERVER__HTTP_ADDR=127.0.0.1:9000`
//! - `SWITCHYARD__SESSION__SECURE=true`
//! - `SWITCHYARD__LOGGING__FORMAT=pretty`

mod config;
mod error;
mod loader;
mod schema;

pub use config::SwitchyardConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{HeadersSection, LoggingSection, SameSitePolicy, ServerSection, SessionSection};
pub use switchyard_telemetry::LogFormat;
