//! The root configuration type.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use switchyard_telemetry::{create_env_filter, LogFormat, LOG_LEVELS};

use crate::{ConfigError, HeadersSection, LoggingSection, ServerSection, SessionSection};

/// Complete Switchyard configuration.
///
/// Every section is optional in a file; missing sections take their
/// defaults.
///
/// ```toml
/// [server]
/// http_addr = "0.0.0.0:8080"
///
/// [headers]
/// content_type = "text/html; charset=utf-8"
/// access_control_allow_origin = "*"
///
/// [session]
/// cookie_name = "session"
///
/// [logging]
/// level = "info"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SwitchyardConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Default response headers.
    #[serde(default)]
    pub headers: HeadersSection,

    /// Session cookie settings.
    #[serde(default)]
    pub session: SessionSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl SwitchyardConfig {
    /// Checks values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the bind address does not
    /// parse, the body limit is zero, the cookie name is empty or contains
    /// characters a cookie name cannot hold, or the log level is neither a known level nor valid
    /// filter directives.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_body_bytes",
                "must be greater than 0",
            ));
        }

        let name = &self.session.cookie_name;
        if name.is_empty() {
            return Err(ConfigError::invalid_value("session.cookie_name", "must not be empty"));
        }
        if !name.bytes().all(is_cookie_name_byte) {
            return Err(ConfigError::invalid_value(
                "session.cookie_name",
                format!("'{name}' is not a valid cookie name"),
            ));
        }

        let level = self.logging.level.trim();
        let is_directive = level.contains('=') || level.contains(',');
        if is_directive {
            create_env_filter(level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        } else if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::invalid_value(
                "logging.level",
                format!("unknown level '{level}', expected one of {}", LOG_LEVELS.join(", ")),
            ));
        }

        Ok(())
    }

    /// Readable debug logging with the permissive HTML headers.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.headers = HeadersSection::permissive_html();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi = true;
        config.logging.file_line_info = true;
        config
    }

    /// JSON logging at `info` and secure session cookies.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi = false;
        config.session.secure = true;
        config
    }
}

// RFC 6265 token characters.
fn is_cookie_name_byte(b: u8) -> bool {
    b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
}
