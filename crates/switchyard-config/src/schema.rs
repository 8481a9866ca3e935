//! Configuration sections.

use serde::{Deserialize, Serialize};
use switchyard_telemetry::{LogConfig, LogFormat};

/// Listener settings.
///
/// ```
/// use switchyard_config::ServerSection;
///
/// let section: ServerSection = toml::from_str(r#"http_addr = "127.0.0.1:3000""#).unwrap();
/// assert_eq!(section.http_addr, "127.0.0.1:3000");
/// assert_eq!(section.shutdown_timeout_secs, 30);
/// assert_eq!(section.max_body_bytes, 1024 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Bind address, e.g. `0.0.0.0:8080`.
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// How long a graceful stop waits for open connections, in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Largest request body read before answering 413, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Headers written on every response unless the handler sets them.
///
/// An empty value leaves the header unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HeadersSection {
    /// `Content-Type`.
    #[serde(default)]
    pub content_type: String,

    /// `Access-Control-Allow-Origin`.
    #[serde(default)]
    pub access_control_allow_origin: String,

    /// `Access-Control-Allow-Methods`.
    #[serde(default)]
    pub access_control_allow_methods: String,
}

impl HeadersSection {
    /// HTML content type with permissive CORS for the common methods.
    #[must_use]
    pub fn permissive_html() -> Self {
        Self {
            content_type: "text/html; charset=utf-8".to_string(),
            access_control_allow_origin: "*".to_string(),
            access_control_allow_methods: "GET, POST, PUT, DELETE, OPTIONS".to_string(),
        }
    }

    /// True when no header is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content_type.is_empty()
            && self.access_control_allow_origin.is_empty()
            && self.access_control_allow_methods.is_empty()
    }
}

/// `SameSite` attribute of the session cookie.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    /// `SameSite=Lax`.
    Lax,
    /// `SameSite=Strict`.
    Strict,
    /// `SameSite=None`.
    None,
}

/// Session cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SessionSection {
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Add the `Secure` flag.
    #[serde(default)]
    pub secure: bool,

    /// Optional `SameSite` attribute.
    #[serde(default)]
    pub same_site: Option<SameSitePolicy>,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secure: false,
            same_site: None,
        }
    }
}

fn default_cookie_name() -> String {
    "session".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Install a subscriber at startup.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Level or filter directives.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Log span open and close.
    #[serde(default)]
    pub span_events: bool,

    /// Include source locations.
    #[serde(default)]
    pub file_line_info: bool,

    /// Colourise pretty output.
    #[serde(default)]
    pub ansi: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            span_events: false,
            file_line_info: false,
            ansi: false,
        }
    }
}

impl From<&LoggingSection> for LogConfig {
    fn from(section: &LoggingSection) -> Self {
        Self {
            enabled: section.enabled,
            level: section.level.clone(),
            format: section.format,
            span_events: section.span_events,
            file_line_info: section.file_line_info,
            include_target: true,
            ansi: section.ansi,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_section_default() {
        let section = ServerSection::default();
        assert_eq!(section.http_addr, "0.0.0.0:8080");
        assert_eq!(section.shutdown_timeout_secs, 30);
        assert_eq!(section.max_body_bytes, 1_048_576);
    }

    #[test]
    fn test_max_body_bytes_from_toml() {
        let section: ServerSection = toml::from_str("max_body_bytes = 4096").unwrap();
        assert_eq!(section.max_body_bytes, 4096);
        assert_eq!(section.http_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ServerSection, _> = toml::from_str(
            r#"
            http_addr = "127.0.0.1:3000"
            max_connections = 10
        "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_headers_empty_by_default() {
        assert!(HeadersSection::default().is_empty());
        assert!(!HeadersSection::permissive_html().is_empty());
    }

    #[test]
    fn test_session_section_deserialize() {
        let section: SessionSection = toml::from_str(
            r#"
            secure = true
            same_site = "strict"
        "#,
        )
        .unwrap();
        assert_eq!(section.cookie_name, "session");
        assert!(section.secure);
        assert_eq!(section.same_site, Some(SameSitePolicy::Strict));
    }

    #[test]
    fn test_logging_section_to_log_config() {
        let section = LoggingSection {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            ..LoggingSection::default()
        };
        let config = LogConfig::from(&section);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.enabled);
    }
}
