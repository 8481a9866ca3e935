//! Listener settings.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use switchyard_config::{SameSitePolicy, ServerSection, SessionSection};
use switchyard_middleware::{SameSite, SessionMiddleware};
use switchyard_session::SessionStore;

use crate::error::ServerError;

/// Default listen address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Default time a graceful stop waits for open connections.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default cap on a request body, 1 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Settings for [`Server`](crate::Server).
///
/// ```rust
/// use std::time::Duration;
/// use switchyard_server::ServerConfig;
///
/// let config = ServerConfig::builder()
///     .http_addr("127.0.0.1:3000")
///     .shutdown_timeout(Duration::from_secs(5))
///     .max_body_bytes(64 * 1024)
///     .build();
/// assert_eq!(config.http_addr(), "127.0.0.1:3000");
/// assert_eq!(config.max_body_bytes(), 65536);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    http_addr: String,
    shutdown_timeout: Duration,
    max_body_bytes: usize,
}

impl ServerConfig {
    /// A builder starting from the defaults.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// The configured listen address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses the listen address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidAddress`] if it is not `ip:port`.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        parse_addr(&self.http_addr)
    }

    /// How long a graceful stop waits for open connections.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Largest request body read before the server answers 413.
    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<&ServerSection> for ServerConfig {
    fn from(section: &ServerSection) -> Self {
        Self::builder()
            .http_addr(section.http_addr.as_str())
            .shutdown_timeout(Duration::from_secs(section.shutdown_timeout_secs))
            .max_body_bytes(section.max_body_bytes)
            .build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    http_addr: String,
    shutdown_timeout: Duration,
    max_body_bytes: usize,
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfigBuilder {
    /// Sets the listen address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the graceful stop timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Sets the request body cap in bytes.
    #[must_use]
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Finishes the configuration.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            http_addr: self.http_addr,
            shutdown_timeout: self.shutdown_timeout,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

/// Builds the session stage described by a config section.
#[must_use]
pub fn session_stage(section: &SessionSection, store: Arc<SessionStore>) -> SessionMiddleware {
    let stage = SessionMiddleware::new(store)
        .cookie_name(section.cookie_name.as_str())
        .secure(section.secure);
    match section.same_site {
        Some(SameSitePolicy::Lax) => stage.same_site(SameSite::Lax),
        Some(SameSitePolicy::Strict) => stage.same_site(SameSite::Strict),
        Some(SameSitePolicy::None) => stage.same_site(SameSite::None),
        None => stage,
    }
}

pub(crate) fn parse_addr(addr: &str) -> Result<SocketAddr, ServerError> {
    addr.parse()
        .map_err(|_| ServerError::InvalidAddress(addr.to_string()))
}
