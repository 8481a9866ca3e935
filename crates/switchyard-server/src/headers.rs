//! Default response headers.

use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use switchyard_config::HeadersSection;

use crate::error::ServerError;

/// Headers every response carries unless a middleware or handler set them.
///
/// Empty values are treated as unset.
///
/// ```rust
/// use switchyard_server::DefaultHeaders;
///
/// let headers = DefaultHeaders::new()
///     .content_type("text/html; charset=utf-8")
///     .allow_origin("*");
/// assert!(!headers.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultHeaders {
    content_type: Option<String>,
    allow_origin: Option<String>,
    allow_methods: Option<String>,
}

impl DefaultHeaders {
    /// No default headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// HTML content type, any origin, and the common methods.
    #[must_use]
    pub fn permissive_html() -> Self {
        Self::from(&HeadersSection::permissive_html())
    }

    /// Sets `Content-Type`.
    #[must_use]
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.content_type = non_empty(value.into());
        self
    }

    /// Sets `Access-Control-Allow-Origin`.
    #[must_use]
    pub fn allow_origin(mut self, value: impl Into<String>) -> Self {
        self.allow_origin = non_empty(value.into());
        self
    }

    /// Sets `Access-Control-Allow-Methods`.
    #[must_use]
    pub fn allow_methods(mut self, value: impl Into<String>) -> Self {
        self.allow_methods = non_empty(value.into());
        self
    }

    /// True when nothing is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content_type.is_none() && self.allow_origin.is_none() && self.allow_methods.is_none()
    }

    /// Validates the values once, at build time.
    pub(crate) fn compile(&self) -> Result<CompiledHeaders, ServerError> {
        let entries = [
            ("content-type", header::CONTENT_TYPE, &self.content_type),
            (
                "access-control-allow-origin",
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                &self.allow_origin,
            ),
            (
                "access-control-allow-methods",
                header::ACCESS_CONTROL_ALLOW_METHODS,
                &self.allow_methods,
            ),
        ];

        let mut compiled = Vec::with_capacity(entries.len());
        for (label, name, value) in entries {
            let Some(value) = value else { continue };
            let parsed = HeaderValue::from_str(value).map_err(|_| ServerError::InvalidHeader {
                name: label,
                value: value.clone(),
            })?;
            compiled.push((name, parsed));
        }
        Ok(CompiledHeaders(compiled))
    }
}

impl From<&HeadersSection> for DefaultHeaders {
    fn from(section: &HeadersSection) -> Self {
        Self::new()
            .content_type(section.content_type.as_str())
            .allow_origin(section.access_control_allow_origin.as_str())
            .allow_methods(section.access_control_allow_methods.as_str())
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Validated default headers.
#[derive(Debug, Clone, Default)]
pub(crate) struct CompiledHeaders(Vec<(HeaderName, HeaderValue)>);

impl CompiledHeaders {
    /// Inserts each header the response does not already carry.
    pub(crate) fn apply(&self, headers: &mut HeaderMap) {
        for (name, value) in &self.0 {
            if !headers.contains_key(name) {
                headers.insert(name.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_are_unset() {
        let headers = DefaultHeaders::new().content_type("").allow_origin("*");
        assert_eq!(headers, DefaultHeaders::new().allow_origin("*"));
        assert!(DefaultHeaders::new().is_empty());
        assert!(DefaultHeaders::from(&HeadersSection::default()).is_empty());
    }

    #[test]
    fn test_apply_fills_missing_only() {
        let compiled = DefaultHeaders::permissive_html().compile().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        compiled.apply(&mut headers);

        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
    }

    #[test]
    fn test_invalid_value_rejected() {
        let result = DefaultHeaders::new().allow_origin("bad\nvalue").compile();
        assert!(matches!(
            result,
            Err(ServerError::InvalidHeader { name: "access-control-allow-origin", .. })
        ));
    }
}
