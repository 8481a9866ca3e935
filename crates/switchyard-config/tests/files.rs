//! Loading configuration from files and the environment.

use std::io::Write;

use switchyard_config::{ConfigError, ConfigLoader, LogFormat, SameSitePolicy};
use tempfile::{Builder, NamedTempFile};

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_toml_file() {
    let file = temp_file(
        ".toml",
        r#"
        [server]
        http_addr = "127.0.0.1:3000"
        shutdown_timeout_secs = 5

        [headers]
        content_type = "text/html; charset=utf-8"
        access_control_allow_origin = "*"
        access_control_allow_methods = "GET, POST, PUT, DELETE, OPTIONS"

        [session]
        cookie_name = "sid"
        same_site = "lax"

        [logging]
        level = "debug"
        format = "pretty"
        "#,
    );

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
    assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    assert_eq!(config.server.shutdown_timeout_secs, 5);
    assert_eq!(config.headers.access_control_allow_origin, "*");
    assert_eq!(config.session.cookie_name, "sid");
    assert_eq!(config.session.same_site, Some(SameSitePolicy::Lax));
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn loads_json_file_with_missing_sections() {
    let file = temp_file(".json", r#"{"logging": {"level": "warn"}}"#);

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.server.http_addr, "0.0.0.0:8080");
    assert_eq!(config.session.cookie_name, "session");
}

#[test]
fn rejects_unknown_keys() {
    let file = temp_file(".toml", "[session]\nttl_secs = 60\n");
    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::TomlError(_))));
}

#[test]
fn rejects_unsupported_extension() {
    let file = temp_file(".yaml", "server: {}\n");
    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
}

#[test]
fn missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let result = ConfigLoader::new().with_file(&path);
    assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));

    let config = ConfigLoader::new()
        .with_optional_file(&path)
        .unwrap()
        .load()
        .unwrap();
    assert_eq!(config.server.http_addr, "0.0.0.0:8080");
}

#[test]
fn environment_overrides_file() {
    let file = temp_file(".toml", "[server]\nhttp_addr = \"127.0.0.1:3000\"\n");
    std::env::set_var("SYCFGTEST__SERVER__HTTP_ADDR", "127.0.0.1:4000");
    std::env::set_var("SYCFGTEST__SESSION__SECURE", "true");

    let config = ConfigLoader::new()
        .with_file(file.path())
        .unwrap()
        .with_env_prefix("sycfgtest")
        .load()
        .unwrap();

    std::env::remove_var("SYCFGTEST__SERVER__HTTP_ADDR");
    std::env::remove_var("SYCFGTEST__SESSION__SECURE");

    assert_eq!(config.server.http_addr, "127.0.0.1:4000");
    assert!(config.session.secure);
}

#[test]
fn bad_environment_value_fails_load() {
    std::env::set_var("SYCFGBAD__LOGGING__ENABLED", "sometimes");
    let result = ConfigLoader::new().with_env_prefix("SYCFGBAD").load();
    std::env::remove_var("SYCFGBAD__LOGGING__ENABLED");

    assert!(matches!(result, Err(ConfigError::EnvParseError { .. })));
}
