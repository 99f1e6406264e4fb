//! Tests for config loading

use esmigrate::{AuthMethod, Config, ConfigError, HttpClient};
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.elasticsearch.url, "http://localhost:9200");
    assert_eq!(config.elasticsearch.auth, AuthMethod::None);
    assert_eq!(config.elasticsearch.timeout_secs, 30);
    assert!(!config.elasticsearch.refresh);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_empty_file_uses_defaults() {
    let config: Config = "".parse().unwrap();
    assert_eq!(config.elasticsearch.url, "http://localhost:9200");
}

#[test]
fn test_parse_basic_auth() {
    let config: Config = r#"
        [elasticsearch]
        url = "https://es.internal:9243"
        refresh = true

        [elasticsearch.auth]
        type = "basic"
        username = "elastic"
        password = "changeme"

        [logging]
        level = "debug"
    "#
    .parse()
    .unwrap();

    assert_eq!(config.elasticsearch.url, "https://es.internal:9243");
    assert!(config.elasticsearch.refresh);
    assert_eq!(
        config.elasticsearch.auth,
        AuthMethod::Basic {
            username: "elastic".to_string(),
            password: "changeme".to_string(),
        }
    );
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_parse_api_key_auth() {
    let config: Config = r#"
        [elasticsearch.auth]
        type = "api_key"
        id = "key-id"
        api_key = "secret"
    "#
    .parse()
    .unwrap();

    assert_eq!(
        config.elasticsearch.auth,
        AuthMethod::ApiKey {
            id: "key-id".to_string(),
            api_key: "secret".to_string(),
        }
    );
}

#[test]
fn test_invalid_url_is_rejected() {
    let err = r#"
        [elasticsearch]
        url = "not a url"
    "#
    .parse::<Config>()
    .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidUrl(_)));
}

#[test]
fn test_unknown_auth_type_is_rejected() {
    let err = r#"
        [elasticsearch.auth]
        type = "kerberos"
    "#
    .parse::<Config>()
    .unwrap_err();

    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_load_from_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("esmigrate.toml");
    std::fs::write(
        &path,
        "[elasticsearch]\nurl = \"http://search:9200\"\ntimeout_secs = 5\n",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.elasticsearch.url, "http://search:9200");
    assert_eq!(config.elasticsearch.timeout_secs, 5);

    let client = HttpClient::from_config(&config.elasticsearch).unwrap();
    assert_eq!(client.base_url().as_str(), "http://search:9200/");
}

#[test]
fn test_missing_file_is_io_error() {
    let temp = tempdir().unwrap();
    let err = Config::load(&temp.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_load_or_default_without_path() {
    let config = Config::load_or_default(None::<&Path>).unwrap();
    assert_eq!(config.logging.level, "info");
}
