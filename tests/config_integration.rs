use nlq_chat::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("NLQ_SERVER__PORT");
        env::remove_var("NLQ_BACKEND__BASE_URL");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("BACKEND_URL");
        env::remove_var("BACKEND_TIMEOUT_SECS");
    }
}

const BIN: &str = "nlq-chat";

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args([BIN]).expect("defaults should load");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.session_ttl_secs, 1800);
    assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
    assert!(config.backend.timeout_secs.is_none());
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("NLQ_SERVER__PORT", "9090");
        env::set_var("NLQ_BACKEND__BASE_URL", "http://backend.internal:5000");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.backend.base_url, "http://backend.internal:5000");

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("widget.yaml");
    fs::write(
        &file_path,
        r#"
server:
  port: 7070
backend:
  base_url: "http://10.0.0.5:5000"
  timeout_secs: 15
"#,
    )
    .expect("Failed to write temp config");

    let path = file_path.to_string_lossy().to_string();
    let config = AppConfig::load_from_args([BIN, "--config", &path])
        .expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.backend.base_url, "http://10.0.0.5:5000");
    assert_eq!(config.backend.timeout_secs, Some(15));
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args([BIN, "--config", "/nonexistent/widget.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_cli_flag_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("NLQ_SERVER__PORT", "9090");
        env::set_var("PORT", "8080");
    }

    // Clap env var beats the NLQ_ prefix...
    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.server.port, 8080);

    // ...and an explicit flag beats both
    let config = AppConfig::load_from_args([BIN, "--port", "4040", "--backend-url", "http://x:1"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 4040);
    assert_eq!(config.backend.base_url, "http://x:1");

    clear_env_vars();
}

#[test]
#[serial]
fn test_timeout_flag() {
    clear_env_vars();

    let config = AppConfig::load_from_args([BIN, "--backend-timeout-secs", "5"])
        .expect("Failed to load config");
    assert_eq!(config.backend.timeout_secs, Some(5));
}
