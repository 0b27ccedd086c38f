//! The shipped sample configuration.

use std::collections::HashMap;
use std::path::PathBuf;

use feed_shell::config::loader::load_unvalidated;
use feed_shell::config::validate_config;
use feed_shell::lifecycle::Application;

mod common;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("feed-shell.example.toml")
}

#[test]
fn test_sample_config_is_valid() {
    let config = load_unvalidated(Some(&sample_path()), |_| None).unwrap();
    assert!(validate_config(&config).is_ok());
    assert_eq!(config, common::shell_config());
}

#[test]
fn test_environment_overrides_sample() {
    let env: HashMap<&str, &str> = [
        ("FEED_SHELL_CLIENT_ID", "otherclient123"),
        ("FEED_SHELL_BIND_ADDRESS", "127.0.0.1:8080"),
        ("FEED_SHELL_LOG_LEVEL", "   "),
    ]
    .into_iter()
    .collect();

    let config = load_unvalidated(Some(&sample_path()), |key| {
        env.get(key).map(|v| v.to_string())
    })
    .unwrap();

    assert_eq!(config.auth.user_pool_web_client_id, "otherclient123");
    assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
    assert_eq!(config.observability.log_level, "info");
    assert_eq!(config.auth.user_pool_id, common::POOL_ID);
}

#[test]
fn test_sample_config_bootstraps() {
    let config = load_unvalidated(Some(&sample_path()), |_| None).unwrap();
    let app = Application::bootstrap(config).unwrap();
    let settings = app.auth.context().unwrap().client_settings();
    assert_eq!(settings.aws_user_pools_web_client_id, common::CLIENT_ID);
    assert!(app.auth.status().is_ready());
}
