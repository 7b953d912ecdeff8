use std::collections::HashMap;

use playlist_migrator::{
    Res,
    config::{self, DEFAULT_API_URL, MAX_PAGE_LIMIT, MigratorConfig},
};

fn config_from(vars: &[(&str, &str)]) -> MigratorConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    MigratorConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults_without_environment() {
    let config = config_from(&[]);

    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.page_limit, MAX_PAGE_LIMIT);
    assert!(!config.demo);
    assert!(config.source_token.is_none());
    assert!(config.target_token.is_none());
}

#[test]
fn test_api_url_trailing_slash_removed() {
    let config = config_from(&[("SPOTIFY_API_URL", "http://localhost:9000/v1/")]);
    assert_eq!(config.api_url, "http://localhost:9000/v1");

    let config = config_from(&[("SPOTIFY_API_URL", "   ")]);
    assert_eq!(config.api_url, DEFAULT_API_URL);
}

#[test]
fn test_page_limit_is_clamped() {
    assert_eq!(config_from(&[("MIGRATOR_PAGE_LIMIT", "20")]).page_limit, 20);
    assert_eq!(config_from(&[("MIGRATOR_PAGE_LIMIT", "500")]).page_limit, 50);
    assert_eq!(config_from(&[("MIGRATOR_PAGE_LIMIT", "0")]).page_limit, 1);
    assert_eq!(
        config_from(&[("MIGRATOR_PAGE_LIMIT", "lots")]).page_limit,
        MAX_PAGE_LIMIT
    );
}

#[test]
fn test_demo_flag_values() {
    for on in ["1", "true", "TRUE", "yes", " on "] {
        assert!(config_from(&[("MIGRATOR_DEMO", on)]).demo, "{on}");
    }
    for off in ["0", "false", "", "nope"] {
        assert!(!config_from(&[("MIGRATOR_DEMO", off)]).demo, "{off}");
    }
}

#[test]
fn test_tokens_are_trimmed_and_blank_ignored() {
    let config = config_from(&[
        ("MIGRATOR_SOURCE_TOKEN", "  BQC-source \n"),
        ("MIGRATOR_TARGET_TOKEN", "   "),
    ]);

    assert_eq!(config.source_token.unwrap().secret(), "BQC-source");
    assert!(config.target_token.is_none());
}

#[test]
fn test_credential_debug_is_redacted() {
    let config = config_from(&[("MIGRATOR_SOURCE_TOKEN", "super-secret")]);
    let printed = format!("{:?}", config);
    assert!(!printed.contains("super-secret"));
}

#[tokio::test]
async fn test_load_env_tolerates_missing_file() {
    // the data directory is created on demand; a missing .env is not an error
    let result: Res<()> = config::load_env().await;
    assert!(result.is_ok(), "{:?}", result);
}
