use sitelens::backend::TaskPriority;
use sitelens::config::Config;
use sitelens::constants::DEFAULT_TASK_CATEGORY;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert!(config.storage.database_url.starts_with("sqlite://"));
    assert!(config.storage.database_url.ends_with("sitelens.db?mode=rwc"));
    assert_eq!(config.sync.default_category, DEFAULT_TASK_CATEGORY);
    assert_eq!(config.sync.default_priority, TaskPriority::Medium);
    assert!(!config.logging.enabled);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.backend.backend_type, "sqlite");
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    // Valid config should pass
    assert!(config.validate().is_ok());

    // Non-sqlite URL should fail
    config.storage.database_url = "postgres://localhost/site".to_string();
    assert!(config.validate().is_err());

    // Reset and test empty category
    config = Config::default();
    config.sync.default_category = "  ".to_string();
    assert!(config.validate().is_err());

    // Unknown log level
    config = Config::default();
    config.logging.level = "loud".to_string();
    assert!(config.validate().is_err());

    // Level is case-insensitive
    config.logging.level = "DEBUG".to_string();
    assert!(config.validate().is_ok());

    // Unknown backend
    config = Config::default();
    config.backend.backend_type = "firebase".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(toml_str.contains("default_priority = \"medium\""));
    assert!(toml_str.contains("backend_type = \"sqlite\""));
}

#[test]
fn test_partial_config_deserialization() {
    // Test that partial TOML configs merge with defaults
    let partial_toml = r#"
[sync]
default_priority = "high"

[logging]
enabled = true
"#;

    let config: Config = toml::from_str(partial_toml).unwrap();

    // Check that specified values are used
    assert_eq!(config.sync.default_priority, TaskPriority::High);
    assert!(config.logging.enabled);

    // Check that unspecified values use defaults
    assert_eq!(config.sync.default_category, DEFAULT_TASK_CATEGORY);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.backend.backend_type, "sqlite");
}

#[test]
fn test_invalid_priority_is_a_parse_error() {
    let result: Result<Config, _> = toml::from_str("[sync]\ndefault_priority = \"High\"\n");
    assert!(result.is_err());
}

#[test]
fn test_empty_config_deserialization() {
    let config: Config = toml::from_str("").unwrap();
    let default_config = Config::default();

    assert_eq!(config.storage.database_url, default_config.storage.database_url);
    assert_eq!(config.sync.default_category, default_config.sync.default_category);
    assert_eq!(config.logging.enabled, default_config.logging.enabled);
}

#[test]
fn test_backend_credentials_carry_database_url() {
    let mut config = Config::default();
    config.storage.database_url = "sqlite::memory:".to_string();
    let creds: serde_json::Value = serde_json::from_str(&config.backend_credentials()).unwrap();
    assert_eq!(creds["database_url"], "sqlite::memory:");
}

#[test]
fn test_generate_config_creates_directory_and_loads_back() {
    use std::fs;

    // Create a temporary path that doesn't exist
    let temp_dir = std::env::temp_dir().join(format!("sitelens_test_config_{}", std::process::id()));
    let config_path = temp_dir.join("nested").join("config.toml");

    if temp_dir.exists() {
        let _ = fs::remove_dir_all(&temp_dir);
    }
    assert!(!temp_dir.exists());

    Config::generate_default_config(&config_path).unwrap();
    assert!(config_path.exists());

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("# Sitelens Configuration File"));

    let loaded = Config::load_from_file(&config_path).unwrap();
    assert_eq!(loaded.sync.default_category, DEFAULT_TASK_CATEGORY);

    // Clean up
    let _ = fs::remove_dir_all(&temp_dir);
}

#[test]
fn test_load_from_file_rejects_invalid_values() {
    use std::fs;

    let temp_dir = std::env::temp_dir().join(format!("sitelens_test_invalid_{}", std::process::id()));
    fs::create_dir_all(&temp_dir).unwrap();
    let config_path = temp_dir.join("config.toml");
    fs::write(&config_path, "[logging]\nlevel = \"chatty\"\n").unwrap();

    assert!(Config::load_from_file(&config_path).is_err());
    assert!(Config::load_from_file(temp_dir.join("absent.toml")).is_err());

    let _ = fs::remove_dir_all(&temp_dir);
}
