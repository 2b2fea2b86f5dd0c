use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_empty_config() {
    let config = ConfigLoader::load_str("").unwrap();
    assert_eq!(config.panel.poll_interval_ms, 2000);
}

#[test]
fn test_expand_path() {
    let expanded = ConfigLoader::expand_path("~/.outline-genie");
    assert!(!expanded.starts_with('~'));
}

#[test]
fn test_load_full_config() {
    let content = r#"
        [analyzer]
        min_title_chars = 3
        use_main_content = false

        [panel]
        poll_interval_ms = 1000

        [host]
        message_timeout_ms = 250
        file_scheme_access = false

        [logging]
        level = "debug"
    "#;
    let config = ConfigLoader::load_str(content).unwrap();
    assert_eq!(config.analyzer.min_title_chars, 3);
    assert!(!config.analyzer.use_main_content);
    assert_eq!(config.panel.poll_interval_ms, 1000);
    assert_eq!(config.host.message_timeout_ms, 250);
    assert!(!config.host.file_scheme_access);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[panel]").unwrap();
    writeln!(file, "notification_duration_ms = 500").unwrap();

    let config = ConfigLoader::load(file.path()).unwrap();
    assert_eq!(config.panel.notification_duration_ms, 500);
}

#[test]
fn test_load_nonexistent_file() {
    let result = ConfigLoader::load(Path::new("/nonexistent/path/config.toml"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_load_invalid_toml() {
    let result = ConfigLoader::load_str("invalid = [unclosed");
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_expand_env_vars() {
    // SAFETY: test-only variable name not read anywhere else
    unsafe {
        std::env::set_var("OUTLINE_GENIE_TEST_LEVEL", "trace");
    }
    let config = ConfigLoader::load_str("[logging]\nlevel = \"${OUTLINE_GENIE_TEST_LEVEL}\"").unwrap();
    assert_eq!(config.logging.level, "trace");
    unsafe {
        std::env::remove_var("OUTLINE_GENIE_TEST_LEVEL");
    }
}

#[test]
fn test_expand_missing_env_var() {
    let result = ConfigLoader::load_str("[logging]\nlevel = \"${OUTLINE_GENIE_TEST_UNSET_VAR}\"");
    assert!(matches!(result, Err(ConfigError::EnvVarNotSet(name)) if name == "OUTLINE_GENIE_TEST_UNSET_VAR"));
}

#[test]
fn test_load_or_default_rejects_invalid_values() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[panel]").unwrap();
    writeln!(file, "poll_interval_ms = 0").unwrap();

    let result = ConfigLoader::load_or_default(Some(file.path()));
    assert!(
        matches!(result, Err(ConfigError::InvalidValue { ref field, .. }) if field == "panel.poll_interval_ms")
    );
}

#[test]
fn test_load_or_default_with_valid_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[analyzer]").unwrap();
    writeln!(file, "id_prefix = \"toc\"").unwrap();

    let config = ConfigLoader::load_or_default(Some(file.path())).unwrap();
    assert_eq!(config.analyzer.id_prefix, "toc");
}
