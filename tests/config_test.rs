// tests/config_test.rs
use changelog_kit::config::{load_config, parse_config, Config, LOCAL_CONFIG_FILE, USER_CONFIG_FILE};
use changelog_kit::domain::Category;
use serial_test::serial;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.changelog_path, "CHANGELOG.md");
    assert_eq!(config.repo_url, None);
    assert_eq!(config.categories.aliases.get("feat"), Some(&Category::Added));
    assert_eq!(config.categories.aliases.get("security"), Some(&Category::Fixed));
    assert!(config.automation.authors.contains(&"estate-catalog[bot]".to_string()));
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
changelog_path = "docs/CHANGELOG.md"
repo_url = "https://github.com/acme/widgets"

[categories.aliases]
feat = "Added"
perf = "Fixed"

[automation]
authors = ["renovate[bot]"]
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let root = TempDir::new().unwrap();
    let config = load_config(Some(temp_file.path().to_str().unwrap()), root.path()).unwrap();
    assert_eq!(config.changelog_path, "docs/CHANGELOG.md");
    assert_eq!(config.repo_url(), Some("https://github.com/acme/widgets"));

    let rules = config.rules();
    assert_eq!(rules.categories.normalize("perf"), Category::Fixed);
    // aliases replace the table, unknown names fall back to Changed
    assert_eq!(rules.categories.normalize("fix"), Category::Changed);
    assert!(rules.is_automation_author("renovate[bot]"));
    assert!(!rules.is_automation_author("estate-catalog[bot]"));
}

#[test]
fn test_local_config_file_in_root() {
    let root = TempDir::new().unwrap();
    std::fs::write(
        root.path().join(LOCAL_CONFIG_FILE),
        "[exclusions.patterns]\ndocs = [\"docs/\"]\n",
    )
    .unwrap();

    let config = load_config(None, root.path()).unwrap();
    let patterns: Vec<&str> = config.exclusions.all_patterns().collect();
    assert_eq!(patterns, vec!["docs/"]);
    // untouched sections keep their defaults
    assert_eq!(config.changelog_path, "CHANGELOG.md");
}

#[test]
fn test_exclusion_groups_replace_defaults() {
    let config = parse_config(
        "[exclusions.patterns]\ndocs = [\"docs/\", \"README.md\"]\nci = [\".github/\"]\n",
    )
    .unwrap();
    assert_eq!(config.exclusions.patterns.len(), 2);
    let patterns: Vec<&str> = config.exclusions.all_patterns().collect();
    assert_eq!(patterns, vec![".github/", "docs/", "README.md"]);
}

#[test]
fn test_default_values() {
    let config = Config::default();
    let patterns: Vec<&str> = config.exclusions.all_patterns().collect();
    assert!(patterns.contains(&".github/"));
    assert!(patterns.contains(&"tests/"));
    assert!(config.style.imperative_verbs.contains(&"Deprecate".to_string()));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("nope.toml");
    assert!(load_config(Some(missing.to_str().unwrap()), root.path()).is_err());
}

#[test]
fn test_invalid_toml_is_a_config_error() {
    let err = parse_config("changelog_path = [").unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_user_config_is_used_without_local_file() {
    let config_home = TempDir::new().unwrap();
    std::fs::write(
        config_home.path().join(USER_CONFIG_FILE),
        "changelog_path = \"HISTORY.md\"\n",
    )
    .unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", config_home.path());

    let root = TempDir::new().unwrap();
    let from_user = load_config(None, root.path()).unwrap();

    std::fs::write(root.path().join(LOCAL_CONFIG_FILE), "changelog_path = \"LOCAL.md\"\n").unwrap();
    let from_local = load_config(None, root.path()).unwrap();

    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(from_user.changelog_path, "HISTORY.md");
    assert_eq!(from_local.changelog_path, "LOCAL.md");
}
