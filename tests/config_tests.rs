mod support;

use airgap::error::{ConfigError, Error};
use airgap::infrastructure::config::settings::Config;
use support::write_temp_config;

#[test]
fn config_loads_full_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(
        dir.path(),
        r#"
[logging]
level = "debug"
format = "json"

[database]
demo_url = "sqlite:///var/lib/airgap/demo.db"
real_url = "sqlite:///var/lib/airgap/real.db"
pool_size = 8
connect_timeout_ms = 2500
run_migrations = false

[resolution]
lookup_timeout_ms = 300
"#,
    );

    let config = Config::load(&path).unwrap();
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.database.pool_size, 8);
    assert!(!config.database.run_migrations);
    assert_eq!(config.database.pool_options().max_size, 8);
    assert_eq!(config.resolution.lookup_timeout().as_millis(), 300);
}

#[test]
fn empty_file_uses_defaults() {
    let config = Config::parse_toml("").unwrap();
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.resolution.lookup_timeout_ms, 750);
    assert!(config.database.run_migrations);
}

#[test]
fn config_rejects_shared_database() {
    let toml = r#"
[database]
demo_url = "sqlite://shared.db"
real_url = "shared.db"
"#;
    let err = Config::parse_toml(toml).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "database.real_url",
            ..
        })
    ));
}

fn database_toml(demo_url: &str, real_url: &str) -> String {
    format!("[database]\ndemo_url = \"{demo_url}\"\nreal_url = \"{real_url}\"\n")
}

#[test]
fn config_rejects_aliases_of_one_database() {
    for (demo_url, real_url) in [
        ("./stores/one.db", "stores/one.db"),
        ("file:stores/one.db", "sqlite://stores/one.db"),
        ("stores/x/../one.db", "stores/one.db"),
        ("one.db?cache=shared", "one.db"),
        ("file:./one.db?cache=shared", "sqlite://one.db"),
    ] {
        let err = Config::parse_toml(&database_toml(demo_url, real_url)).unwrap_err();
        assert!(
            matches!(
                err,
                Error::Config(ConfigError::InvalidValue {
                    field: "database.real_url",
                    ..
                })
            ),
            "{demo_url} vs {real_url}: {err}"
        );
    }
}

#[test]
fn config_rejects_absolute_alias_of_relative_path() {
    let absolute = std::env::current_dir().unwrap().join("stores/one.db");
    let toml = database_toml(&absolute.display().to_string(), "stores/one.db");
    assert!(Config::parse_toml(&toml).is_err());
}

#[cfg(unix)]
#[test]
fn config_rejects_symlinked_directory_alias() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir(&data).unwrap();
    let link = dir.path().join("link");
    std::os::unix::fs::symlink(&data, &link).unwrap();

    let toml = database_toml(
        &data.join("one.db").display().to_string(),
        &link.join("one.db").display().to_string(),
    );
    assert!(Config::parse_toml(&toml).is_err());
}

#[test]
fn config_rejects_in_memory_stores() {
    for (demo_url, real_url, field) in [
        (":memory:", "real.db", "database.demo_url"),
        ("demo.db", "sqlite://:memory:", "database.real_url"),
        ("file:x.db?mode=memory", "real.db", "database.demo_url"),
    ] {
        let err = Config::parse_toml(&database_toml(demo_url, real_url)).unwrap_err();
        assert!(
            matches!(
                &err,
                Error::Config(ConfigError::InvalidValue { field: f, .. }) if *f == field
            ),
            "{demo_url} / {real_url}: {err}"
        );
    }
}

#[test]
fn config_accepts_distinct_databases() {
    for (demo_url, real_url) in [
        ("stores/demo.db", "stores/real.db"),
        ("file:demo.db", "sqlite://real.db"),
        ("a/one.db", "b/one.db"),
    ] {
        assert!(Config::parse_toml(&database_toml(demo_url, real_url)).is_ok());
    }
}

#[test]
fn config_rejects_zero_pool() {
    let toml = r#"
[database]
demo_url = "demo.db"
real_url = "real.db"
pool_size = 0
"#;
    assert!(matches!(
        Config::parse_toml(toml),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "database.pool_size",
            ..
        }))
    ));
}

#[test]
fn config_rejects_zero_lookup_timeout() {
    let toml = r#"
[resolution]
lookup_timeout_ms = 0
"#;
    assert!(matches!(
        Config::parse_toml(toml),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "resolution.lookup_timeout_ms",
            ..
        }))
    ));
}

#[test]
fn config_rejects_unknown_log_format() {
    let toml = r#"
[logging]
level = "info"
format = "xml"
"#;
    assert!(matches!(
        Config::parse_toml(toml),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "logging.format",
            ..
        }))
    ));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(
        Config::parse_toml("[database\nbroken"),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Config::load(dir.path().join("absent.toml")),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}

#[test]
fn load_or_default_tolerates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.database.pool_size, 5);
}
