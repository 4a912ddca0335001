use std::env;

use pretty_assertions::assert_eq;
use serial_test::serial;
use urlaubsverwaltung::config::{Config, WorkingTimeProperties};

mod common;

const KEYS: [&str; 9] = [
    "DATABASE_URL",
    "JWT_SECRET",
    "HOST",
    "PORT",
    "ENVIRONMENT",
    "LOCALE",
    "WORKING_TIME_DEFAULT_WORKING_DAYS",
    "WORKING_TIME_DEFAULT_WORKING_DAYS_DEACTIVATED",
    "SETTINGS_CACHE_TTL_SECONDS",
];

/// Runs `f` with the given variables set and every other config variable
/// cleared, restoring the previous environment afterwards.
fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
    let original: Vec<(&str, Option<String>)> =
        KEYS.iter().map(|key| (*key, env::var(key).ok())).collect();

    unsafe {
        for key in KEYS {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    f();

    unsafe {
        for (key, value) in original {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }
}

#[test]
#[serial]
fn test_config_from_env_with_defaults() {
    with_env(&[], || {
        let config = Config::from_env_only().unwrap();

        assert_eq!(config.database_url, "postgres://@localhost:5432/urlaubsverwaltung");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "development");
        assert_eq!(config.locale, "de");
        assert_eq!(config.working_time, WorkingTimeProperties::default());
        assert_eq!(config.settings_cache_ttl_seconds, 300);
    });
}

#[test]
#[serial]
fn test_config_from_env_with_custom_values() {
    with_env(
        &[
            ("DATABASE_URL", "postgres://uv:secret@db:5432/uv"),
            ("JWT_SECRET", "test-secret"),
            ("HOST", "0.0.0.0"),
            ("PORT", "3000"),
            ("ENVIRONMENT", "production"),
            ("LOCALE", "en"),
            ("WORKING_TIME_DEFAULT_WORKING_DAYS", "1, 2, 3"),
            ("WORKING_TIME_DEFAULT_WORKING_DAYS_DEACTIVATED", "TRUE"),
            ("SETTINGS_CACHE_TTL_SECONDS", "60"),
        ],
        || {
            let config = Config::from_env_only().unwrap();

            assert_eq!(config.database_url, "postgres://uv:secret@db:5432/uv");
            assert_eq!(config.jwt_secret, "test-secret");
            assert_eq!(config.server_address(), "0.0.0.0:3000");
            assert!(config.is_production());
            assert_eq!(config.locale, "en");
            assert_eq!(
                config.working_time,
                WorkingTimeProperties {
                    default_working_days: vec![1, 2, 3],
                    default_working_days_deactivated: true,
                }
            );
            assert_eq!(config.settings_cache_ttl_seconds, 60);
        },
    );
}

#[test]
#[serial]
fn test_config_invalid_numbers_fall_back_to_defaults() {
    with_env(
        &[
            ("PORT", "invalid_port"),
            ("SETTINGS_CACHE_TTL_SECONDS", "-1"),
        ],
        || {
            let config = Config::from_env_only().unwrap();

            assert_eq!(config.port, 8080);
            assert_eq!(config.settings_cache_ttl_seconds, 300);
        },
    );
}

#[test]
#[serial]
fn test_config_rejects_invalid_working_days() {
    with_env(&[("WORKING_TIME_DEFAULT_WORKING_DAYS", "1,2,9")], || {
        assert!(Config::from_env_only().is_err());
    });
}

#[test]
fn test_config_environment_detection() {
    let mut config = common::test_config();

    config.environment = "production".to_string();
    assert!(config.is_production());
    assert!(!config.is_development());

    config.environment = "development".to_string();
    assert!(!config.is_production());
    assert!(config.is_development());
}
