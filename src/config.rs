use anyhow::{anyhow, Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub environment: String,
    /// Locale of the labels in exports, e.g. `de` or `en`.
    pub locale: String,
    pub working_time: WorkingTimeProperties,
    pub settings_cache_ttl_seconds: u64,
}

/// Application-level defaults for newly provisioned working times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingTimeProperties {
    /// ISO day numbers, 1 = Monday .. 7 = Sunday.
    pub default_working_days: Vec<u8>,
    /// When set, defaults come from the settings instead of `default_working_days`.
    pub default_working_days_deactivated: bool,
}

impl Default for WorkingTimeProperties {
    fn default() -> Self {
        Self {
            default_working_days: vec![1, 2, 3, 4, 5],
            default_working_days_deactivated: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://@localhost:5432/urlaubsverwaltung".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                "your-super-secret-jwt-key-change-this-in-production-12345".to_string()
            }),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            locale: env::var("LOCALE").unwrap_or_else(|_| "de".to_string()),
            working_time: WorkingTimeProperties {
                default_working_days: match env::var("WORKING_TIME_DEFAULT_WORKING_DAYS") {
                    Ok(value) => parse_working_days(&value)?,
                    Err(_) => WorkingTimeProperties::default().default_working_days,
                },
                default_working_days_deactivated: env::var(
                    "WORKING_TIME_DEFAULT_WORKING_DAYS_DEACTIVATED",
                )
                .map(|value| value.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            },
            settings_cache_ttl_seconds: env::var("SETTINGS_CACHE_TTL_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parses a comma separated list of ISO day numbers such as `1,2,3,4,5`.
pub fn parse_working_days(value: &str) -> Result<Vec<u8>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|day| !day.is_empty())
        .map(|day| {
            let number: u8 = day
                .parse()
                .with_context(|| format!("Invalid working day '{}'", day))?;
            if (1..=7).contains(&number) {
                Ok(number)
            } else {
                Err(anyhow!("Working day {} is not between 1 and 7", number))
            }
        })
        .collect()
}
