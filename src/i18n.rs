//! Localized labels for exports, loaded from the TOML bundles in `messages/`.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

const BUNDLE_DE: &str = include_str!("../messages/de.toml");
const BUNDLE_EN: &str = include_str!("../messages/en.toml");

pub const DEFAULT_LOCALE: &str = "de";

/// Resolves message keys to labels of one locale.
pub trait MessageSource: Send + Sync {
    fn get_message(&self, key: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct BundleMessageSource {
    locale: String,
    messages: HashMap<String, String>,
}

impl BundleMessageSource {
    /// Bundle shipped with the binary. Unknown locales fall back to German.
    pub fn for_locale(locale: &str) -> Result<Self> {
        let bundle = match locale.to_lowercase().as_str() {
            "de" => BUNDLE_DE,
            "en" => BUNDLE_EN,
            other => {
                log::warn!(
                    "No message bundle for locale '{}', using '{}'",
                    other,
                    DEFAULT_LOCALE
                );
                return Self::from_toml(DEFAULT_LOCALE, BUNDLE_DE);
            }
        };

        Self::from_toml(locale, bundle)
    }

    pub fn from_toml(locale: &str, content: &str) -> Result<Self> {
        let messages: HashMap<String, String> = toml::from_str(content)
            .with_context(|| format!("Invalid message bundle for locale '{}'", locale))?;

        Ok(Self {
            locale: locale.to_lowercase(),
            messages,
        })
    }

    pub fn from_file(locale: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message bundle {}", path.display()))?;

        Self::from_toml(locale, &content)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl MessageSource for BundleMessageSource {
    /// Falls back to the key itself when the bundle has no entry.
    fn get_message(&self, key: &str) -> String {
        match self.messages.get(key) {
            Some(message) => message.clone(),
            None => {
                log::debug!("Missing message '{}' for locale '{}'", key, self.locale);
                key.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn bundled_locales_resolve_export_labels() {
        let de = BundleMessageSource::for_locale("de").unwrap();
        let en = BundleMessageSource::for_locale("EN").unwrap();

        assert_eq!(de.get_message("FULL"), "ganztägig");
        assert_eq!(en.get_message("FULL"), "Full day");
        assert_eq!(en.locale(), "en");
    }

    #[test]
    fn unknown_locale_falls_back_to_german() {
        let source = BundleMessageSource::for_locale("fr").unwrap();

        assert_eq!(source.locale(), "de");
    }

    #[test]
    fn missing_key_resolves_to_itself() {
        let source = BundleMessageSource::from_toml("de", "\"a.b\" = \"A\"").unwrap();

        assert_eq!(source.get_message("a.b"), "A");
        assert_eq!(source.get_message("x.y"), "x.y");
    }

    #[test]
    fn loads_bundle_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\"sicknotes.statistics\" = \"Krankmeldungen\"").unwrap();

        let source = BundleMessageSource::from_file("de", file.path()).unwrap();

        assert_eq!(source.get_message("sicknotes.statistics"), "Krankmeldungen");
    }

    #[test]
    fn malformed_bundle_is_an_error() {
        assert!(BundleMessageSource::from_toml("de", "not toml at all = = ").is_err());
    }
}
