//! Locale registry: Single source of truth for all supported locales.
//!
//! The registry is built once on first access through a `OnceLock` and is
//! immutable thereafter. Hebrew is the default locale of the directory.

use serde::Serialize;
use std::sync::OnceLock;

/// Text direction of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// Value suitable for an HTML `dir` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    /// Fixed mapping from locale code to direction.
    pub fn for_code(code: &str) -> Direction {
        match code {
            "he" | "ar" | "fa" | "ur" | "yi" => Direction::Rtl,
            _ => Direction::Ltr,
        }
    }
}

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// Short locale code used as the URL prefix (e.g., "he", "en")
    pub code: &'static str,

    /// English name of the locale (e.g., "Hebrew")
    pub name: &'static str,

    /// Native name of the locale (e.g., "עברית")
    pub native_name: &'static str,

    /// Whether this is the default locale (exactly one should be true)
    pub is_default: bool,

    /// Whether this locale is served
    pub enabled: bool,
}

impl LocaleConfig {
    /// Text direction, derived from the code rather than stored.
    pub fn direction(&self) -> Direction {
        Direction::for_code(self.code)
    }
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its exact code.
    ///
    /// # Returns
    /// * `Some(&LocaleConfig)` if the locale exists
    /// * `None` if the locale is not found
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Get all enabled locales, in registry order.
    pub fn list_enabled(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().filter(|locale| locale.enabled).collect()
    }

    /// Get all locales (including disabled ones).
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Codes of all enabled locales, in registry order.
    pub fn codes(&self) -> Vec<&'static str> {
        self.list_enabled().iter().map(|locale| locale.code).collect()
    }

    /// Get the default locale configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one default locale
    /// (a configuration error caught by the tests below).
    pub fn default_locale(&self) -> &LocaleConfig {
        let defaults: Vec<_> = self
            .locales
            .iter()
            .filter(|locale| locale.is_default)
            .collect();

        match defaults.len() {
            0 => panic!("No default locale found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default locales found in registry"),
        }
    }

    /// Check if a locale code is supported and enabled.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|locale| locale.enabled)
            .unwrap_or(false)
    }
}

/// Supported locales: Hebrew (default) and English.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "he",
            name: "Hebrew",
            native_name: "עברית",
            is_default: true,
            enabled: true,
        },
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_default: false,
            enabled: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LocaleRegistry::get();
        let registry2 = LocaleRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_hebrew() {
        let config = LocaleRegistry::get()
            .get_by_code("he")
            .expect("Hebrew should be registered");

        assert_eq!(config.name, "Hebrew");
        assert_eq!(config.native_name, "עברית");
        assert!(config.is_default);
        assert!(config.enabled);
        assert_eq!(config.direction(), Direction::Rtl);
    }

    #[test]
    fn test_get_by_code_english() {
        let config = LocaleRegistry::get()
            .get_by_code("en")
            .expect("English should be registered");

        assert_eq!(config.name, "English");
        assert!(!config.is_default);
        assert_eq!(config.direction(), Direction::Ltr);
    }

    #[test]
    fn test_get_by_code_is_exact() {
        let registry = LocaleRegistry::get();
        assert!(registry.get_by_code("HE").is_none());
        assert!(registry.get_by_code("en-US").is_none());
        assert!(registry.get_by_code("").is_none());
    }

    #[test]
    fn test_codes_are_ordered() {
        assert_eq!(LocaleRegistry::get().codes(), vec!["he", "en"]);
    }

    #[test]
    fn test_list_all_matches_enabled() {
        let registry = LocaleRegistry::get();
        assert_eq!(registry.list_all().len(), 2);
        assert_eq!(registry.list_enabled().len(), 2);
    }

    #[test]
    fn test_exactly_one_default() {
        let registry = LocaleRegistry::get();
        let defaults = registry
            .list_all()
            .into_iter()
            .filter(|locale| locale.is_default)
            .count();
        assert_eq!(defaults, 1);
        assert_eq!(registry.default_locale().code, "he");
    }

    #[test]
    fn test_is_supported() {
        let registry = LocaleRegistry::get();
        assert!(registry.is_supported("he"));
        assert!(registry.is_supported("en"));
        assert!(!registry.is_supported("fr"));
    }

    #[test]
    fn test_direction_mapping() {
        assert_eq!(Direction::for_code("he"), Direction::Rtl);
        assert_eq!(Direction::for_code("ar"), Direction::Rtl);
        assert_eq!(Direction::for_code("en"), Direction::Ltr);
        assert_eq!(Direction::Rtl.as_str(), "rtl");
        assert_eq!(Direction::Ltr.as_str(), "ltr");
    }
}
