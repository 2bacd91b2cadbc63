//! Locale type: validated locale representation.
//!
//! A `Locale` can only be constructed from a code that the registry knows and
//! serves, so holding one means the code is safe to use as a URL prefix.

use crate::error::{Error, Result};
use crate::i18n::registry::{Direction, LocaleConfig, LocaleRegistry};
use serde::{Serialize, Serializer};
use std::fmt;

/// A validated, enabled locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    code: &'static str,
}

impl Locale {
    pub const HEBREW: Locale = Locale { code: "he" };
    pub const ENGLISH: Locale = Locale { code: "en" };

    /// Create a Locale from an exact locale code.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code is registered and enabled
    /// * `Err(Error::NotFound)` otherwise
    pub fn from_code(code: &str) -> Result<Locale> {
        match LocaleRegistry::get().get_by_code(code) {
            Some(config) if config.enabled => Ok(Locale { code: config.code }),
            Some(_) => Err(Error::NotFound(format!("locale '{}' is not enabled", code))),
            None => Err(Error::NotFound(format!("unknown locale '{}'", code))),
        }
    }

    /// The registry's default locale.
    pub fn default_locale() -> Locale {
        Locale {
            code: LocaleRegistry::get().default_locale().code,
        }
    }

    /// All enabled locales in registry order.
    pub fn all() -> Vec<Locale> {
        LocaleRegistry::get()
            .list_enabled()
            .into_iter()
            .map(|config| Locale { code: config.code })
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Full locale configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for a Locale built through `from_code` or the constants.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("Locale code should always be registered")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn direction(&self) -> Direction {
        Direction::for_code(self.code)
    }

    pub fn is_default(&self) -> bool {
        self.config().is_default
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hebrew_constant() {
        let hebrew = Locale::HEBREW;
        assert_eq!(hebrew.code(), "he");
        assert_eq!(hebrew.name(), "Hebrew");
        assert!(hebrew.is_default());
        assert_eq!(hebrew.direction(), Direction::Rtl);
    }

    #[test]
    fn test_english_constant() {
        let english = Locale::ENGLISH;
        assert_eq!(english.code(), "en");
        assert_eq!(english.native_name(), "English");
        assert!(!english.is_default());
        assert_eq!(english.direction(), Direction::Ltr);
    }

    #[test]
    fn test_from_code_valid() {
        assert_eq!(Locale::from_code("he").unwrap(), Locale::HEBREW);
        assert_eq!(Locale::from_code("en").unwrap(), Locale::ENGLISH);
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Locale::from_code("fr");
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(Locale::from_code("").is_err());
        assert!(Locale::from_code("EN").is_err());
    }

    #[test]
    fn test_default_locale_is_hebrew() {
        assert_eq!(Locale::default_locale(), Locale::HEBREW);
    }

    #[test]
    fn test_all_in_registry_order() {
        assert_eq!(Locale::all(), vec![Locale::HEBREW, Locale::ENGLISH]);
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(Locale::ENGLISH.to_string(), "en");
        assert_eq!(serde_json::to_string(&Locale::HEBREW).unwrap(), "\"he\"");
    }
}
