//! Translation coverage validation.
//!
//! Compares a locale's table against the default locale's table for the same
//! namespace. The default table is the reference: every key in use must exist
//! there, while other locales may be partial.

use crate::i18n::table::{placeholders, TranslationTable};

/// Validation report containing errors and warnings about a locale's table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoverageReport {
    /// Keys the default table does not define
    pub errors: Vec<String>,

    /// Gaps and inconsistencies that the fallback chain papers over
    pub warnings: Vec<String>,
}

impl CoverageReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

pub struct TranslationValidator;

impl TranslationValidator {
    /// Check `translated` against the default locale's `reference` table.
    ///
    /// - keys only in `translated` are errors
    /// - keys missing from `translated` are warnings (served from the default)
    /// - differing `{placeholder}` sets are warnings
    /// - empty values in either table are warnings
    pub fn validate(reference: &TranslationTable, translated: &TranslationTable) -> CoverageReport {
        let mut report = CoverageReport::new();
        let reference_keys = reference.keys();
        let translated_keys = translated.keys();

        for key in translated_keys.difference(&reference_keys) {
            report
                .errors
                .push(format!("Key '{}' is not defined in the default locale", key));
        }

        for key in reference_keys.difference(&translated_keys) {
            report
                .warnings
                .push(format!("Key '{}' is missing; the default text will be shown", key));
        }

        for key in reference_keys.intersection(&translated_keys) {
            let (Some(original), Some(text)) = (reference.get(key), translated.get(key)) else {
                continue;
            };

            let expected = placeholders(original);
            let found = placeholders(text);
            if expected != found {
                report.warnings.push(format!(
                    "Placeholder mismatch for '{}': default has {:?}, translation has {:?}",
                    key, expected, found
                ));
            }

            if text.trim().is_empty() {
                report.warnings.push(format!("Key '{}' has an empty translation", key));
            }
        }

        for key in &reference_keys {
            if reference.get(key).is_some_and(|text| text.trim().is_empty()) {
                report
                    .warnings
                    .push(format!("Key '{}' is empty in the default locale", key));
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> TranslationTable {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_identical_coverage_is_clean() {
        let reference = table(&[("search", "חיפוש"), ("results", "נמצאו {count}")]);
        let translated = table(&[("search", "Search"), ("results", "Found {count}")]);

        assert!(TranslationValidator::validate(&reference, &translated).is_clean());
    }

    #[test]
    fn test_missing_key_is_warning() {
        let reference = table(&[("clear", "נקה"), ("search", "חיפוש")]);
        let translated = table(&[("search", "Search")]);

        let report = TranslationValidator::validate(&reference, &translated);
        assert!(!report.has_errors());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("'clear'"));
    }

    #[test]
    fn test_extra_key_is_error() {
        let reference = table(&[("search", "חיפוש")]);
        let translated = table(&[("search", "Search"), ("filters.open", "Open now")]);

        let report = TranslationValidator::validate(&reference, &translated);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("filters.open"));
    }

    #[test]
    fn test_placeholder_mismatch_is_warning() {
        let reference = table(&[("results", "נמצאו {count} פארקים ב{city}")]);
        let translated = table(&[("results", "Found {total} parks in {city}")]);

        let report = TranslationValidator::validate(&reference, &translated);
        assert!(!report.has_errors());
        assert!(report.warnings[0].contains("Placeholder mismatch"));
    }

    #[test]
    fn test_empty_values_are_warnings() {
        let reference = table(&[("a", ""), ("b", "ב")]);
        let translated = table(&[("a", "A"), ("b", "  ")]);

        let report = TranslationValidator::validate(&reference, &translated);
        assert_eq!(report.warnings.len(), 2);
        assert!(report.has_warnings());
    }
}
