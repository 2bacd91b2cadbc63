use crate::error::{Error, Result};
use crate::i18n::{Namespace, DEFAULT_LOAD_TIMEOUT};
use crate::router::DEFAULT_EXEMPT_PREFIXES;
use std::path::PathBuf;
use std::time::Duration;

/// Where translation tables come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Directory(PathBuf),
    Remote(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Translations
    pub translation_source: SourceConfig,
    pub load_timeout: Duration,
    pub preload_namespaces: Vec<Namespace>,

    // Routing
    pub exempt_prefixes: Vec<String>,

    // Admin endpoints are disabled without a key
    pub admin_api_key: Option<String>,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Configuration(format!("{} has an invalid value: '{}'", name, raw))),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let translation_source = match var("TRANSLATION_SOURCE").as_deref() {
            None | Some("dir") | Some("directory") => SourceConfig::Directory(PathBuf::from(
                var("TRANSLATIONS_DIR").unwrap_or_else(|| "locales".to_string()),
            )),
            Some("remote") => SourceConfig::Remote(var("TRANSLATIONS_URL").ok_or_else(|| {
                Error::Configuration("TRANSLATIONS_URL not set (required for TRANSLATION_SOURCE=remote)".to_string())
            })?),
            Some(other) => {
                return Err(Error::Configuration(format!(
                    "TRANSLATION_SOURCE must be 'dir' or 'remote', got '{}'",
                    other
                )))
            }
        };

        let preload_namespaces = Namespace::parse_list(
            &var("PRELOAD_NAMESPACES").unwrap_or_else(|| "common,skateparks".to_string()),
        )
        .map_err(|e| Error::Configuration(format!("PRELOAD_NAMESPACES: {}", e)))?;

        let exempt_prefixes = match var("EXEMPT_PREFIXES") {
            Some(list) => list
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            None => DEFAULT_EXEMPT_PREFIXES.iter().map(|p| p.to_string()).collect(),
        };

        let load_timeout_ms: u64 =
            parse_var("TRANSLATION_LOAD_TIMEOUT_MS", DEFAULT_LOAD_TIMEOUT.as_millis() as u64)?;
        if load_timeout_ms == 0 {
            return Err(Error::Configuration(
                "TRANSLATION_LOAD_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            port: parse_var("PORT", 8080)?,
            translation_source,
            load_timeout: Duration::from_millis(load_timeout_ms),
            preload_namespaces,
            exempt_prefixes,
            admin_api_key: var("ADMIN_API_KEY"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "PORT",
        "TRANSLATION_SOURCE",
        "TRANSLATIONS_DIR",
        "TRANSLATIONS_URL",
        "TRANSLATION_LOAD_TIMEOUT_MS",
        "PRELOAD_NAMESPACES",
        "EXEMPT_PREFIXES",
        "ADMIN_API_KEY",
    ];

    fn clear_env() {
        for name in VARS {
            std::env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.translation_source,
            SourceConfig::Directory(PathBuf::from("locales"))
        );
        assert_eq!(config.load_timeout, Duration::from_secs(2));
        let names: Vec<&str> = config.preload_namespaces.iter().map(Namespace::as_str).collect();
        assert_eq!(names, vec!["common", "skateparks"]);
        assert_eq!(config.exempt_prefixes, vec!["/_next", "/_vercel", "/static"]);
        assert!(config.admin_api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_remote_source() {
        clear_env();
        std::env::set_var("TRANSLATION_SOURCE", "remote");
        std::env::set_var("TRANSLATIONS_URL", "https://cdn.example.com/locales");
        std::env::set_var("ADMIN_API_KEY", "admin-key");
        std::env::set_var("EXEMPT_PREFIXES", "/assets, /health");

        let config = Config::from_env().unwrap();
        assert_eq!(
            config.translation_source,
            SourceConfig::Remote("https://cdn.example.com/locales".to_string())
        );
        assert_eq!(config.admin_api_key.as_deref(), Some("admin-key"));
        assert_eq!(config.exempt_prefixes, vec!["/assets", "/health"]);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_remote_without_url_is_configuration_error() {
        clear_env();
        std::env::set_var("TRANSLATION_SOURCE", "remote");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("TRANSLATIONS_URL"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_configuration_errors() {
        clear_env();
        std::env::set_var("PORT", "eighty");
        assert!(matches!(Config::from_env(), Err(Error::Configuration(_))));

        clear_env();
        std::env::set_var("PRELOAD_NAMESPACES", "common,../secrets");
        assert!(matches!(Config::from_env(), Err(Error::Configuration(_))));

        clear_env();
        std::env::set_var("TRANSLATION_SOURCE", "s3");
        assert!(matches!(Config::from_env(), Err(Error::Configuration(_))));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_zero_load_timeout_is_rejected() {
        clear_env();
        std::env::set_var("TRANSLATION_LOAD_TIMEOUT_MS", "0");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("TRANSLATION_LOAD_TIMEOUT_MS"));

        std::env::set_var("TRANSLATION_LOAD_TIMEOUT_MS", "750");
        assert_eq!(Config::from_env().unwrap().load_timeout, Duration::from_millis(750));
        clear_env();
    }
}
