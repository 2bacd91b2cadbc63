//! Check translation coverage against the default locale.
//!
//! Usage:
//!   cargo run --bin check-translations              # uses TRANSLATIONS_DIR or ./locales
//!   cargo run --bin check-translations -- path/dir  # explicit directory
//!
//! Exits non-zero when a locale defines keys or namespaces that the default
//! locale does not.

use anyhow::{bail, Context, Result};
use skatepark_locale::i18n::{DirectorySource, Locale, TranslationSource, TranslationValidator};
use std::collections::BTreeSet;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("check_translations=info".parse()?),
        )
        .init();

    let dir = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TRANSLATIONS_DIR").ok())
        .unwrap_or_else(|| "locales".to_string());
    let source = DirectorySource::new(&dir);
    let default = Locale::default_locale();

    let default_namespaces: BTreeSet<_> = source
        .namespaces(default)
        .context(format!("Failed to list {} namespaces in {}", default, dir))?
        .into_iter()
        .collect();
    info!("Checking {} namespaces in {} against {}", default_namespaces.len(), dir, default);

    let mut error_count = 0;
    let mut warning_count = 0;

    for locale in Locale::all().into_iter().filter(|l| *l != default) {
        let namespaces: BTreeSet<_> = source
            .namespaces(locale)
            .unwrap_or_default()
            .into_iter()
            .collect();

        for orphan in namespaces.difference(&default_namespaces) {
            error!("{}/{}: namespace does not exist for {}", locale, orphan, default);
            error_count += 1;
        }

        for namespace in &default_namespaces {
            let reference = source
                .fetch(default, namespace)
                .await
                .context(format!("Failed to read {}/{}", default, namespace))?;

            let translated = match source.fetch(locale, namespace).await {
                Ok(table) => table,
                Err(e) => {
                    warn!("{}/{}: {} (every key falls back to {})", locale, namespace, e, default);
                    warning_count += 1;
                    continue;
                }
            };

            let report = TranslationValidator::validate(&reference, &translated);
            for message in &report.errors {
                error!("{}/{}: {}", locale, namespace, message);
            }
            for message in &report.warnings {
                warn!("{}/{}: {}", locale, namespace, message);
            }
            error_count += report.errors.len();
            warning_count += report.warnings.len();
        }
    }

    info!("{} errors, {} warnings", error_count, warning_count);
    if error_count > 0 {
        bail!("translation coverage check failed with {} errors", error_count);
    }
    Ok(())
}
