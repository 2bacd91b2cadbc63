//! Internationalization (i18n) module for the Hebrew/English directory.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported locales and the default
//! - `locale`: Validated `Locale` type backed by the registry
//! - `namespace`: Validated names of translation key partitions
//! - `table`: Flattened, dot-path addressable translation tables
//! - `source`: Providers of tables (directory, remote, memory)
//! - `resolver`: Cached, fallback-aware table loading and lookup
//! - `session`: Client-side locale state that reloads only on change
//! - `validator`: Coverage checks against the default locale
//! - `metrics`: Per-resolver counters
//!
//! # Example
//!
//! ```rust,ignore
//! use skatepark_locale::i18n::{DirectorySource, Locale, Namespace, TranslationResolver};
//!
//! let resolver = TranslationResolver::new(Arc::new(DirectorySource::new("locales")));
//! let common = Namespace::new("common")?;
//! let clear = resolver.translate(Locale::ENGLISH, &common, "filters.clear").await;
//! ```

mod locale;
mod metrics;
mod namespace;
mod registry;
mod resolver;
mod session;
mod source;
mod table;
mod validator;

pub use locale::Locale;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use namespace::Namespace;
pub use registry::{Direction, LocaleConfig, LocaleRegistry};
pub use resolver::{TranslationCache, TranslationResolver, Translator, DEFAULT_LOAD_TIMEOUT};
pub use session::LocaleSession;
pub use source::{DirectorySource, MemorySource, RemoteSource, TranslationSource};
pub use table::{interpolate, placeholders, TranslationTable};
pub use validator::{CoverageReport, TranslationValidator};
