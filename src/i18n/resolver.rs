//! Translation resolver: lazy, cached, fallback-aware lookup of translation
//! tables.
//!
//! The cache is an explicit object owned by the resolver (and shareable
//! through `Arc`), never ambient global state. Each (locale, namespace) pair
//! gets a `OnceCell` slot, so concurrent first loads of the same pair wait on
//! a single source fetch.

use crate::error::{Error, Result};
use crate::i18n::registry::Direction;
use crate::i18n::source::TranslationSource;
use crate::i18n::table::{interpolate, TranslationTable};
use crate::i18n::{Locale, Namespace, TranslationMetrics};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

/// Default upper bound on a single source fetch.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(2);

type Slot = Arc<OnceCell<Arc<TranslationTable>>>;

/// Cache of loaded translation tables keyed by (locale, namespace).
#[derive(Default)]
pub struct TranslationCache {
    slots: Mutex<HashMap<(Locale, Namespace), Slot>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<(Locale, Namespace), Slot>> {
        // Slots hold no invariants a panicking holder could break
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn slot(&self, locale: Locale, namespace: &Namespace) -> Slot {
        self.slots()
            .entry((locale, namespace.clone()))
            .or_default()
            .clone()
    }

    /// Forget a slot whose load failed, unless it was replaced or filled
    /// meanwhile. Failed pairs leave nothing behind in the map.
    fn discard_if_empty(&self, locale: Locale, namespace: &Namespace, slot: &Slot) {
        let mut slots = self.slots();
        let key = (locale, namespace.clone());
        let stale = slots
            .get(&key)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && !current.initialized());
        if stale {
            slots.remove(&key);
        }
    }

    /// Loaded table for the pair, if any.
    pub fn get(&self, locale: Locale, namespace: &Namespace) -> Option<Arc<TranslationTable>> {
        self.slots()
            .get(&(locale, namespace.clone()))
            .and_then(|slot| slot.get().cloned())
    }

    /// Number of loaded tables.
    pub fn len(&self) -> usize {
        self.slots()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries matching the filters (`None` matches everything) and
    /// return how many loaded tables went with them.
    ///
    /// A load already in flight for a dropped entry still completes for its
    /// waiters, but its result is not seen by later lookups.
    pub fn invalidate(&self, locale: Option<Locale>, namespace: Option<&Namespace>) -> usize {
        let mut dropped = 0;
        self.slots().retain(|(l, ns), slot| {
            let locale_matches = locale.map_or(true, |wanted| *l == wanted);
            let namespace_matches = namespace.map_or(true, |wanted| ns == wanted);
            let matches = locale_matches && namespace_matches;
            if matches && slot.initialized() {
                dropped += 1;
            }
            !matches
        });
        dropped
    }

    /// Number of (locale, namespace) slots held, loaded or not.
    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.slots().len()
    }

    pub fn clear(&self) {
        self.slots().clear();
    }
}

pub struct TranslationResolver {
    source: Arc<dyn TranslationSource>,
    cache: Arc<TranslationCache>,
    metrics: Arc<TranslationMetrics>,
    load_timeout: Duration,
}

impl TranslationResolver {
    pub fn new(source: Arc<dyn TranslationSource>) -> Self {
        Self {
            source,
            cache: Arc::new(TranslationCache::new()),
            metrics: Arc::new(TranslationMetrics::new()),
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }

    /// Use an externally owned cache (e.g. one shared with an admin tool).
    pub fn with_cache(mut self, cache: Arc<TranslationCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.metrics
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Cached table for exactly this pair, fetching it on first use.
    async fn load_exact(&self, locale: Locale, namespace: &Namespace) -> Result<Arc<TranslationTable>> {
        let slot = self.cache.slot(locale, namespace);
        if let Some(table) = slot.get() {
            self.metrics.record_cache_hit();
            return Ok(table.clone());
        }
        self.metrics.record_cache_miss();

        let loaded = slot
            .get_or_try_init(|| async {
                self.metrics.record_source_load();
                match tokio::time::timeout(self.load_timeout, self.source.fetch(locale, namespace)).await {
                    Ok(Ok(table)) => {
                        info!(
                            "Loaded {} translations for {}/{} from {}",
                            table.len(),
                            locale,
                            namespace,
                            self.source.describe()
                        );
                        Ok(Arc::new(table))
                    }
                    Ok(Err(e)) => {
                        self.metrics.record_source_failure();
                        Err(e)
                    }
                    Err(_) => {
                        self.metrics.record_source_failure();
                        Err(Error::load(
                            locale.code(),
                            namespace.as_str(),
                            format!("timed out after {:?}", self.load_timeout),
                        ))
                    }
                }
            })
            .await;

        match loaded {
            Ok(table) => Ok(table.clone()),
            Err(e) => {
                self.cache.discard_if_empty(locale, namespace, &slot);
                Err(e)
            }
        }
    }

    /// Load the table for (locale, namespace).
    ///
    /// A failure for a non-default locale is logged and answered with the
    /// default locale's table. The failure is not cached, so a later call
    /// tries the source again. A failure for the default locale is returned.
    pub async fn load(&self, locale: Locale, namespace: &Namespace) -> Result<Arc<TranslationTable>> {
        match self.load_exact(locale, namespace).await {
            Ok(table) => Ok(table),
            Err(e) if !locale.is_default() => {
                warn!("{}; falling back to {}", e, Locale::default_locale());
                self.metrics.record_fallback();
                self.load_exact(Locale::default_locale(), namespace).await
            }
            Err(e) => {
                error!("{}", e);
                Err(e)
            }
        }
    }

    /// Lookup handle bound to (locale, namespace), loading each table once.
    ///
    /// Fails only when no table could be loaded at all: the default locale's
    /// own table, or both the locale's table and its default fallback.
    pub async fn try_translator(&self, locale: Locale, namespace: &Namespace) -> Result<Translator> {
        let default = Locale::default_locale();

        let primary = self.load_exact(locale, namespace).await;
        if let Err(e) = &primary {
            if locale.is_default() {
                error!("{}", e);
            } else {
                warn!("{}; falling back to {}", e, default);
                self.metrics.record_fallback();
            }
        }

        let fallback = if locale == default {
            None
        } else {
            Some(self.load_exact(default, namespace).await)
        };
        if let Some(Err(e)) = &fallback {
            error!("{}", e);
        }

        let (primary, fallback) = match (primary, fallback) {
            (Err(e), None) | (Err(_), Some(Err(e))) => return Err(e),
            (primary, fallback) => (primary.ok(), fallback.and_then(|r| r.ok())),
        };

        Ok(Translator {
            locale,
            namespace: namespace.clone(),
            primary,
            fallback,
            metrics: self.metrics.clone(),
        })
    }

    /// Lookup handle bound to (locale, namespace). Never fails: tables that
    /// cannot be loaded are simply absent and lookups echo the key.
    pub async fn translator(&self, locale: Locale, namespace: &Namespace) -> Translator {
        match self.try_translator(locale, namespace).await {
            Ok(translator) => translator,
            Err(_) => Translator {
                locale,
                namespace: namespace.clone(),
                primary: None,
                fallback: None,
                metrics: self.metrics.clone(),
            },
        }
    }

    /// Localized text for `key`: the locale's value, else the default
    /// locale's value, else the key itself.
    pub async fn translate(&self, locale: Locale, namespace: &Namespace, key: &str) -> String {
        self.translator(locale, namespace).await.t(key)
    }

    /// `translate` followed by `{placeholder}` substitution.
    pub async fn translate_with(
        &self,
        locale: Locale,
        namespace: &Namespace,
        key: &str,
        args: &[(&str, &str)],
    ) -> String {
        self.translator(locale, namespace).await.t_with(key, args)
    }

    /// Warm the default locale's tables. Failures are logged and returned
    /// rather than aborting, since each one only affects its namespace.
    pub async fn preload(&self, namespaces: &[Namespace]) -> Vec<Error> {
        let default = Locale::default_locale();
        let results = join_all(namespaces.iter().map(|ns| self.load_exact(default, ns))).await;

        let failures: Vec<Error> = results.into_iter().filter_map(|r| r.err()).collect();
        for failure in &failures {
            error!("Preload failed: {}", failure);
        }
        info!(
            "Preloaded {}/{} namespaces for {}",
            namespaces.len() - failures.len(),
            namespaces.len(),
            default
        );
        failures
    }

    /// Drop cached tables matching the filters; returns how many were dropped.
    pub fn invalidate(&self, locale: Option<Locale>, namespace: Option<&Namespace>) -> usize {
        let dropped = self.cache.invalidate(locale, namespace);
        info!(
            "Invalidated {} cached translation tables (locale: {}, namespace: {})",
            dropped,
            locale.map_or("*".to_string(), |l| l.to_string()),
            namespace.map_or("*".to_string(), |ns| ns.to_string())
        );
        dropped
    }
}

/// Synchronous lookup handle for one (locale, namespace).
#[derive(Clone, Debug)]
pub struct Translator {
    locale: Locale,
    namespace: Namespace,
    primary: Option<Arc<TranslationTable>>,
    fallback: Option<Arc<TranslationTable>>,
    metrics: Arc<TranslationMetrics>,
}

impl Translator {
    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn direction(&self) -> Direction {
        self.locale.direction()
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.primary
            .as_deref()
            .and_then(|table| table.get(key))
            .or_else(|| self.fallback.as_deref().and_then(|table| table.get(key)))
    }

    /// Whether `key` resolves to text in either table.
    pub fn has(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    pub fn t(&self, key: &str) -> String {
        match self.lookup(key) {
            Some(text) => text.to_string(),
            None => {
                debug!("Missing translation key {}/{}: {}", self.locale, self.namespace, key);
                self.metrics.record_missing_key();
                key.to_string()
            }
        }
    }

    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(&self.t(key), args)
    }

    /// The effective table: default values overlaid with the locale's own.
    pub fn merged(&self) -> TranslationTable {
        let mut merged = TranslationTable::new();
        for table in [&self.fallback, &self.primary].into_iter().flatten() {
            for (key, text) in table.entries() {
                merged.insert(key.clone(), text.clone());
            }
        }
        merged
    }
}
