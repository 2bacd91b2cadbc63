//! Client-side locale state.
//!
//! Translators are (re)loaded only when the active locale actually changes.
//! Lookups in between are plain synchronous reads. Subscribers observe
//! changes through a `watch` channel.

use crate::i18n::resolver::{TranslationResolver, Translator};
use crate::i18n::{Locale, Namespace};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

pub struct LocaleSession {
    resolver: Arc<TranslationResolver>,
    namespaces: Vec<Namespace>,
    active: Locale,
    translators: HashMap<Namespace, Translator>,
    changes: watch::Sender<Locale>,
}

impl LocaleSession {
    /// Start a session in `locale` with translators for `namespaces`.
    pub async fn start(
        resolver: Arc<TranslationResolver>,
        locale: Locale,
        namespaces: Vec<Namespace>,
    ) -> Self {
        let translators = load_translators(&resolver, locale, &namespaces).await;
        let (changes, _) = watch::channel(locale);

        Self {
            resolver,
            namespaces,
            active: locale,
            translators,
            changes,
        }
    }

    pub fn locale(&self) -> Locale {
        self.active
    }

    /// Receiver that yields the active locale after each change.
    pub fn subscribe(&self) -> watch::Receiver<Locale> {
        self.changes.subscribe()
    }

    /// Switch to `locale`. Returns `false` without doing any work when it is
    /// already active.
    pub async fn change_locale(&mut self, locale: Locale) -> bool {
        if locale == self.active {
            debug!("Locale {} already active", locale);
            return false;
        }

        let translators = load_translators(&self.resolver, locale, &self.namespaces).await;
        info!("Locale changed from {} to {}", self.active, locale);
        self.translators = translators;
        self.active = locale;
        self.changes.send_replace(locale);
        true
    }

    pub fn translator(&self, namespace: &Namespace) -> Option<&Translator> {
        self.translators.get(namespace)
    }

    /// Lookup in the active locale. Namespaces outside the session echo the key.
    pub fn t(&self, namespace: &Namespace, key: &str) -> String {
        self.translators
            .get(namespace)
            .map_or_else(|| key.to_string(), |translator| translator.t(key))
    }
}

async fn load_translators(
    resolver: &TranslationResolver,
    locale: Locale,
    namespaces: &[Namespace],
) -> HashMap<Namespace, Translator> {
    let translators = join_all(namespaces.iter().map(|ns| resolver.translator(locale, ns))).await;
    namespaces.iter().cloned().zip(translators).collect()
}
