//! Translation sources: opaque providers of key→text data per
//! (locale, namespace).

use crate::error::{Error, Result};
use crate::i18n::{Locale, Namespace, TranslationTable};
use crate::retry::{with_retry_if, RetryConfig};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait TranslationSource: Send + Sync {
    /// Fetch the table for one (locale, namespace) pair.
    async fn fetch(&self, locale: Locale, namespace: &Namespace) -> Result<TranslationTable>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

// ==================== Directory Source ====================

/// Reads `{root}/{locale}/{namespace}.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, locale: Locale, namespace: &Namespace) -> PathBuf {
        self.root
            .join(locale.code())
            .join(format!("{}.json", namespace))
    }

    /// Namespaces that have a file for `locale`, sorted by name.
    pub fn namespaces(&self, locale: Locale) -> std::io::Result<Vec<Namespace>> {
        let mut namespaces = Vec::new();
        for entry in std::fs::read_dir(self.root.join(locale.code()))? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(ns) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| Namespace::new(stem).ok())
            {
                namespaces.push(ns);
            }
        }
        namespaces.sort();
        Ok(namespaces)
    }
}

#[async_trait]
impl TranslationSource for DirectorySource {
    async fn fetch(&self, locale: Locale, namespace: &Namespace) -> Result<TranslationTable> {
        let path = self.path_for(locale, namespace);
        debug!("Reading translations from {}", path.display());

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::load(locale.code(), namespace.as_str(), format!("{}: {}", path.display(), e)))?;

        TranslationTable::from_json_str(&text)
            .map_err(|e| Error::load(locale.code(), namespace.as_str(), format!("{}: {}", path.display(), e)))
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

// ==================== Remote Source ====================

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("translation server returned {0}")]
    Status(StatusCode),
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    #[error("malformed translation document: {0}")]
    Body(String),
}

/// Retry 429, 5xx, and transport failures. Other 4xx and malformed bodies
/// will not get better on a second attempt.
fn is_retryable(error: &FetchError) -> bool {
    match error {
        FetchError::Status(status) => {
            *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
        }
        FetchError::Transport(_) => true,
        FetchError::Body(_) => false,
    }
}

/// Fetches `GET {base_url}/{locale}/{namespace}.json`.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl RemoteSource {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::translation_fetch(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn url_for(&self, locale: Locale, namespace: &Namespace) -> String {
        format!("{}/{}/{}.json", self.base_url, locale.code(), namespace)
    }
}

#[async_trait]
impl TranslationSource for RemoteSource {
    async fn fetch(&self, locale: Locale, namespace: &Namespace) -> Result<TranslationTable> {
        let url = self.url_for(locale, namespace);

        with_retry_if(
            &self.retry,
            &format!("Translation fetch {}/{}", locale, namespace),
            || async {
                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(FetchError::Transport)?;

                if !response.status().is_success() {
                    return Err(FetchError::Status(response.status()));
                }

                let text = response.text().await.map_err(FetchError::Transport)?;
                TranslationTable::from_json_str(&text).map_err(FetchError::Body)
            },
            is_retryable,
        )
        .await
        .map_err(|e| Error::load(locale.code(), namespace.as_str(), e))
    }

    fn describe(&self) -> String {
        format!("remote {}", self.base_url)
    }
}

// ==================== Memory Source ====================

/// In-memory source for embedded tables and tests.
///
/// Counts fetches and can simulate latency or failures per pair.
#[derive(Default)]
pub struct MemorySource {
    tables: Mutex<HashMap<(Locale, Namespace), TranslationTable>>,
    failing: Mutex<Vec<(Locale, Namespace)>>,
    latency: Option<Duration>,
    fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_table(self, locale: Locale, namespace: &Namespace, table: TranslationTable) -> Self {
        self.insert(locale, namespace, table);
        self
    }

    /// Replace the table for a pair (visible after invalidation).
    pub fn insert(&self, locale: Locale, namespace: &Namespace, table: TranslationTable) {
        self.tables
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((locale, namespace.clone()), table);
    }

    /// Make every fetch for the pair fail.
    pub fn fail(&self, locale: Locale, namespace: &Namespace) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((locale, namespace.clone()));
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationSource for MemorySource {
    async fn fetch(&self, locale: Locale, namespace: &Namespace) -> Result<TranslationTable> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let key = (locale, namespace.clone());
        if self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&key)
        {
            return Err(Error::load(locale.code(), namespace.as_str(), "source unavailable"));
        }

        self.tables
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::load(locale.code(), namespace.as_str(), "no such table"))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
