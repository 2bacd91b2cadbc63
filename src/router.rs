//! Locale router: decides, for every inbound request, whether it already
//! targets a locale (`/{locale}/...`) or must be redirected to one.
//!
//! The decision is a pure function of the registry, the path, and the
//! `Accept-Language` header. The router never fails and never serves content.

use crate::i18n::Locale;
use axum::extract::{Request, State};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;
use tracing::debug;

/// Path prefixes that are never redirected besides `/api`.
pub const DEFAULT_EXEMPT_PREFIXES: &[&str] = &["/_next", "/_vercel", "/static"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// The path starts with a registered locale.
    PassThrough(Locale),
    /// No locale prefix; redirect to this location.
    Redirect(String),
    /// Assets, API routes, and files are left alone.
    Exempt,
}

#[derive(Debug, Clone)]
pub struct LocaleRouter {
    exempt_prefixes: Arc<[String]>,
}

impl Default for LocaleRouter {
    fn default() -> Self {
        Self::new(DEFAULT_EXEMPT_PREFIXES.iter().map(|p| p.to_string()).collect())
    }
}

impl LocaleRouter {
    pub fn new(exempt_prefixes: Vec<String>) -> Self {
        let exempt_prefixes: Vec<String> = exempt_prefixes
            .into_iter()
            .map(|p| p.trim().trim_end_matches('/').to_string())
            .filter(|p| p.starts_with('/') && p.len() > 1)
            .collect();
        Self {
            exempt_prefixes: exempt_prefixes.into(),
        }
    }

    /// API routes, internal asset prefixes, and paths ending in a file name
    /// with an extension.
    pub fn is_exempt(&self, path: &str) -> bool {
        if has_prefix(path, "/api") {
            return true;
        }
        if self
            .exempt_prefixes
            .iter()
            .any(|prefix| has_prefix(path, prefix))
        {
            return true;
        }

        let last_segment = path.rsplit('/').next().unwrap_or("");
        matches!(last_segment.rsplit_once('.'), Some((_, ext)) if !ext.is_empty())
    }

    pub fn decide(&self, path: &str, query: Option<&str>, accept_language: Option<&str>) -> RouteDecision {
        if self.is_exempt(path) {
            return RouteDecision::Exempt;
        }

        if let Some(locale) = locale_prefix(path) {
            return RouteDecision::PassThrough(locale);
        }

        let target = negotiate(accept_language);
        RouteDecision::Redirect(redirect_location(target, path, query))
    }
}

fn has_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Locale named by the first path segment, if it is exactly a registered code.
pub fn locale_prefix(path: &str) -> Option<Locale> {
    let segment = path.strip_prefix('/').unwrap_or(path).split('/').next()?;
    Locale::from_code(segment).ok()
}

/// Locale named by the primary subtag of the first `Accept-Language` entry.
///
/// Weights and later entries are ignored. Malformed or unsupported values
/// yield `None`.
pub fn preferred_locale(accept_language: Option<&str>) -> Option<Locale> {
    let first = accept_language?.split(',').next()?;
    let tag = first.split(';').next()?.trim();
    let primary = tag.split(['-', '_']).next()?.to_ascii_lowercase();
    Locale::from_code(&primary).ok()
}

/// Preferred locale, else the registry default.
pub fn negotiate(accept_language: Option<&str>) -> Locale {
    preferred_locale(accept_language).unwrap_or_else(Locale::default_locale)
}

/// `/{locale}` followed by the original path (`/` adds nothing) and query.
pub fn redirect_location(locale: Locale, path: &str, query: Option<&str>) -> String {
    let mut location = format!("/{}", locale.code());
    if !path.is_empty() && path != "/" {
        if !path.starts_with('/') {
            location.push('/');
        }
        location.push_str(path);
    }
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(query);
    }
    location
}

/// Axum middleware applying [`LocaleRouter::decide`].
///
/// Pass-through requests carry the resolved `Locale` as a request extension.
pub async fn locale_middleware(
    State(router): State<LocaleRouter>,
    mut request: Request,
    next: Next,
) -> Response {
    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    let decision = router.decide(request.uri().path(), request.uri().query(), accept_language);

    match decision {
        RouteDecision::PassThrough(locale) => {
            request.extensions_mut().insert(locale);
            next.run(request).await
        }
        RouteDecision::Redirect(location) => {
            debug!("Redirecting {} to {}", request.uri(), location);
            Redirect::temporary(&location).into_response()
        }
        RouteDecision::Exempt => next.run(request).await,
    }
}
