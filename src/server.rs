//! HTTP surface: locale middleware in front of a demonstration page handler
//! and the translation JSON API.

use crate::error::{Error, Result};
use crate::i18n::{Locale, Namespace, TranslationResolver};
use crate::router::{locale_middleware, LocaleRouter};
use crate::security::bearer_matches;
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_LANGUAGE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<TranslationResolver>,
    pub router: LocaleRouter,
    pub admin_api_key: Option<Arc<str>>,
}

pub fn build_app(state: AppState) -> Router {
    let locale_router = state.router.clone();

    Router::new()
        .route("/api/health", get(health))
        .route("/api/i18n/metrics", get(metrics))
        .route("/api/i18n/invalidate", post(invalidate))
        .route("/api/i18n/:locale/:namespace", get(translations))
        .route("/:locale", get(page))
        .route("/:locale/*rest", get(page))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(locale_router, locale_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> Error {
    Error::NotFound("no such page".to_string())
}

/// Locale-prefixed page. The middleware has already attached the `Locale`;
/// exempt paths that land here (e.g. `/logo.png`) have none.
async fn page(State(state): State<AppState>, locale: Option<Extension<Locale>>) -> Result<Response> {
    let Extension(locale) = locale.ok_or_else(|| Error::NotFound("no such page".to_string()))?;
    let common = Namespace::new("common")?;
    let t = state.resolver.translator(locale, &common).await;

    let alternates: String = Locale::all()
        .into_iter()
        .filter(|other| *other != locale)
        .map(|other| {
            format!(
                r#"<a href="/{}" hreflang="{}">{}</a>"#,
                other.code(),
                other.code(),
                escape_html(other.native_name())
            )
        })
        .collect();

    let body = format!(
        r#"<!DOCTYPE html>
<html lang="{lang}" dir="{dir}">
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<h1>{title}</h1>
<p>{tagline}</p>
<nav>{alternates}</nav>
</body>
</html>"#,
        lang = locale.code(),
        dir = locale.direction().as_str(),
        title = escape_html(&t.t("title")),
        tagline = escape_html(&t.t("tagline")),
        alternates = alternates,
    );

    Ok(([(CONTENT_LANGUAGE, locale.code())], Html(body)).into_response())
}

/// Effective table for (locale, namespace) as JSON, default values included.
async fn translations(
    State(state): State<AppState>,
    Path((locale, namespace)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let locale = Locale::from_code(&locale)?;
    let namespace = Namespace::new(&namespace)?;

    let translator = state.resolver.try_translator(locale, &namespace).await?;

    Ok(Json(json!({
        "locale": locale,
        "namespace": namespace,
        "direction": locale.direction(),
        "messages": translator.merged().entries(),
    })))
}

async fn metrics(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "source": state.resolver.source_description(),
        "cached_tables": state.resolver.cache().len(),
        "translations": state.resolver.metrics().report(),
    }))
}

#[derive(Debug, Deserialize)]
struct InvalidateParams {
    locale: Option<String>,
    namespace: Option<String>,
}

async fn invalidate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<InvalidateParams>,
) -> Result<Response> {
    let Some(expected) = state.admin_api_key.as_deref() else {
        return Err(Error::NotFound("no such page".to_string()));
    };

    if !bearer_matches(&headers, expected) {
        warn!("Rejected cache invalidation with a bad admin key");
        return Ok((StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))).into_response());
    }

    let locale = params.locale.as_deref().map(Locale::from_code).transpose()?;
    let namespace = params.namespace.as_deref().map(Namespace::new).transpose()?;
    let invalidated = state.resolver.invalidate(locale, namespace.as_ref());

    Ok(Json(json!({ "invalidated": invalidated })).into_response())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"פארק\" & 'ramp'</b>"), "&lt;b&gt;&quot;פארק&quot; &amp; &#39;ramp&#39;&lt;/b&gt;");
        assert_eq!(escape_html("סקייטפארק"), "סקייטפארק");
    }
}
