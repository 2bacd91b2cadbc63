use anyhow::{Context, Result};
use skatepark_locale::config::{Config, SourceConfig};
use skatepark_locale::i18n::{DirectorySource, RemoteSource, TranslationResolver, TranslationSource};
use skatepark_locale::router::LocaleRouter;
use skatepark_locale::server::{build_app, AppState};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skatepark_locale=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!("Starting skatepark locale service");

    // Missing configuration is fatal here, before anything is served
    let config = Config::from_env().context("Invalid configuration")?;

    let source: Arc<dyn TranslationSource> = match &config.translation_source {
        SourceConfig::Directory(dir) => Arc::new(DirectorySource::new(dir)),
        SourceConfig::Remote(url) => Arc::new(RemoteSource::new(reqwest::Client::new(), url)),
    };
    let resolver = Arc::new(TranslationResolver::new(source).with_load_timeout(config.load_timeout));
    info!("Translations from {}", resolver.source_description());

    let failures = resolver.preload(&config.preload_namespaces).await;
    if !failures.is_empty() {
        warn!(
            "{} namespaces failed to preload; their pages will show raw keys until the source recovers",
            failures.len()
        );
    }

    if config.admin_api_key.is_none() {
        info!("ADMIN_API_KEY not set, cache invalidation endpoint disabled");
    }

    let state = AppState {
        resolver,
        router: LocaleRouter::new(config.exempt_prefixes.clone()),
        admin_api_key: config.admin_api_key.as_deref().map(Arc::from),
    };
    let app = build_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("✓ Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
