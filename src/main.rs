use std::sync::Arc;

use product_recommender::{
    config::{CatalogSource, Config},
    db::{create_pool, create_redis_client, Cache, CacheWriterHandle},
    routes::{create_router, AppState},
    services::{
        catalog::{CachedCatalog, DemoCatalog, PostgresCatalog},
        providers::GroqProvider,
        AiRecommender, AiSettings, CatalogProvider, RecommendationEngine,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("product_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let engine = build_engine(&config)?;
    let (catalog, cache_writer) = build_catalog(&config).await?;

    tracing::info!(
        catalog = catalog.name(),
        ai_enabled = engine.ai_enabled(),
        cached = cache_writer.is_some(),
        "Application state initialized"
    );

    let app = create_router(Arc::new(AppState::new(engine, catalog)));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(writer) = cache_writer {
        writer.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Builds the engine with one shared AI client, or fallback-only without a key
fn build_engine(config: &Config) -> anyhow::Result<RecommendationEngine> {
    let caps = config.candidate_profile.caps();

    let Some(api_key) = config.groq_api_key.clone() else {
        tracing::warn!("GROQ_API_KEY not set, running with fallback ranking only");
        return Ok(RecommendationEngine::fallback_only(caps));
    };

    let provider = GroqProvider::new(
        api_key,
        config.groq_api_url.clone(),
        config.groq_model.clone(),
        config.ai_timeout(),
    )?;

    let ai = AiRecommender::new(
        Arc::new(provider),
        AiSettings {
            max_tokens: config.ai_max_tokens,
            temperature: config.ai_temperature,
            timeout: config.ai_timeout(),
        },
    );

    tracing::info!(
        provider = ai.provider_name(),
        model = %config.groq_model,
        "AI recommender initialized"
    );

    Ok(RecommendationEngine::new(Some(ai), caps))
}

async fn build_catalog(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CatalogProvider>, Option<CacheWriterHandle>)> {
    let catalog: Arc<dyn CatalogProvider> = match config.catalog_source {
        CatalogSource::Demo => Arc::new(DemoCatalog::new()),
        CatalogSource::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres catalog"))?;
            Arc::new(PostgresCatalog::new(create_pool(database_url).await?))
        }
    };

    let Some(redis_url) = config.redis_url.as_deref() else {
        return Ok((catalog, None));
    };

    let (cache, writer) = Cache::new(create_redis_client(redis_url)?).await?;
    let cached = CachedCatalog::new(catalog, Arc::new(cache), config.catalog_cache_ttl_secs);

    Ok((Arc::new(cached), Some(writer)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
