mod api;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = postpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = postpulse_db::PoolConfig::from_app_config(&config);
    let pool = postpulse_db::connect_pool(&config.database_url, pool_config).await?;
    postpulse_db::run_migrations(&pool).await?;

    let scraper = Arc::new(postpulse_scraper::HarvestClient::with_base_url(
        &config.harvest_api_token,
        &config.harvest_actor,
        config.harvest_request_timeout_secs,
        &config.harvest_base_url,
    )?);
    let ingest = postpulse_ingest::IngestConfig::from_app_config(&config);

    let app = build_app(AppState {
        pool,
        scraper,
        ingest,
        default_max_posts: config.default_max_posts,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "postpulse server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
