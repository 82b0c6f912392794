mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(insiderdb_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = insiderdb_db::PoolConfig::from_app_config(&config);
    let pool = insiderdb_db::connect_pool(&config.database_url, pool_config).await?;
    insiderdb_db::run_migrations(&pool).await?;

    let edgar = Arc::new(insiderdb_edgar::EdgarClient::new(
        &config.sec_user_agent,
        config.request_timeout_secs,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?);
    let reddit = Arc::new(insiderdb_reddit::RedditClient::new(
        &config.sec_user_agent,
        config.request_timeout_secs,
    )?);
    let cik_map = Arc::new(insiderdb_edgar::CikMap::new(Duration::from_secs(
        config.cik_map_ttl_secs,
    )));

    let state = AppState {
        pool,
        edgar,
        reddit,
        cik_map,
        config: Arc::clone(&config),
    };

    let _scheduler = scheduler::build_scheduler(state.clone()).await?;

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
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
