use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use qiita_api::config::ServerConfig;
use qiita_api::router::build_app_router;
use qiita_api::state::AppState;
use qiita_db::{DbPool, PgCatalog};
use qiita_jobs::{QueueDispatcher, RedisJobStore};

const DEFAULT_LOG_FILTER: &str = "qiita_api=debug,qiita_jobs=debug,tower_http=debug";

/// `RUST_LOG` filtering; `LOG_FORMAT=json` for JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Connect to the catalog, check it answers and bring the schema up to date.
async fn open_catalog(database_url: &str) -> DbPool {
    let pool = qiita_db::create_pool(database_url)
        .await
        .expect("Failed to connect to the catalog database");
    qiita_db::health_check(&pool)
        .await
        .expect("Catalog database health check failed");
    qiita_db::run_migrations(&pool)
        .await
        .expect("Failed to run catalog migrations");
    tracing::info!("Catalog database ready");
    pool
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        upload_dir = %config.upload_dir.display(),
        "Loaded server configuration"
    );

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = open_catalog(&database_url).await;

    let job_store = Arc::new(
        RedisJobStore::connect(&config.redis_url)
            .await
            .expect("Failed to connect to the job status store"),
    );
    tracing::info!(redis_url = %config.redis_url, "Job status store connected");

    let state = AppState {
        catalog: Arc::new(PgCatalog::new(pool.clone())),
        config: Arc::new(config.clone()),
        dispatcher: Arc::new(QueueDispatcher::new(job_store.clone())),
        job_store,
    };
    let app = build_app_router(state, &config);

    let host = config.host.parse().expect("HOST must be an IP address");
    let addr = SocketAddr::new(host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind the listen address");
    tracing::info!(%addr, "Study portal listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Shut down");
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.expect("Failed to install Ctrl-C handler");
                tracing::info!("SIGINT received, draining connections");
            }
            _ = terminate.recv() => {
                tracing::info!("SIGTERM received, draining connections");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
        tracing::info!("Ctrl-C received, draining connections");
    }
}
