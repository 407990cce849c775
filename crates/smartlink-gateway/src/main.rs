mod cli;

use crate::cli::{LogFormat, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use smartlink_core::{LinkEvents, Repository, SystemClock};
use smartlink_gateway::{App, AppState, RESERVED_PATHS};
use smartlink_generator::RandomGenerator;
use smartlink_metrics::PrometheusEvents;
use smartlink_redirector::RedirectorService;
use smartlink_shortener::{LinkService, ShortenerSettings};
use smartlink_storage::{InMemoryRepository, SqliteRepository};
use smartlink_sweeper::{ExpirySweeper, SweeperSettings};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        storage_backend = %config.storage,
        sweep_interval_secs = config.sweep_interval_secs,
        code_length = config.code_length,
        "starting smartlink gateway"
    );

    match config.storage {
        StorageBackendArg::InMemory => run_server(&config, InMemoryRepository::new()).await,
        StorageBackendArg::Sqlite => {
            let repository = SqliteRepository::connect(&config.sqlite_url)
                .await
                .with_context(|| format!("failed to open sqlite database {}", config.sqlite_url))?;
            run_server(&config, repository).await
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run_server<R: Repository>(config: &CLI, repository: R) -> anyhow::Result<()> {
    let repository = Arc::new(repository);
    let metrics = Arc::new(PrometheusEvents::new().context("failed to register metrics")?);
    let events: Arc<dyn LinkEvents> = metrics.clone();
    let clock = Arc::new(SystemClock);

    let generator =
        RandomGenerator::with_length(config.code_length).context("invalid --code-length")?;
    let shortener = LinkService::with_settings(
        repository.clone(),
        generator,
        events.clone(),
        ShortenerSettings::builder().reserved(RESERVED_PATHS).build(),
    );
    let redirector = RedirectorService::new(repository.clone(), events.clone());

    let sweeper = ExpirySweeper::new(
        repository,
        events,
        clock.clone(),
        SweeperSettings::builder()
            .interval(Duration::from_secs(config.sweep_interval_secs))
            .build(),
    );

    let state = AppState::builder()
        .shortener(Arc::new(shortener))
        .redirector(Arc::new(redirector))
        .metrics(metrics)
        .clock(clock)
        .base_url(config.public_base_url.clone())
        .build();

    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
    let sweeper = tokio::spawn(sweeper.run_until(async move {
        let mut stop_rx = stop_rx;
        let _ = stop_rx.wait_for(|stopped| *stopped).await;
    }));

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    let _ = stop_tx.send(true);
    sweeper.await.context("expiry sweeper panicked")?;

    info!("smartlink gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
