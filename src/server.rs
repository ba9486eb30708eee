//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, seed data loading, probe worker spawning and
//! the Axum server lifecycle.

use crate::config::Config;
use crate::domain::probe_worker::{ProbeExecutor, ProbeScheduler, run_probe_worker};
use crate::domain::repositories::OrganizationDirectory;
use crate::infrastructure::http::RedirectClient;
use crate::infrastructure::organizations::JsonOrganizationDirectory;
use crate::infrastructure::persistence::Repositories;
use crate::routes::app_router;
use crate::state::{AppState, Components};
use crate::utils::address_generator::AddressGenerator;
use crate::utils::domain_name::DomainLabeler;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Connects to PostgreSQL and applies migrations, or falls back to the
/// in-memory store when no database is configured.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect_repositories(config: &Config) -> Result<Repositories> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("No database configured, using in-memory store");
        return Ok(Repositories::in_memory());
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    Ok(Repositories::postgres(Arc::new(pool)))
}

/// Loads seed data and builds the service components.
///
/// # Errors
///
/// Returns an error if the public suffix list or a name list cannot be read.
/// A missing or malformed organization file only logs an error.
pub fn load_components(config: &Config, repositories: Repositories) -> Result<Components> {
    let labeler = match &config.public_suffix_list {
        Some(path) => DomainLabeler::from_file(path)
            .with_context(|| format!("Failed to load public suffix list {}", path.display()))?,
        None => {
            tracing::warn!("No public suffix list configured, labeling by last two host labels");
            DomainLabeler::new()
        }
    };

    let organizations: Arc<dyn OrganizationDirectory> = Arc::new(
        JsonOrganizationDirectory::load_or_empty(config.organization_domains.as_deref()),
    );

    let generator = match (&config.first_names, &config.surnames) {
        (Some(first), Some(last)) => AddressGenerator::from_files(first, last)
            .context("Failed to load name lists")?,
        _ => AddressGenerator::default(),
    };

    let rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    Ok(Components {
        repositories,
        labeler: Arc::new(labeler),
        organizations,
        generator: Arc::new(generator),
        mail_domain: config.mail_domain.clone(),
        rng,
    })
}

/// Creates the probe queue and spawns the worker draining it.
///
/// The worker stops once every clone of the returned scheduler is dropped
/// and the queued probes have run.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn spawn_probe_worker(
    config: &Config,
    components: &Components,
) -> Result<(ProbeScheduler, JoinHandle<()>)> {
    let client = RedirectClient::new().context("Failed to build redirect client")?;
    let executor = Arc::new(ProbeExecutor::new(
        Arc::new(client),
        components.repositories.redirects.clone(),
        components.recorder(),
    ));

    let (scheduler, rx) = ProbeScheduler::channel(config.probe_queue_capacity);
    let handle = tokio::spawn(run_probe_worker(
        rx,
        executor,
        config.probe_workers,
        config.probe_delay(),
    ));
    tracing::info!(workers = config.probe_workers, "Probe worker started");

    Ok((scheduler, handle))
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Storage initialization fails
/// - Seed data cannot be loaded
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repositories = connect_repositories(&config).await?;
    let components = load_components(&config, repositories)?;
    let (scheduler, _worker) = spawn_probe_worker(&config, &components)?;

    let state = AppState::new(components, scheduler);
    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
