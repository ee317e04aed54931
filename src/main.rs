mod core;
mod features;
mod shared;

use crate::core::config::Config;
use crate::core::router::{build_router, AppServices};
use crate::features::map::{LeafletCanvas, MapService};
use crate::features::reports::{ReportService, SeedLoader};
use crate::features::submissions::{HttpFormEndpoint, SubmissionService};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Initialize Report Service and load static data
    let report_service = Arc::new(ReportService::new());
    let seed_loader =
        SeedLoader::new().map_err(|e| anyhow::anyhow!("Failed to build seed loader: {}", e))?;
    let records = match seed_loader.load(&config.data.seed_source).await {
        Ok(records) => records,
        Err(e) => {
            // The page still works with an empty list
            tracing::error!("Error loading city data: {}", e);
            Vec::new()
        }
    };
    let seeded = report_service.load_seed(records).await;
    tracing::info!(
        "Report service initialized with {} reports from {}",
        seeded.len(),
        config.data.seed_source
    );

    // Initialize Map Service
    let map_service = Arc::new(MapService::new(
        config.map.clone(),
        Box::new(LeafletCanvas::new()),
    ));
    map_service.place_report_markers(&seeded).await;
    tracing::info!("Map service initialized");

    // Initialize Submission Service
    let form_endpoint = Arc::new(
        HttpFormEndpoint::new(&config.form_endpoint)
            .map_err(|e| anyhow::anyhow!("Failed to create form endpoint client: {}", e))?,
    );
    let submission_service = Arc::new(SubmissionService::new(
        form_endpoint,
        Arc::clone(&report_service),
        Arc::clone(&map_service),
    ));
    tracing::info!(
        "Submission service initialized (form endpoint: {}, timeout: {:?})",
        config.form_endpoint.url,
        config.form_endpoint.timeout
    );

    let app = build_router(
        AppServices {
            report_service,
            map_service,
            submission_service,
        },
        config.app.cors_allowed_origins.clone(),
    );

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "OpenAPI document available at {}",
        format!("http://{}/api-docs/openapi.json", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
