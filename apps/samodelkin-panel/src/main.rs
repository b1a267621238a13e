mod api;
mod cli;
mod config;
mod error;
mod handlers;
mod services;
mod storage;
mod utils;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::backend::BackendClient;
use config::PanelConfig;
use error::PanelError;
use services::notification_service::NotificationService;
use services::simulation_service::SimulationService;
use services::stats_service::StatsService;
use storage::{FileStore, MemoryStore, SimulationStore};

#[derive(Clone)]
pub struct AppState {
    pub config: PanelConfig,
    pub backend: BackendClient,
    pub simulation: Arc<SimulationService>,
    pub stats: Arc<StatsService>,
    pub notifications: Arc<NotificationService>,
    pub system_stats: Arc<tokio::sync::Mutex<sysinfo::System>>,
}

#[derive(Parser)]
#[command(name = "samodelkin-panel")]
#[command(about = "Samodelkin community admin panel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the panel web server
    Serve,
    /// Administrative tools
    Admin {
        #[command(subcommand)]
        subcommand: AdminCommands,
    },
    /// Install the panel as a systemd service
    Install,
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Show panel connection information
    Info,
    /// Reset the counter simulation to its default state
    ResetSimulation,
}

async fn auth_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if state.config.admin_token.is_empty() {
        // No token configured: open panel for local installs
        return next.run(req).await;
    }

    let authorized = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token == state.config.admin_token)
        .unwrap_or(false);

    if authorized {
        next.run(req).await
    } else {
        PanelError::Unauthorized.into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/api/dashboard", get(handlers::admin::get_dashboard))
        .route("/api/statusbar", get(handlers::admin::get_statusbar))
        .route("/api/simulation", get(handlers::admin::get_simulation))
        .route("/api/simulation/history", get(handlers::admin::get_history))
        .route(
            "/api/simulation/online/toggle",
            post(handlers::admin::toggle_online),
        )
        .route(
            "/api/simulation/total/toggle",
            post(handlers::admin::toggle_total),
        )
        .route(
            "/api/simulation/total/increment",
            post(handlers::admin::increment_total),
        )
        .route(
            "/api/simulation/total/decrement",
            post(handlers::admin::decrement_total),
        )
        .route("/api/simulation/total/set", post(handlers::admin::set_total))
        .route("/api/simulation/reset", post(handlers::admin::reset_simulation))
        .route("/api/notifications", get(handlers::admin::list_notifications))
        .route(
            "/api/notifications/{id}/read",
            post(handlers::admin::mark_notification_read),
        )
        .route("/api/stats/content", get(handlers::admin::get_content_stats))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(handlers::public::health_check))
        .route("/api/stats/summary", get(handlers::public::stats_summary))
        .nest(&state.config.admin_prefix(), admin_routes)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::compression::CompressionLayer::new())
        .layer(tower_http::set_header::SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            axum::http::HeaderValue::from_static("nosniff"),
        ))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (optional outside packaged installs)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing
    let file_appender = tracing_appender::rolling::never(".", "panel.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "samodelkin_panel=debug,axum=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    let config = PanelConfig::load()?;

    match cli.command {
        Commands::Serve => run_server(config).await?,
        Commands::Admin { subcommand } => match subcommand {
            AdminCommands::Info => cli::print_info(&config),
            AdminCommands::ResetSimulation => cli::reset_simulation(&config)?,
        },
        Commands::Install => cli::install_service()?,
    }

    Ok(())
}

async fn run_server(config: PanelConfig) -> Result<()> {
    let backend = BackendClient::new(config.backend_url.clone(), config.backend_token.clone());

    let store: Arc<dyn SimulationStore> = if config.ephemeral {
        tracing::info!("Running with ephemeral simulation state (nothing persisted)");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::open(config.state_file()))
    };

    let simulation = Arc::new(SimulationService::new(store));
    if simulation.online_generator_running() {
        tracing::info!("Online simulation resumed from persisted state");
    }

    let stats = Arc::new(StatsService::new(backend.clone(), simulation.clone()));
    let notifications = Arc::new(NotificationService::new(backend.clone()));

    // Initialize System Monitor
    let mut sys = sysinfo::System::new_all();
    sys.refresh_all();
    let system_stats = Arc::new(tokio::sync::Mutex::new(sys));

    let state = AppState {
        config: config.clone(),
        backend,
        simulation,
        stats,
        notifications,
        system_stats,
    };

    // Start backend health watcher
    let monitoring_state = state.clone();
    tokio::spawn(async move {
        let monitor = services::monitoring::MonitoringService::new(monitoring_state);
        monitor.start().await;
    });

    let app = build_router(state);

    tracing::info!("Admin panel available at: {}", config.admin_prefix());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
