//! modqueue UI server - JSON and SSE surface for the moderation report view.

mod routes;
mod sse;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use axum::routing::get;
use clap::Parser;
use modqueue::io::config::load_config;
use modqueue::io::http::HttpReportsApi;
use modqueue::view::{Entry, ReportsView};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "modqueue-ui")]
#[command(about = "Web surface for aggregating and resolving moderation reports")]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value = "3001")]
    port: u16,

    /// Path to the modqueue config file
    #[arg(long, default_value = ".modqueue/config.toml")]
    config: PathBuf,

    /// Session token (overrides the config file)
    #[arg(long, env = "MODQUEUE_AUTH", hide_env_values = true)]
    auth: Option<String>,

    /// Directory containing UI static files
    #[arg(long)]
    ui_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("modqueue_ui=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let cfg = load_config(&args.config)?;
    let session = cfg.caller_session(args.auth);
    info!(instance = %cfg.instance_url, admin = session.is_admin(), "starting modqueue-ui");

    let api = HttpReportsApi::from_config(&cfg)?;
    let state = AppState::new(
        ReportsView::new(api, cfg.fetch_limit),
        session,
        cfg.site_name(),
    );

    if state.view.enter(&state.session).await == Entry::RedirectToLogin {
        warn!("no session token; report routes will answer 401 until restarted with --auth");
    }

    // Build router
    let api_router = routes::api_router();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .nest("/api", api_router)
        .route("/events", get(sse::events_handler))
        .layer(cors)
        .with_state(state);

    if let Some(ui_dir) = args.ui_dir {
        if ui_dir.exists() {
            info!(ui_dir = %ui_dir.display(), "serving static UI files");
            app = app
                .fallback_service(ServeDir::new(ui_dir).append_index_html_on_directories(true));
        } else {
            info!(ui_dir = %ui_dir.display(), "UI directory not found, API-only mode");
        }
    }

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
