use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use lookout::api;
use lookout::config::Config;
use lookout::engine::{BotRegistry, VisitScanner};

/// Visit-log analytics dashboard.
#[derive(Parser, Debug)]
#[command(name = "lookout")]
#[command(about = "Scans per-service visit logs and serves aggregated counts", long_about = None)]
struct Args {
    /// Bind host (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Services root directory (overrides SERVICES_ROOT)
    #[arg(long)]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    // Load configuration, then apply CLI overrides
    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(root) = args.root {
        config.logs.services_root = root.to_string_lossy().into_owned();
    }
    info!("Loaded configuration");

    let root = PathBuf::from(&config.logs.services_root);

    // The bot registry lives for the whole process; every request's
    // classification pass shares it.
    let bots = Arc::new(BotRegistry::new());
    let scanner = Arc::new(VisitScanner::new(root.clone(), bots));

    let router = api::create_router(Arc::clone(&scanner), config.frontend.clone());

    if let Some(ref static_dir) = config.frontend.static_dir {
        info!("🎨 Serving frontend from directory: {}", static_dir);
    } else {
        info!("🎨 Serving embedded frontend");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Dashboard listening on http://{}", addr);
    info!("   - Scanning services under {}", root.display());

    axum::serve(listener, router).await?;

    Ok(())
}
