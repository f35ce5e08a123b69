//! Extension host binary.
//!
//! Startup order: config first, then extension discovery, listener last.
//! Any startup error is fatal; a host missing capabilities must not
//! come up looking healthy.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use extension_host::config::{load_config, HostConfig};
use extension_host::extensions::{ExtensionLoader, HandlerCatalog};
use extension_host::lifecycle::signals;
use extension_host::{HostRegistry, HttpServer, ShutdownCoordinator};

#[derive(Parser)]
#[command(name = "extension-host")]
#[command(about = "Request-dispatch host for pluggable backend extensions", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "host.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        HostConfig::default()
    };

    // Initialize tracing subscriber; RUST_LOG wins over the config level.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        config = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        platform_url = %config.platform.base_url,
        extensions_dir = %config.extensions.root_dir,
        dev_artifacts = config.extensions.dev_artifacts,
        "Configuration loaded"
    );

    // Discover extensions before the listener exists; registries are
    // frozen once serving begins.
    let mut registry = HostRegistry::new();
    let loader = ExtensionLoader::new(
        &config.extensions.root_dir,
        config.extensions.dev_artifacts,
        Arc::new(HandlerCatalog::new()),
    );
    let summary = loader.load_all(&mut registry)?;
    tracing::info!(
        hooks = summary.hooks,
        proxies = summary.proxies,
        customizes = summary.customizes,
        functions = summary.functions,
        "Extensions loaded"
    );
    let registry = Arc::new(registry);

    let shutdown = Arc::new(ShutdownCoordinator::new(config.shutdown.grace()));
    signals::spawn_signal_listener(Arc::clone(&shutdown));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config, registry, shutdown)?;
    server.run(listener).await?;

    Ok(())
}
