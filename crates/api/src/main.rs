use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};

use catalog_api::{AppServices, serve};
use catalog_auth::{AuthGate, Authenticator};
use catalog_infra::config::{AppConfig, load_config, resolve_path};
use catalog_infra::db;

#[derive(Debug, Parser)]
#[command(name = "catalog-api", version, about = "Product and subscription plan gRPC service")]
struct Cli {
    /// Config file (default: $CONFIG_PATH, then etc/config.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Run the gRPC server (default).
    Server,
    /// Load and validate the configuration, then exit.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let path = resolve_path(cli.config.as_deref());
    let config = load_config(&path).with_context(|| format!("loading {}", path.display()))?;

    catalog_observability::tracing::init(&config.log);

    match cli.command.unwrap_or(Command::Server) {
        Command::CheckConfig => {
            info!(path = %path.display(), "configuration is valid");
            println!("{}: ok", path.display());
            Ok(())
        }
        Command::Server => run(config).await,
    }
}

async fn run(mut config: AppConfig) -> anyhow::Result<()> {
    info!(
        app = %config.app.name,
        version = %config.app.version,
        env = %config.app.env,
        "starting"
    );

    let credentials = config
        .auth
        .take_credential_store()
        .context("loading API users")?;
    let authenticator = Authenticator::new(Arc::new(credentials));
    if authenticator.usernames().is_empty() {
        warn!("no API users configured; every authenticated call will be rejected");
    }
    let gate = AuthGate::with_bypass_suffix(authenticator, config.auth.bypass_suffix.clone());

    let pool = db::connect(&config.database)
        .await
        .context("connecting to postgres")?;
    if config.database.run_migrations {
        db::migrate(&pool).await.context("applying schema")?;
    }

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    serve(AppServices::postgres(pool.clone()), gate, listener, shutdown_signal()).await?;
    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown signal received");
}
