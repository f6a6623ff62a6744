use clap::Parser;
use dotenvy::dotenv;
use favameal_service::{build_pool, establish_connection, run_migrations};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod error;
mod handlers;
mod models;

use config::{Cli, Commands, ServeArgs};
use handlers::{AppState, app};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Migrate(args) => {
            let applied = tokio::task::spawn_blocking(move || -> Result<usize, BoxError> {
                let mut conn = establish_connection(&args.database_url)?;
                Ok(run_migrations(&mut conn)?)
            })
            .await??;
            info!(applied, "migrations complete");
            Ok(())
        }
        Commands::Serve(args) => serve(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<(), BoxError> {
    let database_url = args.database.database_url;
    let pool = tokio::task::spawn_blocking(move || build_pool(&database_url)).await??;

    if !args.skip_migrations {
        let pool = pool.clone();
        tokio::task::spawn_blocking(move || -> Result<usize, BoxError> {
            let mut conn = pool.get()?;
            Ok(run_migrations(&mut conn)?)
        })
        .await??;
    }

    let state = AppState::new(pool, &args.secret_key);

    let listener = tokio::net::TcpListener::bind(args.listen_addr).await?;
    info!("Favameal API listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
