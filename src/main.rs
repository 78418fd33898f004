use anyhow::Context;
use clap::{Parser, Subcommand};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use tableside::config::Config;
use tableside::db::{self, AppState};
use tableside::email::EmailService;
use tableside::handlers;
use tableside::jwt::TokenService;

#[derive(Parser)]
#[command(name = "tableside", version, about = "Authentication and account service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the database schema and exit
    InitDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tableside=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command.unwrap_or(Command::Serve) {
        Command::InitDb => init_db(&config),
        Command::Serve => serve(config).await,
    }
}

fn build_pool(config: &Config) -> anyhow::Result<db::DbPool> {
    let manager = SqliteConnectionManager::file(&config.database_path);
    Pool::new(manager).context("failed to build connection pool")
}

fn init_db(config: &Config) -> anyhow::Result<()> {
    let pool = build_pool(config)?;
    let conn = pool.get()?;
    db::init_db(&conn)?;
    tracing::info!(path = %config.database_path, "database initialized");
    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    if config.dev_mode {
        tracing::info!("running in dev mode");
    }

    let pool = build_pool(&config)?;
    {
        let conn = pool.get()?;
        db::init_db(&conn)?;
    }

    let state = AppState {
        db: pool,
        tokens: TokenService::new(&config.jwt_secret, config.token_ttl_secs),
        email: EmailService::from_config(&config),
        bcrypt_cost: config.bcrypt_cost,
    };

    let app = handlers::app(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await.context("server error")
}
