use anyhow::Context;
use clap::{Parser, Subcommand};
use coursebyte::logging::init_tracing;
use coursebyte::router::init_router;
use coursebyte::state::AppState;
use coursebyte_config::{CorsConfig, DatabaseConfig, LogConfig, ServerConfig};
use coursebyte_db::{MIGRATOR, PgRepository, init_db_pool};
use dotenvy::dotenv;
use tracing::info;

#[derive(Parser)]
#[command(name = "coursebyte")]
#[command(about = "Coursebyte - course structure and quiz assessment API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run pending migrations, then serve the HTTP API
    Serve,
    /// Run pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&LogConfig::from_env())?;

    let pool = init_db_pool(&DatabaseConfig::from_env()).await?;
    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Migrations applied");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Migrate => Ok(()),
        Commands::Serve => serve(PgRepository::new(pool)).await,
    }
}

async fn serve(repo: PgRepository) -> anyhow::Result<()> {
    let server = ServerConfig::from_env();
    let state = AppState::new(repo, CorsConfig::from_env());
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(server.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", server.bind_address()))?;

    info!(address = %server.bind_address(), "Server running");
    info!("Swagger UI available at /swagger-ui, Scalar at /scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
