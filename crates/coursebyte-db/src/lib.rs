//! # Coursebyte DB
//!
//! Data access for the Coursebyte API.
//!
//! The engines in the main crate never talk to a database session directly;
//! they call the narrow query shapes declared in [`repository`]. Two
//! implementations exist:
//!
//! - [`PgRepository`]: PostgreSQL via SQLx. Uniqueness and "has dependents"
//!   rules are backed by constraints and row locks so concurrent callers
//!   cannot both succeed.
//! - [`MemoryRepository`]: a single-lock in-memory store with the same
//!   constraint semantics, used by tests and local experiments.
//!
//! # Example
//!
//! ```ignore
//! use coursebyte_db::{init_db_pool, PgRepository, MIGRATOR};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()).await?;
//! MIGRATOR.run(&pool).await?;
//! let repo = PgRepository::new(pool);
//! ```

use anyhow::Context;
use coursebyte_config::DatabaseConfig;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

pub mod conflicts;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;
pub use repository::{CourseDirectory, QuizRepository, Repository, StructureRepository};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Embedded schema migrations from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Opens a PostgreSQL connection pool.
///
/// Fails if `DATABASE_URL` is unset or the database is unreachable.
pub async fn init_db_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let url = config
        .url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(max_connections = config.max_connections, "Database pool ready");

    Ok(pool)
}
