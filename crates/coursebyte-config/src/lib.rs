//! # Coursebyte Config
//!
//! Configuration types for the Coursebyte API, loaded from environment
//! variables (a `.env` file is read by the binary before any of these run).
//!
//! - [`server`]: Listen address
//! - [`database`]: PostgreSQL connection settings
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`logging`]: Log file location
//!
//! # Example
//!
//! ```ignore
//! use coursebyte_config::{CorsConfig, DatabaseConfig, ServerConfig};
//!
//! let server = ServerConfig::from_env();
//! let database = DatabaseConfig::from_env();
//! let cors = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod logging;
pub mod server;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use logging::LogConfig;
pub use server::ServerConfig;

/// Reads `key` and parses it, falling back to `default` when the variable is
/// missing or unparsable.
pub(crate) fn env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparsable environment value");
            default
        }),
        Err(_) => default,
    }
}
