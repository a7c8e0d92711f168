//! # Coursebyte Core
//!
//! Foundational types shared by every Coursebyte crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//!
//! # Example
//!
//! ```ignore
//! use coursebyte_core::AppError;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Module not found"));
//! assert_eq!(error.status, axum::http::StatusCode::NOT_FOUND);
//! ```

pub mod errors;

pub use errors::{AppError, ErrorResponse};
