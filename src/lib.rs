//! # Coursebyte API
//!
//! A REST API built with Rust, Axum, and PostgreSQL that maintains the
//! ordered structure of courses (modules and lessons) and authors and grades
//! quizzes.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── modules/
//! │   ├── structure/    # Modules and lessons, sibling ordering
//! │   ├── quizzes/      # Quiz authoring
//! │   └── submissions/  # Exact-match grading, one attempt per student
//! ├── docs.rs           # OpenAPI document
//! ├── logging.rs        # Request logging middleware, subscriber setup
//! ├── router.rs         # Main application router
//! ├── state.rs          # Shared application state
//! └── validator.rs      # Validated JSON extractor
//! ```
//!
//! Each feature module follows the same layout:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: business rules, generic over the repository
//! - `model.rs`: re-exports of the entities and DTOs it uses
//! - `router.rs`: Axum router configuration
//!
//! Storage lives behind the traits in [`coursebyte_db::repository`]; the
//! services never see a database session, so the same rules run against
//! PostgreSQL and the in-memory store.
//!
//! ## Invariants
//!
//! - Order indices are positive and unique among siblings. Gaps are allowed
//!   until a bulk reorder renumbers `1..=N`.
//! - A module with lessons cannot be deleted; neither can a quiz with
//!   submissions.
//! - A module carries at most one quiz.
//! - A student submits a quiz at most once. A question scores its points
//!   iff the selected options equal the correct options exactly.
//!
//! ## API Documentation
//!
//! When the server is running:
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod docs;
pub mod logging;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use coursebyte_config;
pub use coursebyte_core;
pub use coursebyte_db;
pub use coursebyte_models;
