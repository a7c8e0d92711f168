pub mod controller;
pub mod model;
pub mod router;
pub mod scoring;
pub mod service;

pub use model::*;
pub use router::{init_quiz_submissions_router, init_student_submissions_router};
