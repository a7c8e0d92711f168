pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::*;
pub use router::{init_course_quizzes_router, init_module_quiz_router, init_quizzes_router};
