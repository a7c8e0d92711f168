pub mod controller;
pub mod model;
pub mod ordering;
pub mod router;
pub mod service;

pub use model::*;
pub use router::{init_course_structure_router, init_lessons_router, init_modules_router};
