use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_quiz, delete_quiz, get_quiz_by_module, get_quiz_with_questions, get_quizzes_by_course,
};

/// Mounted under `/api/quizzes`.
pub fn init_quizzes_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_quiz))
        .route("/{quiz_id}", get(get_quiz_with_questions).delete(delete_quiz))
}

/// Merged into the `/api/courses` router.
pub fn init_course_quizzes_router() -> Router<AppState> {
    Router::new().route("/{course_id}/quizzes", get(get_quizzes_by_course))
}

/// Merged into the `/api/modules` router.
pub fn init_module_quiz_router() -> Router<AppState> {
    Router::new().route("/{module_id}/quiz", get(get_quiz_by_module))
}
