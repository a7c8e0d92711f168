use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    get_submissions_by_quiz, get_submissions_by_student, submit_quiz, submit_single_choice,
};

/// Merged into the `/api/quizzes` router.
pub fn init_quiz_submissions_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{quiz_id}/submissions",
            post(submit_quiz).get(get_submissions_by_quiz),
        )
        .route("/{quiz_id}/submissions/single", post(submit_single_choice))
}

/// Mounted under `/api/students`.
pub fn init_student_submissions_router() -> Router<AppState> {
    Router::new().route(
        "/{student_id}/quiz-submissions",
        get(get_submissions_by_student),
    )
}
