use axum::{
    Router,
    routing::{get, patch, put},
};

use crate::state::AppState;

use super::controller::{
    add_lesson, add_module, delete_lesson, delete_module, get_course_modules,
    get_course_structure, get_lesson, get_module_lessons, get_module_with_lessons,
    reorder_lessons, reorder_modules, update_lesson, update_lesson_order, update_module,
    update_module_order,
};

/// Mounted under `/api/courses`.
pub fn init_course_structure_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{course_id}/modules",
            get(get_course_modules).post(add_module),
        )
        .route("/{course_id}/modules/order", put(reorder_modules))
        .route("/{course_id}/modules/{module_id}", put(update_module))
        .route("/{course_id}/structure", get(get_course_structure))
}

/// Mounted under `/api/modules`.
pub fn init_modules_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{module_id}",
            get(get_module_with_lessons).delete(delete_module),
        )
        .route("/{module_id}/order", patch(update_module_order))
        .route(
            "/{module_id}/lessons",
            get(get_module_lessons).post(add_lesson),
        )
        .route("/{module_id}/lessons/order", put(reorder_lessons))
        .route("/{module_id}/lessons/{lesson_id}", put(update_lesson))
}

/// Mounted under `/api/lessons`.
pub fn init_lessons_router() -> Router<AppState> {
    Router::new()
        .route("/{lesson_id}", get(get_lesson).delete(delete_lesson))
        .route("/{lesson_id}/order", patch(update_lesson_order))
}
