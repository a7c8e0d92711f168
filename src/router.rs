use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::quizzes::{
    init_course_quizzes_router, init_module_quiz_router, init_quizzes_router,
};
use crate::modules::structure::{
    init_course_structure_router, init_lessons_router, init_modules_router,
};
use crate::modules::submissions::{
    init_quiz_submissions_router, init_student_submissions_router,
};
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest(
                    "/courses",
                    init_course_structure_router().merge(init_course_quizzes_router()),
                )
                .nest(
                    "/modules",
                    init_modules_router().merge(init_module_quiz_router()),
                )
                .nest("/lessons", init_lessons_router())
                .nest(
                    "/quizzes",
                    init_quizzes_router().merge(init_quiz_submissions_router()),
                )
                .nest("/students", init_student_submissions_router()),
        )
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}
