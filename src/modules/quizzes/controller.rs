use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use coursebyte_core::{AppError, ErrorResponse};
use tracing::instrument;

use crate::modules::quizzes::model::{
    CourseId, CreateQuizDto, ModuleId, Quiz, QuizDetail, QuizId, QuizSummary,
};
use crate::modules::quizzes::service::QuizService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/quizzes",
    request_body = CreateQuizDto,
    responses(
        (status = 201, description = "Quiz created with all questions and options", body = QuizSummary),
        (status = 400, description = "Module belongs to another course", body = ErrorResponse),
        (status = 404, description = "Course or module not found", body = ErrorResponse),
        (status = 409, description = "Module already has a quiz", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Quizzes"
)]
#[instrument(skip(state, dto))]
pub async fn create_quiz(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateQuizDto>,
) -> Result<(StatusCode, Json<QuizSummary>), AppError> {
    let quiz = QuizService::create_quiz(state.repo.as_ref(), dto).await?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

#[utoipa::path(
    get,
    path = "/api/quizzes/{quiz_id}",
    params(
        ("quiz_id" = Uuid, Path, description = "Quiz ID")
    ),
    responses(
        (status = 200, description = "Quiz with questions and options", body = QuizDetail),
        (status = 404, description = "Quiz not found", body = ErrorResponse)
    ),
    tag = "Quizzes"
)]
#[instrument(skip(state))]
pub async fn get_quiz_with_questions(
    State(state): State<AppState>,
    Path(quiz_id): Path<QuizId>,
) -> Result<Json<QuizDetail>, AppError> {
    let quiz = QuizService::get_quiz_with_questions(state.repo.as_ref(), quiz_id).await?;

    Ok(Json(quiz))
}

#[utoipa::path(
    delete,
    path = "/api/quizzes/{quiz_id}",
    params(
        ("quiz_id" = Uuid, Path, description = "Quiz ID")
    ),
    responses(
        (status = 204, description = "Quiz deleted"),
        (status = 404, description = "Quiz not found", body = ErrorResponse),
        (status = 409, description = "Quiz has submissions", body = ErrorResponse)
    ),
    tag = "Quizzes"
)]
#[instrument(skip(state))]
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<QuizId>,
) -> Result<StatusCode, AppError> {
    QuizService::delete_quiz(state.repo.as_ref(), quiz_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/quizzes",
    params(
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Quizzes of the course", body = Vec<Quiz>),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Quizzes"
)]
#[instrument(skip(state))]
pub async fn get_quizzes_by_course(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
) -> Result<Json<Vec<Quiz>>, AppError> {
    let quizzes = QuizService::get_quizzes_by_course(state.repo.as_ref(), course_id).await?;

    Ok(Json(quizzes))
}

#[utoipa::path(
    get,
    path = "/api/modules/{module_id}/quiz",
    params(
        ("module_id" = Uuid, Path, description = "Module ID")
    ),
    responses(
        (status = 200, description = "The module's quiz", body = Quiz),
        (status = 404, description = "Module not found or has no quiz", body = ErrorResponse)
    ),
    tag = "Quizzes"
)]
#[instrument(skip(state))]
pub async fn get_quiz_by_module(
    State(state): State<AppState>,
    Path(module_id): Path<ModuleId>,
) -> Result<Json<Quiz>, AppError> {
    let quiz = QuizService::get_quiz_by_module(state.repo.as_ref(), module_id).await?;

    Ok(Json(quiz))
}
